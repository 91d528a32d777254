use std::fmt;

use super::state::TargetStatus;

/// Operator-facing notices, one variant per kind of event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MonitorEvent {
    Started {
        target: String,
        mac_address: String,
        reference: String,
    },
    StatusChanged {
        target: String,
        from: TargetStatus,
        to: TargetStatus,
    },
    OutageSuppressed {
        reference: String,
    },
    WakeTriggered {
        mac_address: String,
    },
    CooldownWait {
        remaining_secs: u64,
    },
}

impl fmt::Display for MonitorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorEvent::Started {
                target,
                mac_address,
                reference,
            } => write!(
                f,
                "Starting monitor: WOL target={} ({}), network check={}",
                target, mac_address, reference
            ),
            MonitorEvent::StatusChanged { target, to, .. } => {
                write!(f, "WOL server state change: {} is {}", target, to)
            }
            MonitorEvent::OutageSuppressed { reference } => write!(
                f,
                "Network check host {} unreachable. Skipping WOL.",
                reference
            ),
            MonitorEvent::WakeTriggered { mac_address } => write!(
                f,
                "WOL conditions met. Sending magic packet to {}...",
                mac_address
            ),
            MonitorEvent::CooldownWait { remaining_secs } => write!(
                f,
                "Waiting for cooldown ({}s) before sending WOL again.",
                remaining_secs
            ),
        }
    }
}

pub trait EventSink {
    fn emit(&mut self, event: MonitorEvent);
}

/// Forwards events to the `log` facade.
#[derive(Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::OutageSuppressed { .. } => log::warn!("{}", event),
            _ => log::info!("{}", event),
        }
    }
}

/// Collects events in memory.
impl EventSink for Vec<MonitorEvent> {
    fn emit(&mut self, event: MonitorEvent) {
        self.push(event);
    }
}
