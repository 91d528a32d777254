use std::fmt;
use std::time::{Duration, Instant};

use crate::wol::Limiter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetStatus {
    Unknown,
    Up,
    Down,
}

impl From<bool> for TargetStatus {
    fn from(reachable: bool) -> Self {
        if reachable {
            TargetStatus::Up
        } else {
            TargetStatus::Down
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetStatus::Unknown => "UNKNOWN",
            TargetStatus::Up => "UP",
            TargetStatus::Down => "DOWN",
        })
    }
}

/// Everything the monitor remembers between ticks. Lives only in memory.
#[derive(Clone, Debug)]
pub struct MonitorState {
    status: TargetStatus,
    limiter: Limiter,
}

impl MonitorState {
    pub fn new(cooldown: Duration) -> Self {
        MonitorState {
            status: TargetStatus::Unknown,
            limiter: Limiter::new(cooldown),
        }
    }
    pub fn status(&self) -> TargetStatus {
        self.status
    }
    /// Stores `status`, returning the previous one if it changed.
    pub fn observe(&mut self, status: TargetStatus) -> Option<TargetStatus> {
        if self.status == status {
            return None;
        }
        let previous = self.status;
        self.status = status;
        Some(previous)
    }
    pub fn cooldown_remaining(&self, now: Instant) -> Option<Duration> {
        self.limiter.remaining(now)
    }
    pub fn record_wake(&mut self, now: Instant) {
        self.limiter.record(now);
    }
    pub fn last_wake(&self) -> Option<Instant> {
        self.limiter.last_sent()
    }
}
