pub mod event;
pub mod state;

use std::time::{Duration, Instant};

use async_channel::Receiver;
use async_std::task;
use futures_lite::future;

use crate::config::MonitorConfig;
use crate::probe::Prober;
use crate::wol::{self, Transmitter};
use event::{EventSink, MonitorEvent};
use state::{MonitorState, TargetStatus};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("wake trigger failed: {0}")]
    Wol(#[from] wol::Error),
}

/// What a single polling round decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Up,
    /// Target and network reference both unreachable.
    Suppressed,
    Woke,
    CoolingDown(Duration),
}

/// Watches the target host and wakes it when it is down while the network is up.
pub struct Monitor<P, T, S>
where
    P: Prober,
    T: Transmitter,
    S: EventSink,
{
    config: MonitorConfig,
    state: MonitorState,
    prober: P,
    transmitter: T,
    sink: S,
}

impl<P, T, S> Monitor<P, T, S>
where
    P: Prober,
    T: Transmitter,
    S: EventSink,
{
    pub fn new(config: MonitorConfig, prober: P, transmitter: T, sink: S) -> Self {
        let state = MonitorState::new(config.wol_cooldown);
        Monitor {
            config,
            state,
            prober,
            transmitter,
            sink,
        }
    }
    pub fn state(&self) -> &MonitorState {
        &self.state
    }
    pub fn transmitter(&self) -> &T {
        &self.transmitter
    }
    pub fn sink(&self) -> &S {
        &self.sink
    }
    /// Runs until the process is terminated or a wake trigger fails.
    pub async fn run_forever(&mut self) -> Result<(), Error> {
        let (_keep_open, shutdown) = async_channel::bounded(1);
        self.run(shutdown).await
    }
    /// Polls every `check_interval` until `shutdown` is closed or receives a message.
    ///
    /// The interval sleep is the only suspension point between ticks; shutdown is
    /// also checked before each probe.
    pub async fn run(&mut self, shutdown: Receiver<()>) -> Result<(), Error> {
        self.sink.emit(MonitorEvent::Started {
            target: self.config.target_host.clone(),
            mac_address: self.config.target_mac.clone(),
            reference: self.config.reference_host.clone(),
        });
        loop {
            if shutdown.is_closed() {
                break;
            }
            let network_up = self.probe_reference().await;
            if shutdown.is_closed() {
                break;
            }
            let target_up = self.probe_target().await;
            let tick = self.decide(Instant::now(), network_up, target_up).await?;
            log::trace!("tick finished with {:?}", tick);

            if shutdown.is_closed() {
                break;
            }
            let interval = self.config.check_interval;
            let stopped = future::or(
                async {
                    task::sleep(interval).await;
                    false
                },
                async {
                    shutdown.recv().await.ok();
                    true
                },
            )
            .await;
            if stopped {
                break;
            }
        }
        log::info!("Monitor stopped");
        Ok(())
    }
    /// Probes both hosts and applies the wake policy as of `now`.
    pub async fn tick(&mut self, now: Instant) -> Result<Tick, Error> {
        let network_up = self.probe_reference().await;
        let target_up = self.probe_target().await;
        self.decide(now, network_up, target_up).await
    }
    async fn probe_reference(&self) -> bool {
        let host = &self.config.reference_host;
        let up = self.prober.probe(host, self.config.ping_timeout_ms).await;
        log::debug!("network check host {} up={}", host, up);
        up
    }
    async fn probe_target(&self) -> bool {
        let host = &self.config.target_host;
        let up = self.prober.probe(host, self.config.ping_timeout_ms).await;
        log::debug!("target {} up={}", host, up);
        up
    }
    async fn decide(
        &mut self,
        now: Instant,
        network_up: bool,
        target_up: bool,
    ) -> Result<Tick, Error> {
        let status = TargetStatus::from(target_up);
        if let Some(from) = self.state.observe(status) {
            self.sink.emit(MonitorEvent::StatusChanged {
                target: self.config.target_host.clone(),
                from,
                to: status,
            });
        }

        if target_up {
            return Ok(Tick::Up);
        }
        if !network_up {
            // likely a power or network outage, broadcasting would be pointless
            self.sink.emit(MonitorEvent::OutageSuppressed {
                reference: self.config.reference_host.clone(),
            });
            return Ok(Tick::Suppressed);
        }

        match self.state.cooldown_remaining(now) {
            None => {
                self.sink.emit(MonitorEvent::WakeTriggered {
                    mac_address: self.config.target_mac.clone(),
                });
                self.transmitter
                    .send_wake(
                        &self.config.target_mac,
                        self.config.broadcast,
                        self.config.wol_port,
                    )
                    .await?;
                self.state.record_wake(now);
                Ok(Tick::Woke)
            }
            Some(remaining) => {
                self.sink.emit(MonitorEvent::CooldownWait {
                    remaining_secs: remaining.as_secs(),
                });
                Ok(Tick::CoolingDown(remaining))
            }
        }
    }
}
