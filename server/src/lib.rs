#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod monitor;
pub mod probe;
pub mod wol;

pub mod prelude {
    pub use super::config::{ConfigError, MonitorConfig, DEFAULT_CONFIG_PATH};
    pub use super::monitor::event::{EventSink, LogSink, MonitorEvent};
    pub use super::monitor::{Error, Monitor, Tick};
    pub use super::probe::{PingProber, Prober};
    pub use super::wol::{Transmitter, UdpTransmitter};
}
