use std::time::Duration;

use async_std::future::timeout;
use async_std::process::{Command, Stdio};
use async_trait::async_trait;

/// Extra time granted to the `ping` child beyond its own timeout before it is killed.
const GRACE: Duration = Duration::from_secs(2);
/// Upper bound on how long a single `ping` child may run.
const MAX_DEADLINE: Duration = Duration::from_secs(24 * 60 * 60);

/// One liveness check against a host.
///
/// Implementations are a fail-safe boundary: every transport fault is
/// reported as "unreachable", never as an error.
#[async_trait]
pub trait Prober {
    async fn probe(&self, host: &str, timeout_ms: u64) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Whole seconds for `ping -W`, rounding half to even and never below one.
fn whole_seconds(timeout_ms: u64) -> u64 {
    let (secs, rest) = (timeout_ms / 1000, timeout_ms % 1000);
    let secs = if rest > 500 || (rest == 500 && secs % 2 == 1) {
        secs + 1
    } else {
        secs
    };
    secs.max(1)
}

/// Arguments for a single echo request; Unix `ping -W` only takes whole seconds.
pub fn ping_args(platform: Platform, host: &str, timeout_ms: u64) -> Vec<String> {
    match platform {
        Platform::Windows => vec![
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            timeout_ms.to_string(),
            host.to_string(),
        ],
        Platform::Unix => {
            let timeout_s = whole_seconds(timeout_ms);
            vec![
                "-c".to_string(),
                "1".to_string(),
                "-W".to_string(),
                timeout_s.to_string(),
                host.to_string(),
            ]
        }
    }
}

/// Shells out to the system `ping`.
pub struct PingProber {
    program: String,
    platform: Platform,
}

impl Default for PingProber {
    fn default() -> Self {
        PingProber {
            program: "ping".to_string(),
            platform: Platform::current(),
        }
    }
}

impl PingProber {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn with_program(program: impl Into<String>) -> Self {
        PingProber {
            program: program.into(),
            platform: Platform::current(),
        }
    }
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, host: &str, timeout_ms: u64) -> bool {
        let child = Command::new(&self.program)
            .args(ping_args(self.platform, host, timeout_ms))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();
        let mut child = match child {
            Ok(child) => child,
            Err(err) => {
                log::debug!("unable to spawn {}: {}", self.program, err);
                return false;
            }
        };

        let deadline = Duration::from_millis(timeout_ms)
            .saturating_add(GRACE)
            .min(MAX_DEADLINE);
        match timeout(deadline, child.status()).await {
            Ok(Ok(status)) => {
                log::trace!("ping {} exited with {}", host, status);
                status.success()
            }
            Ok(Err(err)) => {
                log::debug!("unable to ping {}: {}", host, err);
                false
            }
            Err(_) => {
                log::debug!("ping {} did not finish in time", host);
                false
            }
        }
    }
}
