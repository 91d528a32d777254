use std::time::{Duration, Instant};

/// Enforces a minimum interval between wake triggers.
///
/// The first trigger is always allowed, whatever the interval.
#[derive(Clone, Debug)]
pub struct Limiter {
    interval: Duration,
    last_sent: Option<Instant>,
}

impl Limiter {
    pub fn new(interval: Duration) -> Self {
        Limiter {
            interval,
            last_sent: None,
        }
    }
    /// Time left before the next trigger is allowed, `None` when it is allowed now.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let last_sent = self.last_sent?;
        let elapsed = now.saturating_duration_since(last_sent);
        if elapsed >= self.interval {
            None
        } else {
            Some(self.interval - elapsed)
        }
    }
    pub fn record(&mut self, now: Instant) {
        self.last_sent = Some(now);
    }
    pub fn last_sent(&self) -> Option<Instant> {
        self.last_sent
    }
}
