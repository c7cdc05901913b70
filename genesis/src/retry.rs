//! Polling policy for payment confirmation.
//!
//! The default policy polls every five seconds with no growth and no
//! ceiling. Ceilings and backoff are opt-in.

use std::time::Duration;

/// Delay between confirmation checks unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    interval: Duration,
    multiplier: f64,
    max_delay: Option<Duration>,
    max_attempts: Option<u32>,
    max_elapsed: Option<Duration>,
}

impl RetryPolicy {
    /// Constant delay, unbounded.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            multiplier: 1.0,
            max_delay: None,
            max_attempts: None,
            max_elapsed: None,
        }
    }

    /// Grow the delay by `multiplier` after each negative answer, capped at
    /// `max_delay`. Multipliers below 1 (or NaN) are treated as 1.
    pub fn with_backoff(mut self, multiplier: f64, max_delay: Option<Duration>) -> Self {
        self.multiplier = if multiplier >= 1.0 && multiplier.is_finite() {
            multiplier
        } else {
            1.0
        };
        self.max_delay = max_delay;
        self
    }

    /// Stop after this many checks.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    /// Stop once waiting any longer would pass `limit` since the first check.
    pub fn with_max_elapsed(mut self, limit: Duration) -> Self {
        self.max_elapsed = Some(limit);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none() && self.max_elapsed.is_none()
    }

    /// Delay after the `attempt`-th negative answer (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = if self.multiplier == 1.0 {
            self.interval
        } else {
            let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
            let secs = self.interval.as_secs_f64() * self.multiplier.powi(exponent);
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        };
        match self.max_delay {
            Some(cap) => base.min(cap),
            None => base,
        }
    }

    /// Delay before the next check, or `None` when the policy gives up.
    ///
    /// `attempt` is the number of checks made so far, `elapsed` the time
    /// since the first one.
    pub fn next_delay(&self, attempt: u32, elapsed: Duration) -> Option<Duration> {
        if let Some(max) = self.max_attempts {
            if attempt >= max {
                return None;
            }
        }
        let delay = self.delay_for(attempt);
        if let Some(limit) = self.max_elapsed {
            if elapsed.saturating_add(delay) > limit {
                return None;
            }
        }
        Some(delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_POLL_INTERVAL)
    }
}
