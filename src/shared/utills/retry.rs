//! Retry policy with exponential backoff
//!
//! Used by the record store to re-run a read-modify-write cycle after a
//! version conflict.

use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first one).
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_multiplier: f64,
    /// Maximum delay between retries (cap).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(200),
        }
    }
}

impl RetryConfig {
    /// Delay to wait after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self
            .backoff_multiplier
            .powi(attempt.saturating_sub(1) as i32);
        Duration::from_secs_f64(
            (self.initial_delay.as_secs_f64() * factor).min(self.max_delay.as_secs_f64()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_and_is_capped() {
        let cfg = RetryConfig {
            max_attempts: 10,
            initial_delay: Duration::from_millis(10),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_millis(50),
        };
        assert_eq!(cfg.delay_after(1), Duration::from_millis(10));
        assert_eq!(cfg.delay_after(2), Duration::from_millis(20));
        assert_eq!(cfg.delay_after(3), Duration::from_millis(40));
        assert_eq!(cfg.delay_after(4), Duration::from_millis(50));
    }
}
