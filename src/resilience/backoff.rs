//! Exponential backoff.

use std::time::Duration;

use crate::config::RetryConfig;

/// Unjittered exponential backoff: `base * factor^(retry - 1)`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    pub base: Duration,
    pub factor: u32,
    pub max: Duration,
}

impl ExponentialBackoff {
    pub fn new(base: Duration, factor: u32, max: Duration) -> Self {
        Self { base, factor, max }
    }

    /// Delay to wait before retry number `retry` (1-based).
    ///
    /// Retry 0 is the first attempt and never waits.
    pub fn delay(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }

        let multiplier = self.factor.saturating_pow(retry - 1);
        self.base.saturating_mul(multiplier).min(self.max)
    }
}

impl From<&RetryConfig> for ExponentialBackoff {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            Duration::from_millis(config.base_delay_ms),
            config.factor,
            Duration::from_millis(config.max_delay_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ExponentialBackoff {
        ExponentialBackoff::from(&RetryConfig::default())
    }

    #[test]
    fn doubles_from_base() {
        let b = reference();
        assert_eq!(b.delay(1), Duration::from_millis(200));
        assert_eq!(b.delay(2), Duration::from_millis(400));
        assert_eq!(b.delay(3), Duration::from_millis(800));
    }

    #[test]
    fn first_attempt_has_no_delay() {
        assert_eq!(reference().delay(0), Duration::ZERO);
    }

    #[test]
    fn capped_at_max() {
        let b = ExponentialBackoff::new(Duration::from_millis(100), 2, Duration::from_millis(1000));
        assert_eq!(b.delay(4), Duration::from_millis(800));
        assert_eq!(b.delay(5), Duration::from_millis(1000));
        assert_eq!(b.delay(64), Duration::from_millis(1000));
    }

    #[test]
    fn factor_one_is_constant() {
        let b = ExponentialBackoff::new(Duration::from_millis(250), 1, Duration::from_secs(10));
        assert_eq!(b.delay(1), b.delay(7));
    }
}
