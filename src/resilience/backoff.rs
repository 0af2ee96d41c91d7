//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Retry delay policy: `base * 2^(attempt-1)`, capped at `max`, plus up to
/// 10% jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    max: Duration,
}

impl Backoff {
    /// Create a policy from millisecond bounds.
    pub fn from_millis(base_ms: u64, max_ms: u64) -> Self {
        Self {
            base: Duration::from_millis(base_ms),
            max: Duration::from_millis(max_ms.max(base_ms)),
        }
    }

    /// Delay before retry `attempt` (1-based). Attempt 0 waits nothing.
    pub fn delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let base_ms = self.base.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        let exponential = 2u64.saturating_pow(attempt - 1);
        let capped = base_ms.saturating_mul(exponential).min(max_ms);

        let jitter_range = capped / 10;
        let jitter = if jitter_range > 0 {
            rand::thread_rng().gen_range(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(capped + jitter)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::from_millis(500, 10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        let backoff = Backoff::from_millis(100, 1_000);
        assert_eq!(backoff.delay(0), Duration::ZERO);

        let first = backoff.delay(1);
        assert!(first >= Duration::from_millis(100) && first < Duration::from_millis(110));

        let second = backoff.delay(2);
        assert!(second >= Duration::from_millis(200));

        let capped = backoff.delay(30);
        assert!(capped >= Duration::from_millis(1_000) && capped < Duration::from_millis(1_100));
    }

    #[test]
    fn test_max_never_below_base() {
        let backoff = Backoff::from_millis(500, 10);
        assert!(backoff.delay(3) >= Duration::from_millis(500));
    }
}
