//! Exponential backoff.

use crate::config::BackoffConfig;
use std::time::Duration;

/// Delay to wait before retry number `attempt_index` (0-based).
///
/// `attempt_index == 0` is the wait after the first attempt failed. The
/// result is `min(initial_delay * multiplier^attempt_index, max_delay)`,
/// computed in nanoseconds so whole-millisecond inputs stay exact. Any
/// overflow of the exponential term saturates to `max_delay`.
pub fn delay(attempt_index: u32, config: &BackoffConfig) -> Duration {
    let initial = config.initial_delay();
    let max = config.max_delay();
    if attempt_index == 0 {
        return initial.min(max);
    }

    let max_nanos = max.as_nanos() as f64;
    let factor = config.multiplier().powf(f64::from(attempt_index));
    let raw = initial.as_nanos() as f64 * factor;

    if !raw.is_finite() || raw >= max_nanos {
        return max;
    }
    // f64 rounding must not drop below the first delay
    // float-to-int casts saturate
    Duration::from_nanos(raw as u64).max(initial).min(max)
}

/// Exponential backoff bound to one [`BackoffConfig`].
#[derive(Debug, Clone, Default)]
pub struct ExponentialBackoff {
    config: BackoffConfig,
}

impl ExponentialBackoff {
    /// Create a backoff from a config.
    #[must_use]
    pub fn new(config: BackoffConfig) -> Self {
        Self { config }
    }

    /// The underlying config.
    pub fn config(&self) -> &BackoffConfig {
        &self.config
    }

    /// Calculate delay for a 0-based retry index.
    pub fn calculate_delay(&self, attempt_index: u32) -> Duration {
        delay(attempt_index, &self.config)
    }

    /// Iterate over the waits between consecutive attempts.
    ///
    /// Yields `max_attempts - 1` values.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.config.max_attempts().saturating_sub(1)).map(|index| self.calculate_delay(index))
    }
}

impl From<BackoffConfig> for ExponentialBackoff {
    fn from(config: BackoffConfig) -> Self {
        Self::new(config)
    }
}
