//! Backoff configuration.

use crate::backoff;
use crate::error::BackoffConfigError;
use std::time::Duration;

/// Configuration for one retrying call site.
///
/// Fields are private so that every instance has passed validation:
/// `initial_delay > 0`, `max_delay >= initial_delay`, `multiplier >= 1.0`
/// and `max_attempts >= 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffConfig {
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    max_attempts: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            max_attempts: 3,
        }
    }
}

impl BackoffConfig {
    /// Create a validated config.
    pub fn new(
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: f64,
        max_attempts: u32,
    ) -> Result<Self, BackoffConfigError> {
        if initial_delay.is_zero() {
            return Err(BackoffConfigError::ZeroInitialDelay);
        }
        if max_delay < initial_delay {
            return Err(BackoffConfigError::MaxBelowInitial {
                initial: initial_delay,
                max: max_delay,
            });
        }
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(BackoffConfigError::InvalidMultiplier(multiplier));
        }
        if max_attempts == 0 {
            return Err(BackoffConfigError::ZeroAttempts);
        }
        Ok(Self {
            initial_delay,
            max_delay,
            multiplier,
            max_attempts,
        })
    }

    /// Create a builder seeded with the defaults.
    #[must_use]
    pub fn builder() -> BackoffConfigBuilder {
        BackoffConfigBuilder::default()
    }

    /// Config that makes exactly one attempt.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before the first retry.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Upper bound for any single delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Growth factor applied per retry.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Total number of attempts, including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Sum of all backoff waits if every attempt fails with a retryable error.
    ///
    /// This excludes the time spent in the operations themselves.
    pub fn worst_case_wait(&self) -> Duration {
        (0..self.max_attempts.saturating_sub(1))
            .map(|index| backoff::delay(index, self))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

/// Builder for [`BackoffConfig`].
#[derive(Debug, Default)]
pub struct BackoffConfigBuilder {
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    multiplier: Option<f64>,
    max_attempts: Option<u32>,
}

impl BackoffConfigBuilder {
    /// Set initial delay.
    #[must_use]
    pub fn initial_delay(mut self, d: Duration) -> Self {
        self.initial_delay = Some(d);
        self
    }

    /// Set max delay.
    #[must_use]
    pub fn max_delay(mut self, d: Duration) -> Self {
        self.max_delay = Some(d);
        self
    }

    /// Set multiplier.
    #[must_use]
    pub fn multiplier(mut self, m: f64) -> Self {
        self.multiplier = Some(m);
        self
    }

    /// Set max attempts.
    #[must_use]
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = Some(n);
        self
    }

    /// Validate and build the config.
    pub fn build(self) -> Result<BackoffConfig, BackoffConfigError> {
        let defaults = BackoffConfig::default();
        BackoffConfig::new(
            self.initial_delay.unwrap_or(defaults.initial_delay),
            self.max_delay.unwrap_or(defaults.max_delay),
            self.multiplier.unwrap_or(defaults.multiplier),
            self.max_attempts.unwrap_or(defaults.max_attempts),
        )
    }
}
