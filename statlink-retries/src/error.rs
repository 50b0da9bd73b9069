//! Retry configuration errors.

use std::time::Duration;
use thiserror::Error;

/// Errors raised when a [`BackoffConfig`](crate::BackoffConfig) is invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackoffConfigError {
    /// Initial delay must be strictly positive.
    #[error("initial delay must be greater than zero")]
    ZeroInitialDelay,

    /// Maximum delay is smaller than the initial delay.
    #[error("max delay {max:?} is smaller than initial delay {initial:?}")]
    MaxBelowInitial {
        /// Configured initial delay.
        initial: Duration,
        /// Configured maximum delay.
        max: Duration,
    },

    /// Multiplier must be finite and at least 1.0.
    #[error("backoff multiplier must be a finite value >= 1.0, got {0}")]
    InvalidMultiplier(f64),

    /// At least one attempt is required.
    #[error("max attempts must be at least 1")]
    ZeroAttempts,
}
