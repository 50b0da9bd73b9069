//! # statlink-retries
//!
//! Backoff and retry executors for statlink.
//!
//! This crate knows nothing about HTTP or the analysis service. It runs an
//! async operation up to a bounded number of times, waits an exponentially
//! growing delay between attempts, and asks a [`RetryPredicate`] whether a
//! failure is worth another attempt.
//!
//! ## Core Concepts
//!
//! - **[`BackoffConfig`]**: Validated delay curve and attempt budget
//! - **[`backoff::delay`]**: `min(initial * multiplier^index, max)`
//! - **[`RetryPredicate`]**: Determine which errors are transient
//! - **[`with_retry`]**: Retry and propagate the original last error
//! - **[`with_retry_result`]**: Retry and always return a [`RetryResult`]
//! - **[`Retry`]**: Builder adding cancellation of pending waits
//!
//! ## Example
//!
//! ```ignore
//! use statlink_retries::{with_retry_result, BackoffConfig, RetryResult};
//! use std::time::Duration;
//!
//! let config = BackoffConfig::builder()
//!     .initial_delay(Duration::from_millis(500))
//!     .max_delay(Duration::from_secs(8))
//!     .max_attempts(4)
//!     .build()?;
//!
//! match with_retry_result(&config, |e: &io::Error| is_transient(e), || fetch()).await {
//!     RetryResult::Success { data, attempts } => { /* ... */ }
//!     RetryResult::Failure { error, .. } | RetryResult::Cancelled { error, .. } => { /* ... */ }
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod backoff;
pub mod config;
pub mod error;
pub mod executor;
pub mod strategy;

// Re-exports
pub use backoff::ExponentialBackoff;
pub use config::{BackoffConfig, BackoffConfigBuilder};
pub use error::BackoffConfigError;
pub use executor::{with_retry, with_retry_result, Retry, RetryResult};
pub use strategy::{AlwaysRetry, NoRetry, RetryPredicate};
pub use tokio_util::sync::CancellationToken;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        with_retry, with_retry_result, BackoffConfig, CancellationToken, ExponentialBackoff,
        Retry, RetryPredicate, RetryResult,
    };
}
