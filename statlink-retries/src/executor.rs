//! Retry executors for running operations with retries.
//!
//! Two flavours share one loop:
//!
//! - [`with_retry`] returns `Result<T, E>` and hands back the *original*
//!   error of the last attempt.
//! - [`with_retry_result`] never fails; it returns a [`RetryResult`] that
//!   also reports how many attempts were made.
//!
//! Both accept an optional [`CancellationToken`] through [`Retry`]. The
//! token only interrupts backoff waits: an attempt that has started always
//! runs to completion.

use crate::backoff;
use crate::config::BackoffConfig;
use crate::strategy::{AlwaysRetry, RetryPredicate};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Outcome of a retried operation that never propagates failure.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryResult<T, E> {
    /// The operation succeeded on attempt `attempts`.
    Success {
        /// Value returned by the successful attempt.
        data: T,
        /// Number of operation invocations made.
        attempts: u32,
    },
    /// The last attempt failed and no further attempt was allowed.
    Failure {
        /// Error of the last attempt, unmodified.
        error: E,
        /// Number of operation invocations made.
        attempts: u32,
    },
    /// A pending backoff wait was cancelled.
    Cancelled {
        /// Error of the attempt that preceded the cancelled wait.
        error: E,
        /// Number of operation invocations made.
        attempts: u32,
    },
}

impl<T, E> RetryResult<T, E> {
    /// Number of operation invocations made.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. }
            | Self::Failure { attempts, .. }
            | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    /// Whether the operation eventually succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether a backoff wait was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Convert into a plain `Result`, dropping the attempt count.
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Success { data, .. } => Ok(data),
            Self::Failure { error, .. } | Self::Cancelled { error, .. } => Err(error),
        }
    }
}

/// Execute an operation with retries, propagating the last error.
///
/// # Example
///
/// ```ignore
/// use statlink_retries::{with_retry, BackoffConfig};
///
/// let config = BackoffConfig::default();
/// let value = with_retry(&config, |e: &MyError| e.is_transient(), || async {
///     fetch().await
/// })
/// .await?;
/// ```
pub async fn with_retry<F, Fut, T, E, P>(
    config: &BackoffConfig,
    predicate: P,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
    P: RetryPredicate<E>,
{
    Retry::new(config).retry_if(predicate).run(operation).await
}

/// Execute an operation with retries, capturing every failure.
pub async fn with_retry_result<F, Fut, T, E, P>(
    config: &BackoffConfig,
    predicate: P,
    operation: F,
) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
    P: RetryPredicate<E>,
{
    Retry::new(config)
        .retry_if(predicate)
        .run_result(operation)
        .await
}

/// Builder for retry operations.
pub struct Retry<'a, P = AlwaysRetry> {
    config: &'a BackoffConfig,
    predicate: P,
    cancel: Option<CancellationToken>,
}

impl<'a> Retry<'a, AlwaysRetry> {
    /// Create a new retry builder that retries every error.
    pub fn new(config: &'a BackoffConfig) -> Self {
        Self {
            config,
            predicate: AlwaysRetry,
            cancel: None,
        }
    }
}

impl<'a, P> Retry<'a, P> {
    /// Use `predicate` to decide which errors are retried.
    pub fn retry_if<Q>(self, predicate: Q) -> Retry<'a, Q> {
        Retry {
            config: self.config,
            predicate,
            cancel: self.cancel,
        }
    }

    /// Stop waiting between attempts once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Run the operation, propagating the last error unmodified.
    ///
    /// A cancelled wait also propagates the error of the preceding attempt.
    pub async fn run<F, Fut, T, E>(self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
        P: RetryPredicate<E>,
    {
        self.run_result(operation).await.into_result()
    }

    /// Run the operation and report the outcome without propagating.
    pub async fn run_result<F, Fut, T, E>(self, mut operation: F) -> RetryResult<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
        P: RetryPredicate<E>,
    {
        let max_attempts = self.config.max_attempts();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            debug!(attempt, max_attempts, "Executing retry attempt");

            let error = match operation().await {
                Ok(data) => {
                    return RetryResult::Success {
                        data,
                        attempts: attempt,
                    }
                }
                Err(error) => error,
            };

            if attempt >= max_attempts || !self.predicate.is_retryable(&error) {
                warn!(
                    attempt,
                    max_attempts,
                    error = %error,
                    "Retry exhausted or error not retryable"
                );
                return RetryResult::Failure {
                    error,
                    attempts: attempt,
                };
            }

            let wait = backoff::delay(attempt - 1, self.config);

            debug!(
                attempt,
                wait_ms = wait.as_millis() as u64,
                error = %error,
                "Waiting before retry"
            );

            if !pause(wait, self.cancel.as_ref()).await {
                debug!(attempt, "Retry wait cancelled");
                return RetryResult::Cancelled {
                    error,
                    attempts: attempt,
                };
            }
        }
    }
}

/// Sleep for `wait`. Returns `false` if the token fired first.
async fn pause(wait: Duration, cancel: Option<&CancellationToken>) -> bool {
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => false,
                _ = sleep(wait) => true,
            }
        }
        None => {
            sleep(wait).await;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::NoRetry;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    #[derive(Debug, Clone, PartialEq)]
    enum TestError {
        Transient(u32),
        Permanent,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Transient(n) => write!(f, "transient failure #{n}"),
                Self::Permanent => write!(f, "permanent failure"),
            }
        }
    }

    fn transient_only(error: &TestError) -> bool {
        matches!(error, TestError::Transient(_))
    }

    fn config(max_attempts: u32) -> BackoffConfig {
        BackoffConfig::builder()
            .initial_delay(Duration::from_millis(1000))
            .max_delay(Duration::from_millis(4000))
            .multiplier(2.0)
            .max_attempts(max_attempts)
            .build()
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_immediate_success() {
        let start = Instant::now();
        let result = with_retry(&config(3), transient_only, || async {
            Ok::<_, TestError>(42)
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_eventual_success() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result = with_retry(&config(3), transient_only, || {
            let attempts = attempts_clone.clone();
            async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(TestError::Transient(n))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_exhausted_returns_original_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        let start = Instant::now();

        let result = with_retry(&config(3), transient_only, || {
            let attempts = attempts_clone.clone();
            async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(TestError::Transient(n))
            }
        })
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        // The error of the third attempt, not a wrapper.
        assert_eq!(result, Err(TestError::Transient(2)));
        // Waits of 1000ms and 2000ms, none after the last attempt.
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_retry_non_retryable() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result = with_retry(&config(10), transient_only, || {
            let attempts = attempts_clone.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(TestError::Permanent)
            }
        })
        .await;

        assert_eq!(result, Err(TestError::Permanent));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_config() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result = with_retry_result(&BackoffConfig::no_retry(), transient_only, || {
            let attempts = attempts_clone.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(TestError::Transient(0))
            }
        })
        .await;

        assert_eq!(
            result,
            RetryResult::Failure {
                error: TestError::Transient(0),
                attempts: 1
            }
        );
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_success_after_one_failure() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result = with_retry_result(&config(3), transient_only, || {
            let attempts = attempts_clone.clone();
            async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n < 1 {
                    Err(TestError::Transient(n))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(
            result,
            RetryResult::Success {
                data: "done",
                attempts: 2
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_success_after_two_failures() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();

        let result = with_retry_result(&config(3), transient_only, || {
            let attempts = attempts_clone.clone();
            async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(TestError::Transient(n))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert!(result.is_success());
        assert_eq!(result.attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_exhausted() {
        let result = with_retry_result(&config(4), transient_only, || async {
            Err::<(), _>(TestError::Transient(7))
        })
        .await;

        assert_eq!(
            result,
            RetryResult::Failure {
                error: TestError::Transient(7),
                attempts: 4
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_non_retryable_short_circuits() {
        let result =
            with_retry_result(&config(5), NoRetry, || async { Err::<(), _>(TestError::Transient(0)) })
                .await;

        assert_eq!(result.attempts(), 1);
        assert!(!result.is_success());
        assert!(!result.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_wait_stops_next_attempt() {
        let token = CancellationToken::new();
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        let token_clone = token.clone();

        let result = Retry::new(&config(3))
            .retry_if(transient_only)
            .with_cancellation(token.clone())
            .run_result(|| {
                let attempts = attempts_clone.clone();
                let token = token_clone.clone();
                async move {
                    let n = attempts.fetch_add(1, Ordering::SeqCst);
                    // caller loses interest while this attempt is in flight
                    token.cancel();
                    Err::<(), _>(TestError::Transient(n))
                }
            })
            .await;

        assert_eq!(
            result,
            RetryResult::Cancelled {
                error: TestError::Transient(0),
                attempts: 1
            }
        );
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_from_other_task() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            canceller.cancel();
        });

        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        let start = Instant::now();

        let result = Retry::new(&config(5))
            .with_cancellation(token)
            .run(|| {
                let attempts = attempts_clone.clone();
                async move {
                    let n = attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(TestError::Transient(n))
                }
            })
            .await;

        // Attempt 1 at t=0, attempt 2 at t=1000, cancelled during the 2000ms wait.
        assert_eq!(result, Err(TestError::Transient(1)));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_precancelled_token_still_runs_first_attempt() {
        let token = CancellationToken::new();
        token.cancel();

        let result = Retry::new(&config(3))
            .with_cancellation(token)
            .run_result(|| async { Ok::<_, TestError>(1) })
            .await;

        assert_eq!(
            result,
            RetryResult::Success {
                data: 1,
                attempts: 1
            }
        );
    }

    #[test]
    fn test_into_result() {
        let ok: RetryResult<i32, TestError> = RetryResult::Success {
            data: 1,
            attempts: 1,
        };
        assert_eq!(ok.into_result(), Ok(1));

        let cancelled: RetryResult<i32, TestError> = RetryResult::Cancelled {
            error: TestError::Permanent,
            attempts: 2,
        };
        assert_eq!(cancelled.into_result(), Err(TestError::Permanent));
    }

    #[test]
    fn test_retry_builder_blocking() {
        let config = config(1);
        let result = tokio_test::block_on(
            Retry::new(&config).run(|| async { Ok::<_, TestError>("success") }),
        );
        assert_eq!(result, Ok("success"));
    }
}
