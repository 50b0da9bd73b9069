//! Retry predicates.

/// Decides whether a failed attempt is worth retrying.
///
/// The executor owns the attempt budget; a predicate only answers whether
/// the error itself is transient. Any `Fn(&E) -> bool` closure is a
/// predicate.
pub trait RetryPredicate<E>: Send + Sync {
    /// Check if the error should be retried.
    fn is_retryable(&self, error: &E) -> bool;
}

impl<E, F> RetryPredicate<E> for F
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn is_retryable(&self, error: &E) -> bool {
        self(error)
    }
}

/// Predicate that never retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl<E> RetryPredicate<E> for NoRetry {
    fn is_retryable(&self, _error: &E) -> bool {
        false
    }
}

/// Predicate that retries every error until the budget runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRetry;

impl<E> RetryPredicate<E> for AlwaysRetry {
    fn is_retryable(&self, _error: &E) -> bool {
        true
    }
}
