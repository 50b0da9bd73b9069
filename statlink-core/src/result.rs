//! Invocation result returned to callers.

use crate::errors::ClassifiedError;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Outcome of one logical invocation.
///
/// Exactly one of `data` and `error` is present: the value wraps a
/// `Result`, so the other two states cannot be represented. Serializes as
/// `{"data": ..., "error": ...}` with the absent side as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResult<T> {
    inner: Result<T, ClassifiedError>,
}

impl<T> InvocationResult<T> {
    /// A successful result.
    pub fn success(data: T) -> Self {
        Self { inner: Ok(data) }
    }

    /// A failed result.
    pub fn failure(error: ClassifiedError) -> Self {
        Self { inner: Err(error) }
    }

    /// The payload, if the invocation succeeded.
    pub fn data(&self) -> Option<&T> {
        self.inner.as_ref().ok()
    }

    /// The classified error, if the invocation failed.
    pub fn error(&self) -> Option<&ClassifiedError> {
        self.inner.as_ref().err()
    }

    /// Whether the invocation succeeded.
    pub fn is_success(&self) -> bool {
        self.inner.is_ok()
    }

    /// Transform the payload, keeping an error untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> InvocationResult<U> {
        InvocationResult {
            inner: self.inner.map(f),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<T, ClassifiedError> {
        self.inner
    }
}

impl<T> From<Result<T, ClassifiedError>> for InvocationResult<T> {
    fn from(inner: Result<T, ClassifiedError>) -> Self {
        Self { inner }
    }
}

impl<T: Serialize> Serialize for InvocationResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("InvocationResult", 2)?;
        state.serialize_field("data", &self.data())?;
        state.serialize_field("error", &self.error())?;
        state.end()
    }
}
