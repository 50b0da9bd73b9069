//! Client error types.

use statlink_retries::BackoffConfigError;
use thiserror::Error;

/// Failure to complete an HTTP round-trip.
///
/// Any response that arrives, whatever its status, is not a transport
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Could not connect to the service.
    #[error("Connection error: {0}")]
    Connect(String),

    /// Host name could not be resolved.
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// The request exceeded its timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The request was aborted in flight.
    #[error("Request aborted: {0}")]
    Aborted(String),

    /// Any other transport failure.
    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Create a connection error.
    pub fn connect(msg: impl Into<String>) -> Self {
        Self::Connect(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create an uncategorized error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable {0}")]
    MissingVar(String),

    /// An environment variable holds an unusable value.
    #[error("invalid value for {name}: {reason}")]
    InvalidVar {
        /// Variable name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The endpoint URL cannot be used.
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Why the URL was rejected.
        reason: String,
    },

    /// Backoff settings are inconsistent.
    #[error(transparent)]
    Backoff(#[from] BackoffConfigError),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl ConfigError {
    pub(crate) fn invalid_var(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidVar {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
