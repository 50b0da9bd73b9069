//! Classified error taxonomy.
//!
//! Every failure of an analysis invocation ends up as exactly one
//! [`ClassifiedError`]: a closed [`ErrorKind`], a message that is safe to
//! show to the user, a retryability flag, and optional field-level details
//! passed through from the service.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Closed set of failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Connection, DNS, or other transport failure.
    NetworkError,
    /// Request timed out or was aborted in flight.
    Timeout,
    /// Response body did not match the expected envelope.
    ParseError,
    /// Input data was rejected by the service.
    ValidationError,
    /// The referenced file is unknown to the service.
    FileNotFound,
    /// The service failed while computing the analysis.
    CalculationError,
    /// Anything the taxonomy does not name.
    UnknownError,
    /// The caller abandoned the invocation during a backoff wait.
    Cancelled,
}

impl ErrorKind {
    /// Wire code for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::ParseError => "PARSE_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::CalculationError => "CALCULATION_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Map a service error code onto a kind.
    ///
    /// Codes outside the service contract map to [`ErrorKind::UnknownError`].
    pub fn from_code(code: &str) -> Self {
        match code {
            "NETWORK_ERROR" => Self::NetworkError,
            "TIMEOUT" => Self::Timeout,
            "PARSE_ERROR" => Self::ParseError,
            "VALIDATION_ERROR" => Self::ValidationError,
            "FILE_NOT_FOUND" => Self::FileNotFound,
            "CALCULATION_ERROR" => Self::CalculationError,
            _ => Self::UnknownError,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure mapped onto the taxonomy, ready for display.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedError {
    kind: ErrorKind,
    message: String,
    retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Vec<Value>>,
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl ClassifiedError {
    /// Create a classified error.
    pub fn new(kind: ErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            details: None,
        }
    }

    /// Attach field-level details.
    pub fn with_details(mut self, details: Vec<Value>) -> Self {
        self.details = Some(details);
        self
    }

    /// The failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// User-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Field-level issues, in the order the service sent them.
    pub fn details(&self) -> Option<&[Value]> {
        self.details.as_deref()
    }
}
