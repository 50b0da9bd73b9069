//! Mapping of raw failures onto [`ClassifiedError`].
//!
//! Only transport failures are retryable. A structured error that arrives in
//! a parsed response body is deterministic for the same input, so it is
//! never retried even when its code names a transient condition.

use crate::error::{ConfigError, TransportError};
use statlink_core::{ClassifiedError, ErrorKind, MessageCatalog, WireError};
use tracing::debug;

/// Longest server message that is shown to users verbatim.
pub const MAX_USER_MESSAGE_LEN: usize = 300;

/// Markers of stack traces and internal exception dumps.
const UNSAFE_MARKERS: &[&str] = &[
    "traceback",
    "exception",
    "  at ",
    "file \"",
    "panicked at",
    "stack",
];

/// A raw failure signal observed during an invocation.
#[derive(Debug)]
pub enum RawFailure {
    /// No response was obtained.
    Transport(TransportError),
    /// The body is not a valid response envelope.
    Unparsable(String),
    /// The envelope carried an application error.
    Application(WireError),
    /// The caller cancelled a pending backoff wait.
    Cancelled,
    /// The endpoint could not be resolved.
    Configuration(ConfigError),
    /// The request body could not be encoded.
    InvalidRequest(String),
}

/// Turns raw failures into classified errors with localized messages.
#[derive(Debug, Clone, Default)]
pub struct ErrorClassifier {
    catalog: MessageCatalog,
}

impl ErrorClassifier {
    /// Create a classifier using `catalog` for user-facing text.
    pub fn new(catalog: MessageCatalog) -> Self {
        Self { catalog }
    }

    /// The message catalog in use.
    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Classify a raw failure.
    pub fn classify(&self, failure: RawFailure) -> ClassifiedError {
        let classified = match failure {
            RawFailure::Transport(err) => self.classify_transport(&err),
            RawFailure::Unparsable(_) => self.fixed(ErrorKind::ParseError),
            RawFailure::Application(err) => self.classify_application(err),
            RawFailure::Cancelled => self.fixed(ErrorKind::Cancelled),
            RawFailure::Configuration(_) => ClassifiedError::new(
                ErrorKind::UnknownError,
                self.catalog.configuration.as_str(),
                false,
            ),
            RawFailure::InvalidRequest(_) => self.fixed(ErrorKind::UnknownError),
        };
        debug!(
            kind = %classified.kind(),
            retryable = classified.is_retryable(),
            "Classified failure"
        );
        classified
    }

    /// Category of a transport failure.
    ///
    /// Opaque errors whose text reads like a timeout count as timeouts.
    pub fn transport_kind(&self, err: &TransportError) -> ErrorKind {
        match err {
            TransportError::Timeout(_) | TransportError::Aborted(_) => ErrorKind::Timeout,
            TransportError::Connect(_) | TransportError::Dns(_) => ErrorKind::NetworkError,
            TransportError::Other(detail) if reads_like_timeout(detail) => ErrorKind::Timeout,
            TransportError::Other(_) => ErrorKind::NetworkError,
        }
    }

    /// Retry predicate for transport failures.
    pub fn is_retryable(&self, err: &TransportError) -> bool {
        matches!(
            self.transport_kind(err),
            ErrorKind::NetworkError | ErrorKind::Timeout
        )
    }

    /// Classify a transport failure.
    pub fn classify_transport(&self, err: &TransportError) -> ClassifiedError {
        let kind = self.transport_kind(err);
        ClassifiedError::new(kind, self.catalog.message_for(kind), self.is_retryable(err))
    }

    /// Classify an application error from a parsed body. Never retryable.
    pub fn classify_application(&self, err: WireError) -> ClassifiedError {
        let kind = ErrorKind::from_code(&err.code);
        match kind {
            ErrorKind::ValidationError => {
                let classified = self.fixed(kind);
                match err.details {
                    Some(details) => classified.with_details(details),
                    None => classified,
                }
            }
            ErrorKind::CalculationError | ErrorKind::UnknownError => {
                let message = if is_user_safe(&err.message) {
                    err.message.trim()
                } else {
                    self.catalog.generic.as_str()
                };
                ClassifiedError::new(kind, message, false)
            }
            _ => self.fixed(kind),
        }
    }

    fn fixed(&self, kind: ErrorKind) -> ClassifiedError {
        ClassifiedError::new(kind, self.catalog.message_for(kind), false)
    }
}

fn reads_like_timeout(detail: &str) -> bool {
    let lower = detail.to_ascii_lowercase();
    ["timeout", "timed out", "deadline"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Whether a server-supplied message can be shown to users as-is.
pub fn is_user_safe(message: &str) -> bool {
    let trimmed = message.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_USER_MESSAGE_LEN {
        return false;
    }
    if trimmed.contains('\n') || trimmed.contains('\r') {
        return false;
    }
    let lower = trimmed.to_lowercase();
    !UNSAFE_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn classifier() -> ErrorClassifier {
        ErrorClassifier::new(MessageCatalog::english())
    }

    fn wire(code: &str, message: &str) -> WireError {
        WireError {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    #[rstest]
    #[case(TransportError::connect("refused"), ErrorKind::NetworkError)]
    #[case(TransportError::Dns("no such host".into()), ErrorKind::NetworkError)]
    #[case(TransportError::timeout("30s"), ErrorKind::Timeout)]
    #[case(TransportError::Aborted("signal".into()), ErrorKind::Timeout)]
    #[case(TransportError::other("operation timed out"), ErrorKind::Timeout)]
    #[case(TransportError::other("request deadline exceeded"), ErrorKind::Timeout)]
    #[case(
        TransportError::other("connection aborted: software caused connection abort (os error 103)"),
        ErrorKind::NetworkError
    )]
    #[case(TransportError::other("connection reset by peer"), ErrorKind::NetworkError)]
    fn test_transport_classification(#[case] err: TransportError, #[case] kind: ErrorKind) {
        let classified = classifier().classify(RawFailure::Transport(err.clone()));
        assert_eq!(classified.kind(), kind);
        assert!(classified.is_retryable());
        assert!(classifier().is_retryable(&err));
        assert_eq!(classified.message(), MessageCatalog::english().message_for(kind));
    }

    #[test]
    fn test_unparsable_is_not_retryable() {
        let classified = classifier().classify(RawFailure::Unparsable("expected value".into()));
        assert_eq!(classified.kind(), ErrorKind::ParseError);
        assert!(!classified.is_retryable());
        assert_eq!(classified.message(), "Could not process the server response.");
    }

    #[test]
    fn test_validation_details_verbatim() {
        let details = vec![
            json!({"row": 1, "column": "A", "message": "Valor inválido"}),
            json!({"row": 7, "column": "C", "message": "Celda vacía", "extra": [1, 2]}),
        ];
        let err = WireError {
            code: "VALIDATION_ERROR".into(),
            message: "internal validator text".into(),
            details: Some(details.clone()),
        };

        let classified = classifier().classify(RawFailure::Application(err));

        assert_eq!(classified.kind(), ErrorKind::ValidationError);
        assert!(!classified.is_retryable());
        assert_eq!(classified.message(), MessageCatalog::english().validation);
        assert_eq!(classified.details(), Some(details.as_slice()));
    }

    #[test]
    fn test_file_not_found_uses_fixed_message() {
        let classified = classifier().classify_application(wire("FILE_NOT_FOUND", "missing /tmp/x"));
        assert_eq!(classified.kind(), ErrorKind::FileNotFound);
        assert_eq!(classified.message(), MessageCatalog::english().file_not_found);
        assert!(!classified.is_retryable());
    }

    #[test]
    fn test_calculation_error_keeps_safe_message() {
        let classified = classifier()
            .classify_application(wire("CALCULATION_ERROR", "Se requieren al menos 2 datos"));
        assert_eq!(classified.kind(), ErrorKind::CalculationError);
        assert_eq!(classified.message(), "Se requieren al menos 2 datos");
    }

    #[test]
    fn test_calculation_error_hides_stack_trace() {
        let classified = classifier().classify_application(wire(
            "CALCULATION_ERROR",
            "Traceback (most recent call last):\n  File \"calc.py\", line 3",
        ));
        assert_eq!(classified.message(), MessageCatalog::english().generic);
    }

    #[test]
    fn test_unrecognized_code_is_unknown() {
        let classified = classifier().classify_application(wire("QUOTA_EXCEEDED", ""));
        assert_eq!(classified.kind(), ErrorKind::UnknownError);
        assert_eq!(classified.message(), MessageCatalog::english().generic);
        assert!(!classified.is_retryable());
    }

    #[rstest]
    #[case("TIMEOUT", ErrorKind::Timeout)]
    #[case("NETWORK_ERROR", ErrorKind::NetworkError)]
    #[case("PARSE_ERROR", ErrorKind::ParseError)]
    fn test_structured_transient_codes_not_retryable(#[case] code: &str, #[case] kind: ErrorKind) {
        let classified = classifier().classify_application(wire(code, "upstream said so"));
        assert_eq!(classified.kind(), kind);
        assert!(!classified.is_retryable());
        assert_eq!(classified.message(), MessageCatalog::english().message_for(kind));
    }

    #[test]
    fn test_cancelled_and_configuration() {
        let cancelled = classifier().classify(RawFailure::Cancelled);
        assert_eq!(cancelled.kind(), ErrorKind::Cancelled);
        assert!(!cancelled.is_retryable());

        let config = classifier().classify(RawFailure::Configuration(ConfigError::MissingVar(
            "STATLINK_ANALYSIS_URL".into(),
        )));
        assert_eq!(config.kind(), ErrorKind::UnknownError);
        assert_eq!(config.message(), MessageCatalog::english().configuration);
    }

    #[rstest]
    #[case("El archivo no contiene columnas numéricas", true)]
    #[case("   ", false)]
    #[case("", false)]
    #[case("line one\nline two", false)]
    #[case("ZeroDivisionError exception in worker", false)]
    #[case("thread 'main' panicked at src/main.rs:3", false)]
    fn test_is_user_safe(#[case] message: &str, #[case] expected: bool) {
        assert_eq!(is_user_safe(message), expected);
    }

    #[test]
    fn test_overlong_message_is_unsafe() {
        assert!(!is_user_safe(&"a".repeat(MAX_USER_MESSAGE_LEN + 1)));
        assert!(is_user_safe(&"a".repeat(MAX_USER_MESSAGE_LEN)));
    }
}
