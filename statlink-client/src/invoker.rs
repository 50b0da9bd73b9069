//! Remote invocation of the analysis service.
//!
//! One call to [`AnalysisInvoker::invoke`] is one logical invocation. It
//! may span several HTTP attempts, but it always ends in exactly one
//! [`InvocationResult`]:
//!
//! ```text
//! Idle -> Attempting(n) -> Success(data)
//!                       -> Retrying(delay) -> Attempting(n + 1)
//!                       -> Failed(classified)
//! ```
//!
//! Only transport failures move to `Retrying`. A response that arrives is
//! parsed exactly once and never retried, whatever its status code.

use crate::classifier::{ErrorClassifier, RawFailure};
use crate::config::ClientConfig;
use crate::endpoint::{EndpointResolver, StaticEndpoint};
use crate::error::{ConfigError, TransportError};
use crate::transport::{AnalysisTransport, RawResponse, ReqwestTransport};
use bytes::Bytes;
use statlink_core::{
    AnalysisData, AnalysisRequest, ClassifiedError, InvocationResult, MessageCatalog,
    ResponseEnvelope,
};
use statlink_retries::{BackoffConfig, Retry, RetryResult};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Client that runs analyses with retries and classified failures.
///
/// Cheap to clone; clones share the transport and endpoint.
#[derive(Clone)]
pub struct AnalysisInvoker {
    transport: Arc<dyn AnalysisTransport>,
    endpoint: Arc<dyn EndpointResolver>,
    backoff: BackoffConfig,
    classifier: ErrorClassifier,
}

impl fmt::Debug for AnalysisInvoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisInvoker")
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl AnalysisInvoker {
    /// Create an invoker from a transport and an endpoint resolver.
    pub fn new(
        transport: impl AnalysisTransport + 'static,
        endpoint: impl EndpointResolver + 'static,
    ) -> Self {
        Self {
            transport: Arc::new(transport),
            endpoint: Arc::new(endpoint),
            backoff: BackoffConfig::default(),
            classifier: ErrorClassifier::default(),
        }
    }

    /// Create an HTTP invoker from a config.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let transport = match config.request_timeout {
            Some(timeout) => ReqwestTransport::with_timeout(timeout)?,
            None => ReqwestTransport::new(),
        };
        let endpoint = StaticEndpoint::new(&config.base_url)?;
        Ok(Self::new(transport, endpoint)
            .with_backoff(config.backoff.clone())
            .with_catalog(MessageCatalog::for_locale(config.locale)))
    }

    /// Create an HTTP invoker from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    /// Set the retry budget and delay curve.
    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the classifier.
    pub fn with_classifier(mut self, classifier: ErrorClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Use `catalog` for user-facing messages.
    pub fn with_catalog(self, catalog: MessageCatalog) -> Self {
        self.with_classifier(ErrorClassifier::new(catalog))
    }

    /// The backoff config in use.
    pub fn backoff(&self) -> &BackoffConfig {
        &self.backoff
    }

    /// Run one analysis.
    pub async fn invoke(&self, request: &AnalysisRequest) -> InvocationResult<AnalysisData> {
        self.invoke_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Run one analysis, abandoning pending retry waits once `cancel` fires.
    ///
    /// An HTTP attempt already in flight is allowed to complete and its
    /// response is still returned.
    pub async fn invoke_with_cancel(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> InvocationResult<AnalysisData> {
        info!(
            analysis_type = %request.analysis_type,
            file_id = %request.file_id,
            max_attempts = self.backoff.max_attempts(),
            "Starting analysis invocation"
        );

        let url = match self.endpoint.analysis_url() {
            Ok(url) => url,
            Err(err) => {
                warn!(error = %err, "Could not resolve analysis endpoint");
                return self.fail(RawFailure::Configuration(err));
            }
        };

        let body = match serde_json::to_vec(request) {
            Ok(body) => Bytes::from(body),
            Err(err) => return self.fail(RawFailure::InvalidRequest(err.to_string())),
        };

        let classifier = &self.classifier;
        let transport = self.transport.as_ref();
        let url = &url;

        let outcome = Retry::new(&self.backoff)
            .retry_if(|err: &TransportError| classifier.is_retryable(err))
            .with_cancellation(cancel.clone())
            .run_result(move || transport.post_json(url, body.clone()))
            .await;

        match outcome {
            RetryResult::Success { data, attempts } => {
                debug!(attempts, status = data.status, "Analysis round-trip completed");
                self.interpret(data)
            }
            RetryResult::Failure { error, attempts } => {
                warn!(attempts, error = %error, "Analysis transport failed");
                self.fail(RawFailure::Transport(error))
            }
            RetryResult::Cancelled { error, attempts } => {
                info!(attempts, last_error = %error, "Analysis invocation cancelled");
                self.fail(RawFailure::Cancelled)
            }
        }
    }

    /// Turn a completed round-trip into a result. The status is not consulted.
    fn interpret(&self, response: RawResponse) -> InvocationResult<AnalysisData> {
        let envelope = match ResponseEnvelope::from_slice(&response.body) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(status = response.status, error = %err, "Unparsable analysis response");
                return self.fail(RawFailure::Unparsable(err.to_string()));
            }
        };

        match envelope {
            ResponseEnvelope {
                error: Some(error), ..
            } => {
                info!(
                    status = response.status,
                    code = %error.code,
                    "Analysis service returned an error"
                );
                self.fail(RawFailure::Application(error))
            }
            ResponseEnvelope {
                data: Some(data),
                error: None,
            } => {
                if !response.is_success() {
                    debug!(status = response.status, "Success envelope under non-2xx status");
                }
                info!(status = response.status, "Analysis completed");
                InvocationResult::success(data)
            }
            ResponseEnvelope {
                data: None,
                error: None,
            } => {
                warn!(status = response.status, "Analysis response carries neither data nor error");
                self.fail(RawFailure::Unparsable(
                    "envelope has neither data nor error".to_string(),
                ))
            }
        }
    }

    fn fail(&self, failure: RawFailure) -> InvocationResult<AnalysisData> {
        let error: ClassifiedError = self.classifier.classify(failure);
        InvocationResult::failure(error)
    }
}
