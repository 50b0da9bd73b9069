//! HTTP transport for the analysis service.

use crate::error::{ConfigError, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// A completed HTTP round-trip.
///
/// The status is kept for logging only; callers classify on the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Entire response body, read once.
    pub body: Bytes,
}

impl RawResponse {
    /// Create a raw response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability to POST a JSON body and read the full response.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Send `body` to `url`.
    ///
    /// Must return `Ok` for every response that arrives, including non-2xx
    /// statuses, and `Err` only when no response was obtained.
    async fn post_json(&self, url: &Url, body: Bytes) -> Result<RawResponse, TransportError>;
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let detail = error_chain(&err);
        if err.is_timeout() {
            TransportError::Timeout(detail)
        } else if err.is_connect() {
            if looks_like_dns(&detail) {
                TransportError::Dns(detail)
            } else {
                TransportError::Connect(detail)
            }
        } else {
            TransportError::Other(detail)
        }
    }
}

/// Render an error and its sources on one line.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn looks_like_dns(detail: &str) -> bool {
    let lower = detail.to_ascii_lowercase();
    lower.contains("dns") || lower.contains("failed to lookup") || lower.contains("resolve")
}

/// [`AnalysisTransport`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a default client and no request timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Create a transport whose every attempt is bounded by `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }

    /// Get a reference to the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl AnalysisTransport for ReqwestTransport {
    async fn post_json(&self, url: &Url, body: Bytes) -> Result<RawResponse, TransportError> {
        debug!(url = %url, bytes = body.len(), "Making HTTP request");

        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(status, bytes = body.len(), "Received HTTP response");

        Ok(RawResponse { status, body })
    }
}
