//! Scripted transport for testing.
//!
//! [`ScriptedTransport`] replays a queue of pre-configured outcomes and
//! records every request it receives, so invoker behavior can be checked
//! without real I/O.
//!
//! ```rust
//! use statlink_client::{ScriptedTransport, TransportError};
//!
//! let transport = ScriptedTransport::new()
//!     .with_error(TransportError::connect("refused"))
//!     .with_json(200, r#"{"data": {"results": {}}, "error": null}"#);
//! assert_eq!(transport.call_count(), 0);
//! ```

use crate::error::TransportError;
use crate::transport::{AnalysisTransport, RawResponse};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use url::Url;

/// A request observed by the scripted transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Target URL.
    pub url: Url,
    /// Request body.
    pub body: Bytes,
}

impl RecordedRequest {
    /// Decode the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport that replays queued outcomes in order.
///
/// Once the queue is empty every call fails with a connection error.
/// Clones share the same queue and request log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    outcomes: Arc<Mutex<VecDeque<Result<RawResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ScriptedTransport {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn with_response(self, response: RawResponse) -> Self {
        self.outcomes.lock().push_back(Ok(response));
        self
    }

    /// Queue a response with a string body.
    pub fn with_json(self, status: u16, body: impl Into<String>) -> Self {
        let body: String = body.into();
        self.with_response(RawResponse::new(status, body))
    }

    /// Queue a transport failure.
    pub fn with_error(self, error: TransportError) -> Self {
        self.outcomes.lock().push_back(Err(error));
        self
    }

    /// Queue the same transport failure `n` times.
    pub fn with_errors(self, error: TransportError, n: usize) -> Self {
        {
            let mut outcomes = self.outcomes.lock();
            outcomes.extend(std::iter::repeat(Err(error)).take(n));
        }
        self
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Outcomes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.outcomes.lock().len()
    }
}

#[async_trait]
impl AnalysisTransport for ScriptedTransport {
    async fn post_json(&self, url: &Url, body: Bytes) -> Result<RawResponse, TransportError> {
        self.requests.lock().push(RecordedRequest {
            url: url.clone(),
            body,
        });
        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::connect("script exhausted")))
    }
}
