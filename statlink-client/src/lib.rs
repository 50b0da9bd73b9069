//! # statlink-client
//!
//! Resilient client for the spreadsheet analysis service.
//!
//! An [`AnalysisInvoker`] submits an [`AnalysisRequest`], retries transport
//! failures with exponential backoff, and always answers with an
//! [`InvocationResult`]: either the analysis data or a [`ClassifiedError`]
//! carrying a stable kind and a message ready for display.
//!
//! ## Example
//!
//! ```ignore
//! use statlink_client::{AnalysisInvoker, AnalysisRequest};
//!
//! let invoker = AnalysisInvoker::from_env()?;
//! let result = invoker
//!     .invoke(&AnalysisRequest::new("capability", file_id).with_specification(10.0))
//!     .await;
//!
//! match result.into_result() {
//!     Ok(data) => render(data),
//!     Err(error) => show(error.message()),
//! }
//! ```
//!
//! ## Testing
//!
//! The transport is a trait. [`ScriptedTransport`] replays queued responses
//! and transport errors so retry behavior can be tested without a server.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod classifier;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod invoker;
pub mod mock;
pub mod transport;

// Re-exports
pub use classifier::{is_user_safe, ErrorClassifier, RawFailure};
pub use config::ClientConfig;
pub use endpoint::{
    compose_analysis_url, EndpointResolver, EnvEndpoint, StaticEndpoint, ANALYSIS_PATH,
};
pub use error::{ConfigError, TransportError};
pub use invoker::AnalysisInvoker;
pub use mock::{RecordedRequest, ScriptedTransport};
pub use transport::{AnalysisTransport, RawResponse, ReqwestTransport};

pub use statlink_core::{
    AnalysisData, AnalysisRequest, ClassifiedError, ErrorKind, InvocationResult, Locale,
    MessageCatalog, SpecLimits,
};
pub use statlink_retries::{BackoffConfig, CancellationToken};
