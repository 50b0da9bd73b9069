//! # statlink
//!
//! Resilient invocation of a long-running spreadsheet analysis service.
//!
//! statlink submits analysis jobs over HTTP, retries only the failures that
//! can go away on their own (dropped connections, timeouts), and reports
//! every other outcome immediately as a classified, displayable error.
//!
//! ## Quick Start
//!
//! ```ignore
//! use statlink::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     statlink::telemetry::init_tracing()?;
//!
//!     let invoker = AnalysisInvoker::from_env()?;
//!     let request = AnalysisRequest::new("capability", "file-42")
//!         .with_specification(10.0)
//!         .with_spec_limits(SpecLimits::new(9.5, 10.5));
//!
//!     match invoker.invoke(&request).await.into_result() {
//!         Ok(data) => println!("{}", data.instructions),
//!         Err(error) => eprintln!("{}: {}", error.kind(), error.message()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`statlink_retries`] - Backoff curve and retry executors
//! - [`statlink_core`] - Error taxonomy, invocation result, wire types
//! - [`statlink_client`] - Transport, classifier, and invoker
//!
//! ## Configuration
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `STATLINK_ANALYSIS_URL` | Service base URL | required |
//! | `STATLINK_MAX_ATTEMPTS` | Attempts per invocation | `3` |
//! | `STATLINK_INITIAL_DELAY_MS` | First retry delay | `1000` |
//! | `STATLINK_MAX_DELAY_MS` | Delay cap | `10000` |
//! | `STATLINK_BACKOFF_MULTIPLIER` | Delay growth factor | `2` |
//! | `STATLINK_REQUEST_TIMEOUT_SECS` | Per-attempt timeout, `0` disables | `120` |
//! | `STATLINK_LOCALE` | Message locale (`es`, `en`) | `es` |
//! | `STATLINK_LOG_FORMAT` | `text` or `json` | `text` |

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod telemetry;

pub use statlink_client;
pub use statlink_core;
pub use statlink_retries;

pub use statlink_client::{
    AnalysisInvoker, AnalysisTransport, ClientConfig, ConfigError, EndpointResolver,
    EnvEndpoint, ErrorClassifier, RawResponse, ReqwestTransport, ScriptedTransport,
    StaticEndpoint, TransportError,
};
pub use statlink_core::{
    AnalysisData, AnalysisRequest, ClassifiedError, ErrorKind, InvocationResult, Locale,
    MessageCatalog, SpecLimits,
};
pub use statlink_retries::{
    with_retry, with_retry_result, BackoffConfig, CancellationToken, Retry, RetryPredicate,
    RetryResult,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        AnalysisData, AnalysisInvoker, AnalysisRequest, BackoffConfig, CancellationToken,
        ClassifiedError, ClientConfig, ErrorKind, InvocationResult, SpecLimits,
    };
}
