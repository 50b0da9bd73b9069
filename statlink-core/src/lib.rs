//! # statlink-core
//!
//! Core types shared by the statlink crates.
//!
//! - **Errors**: the closed [`ErrorKind`] taxonomy and [`ClassifiedError`]
//! - **Results**: [`InvocationResult`], the only value an invocation returns
//! - **Wire**: request and response bodies of the analysis service
//! - **Catalog**: localized user-facing messages
//!
//! ## Example
//!
//! ```rust
//! use statlink_core::{AnalysisRequest, SpecLimits};
//!
//! let request = AnalysisRequest::new("capability", "file-42")
//!     .with_specification(10.0)
//!     .with_spec_limits(SpecLimits::new(9.5, 10.5));
//!
//! let body = serde_json::to_value(&request).unwrap();
//! assert!(body.get("message_id").is_none());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod errors;
pub mod result;
pub mod wire;

// Re-exports for convenience
pub use catalog::{Locale, MessageCatalog, UnknownLocale};
pub use errors::{ClassifiedError, ErrorKind};
pub use result::InvocationResult;
pub use wire::{AnalysisData, AnalysisRequest, ResponseEnvelope, SpecLimits, WireError};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::catalog::{Locale, MessageCatalog};
    pub use crate::errors::{ClassifiedError, ErrorKind};
    pub use crate::result::InvocationResult;
    pub use crate::wire::{AnalysisData, AnalysisRequest, SpecLimits};
}
