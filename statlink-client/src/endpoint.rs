//! Endpoint resolution.
//!
//! Where the analysis service lives is environment-specific. The invoker
//! only asks an [`EndpointResolver`] for the full analysis URL on each
//! invocation.

use crate::error::ConfigError;
use url::Url;

/// Path of the analysis operation, relative to the service base URL.
pub const ANALYSIS_PATH: &str = "api/analysis";

/// Environment variable holding the service base URL.
pub const ANALYSIS_URL_VAR: &str = "STATLINK_ANALYSIS_URL";

/// Supplies the analysis URL.
pub trait EndpointResolver: Send + Sync {
    /// Resolve the full analysis URL.
    fn analysis_url(&self) -> Result<Url, ConfigError>;
}

/// Parse a base URL, accepting only absolute http(s) URLs.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::invalid_url(raw, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::invalid_url(
            raw,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Compose the analysis URL from a service base.
///
/// The base path is kept: `https://host/v2` resolves to
/// `https://host/v2/api/analysis`.
pub fn compose_analysis_url(base: &Url) -> Result<Url, ConfigError> {
    if base.cannot_be_a_base() {
        return Err(ConfigError::invalid_url(base.as_str(), "cannot be a base"));
    }
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);
    base.join(ANALYSIS_PATH)
        .map_err(|e| ConfigError::invalid_url(base.as_str(), e.to_string()))
}

/// A fixed endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticEndpoint {
    url: Url,
}

impl StaticEndpoint {
    /// Build from a service base URL.
    pub fn new(base: &Url) -> Result<Self, ConfigError> {
        Ok(Self {
            url: compose_analysis_url(base)?,
        })
    }

    /// Parse a base URL string.
    pub fn parse(base: &str) -> Result<Self, ConfigError> {
        Self::new(&parse_base_url(base)?)
    }

    /// The composed analysis URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl EndpointResolver for StaticEndpoint {
    fn analysis_url(&self) -> Result<Url, ConfigError> {
        Ok(self.url.clone())
    }
}

/// Reads the base URL from an environment variable on every resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEndpoint {
    var: String,
}

impl Default for EnvEndpoint {
    fn default() -> Self {
        Self::new(ANALYSIS_URL_VAR)
    }
}

impl EnvEndpoint {
    /// Read from the variable `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// The variable name.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl EndpointResolver for EnvEndpoint {
    fn analysis_url(&self) -> Result<Url, ConfigError> {
        let raw = std::env::var(&self.var).map_err(|_| ConfigError::MissingVar(self.var.clone()))?;
        compose_analysis_url(&parse_base_url(&raw)?)
    }
}
