//! Client configuration.

use crate::endpoint::{parse_base_url, ANALYSIS_URL_VAR};
use crate::error::ConfigError;
use statlink_core::Locale;
use statlink_retries::BackoffConfig;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Maximum attempts per invocation.
pub const MAX_ATTEMPTS_VAR: &str = "STATLINK_MAX_ATTEMPTS";
/// Delay before the first retry, in milliseconds.
pub const INITIAL_DELAY_MS_VAR: &str = "STATLINK_INITIAL_DELAY_MS";
/// Upper bound of any retry delay, in milliseconds.
pub const MAX_DELAY_MS_VAR: &str = "STATLINK_MAX_DELAY_MS";
/// Backoff growth factor.
pub const MULTIPLIER_VAR: &str = "STATLINK_BACKOFF_MULTIPLIER";
/// Per-attempt request timeout in seconds; `0` disables it.
pub const REQUEST_TIMEOUT_SECS_VAR: &str = "STATLINK_REQUEST_TIMEOUT_SECS";
/// Locale of user-facing messages.
pub const LOCALE_VAR: &str = "STATLINK_LOCALE";

/// Settings for an [`AnalysisInvoker`](crate::AnalysisInvoker).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the analysis service.
    pub base_url: Url,
    /// Retry budget and delay curve.
    pub backoff: BackoffConfig,
    /// Timeout of a single HTTP attempt.
    pub request_timeout: Option<Duration>,
    /// Locale of user-facing messages.
    pub locale: Locale,
}

impl ClientConfig {
    /// Default per-attempt timeout. Analyses of large sheets are slow.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    /// Create a config with defaults for everything but the base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            backoff: BackoffConfig::default(),
            request_timeout: Some(Self::DEFAULT_REQUEST_TIMEOUT),
            locale: Locale::default(),
        }
    }

    /// Set the backoff config.
    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set or disable the per-attempt timeout.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the locale.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Load from process environment variables.
    ///
    /// `STATLINK_ANALYSIS_URL` is required; everything else falls back to
    /// the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup(ANALYSIS_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar(ANALYSIS_URL_VAR.to_string()))?;
        let base_url = parse_base_url(&raw_url)?;

        let defaults = BackoffConfig::default();
        let mut backoff = BackoffConfig::builder();
        if let Some(n) = parse_var::<u32, _>(&lookup, MAX_ATTEMPTS_VAR)? {
            backoff = backoff.max_attempts(n);
        }
        let initial = parse_var::<u64, _>(&lookup, INITIAL_DELAY_MS_VAR)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.initial_delay());
        let max = parse_var::<u64, _>(&lookup, MAX_DELAY_MS_VAR)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.max_delay());
        backoff = backoff.initial_delay(initial).max_delay(max);
        if let Some(m) = parse_var::<f64, _>(&lookup, MULTIPLIER_VAR)? {
            backoff = backoff.multiplier(m);
        }

        let request_timeout = match parse_var::<u64, _>(&lookup, REQUEST_TIMEOUT_SECS_VAR)? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Self::DEFAULT_REQUEST_TIMEOUT),
        };

        let locale = match lookup(LOCALE_VAR) {
            Some(tag) => Locale::from_str(&tag)
                .map_err(|e| ConfigError::invalid_var(LOCALE_VAR, e.to_string()))?,
            None => Locale::default(),
        };

        Ok(Self {
            base_url,
            backoff: backoff.build()?,
            request_timeout,
            locale,
        })
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::invalid_var(name, format!("'{raw}': {e}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use statlink_retries::BackoffConfigError;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_from_minimal_env() {
        let config =
            ClientConfig::from_lookup(lookup(&[(ANALYSIS_URL_VAR, "http://localhost:8000")]))
                .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.backoff, BackoffConfig::default());
        assert_eq!(
            config.request_timeout,
            Some(ClientConfig::DEFAULT_REQUEST_TIMEOUT)
        );
        assert_eq!(config.locale, Locale::Es);
    }

    #[test]
    fn test_full_env() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ANALYSIS_URL_VAR, "https://stats.example.com"),
            (MAX_ATTEMPTS_VAR, "5"),
            (INITIAL_DELAY_MS_VAR, "250"),
            (MAX_DELAY_MS_VAR, "4000"),
            (MULTIPLIER_VAR, "3"),
            (REQUEST_TIMEOUT_SECS_VAR, "0"),
            (LOCALE_VAR, "en-US"),
        ]))
        .unwrap();

        assert_eq!(config.backoff.max_attempts(), 5);
        assert_eq!(config.backoff.initial_delay(), Duration::from_millis(250));
        assert_eq!(config.backoff.max_delay(), Duration::from_millis(4000));
        assert_eq!(config.backoff.multiplier(), 3.0);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn test_missing_url() {
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[])),
            Err(ConfigError::MissingVar(ANALYSIS_URL_VAR.into()))
        );
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[(ANALYSIS_URL_VAR, "  ")])),
            Err(ConfigError::MissingVar(ANALYSIS_URL_VAR.into()))
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ANALYSIS_URL_VAR, "http://localhost"),
            (MAX_ATTEMPTS_VAR, "three"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { ref name, .. } if name == MAX_ATTEMPTS_VAR));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ANALYSIS_URL_VAR, "http://localhost"),
            (MAX_ATTEMPTS_VAR, "0"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Backoff(BackoffConfigError::ZeroAttempts));
    }

    #[test]
    fn test_invalid_locale() {
        let err = ClientConfig::from_lookup(lookup(&[
            (ANALYSIS_URL_VAR, "http://localhost"),
            (LOCALE_VAR, "klingon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { ref name, .. } if name == LOCALE_VAR));
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::new(Url::parse("http://localhost").unwrap())
            .with_backoff(BackoffConfig::no_retry())
            .with_request_timeout(Some(Duration::from_secs(5)))
            .with_locale(Locale::En);

        assert_eq!(config.backoff.max_attempts(), 1);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.locale, Locale::En);
    }
}
