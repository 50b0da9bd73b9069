//! Tracing setup for binaries embedding statlink.

use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log format (`text` or `json`).
pub const LOG_FORMAT_VAR: &str = "STATLINK_LOG_FORMAT";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(anyhow::anyhow!("unknown log format '{other}'")),
        }
    }
}

/// Install a global subscriber filtered by `RUST_LOG` (default `info`).
///
/// The format comes from `STATLINK_LOG_FORMAT`.
pub fn init_tracing() -> anyhow::Result<()> {
    let format = match std::env::var(LOG_FORMAT_VAR) {
        Ok(raw) => raw.parse()?,
        Err(_) => LogFormat::default(),
    };
    init_tracing_with(format)
}

/// Install a global subscriber with an explicit format.
pub fn init_tracing_with(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
