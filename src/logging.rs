//! Logging setup, powered by tracing-subscriber.
//!
//! Logs go to stderr so stdout carries only query output. `RUST_LOG`, when
//! set, takes precedence over the configured level.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact text: timestamp LEVEL target message
    #[default]
    Compact,
    /// JSON lines
    Json,
}

/// Directives for crates that are chatty at debug level.
const QUIET_TARGETS: &[(&str, &str)] = &[
    ("hyper", "warn"),
    ("reqwest", "warn"),
    ("rustls", "warn"),
    ("h2", "warn"),
    ("sqlparser", "warn"),
];

/// Build the filter from `RUST_LOG` or, failing that, `level` plus quiet overrides.
pub fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut directives = vec![level.to_string()];
    directives.extend(
        QUIET_TARGETS
            .iter()
            .map(|(target, lvl)| format!("{}={}", target, lvl)),
    );

    EnvFilter::try_new(directives.join(","))
        .map_err(|e| Error::config(format!("invalid log level '{}': {}", level, e)))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns `Error::Config` for an unparseable level and `Error::Internal`
/// if a subscriber is already installed
pub fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = build_env_filter(level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    installed.map_err(|e| Error::Internal(format!("logging already initialised: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_env_filter_accepts_levels() {
        for level in ["error", "warn", "info", "debug", "trace", "talkdb=debug"] {
            assert!(build_env_filter(level).is_ok(), "{}", level);
        }
    }

    #[test]
    fn test_log_format_parses_from_json() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }
}
