//! Structured logging setup.
//!
//! Parsing and connecting emit `tracing` events. Nothing is printed unless a
//! subscriber is installed, either by the embedding application or by
//! [`init`] (requires the `tracing-subscriber` feature).
//!
//! # Environment Variables
//!
//! - `CONNSTR_DEBUG=true|1|yes` - enable debug-level logging
//! - `CONNSTR_LOG_LEVEL=trace|debug|info|warn|error` - set the level
//! - `CONNSTR_LOG_FORMAT=json|pretty|compact` - output format (default: json)

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

const DEBUG_VAR: &str = "CONNSTR_DEBUG";
const LEVEL_VAR: &str = "CONNSTR_LOG_LEVEL";
const FORMAT_VAR: &str = "CONNSTR_LOG_FORMAT";

/// Output format for the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
    /// Single-line human-readable output.
    Compact,
}

impl LogFormat {
    /// Parse from a string, falling back to JSON.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::Json,
        }
    }

    /// Get the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

/// Check if `CONNSTR_DEBUG` is set to a truthy value.
pub fn is_debug_enabled() -> bool {
    env::var(DEBUG_VAR)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Resolve the log level from `CONNSTR_LOG_LEVEL`, then `CONNSTR_DEBUG`.
pub fn log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var(LEVEL_VAR) {
        Ok(level) => normalize_level(&level).unwrap_or(fallback),
        Err(_) => fallback,
    }
}

/// Resolve the log format from `CONNSTR_LOG_FORMAT`.
pub fn log_format() -> LogFormat {
    env::var(FORMAT_VAR)
        .map(|f| LogFormat::parse(&f))
        .unwrap_or_default()
}

fn normalize_level(level: &str) -> Option<&'static str> {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Install a global subscriber configured from the environment.
///
/// Does nothing unless `CONNSTR_DEBUG` or `CONNSTR_LOG_LEVEL` is set.
/// Subsequent calls are no-ops.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var(LEVEL_VAR).is_err() {
            return;
        }
        install(log_level(), log_format());
    });
}

/// Install a global subscriber with an explicit level and format.
///
/// Unlike [`init`], this ignores the environment. Subsequent calls, and
/// calls after [`init`] installed a subscriber, are no-ops.
pub fn init_with(level: &str, format: LogFormat) {
    let level = normalize_level(level).unwrap_or("warn");
    INIT.call_once(|| install(level, format));
}

#[cfg(feature = "tracing-subscriber")]
fn install(level: &'static str, format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_new(format!(
        "connstr={level},connstr_core={level},connstr_cli={level}"
    ))
    .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
    };

    if installed.is_ok() {
        tracing::info!(level, format = format.as_str(), "connstr logging initialized");
    }
}

#[cfg(not(feature = "tracing-subscriber"))]
fn install(_level: &'static str, _format: LogFormat) {
    // Without the subscriber feature, events reach whatever subscriber the
    // embedding application installs.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Json);
        assert_eq!(LogFormat::default().as_str(), "json");
    }

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("DEBUG"), Some("debug"));
        assert_eq!(normalize_level("verbose"), None);
    }
}
