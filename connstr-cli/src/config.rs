//! CLI configuration handling.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CliResult;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "connstr.toml";

/// connstr CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionSettings,

    /// Logging settings
    pub logging: LoggingSettings,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from an explicit path, or from `connstr.toml` in the current
    /// directory if one exists, or fall back to defaults.
    pub fn discover(explicit: Option<&Path>) -> CliResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = PathBuf::from(CONFIG_FILE_NAME);
        if default_path.is_file() {
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Connection string used when none is given on the command line
    pub uri: Option<String>,

    /// Expand `$VAR` references before parsing
    pub expand_env: bool,

    /// Per-host connect timeout in milliseconds
    pub connect_timeout_ms: Option<u64>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Output format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
        }
    }
}
