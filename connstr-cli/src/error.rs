//! CLI error types and result alias.

use connstr_core::{ConnectError, ParseError};
use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(connstr::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(code(connstr::config))]
    Config(String),

    /// Connection string rejected
    #[error("{0}")]
    #[diagnostic(code(connstr::parse))]
    Parse(#[from] ParseError),

    /// Connecting failed
    #[error("{0}")]
    #[diagnostic(code(connstr::connect))]
    Connect(#[from] ConnectError),

    /// One or more connection strings failed validation
    #[error("Validation error: {0}")]
    #[diagnostic(code(connstr::validation))]
    Validation(String),

    /// Output serialization error
    #[error("Output error: {0}")]
    #[diagnostic(code(connstr::output))]
    Output(#[from] serde_json::Error),
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(format!("Failed to parse TOML: {}", err))
    }
}
