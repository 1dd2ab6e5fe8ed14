//! CLI command implementations.

pub mod check;
pub mod connect;
pub mod normalize;
pub mod version;

use connstr_core::{ConnectionInput, ConnectionString, EnvExpander, ParseResult, parse};

use crate::config::Config;

/// Pick the command-line URI, else the configured one. With neither set
/// the input is absent, which the parser reports as missing.
pub(crate) fn resolve_input(arg: Option<&str>, config: &Config) -> ConnectionInput {
    arg.or(config.connection.uri.as_deref()).into()
}

/// Parse an input, expanding environment references first if asked.
pub(crate) fn parse_input(input: ConnectionInput, expand: bool) -> ParseResult<ConnectionString> {
    match input {
        ConnectionInput::Text(text) if expand => {
            let expanded = EnvExpander::new().expand(&text)?;
            ConnectionString::parse(&expanded)
        }
        other => parse(other),
    }
}
