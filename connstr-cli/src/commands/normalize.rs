//! `connstr normalize` command - Print the canonical form of a connection string.

use crate::cli::NormalizeArgs;
use crate::commands::{parse_input, resolve_input};
use crate::config::Config;
use crate::error::CliResult;

/// Run the normalize command
pub async fn run(args: NormalizeArgs, config: &Config) -> CliResult<()> {
    let input = resolve_input(args.uri.as_deref(), config);
    let conn = parse_input(input, args.env || config.connection.expand_env)?;

    // Plain stdout so the result can be piped.
    println!("{}", conn.to_uri());
    Ok(())
}
