//! connstr CLI - Validate document-database connection strings.

use clap::Parser;

use connstr_cli::cli::{Cli, Command};
use connstr_cli::commands;
use connstr_cli::config::Config;
use connstr_cli::error::CliResult;
use connstr_cli::output;
use connstr_core::logging::{self, LogFormat};

#[tokio::main]
async fn main() {
    // Run the CLI and handle errors
    if let Err(e) = run().await {
        output::newline();
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = Config::discover(cli.config.as_deref())?;

    // Environment variables take precedence over the config file.
    match config.logging.level.as_deref() {
        Some(level) if std::env::var("CONNSTR_LOG_LEVEL").is_err() => {
            logging::init_with(level, LogFormat::parse(&config.logging.format))
        }
        _ => logging::init(),
    }

    match cli.command {
        Command::Check(args) => commands::check::run(args, &config).await,
        Command::Normalize(args) => commands::normalize::run(args, &config).await,
        Command::Connect(args) => commands::connect::run(args, &config).await,
        Command::Version => commands::version::run().await,
    }
}
