//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// connstr - Validate document-database connection strings
#[derive(Parser, Debug)]
#[command(name = "connstr")]
#[command(version)]
#[command(about = "connstr - Validate document-database connection strings", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a connstr.toml configuration file
    #[arg(short, long, global = true, env = "CONNSTR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one or more connection strings
    Check(CheckArgs),

    /// Print the canonical form of a connection string
    Normalize(NormalizeArgs),

    /// Check that a host in the connection string is reachable
    Connect(ConnectArgs),

    /// Display version information
    Version,
}

/// Arguments for the `check` command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Connection strings to validate (defaults to the configured URI)
    pub uris: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Expand $VAR and ${VAR} references before parsing
    #[arg(short, long)]
    pub env: bool,
}

/// Arguments for the `normalize` command
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Connection string to normalize
    pub uri: Option<String>,

    /// Expand $VAR and ${VAR} references before parsing
    #[arg(short, long)]
    pub env: bool,
}

/// Arguments for the `connect` command
#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Connection string to connect with
    #[arg(env = "MONGODB_URI")]
    pub uri: Option<String>,

    /// Per-host connect timeout in milliseconds
    #[arg(short, long)]
    pub timeout_ms: Option<u64>,

    /// Expand $VAR and ${VAR} references before parsing
    #[arg(short, long)]
    pub env: bool,
}
