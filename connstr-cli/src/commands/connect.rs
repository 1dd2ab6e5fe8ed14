//! `connstr connect` command - Check that a host is reachable.

use std::time::Duration;

use connstr_core::{ClientConfig, Connector, HostSetConnector, TcpDialer};

use crate::cli::ConnectArgs;
use crate::commands::{parse_input, resolve_input};
use crate::config::Config;
use crate::error::CliResult;
use crate::output::{self, kv, success};

/// Run the connect command
pub async fn run(args: ConnectArgs, config: &Config) -> CliResult<()> {
    output::header("Connect");

    let input = resolve_input(args.uri.as_deref(), config);
    let conn = parse_input(input, args.env || config.connection.expand_env)?;
    let client_config = ClientConfig::from_connection_string(conn)?;

    let dialer = match args.timeout_ms.or(config.connection.connect_timeout_ms) {
        Some(ms) => TcpDialer::new(Duration::from_millis(ms)),
        None => TcpDialer::from_config(&client_config),
    };

    let seeds = client_config.connection_string.seed_list();
    kv("Hosts", &seeds);
    if let Some(ref set) = client_config.replica_set {
        kv("Replica set", set);
    }
    kv("Timeout", &format!("{}ms", dialer.timeout().as_millis()));
    output::newline();

    let connector = HostSetConnector::new(dialer);
    let connection = connector.connect(&client_config.connection_string).await?;

    success(&format!("Reached {} ({})", connection.host, connection.peer));
    if let Some(ref db) = connection.database {
        kv("Database", db);
    }
    Ok(())
}
