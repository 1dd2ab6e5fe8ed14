//! `connstr check` command - Validate connection strings.

use connstr_core::{ConnectionString, ParseError, ParsedUri};
use serde::Serialize;

use crate::cli::CheckArgs;
use crate::commands::parse_input;
use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::output::{self, kv, success};

/// Outcome of validating one connection string
#[derive(Debug, Serialize)]
pub struct CheckReport {
    /// The input as given, if any
    pub input: Option<String>,
    /// Whether it parsed
    pub valid: bool,
    /// Canonical form, when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    /// Parsed components, when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<ParsedUri>,
    /// Error kind, when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    /// Numeric error code, when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    /// Error message, when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckReport {
    fn new(input: Option<String>, result: Result<ConnectionString, ParseError>) -> Self {
        match result {
            Ok(conn) => Self {
                input,
                valid: true,
                canonical: Some(conn.to_uri()),
                parsed: Some(conn.parsed().clone()),
                kind: None,
                code: None,
                message: None,
            },
            Err(e) => Self {
                input,
                valid: false,
                canonical: None,
                parsed: None,
                kind: Some(e.kind()),
                code: Some(e.code().as_i32()),
                message: Some(e.to_string()),
            },
        }
    }
}

/// Run the check command
pub async fn run(args: CheckArgs, config: &Config) -> CliResult<()> {
    let expand = args.env || config.connection.expand_env;

    let inputs: Vec<Option<String>> = if args.uris.is_empty() {
        vec![config.connection.uri.clone()]
    } else {
        args.uris.into_iter().map(Some).collect()
    };

    let reports: Vec<CheckReport> = inputs
        .into_iter()
        .map(|input| {
            let result = parse_input(input.as_deref().into(), expand);
            CheckReport::new(input, result)
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    let failed = reports.iter().filter(|r| !r.valid).count();
    if failed > 0 {
        return Err(CliError::Validation(format!(
            "{} of {} connection strings rejected",
            failed,
            reports.len()
        )));
    }
    Ok(())
}

fn print_report(report: &CheckReport) {
    let label = report.input.as_deref().unwrap_or("<none>");

    if let Some(ref parsed) = report.parsed {
        success(&format!("valid: {}", label));
        kv(
            "Form",
            parsed.scheme.map_or("legacy", |s| s.name()),
        );
        let hosts: Vec<String> = parsed.hosts.iter().map(ToString::to_string).collect();
        kv("Hosts", &hosts.join(", "));
        kv("Database", parsed.database.as_deref().unwrap_or("-"));
        if !parsed.options.is_empty() {
            kv("Options", &parsed.options.to_query());
        }
        if let Some(ref canonical) = report.canonical {
            kv("Canonical", canonical);
        }
    } else {
        output::error(&format!(
            "invalid: {}: {}",
            label,
            report.message.as_deref().unwrap_or_default()
        ));
        kv("Kind", report.kind.unwrap_or_default());
        kv("Code", &report.code.map(|c| c.to_string()).unwrap_or_default());
    }
    output::newline();
}
