//! `connstr version` command - Display version information.

use crate::error::CliResult;
use crate::output::{self, kv};

/// Package version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
const NAME: &str = env!("CARGO_PKG_NAME");

/// Run the version command
pub async fn run() -> CliResult<()> {
    output::header("connstr");

    kv("Version", VERSION);
    kv("Package", NAME);

    #[cfg(debug_assertions)]
    let build_mode = "debug";
    #[cfg(not(debug_assertions))]
    let build_mode = "release";

    kv("Build", build_mode);

    output::newline();
    output::section("Schemes");
    output::list_item("mongodb://");
    output::list_item("mongodb+srv://");
    output::list_item("host[:port][,host[:port]...][/database] (legacy)");

    output::newline();
    output::dim(&format!("connstr-core {}", VERSION));

    Ok(())
}
