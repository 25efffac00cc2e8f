//! ledgerview CLI entry point
//!
//! This is a minimal entrypoint that:
//! 1. Installs the log subscriber (stderr, `LEDGERVIEW_LOG` filter)
//! 2. Dispatches to CLI commands (via cli::run)
//! 3. Prints errors to stderr
//! 4. Exits with non-zero on failure
//!
//! All logic is delegated to the CLI module.

use ledgerview::{cli, observability};

#[tokio::main]
async fn main() {
    observability::init_logging("info");

    if let Err(e) = cli::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
