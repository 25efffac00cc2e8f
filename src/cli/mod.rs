//! CLI module for ledgerview
//!
//! Provides command-line interface for:
//! - explain: Show the plan a filter resolves to
//! - query: Execute a filter against a record file
//! - summary: Summarize a collection, optionally grouped
//! - overview: Both summaries, overdue invoices and margin

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, overview, query, run_command, summary, FormFilter};
pub use errors::{CliError, CliErrorCode, CliResult};

/// Parse arguments and run the selected command
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.config.as_deref(), cli.command).await
}
