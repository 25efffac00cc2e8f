//! CLI argument definitions using clap
//!
//! Commands:
//! - ledgerview explain --kind <quotes|invoices> [--filter <json>]
//! - ledgerview query --records <path> --kind <quotes|invoices> [--filter <json>]
//! - ledgerview summary --records <path> --kind <quotes|invoices> [--group-by <field>]
//! - ledgerview overview --records <path> [--as-of <rfc3339>]

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::dashboard::RecordKind;

/// ledgerview - query routing and roll-ups for quotes and invoices
#[derive(Parser, Debug)]
#[command(name = "ledgerview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the plan a filter resolves to, without executing it
    Explain {
        /// Record kind
        #[arg(long)]
        kind: RecordKind,

        /// Filter form as JSON, or @path to a JSON file
        #[arg(long)]
        filter: Option<String>,

        /// Print the plan as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Execute a filter against a record file
    Query {
        /// JSON file of collections: {"orcamentos": [...], "notasFiscais": [...]}
        #[arg(long)]
        records: PathBuf,

        /// Record kind
        #[arg(long)]
        kind: RecordKind,

        /// Filter form as JSON, or @path to a JSON file
        #[arg(long)]
        filter: Option<String>,
    },

    /// Summarize a whole collection
    Summary {
        /// JSON file of collections
        #[arg(long)]
        records: PathBuf,

        /// Record kind
        #[arg(long)]
        kind: RecordKind,

        /// Field to group by (e.g. cliente, tipoServico)
        #[arg(long)]
        group_by: Option<String>,
    },

    /// Both summaries, overdue invoices and margin
    Overview {
        /// JSON file of collections
        #[arg(long)]
        records: PathBuf,

        /// Reference time for overdue invoices (defaults to now)
        #[arg(long)]
        as_of: Option<DateTime<Utc>>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summary() {
        let cli = Cli::try_parse_from([
            "ledgerview",
            "summary",
            "--records",
            "data.json",
            "--kind",
            "quotes",
            "--group-by",
            "cliente",
        ])
        .unwrap();

        match cli.command {
            Command::Summary { kind, group_by, .. } => {
                assert_eq!(kind, RecordKind::Quotes);
                assert_eq!(group_by.as_deref(), Some("cliente"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ledgerview",
            "explain",
            "--kind",
            "notasFiscais",
            "--config",
            "ledgerview.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ledgerview.json")));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["ledgerview", "explain", "--kind", "clientes"]).is_err());
    }
}
