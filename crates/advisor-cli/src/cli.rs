//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Advisor - Financial evaluation toolkit
#[derive(Parser)]
#[command(name = "advisor")]
#[command(about = "Compute and review client financial evaluations", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ~/.config/advisor/config.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recompute and show the derived totals of an evaluation record
    Evaluate {
        /// JSON record, draft or submitted evaluation ("-" for stdin)
        #[arg(short, long)]
        file: PathBuf,

        /// Print the recomputed record as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Apply field edits to a record one at a time
    Edit {
        /// JSON record ("-" for stdin)
        #[arg(short, long)]
        file: PathBuf,

        /// Edit to apply, e.g. --set personalIncome=5000 (repeatable)
        #[arg(short, long = "set", value_name = "FIELD=VALUE", required = true)]
        assignments: Vec<String>,

        /// Print the edited record as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Validate a draft and print the evaluation to store
    Submit {
        /// JSON draft ("-" for stdin)
        #[arg(short, long)]
        file: PathBuf,

        /// JSON client list used to resolve the client name
        #[arg(long)]
        clients: Option<PathBuf>,

        /// Evaluation id (defaults to the current time in milliseconds)
        #[arg(long)]
        id: Option<i64>,
    },

    /// Search the report list or add a report request to it
    Reports {
        #[command(subcommand)]
        action: ReportsAction,
    },

    /// Show the active configuration and where it was loaded from
    Config,
}

#[derive(Subcommand)]
pub enum ReportsAction {
    /// List reports matching a search and type
    List {
        /// JSON report list
        #[arg(short, long)]
        file: PathBuf,

        /// Case-insensitive search on title and client
        #[arg(short, long)]
        search: Option<String>,

        /// Report type: quarterly, annual, loan, investment, risk (default: all)
        #[arg(short = 't', long = "type")]
        report_type: Option<String>,
    },

    /// Turn a report generation request into a listing entry
    New {
        /// JSON report request
        #[arg(short, long)]
        file: PathBuf,

        /// Report id
        #[arg(long)]
        id: i64,

        /// Report date in YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}
