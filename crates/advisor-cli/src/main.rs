//! Advisor CLI - Financial evaluation toolkit
//!
//! Usage:
//!   advisor evaluate --file record.json           Show derived totals
//!   advisor edit --file record.json --set k=v     Apply edits
//!   advisor submit --file draft.json              Validate and finalize
//!   advisor reports list --file reports.json      Search the report list

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let (config, source) = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Evaluate { file, json } => commands::cmd_evaluate(&config, &file, json),
        Commands::Edit {
            file,
            assignments,
            json,
        } => commands::cmd_edit(&config, &file, &assignments, json),
        Commands::Submit { file, clients, id } => {
            commands::cmd_submit(&file, clients.as_deref(), id)
        }
        Commands::Reports { action } => match action {
            ReportsAction::List {
                file,
                search,
                report_type,
            } => commands::cmd_reports_list(&file, search.as_deref(), report_type.as_deref()),
            ReportsAction::New { file, id, date } => {
                commands::cmd_reports_new(&config, &file, id, date.as_deref())
            }
        },
        Commands::Config => commands::cmd_config(&config, &source),
    }
}
