//! Tally CLI - Personal expense tracker
//!
//! Usage:
//!   tally init                            Initialize database
//!   tally transactions add 12.50 "Lunch"  Record an expense
//!   tally summary --month 3               Summarize spending
//!   tally serve --port 3000               Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
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
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, static_dir.as_deref()).await,
        Commands::Status => commands::cmd_status(&cli.db),
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_transactions_list(&db, 0, None),
                Some(TransactionsAction::List { month, year }) => {
                    commands::cmd_transactions_list(&db, month, year)
                }
                Some(TransactionsAction::Add {
                    amount,
                    description,
                    category,
                    date,
                }) => commands::cmd_transactions_add(
                    &db,
                    amount,
                    &description,
                    category.as_deref(),
                    date.as_deref(),
                ),
                Some(TransactionsAction::Edit {
                    id,
                    amount,
                    description,
                    category,
                    date,
                }) => commands::cmd_transactions_edit(
                    &db,
                    id,
                    amount,
                    description,
                    category.as_deref(),
                    date.as_deref(),
                ),
                Some(TransactionsAction::Delete { id }) => {
                    commands::cmd_transactions_delete(&db, id)
                }
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_budgets_list(&db, None, None),
                Some(BudgetsAction::List { month, year }) => {
                    commands::cmd_budgets_list(&db, month, year)
                }
                Some(BudgetsAction::Set {
                    category,
                    limit,
                    month,
                    year,
                }) => commands::cmd_budgets_set(&db, &category, limit, month, year),
            }
        }
        Commands::Summary { month, year, json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_summary(&db, month, year, json)
        }
        Commands::Compare { month, year, json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_compare(&db, month, year, json)
        }
    }
}
