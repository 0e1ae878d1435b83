//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track expenses and monthly budgets
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted personal expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, env = "TALLY_DB", default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "TALLY_PORT", default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, env = "TALLY_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show database status
    Status,

    /// Manage transactions (list, add, edit, delete)
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// Manage monthly budgets (list, set)
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Summarize spending (total, categories, recent, per month)
    Summary {
        /// Month 1-12, or 0 for all time
        #[arg(short, long, default_value = "0")]
        month: i64,

        /// Year for the month (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Compare a month's spending with its budgets
    Compare {
        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions, newest first
    List {
        /// Month 1-12, or 0 for all time
        #[arg(short, long, default_value = "0")]
        month: i64,

        /// Year for the month (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Record an expense
    Add {
        /// Amount spent (positive)
        amount: f64,

        /// What the money was spent on (at least 3 characters)
        description: String,

        /// Category: Food, Rent, Entertainment, Transport, Housing, Others
        #[arg(short, long)]
        category: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Change fields of an existing expense
    Edit {
        /// Transaction ID
        id: i64,

        /// New amount
        #[arg(short, long)]
        amount: Option<f64>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// List budgets for a month
    List {
        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Set the limit for a category in a month
    Set {
        /// Category: Food, Rent, Entertainment, Transport, Housing, Others
        category: String,

        /// Spending limit (zero or more)
        limit: f64,

        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },
}
