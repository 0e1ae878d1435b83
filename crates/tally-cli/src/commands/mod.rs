//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `budgets` - Budget commands (list, set)
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `reports` - Summary and budget comparison
//! - `serve` - Web server command
//! - `status` - Database status
//! - `transactions` - Transaction commands (list, add, edit, delete)

pub mod budgets;
pub mod core;
pub mod reports;
pub mod serve;
pub mod status;
pub mod transactions;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use reports::*;
pub use serve::*;
pub use status::*;
pub use transactions::*;

use chrono::{Datelike, Utc};

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Year to use when none was given on the command line
pub fn year_or_current(year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| Utc::now().year())
}

/// Month to use when none was given on the command line
pub fn month_or_current(month: Option<u32>) -> u32 {
    month.unwrap_or_else(|| Utc::now().month())
}
