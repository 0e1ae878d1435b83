//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - Domain models and validation
//! - Month selectors and their date ranges
//! - Database access and migrations (transactions, budgets)
//! - Expense summaries and budget comparison

pub mod comparison;
pub mod db;
pub mod error;
pub mod models;
pub mod period;

pub use comparison::{compare_budgets, BudgetComparison, BudgetComparisonRow, OverBudget};
pub use db::Database;
pub use error::{Error, Result};
pub use models::{
    Budget, Category, CategoryTotal, ExpenseSummary, MonthlyExpense, NewBudget, NewTransaction,
    Transaction, TransactionUpdate,
};
pub use period::MonthSelector;
