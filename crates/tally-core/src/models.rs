//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum length of a transaction description (after trimming)
pub const MIN_DESCRIPTION_LEN: usize = 3;

/// Number of transactions included in a summary's recent list
pub const RECENT_TRANSACTIONS_LIMIT: i64 = 5;

/// Spending category shared by transactions, budgets, and reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Category {
    Food,
    Rent,
    Entertainment,
    Transport,
    Housing,
    #[default]
    Others,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 6] = [
        Self::Food,
        Self::Rent,
        Self::Entertainment,
        Self::Transport,
        Self::Housing,
        Self::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Rent => "Rent",
            Self::Entertainment => "Entertainment",
            Self::Transport => "Transport",
            Self::Housing => "Housing",
            Self::Others => "Others",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "rent" => Ok(Self::Rent),
            "entertainment" => Ok(Self::Entertainment),
            "transport" => Ok(Self::Transport),
            "housing" => Ok(Self::Housing),
            "others" | "other" => Ok(Self::Others),
            _ => Err(format!(
                "Unknown category: {}. Available: Food, Rent, Entertainment, Transport, Housing, Others",
                s
            )),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A recorded expense
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    /// Always positive
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A new transaction to be stored (before DB insertion)
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub category: Category,
}

impl NewTransaction {
    /// Check amount and description constraints
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        validate_description(&self.description)
    }
}

/// Partial update of a transaction; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<Category>,
}

impl TransactionUpdate {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.category.is_none()
    }

    /// Merge this update over an existing transaction, producing the record to store
    pub fn apply_to(&self, existing: &Transaction) -> NewTransaction {
        NewTransaction {
            amount: self.amount.unwrap_or(existing.amount),
            date: self.date.unwrap_or(existing.date),
            description: self
                .description
                .as_deref()
                .map(|d| d.trim().to_string())
                .unwrap_or_else(|| existing.description.clone()),
            category: self.category.unwrap_or(existing.category),
        }
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidData(format!(
            "Amount must be positive (got {})",
            amount
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().chars().count() < MIN_DESCRIPTION_LEN {
        return Err(Error::InvalidData(format!(
            "Description must be at least {} characters",
            MIN_DESCRIPTION_LEN
        )));
    }
    Ok(())
}

/// Monthly spending limit for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: i64,
    pub category: Category,
    pub limit: f64,
    pub month: u32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Budget to create or replace, keyed on (category, month, year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category: Category,
    pub limit: f64,
    pub month: u32,
    pub year: i32,
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        if !self.limit.is_finite() || self.limit < 0.0 {
            return Err(Error::InvalidData(format!(
                "Budget limit must be zero or more (got {})",
                self.limit
            )));
        }
        if !(1..=12).contains(&self.month) {
            return Err(Error::InvalidData(format!(
                "Budget month must be between 1 and 12 (got {})",
                self.month
            )));
        }
        validate_year(self.year)
    }
}

/// Years are stored as four-digit integers
pub fn validate_year(year: i32) -> Result<()> {
    if !(1000..=9999).contains(&year) {
        return Err(Error::InvalidData(format!(
            "Year must be a four-digit number (got {})",
            year
        )));
    }
    Ok(())
}

/// Summed spending for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// Summed spending for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpense {
    pub month: u32,
    pub year: i32,
    pub total: f64,
}

/// Aggregated view of spending for a month selector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub total_expenses: f64,
    pub category_breakdown: Vec<CategoryTotal>,
    pub recent_transactions: Vec<Transaction>,
    pub monthly_expenses: Vec<MonthlyExpense>,
}
