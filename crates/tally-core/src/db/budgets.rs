//! Budget operations

use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use super::{conversion_error, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{validate_year, Budget, Category, NewBudget};

const BUDGET_COLUMNS: &str = r#"id, category, "limit", month, year, created_at, updated_at"#;

impl Database {
    /// List the budgets set for a month, ordered by category
    pub fn list_budgets(&self, month: u32, year: i32) -> Result<Vec<Budget>> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidData(format!(
                "Budget month must be between 1 and 12 (got {})",
                month
            )));
        }
        validate_year(year)?;

        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM budgets WHERE month = ? AND year = ? ORDER BY category",
            BUDGET_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let budgets = stmt
            .query_map(params![month, year], |row| Self::row_to_budget(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    /// Get the budget for one category and month, if set
    pub fn get_budget(&self, category: Category, month: u32, year: i32) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM budgets WHERE category = ? AND month = ? AND year = ?",
            BUDGET_COLUMNS
        );

        let budget = conn
            .query_row(&sql, params![category.as_str(), month, year], |row| {
                Self::row_to_budget(row)
            })
            .optional()?;

        Ok(budget)
    }

    /// Create or replace the budget for (category, month, year)
    pub fn upsert_budget(&self, budget: &NewBudget) -> Result<Budget> {
        budget.validate()?;
        let conn = self.conn()?;

        let id = Self::upsert_budget_row(&conn, budget)?;
        info!(
            category = %budget.category,
            month = budget.month,
            year = budget.year,
            limit = budget.limit,
            "Budget upserted"
        );

        Self::budget_by_id(&conn, id)
    }

    /// Upsert a batch of budgets atomically
    ///
    /// Every entry is validated before anything is written, and all writes
    /// share one SQL transaction: either the whole batch is stored or none
    /// of it is. Entries repeating a (category, month, year) key collapse
    /// into one stored budget holding the last entry's limit.
    pub fn upsert_budgets(&self, budgets: &[NewBudget]) -> Result<Vec<Budget>> {
        if budgets.is_empty() {
            return Err(Error::InvalidData("Budget batch is empty".to_string()));
        }
        for (index, budget) in budgets.iter().enumerate() {
            budget.validate().map_err(|e| match e {
                Error::InvalidData(msg) => {
                    Error::InvalidData(format!("budgets[{}]: {}", index, msg))
                }
                other => other,
            })?;
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let mut ids = Vec::with_capacity(budgets.len());
        for budget in budgets {
            let id = Self::upsert_budget_row(&tx, budget)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        let stored = ids
            .iter()
            .map(|id| Self::budget_by_id(&tx, *id))
            .collect::<Result<Vec<_>>>()?;

        tx.commit()?;

        info!(count = stored.len(), "Budget batch upserted");
        Ok(stored)
    }

    /// Count all stored budgets
    pub fn count_budgets(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM budgets", [], |row| row.get(0))?;
        Ok(count)
    }

    fn upsert_budget_row(conn: &Connection, budget: &NewBudget) -> Result<i64> {
        let id: i64 = conn.query_row(
            r#"
            INSERT INTO budgets (category, "limit", month, year)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(category, month, year) DO UPDATE SET
                "limit" = excluded."limit",
                updated_at = CURRENT_TIMESTAMP
            RETURNING id
            "#,
            params![
                budget.category.as_str(),
                budget.limit,
                budget.month,
                budget.year
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn budget_by_id(conn: &Connection, id: i64) -> Result<Budget> {
        let sql = format!("SELECT {} FROM budgets WHERE id = ?", BUDGET_COLUMNS);
        conn.query_row(&sql, params![id], |row| Self::row_to_budget(row))
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("budget {}", id)))
    }

    /// Column order: id, category, limit, month, year, created_at, updated_at
    fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
        let category_str: String = row.get(1)?;
        let created_at_str: String = row.get(5)?;
        let updated_at_str: String = row.get(6)?;
        Ok(Budget {
            id: row.get(0)?,
            category: category_str
                .parse()
                .map_err(|e: String| conversion_error(1, e))?,
            limit: row.get(2)?,
            month: row.get(3)?,
            year: row.get(4)?,
            created_at: parse_datetime(5, &created_at_str)?,
            updated_at: parse_datetime(6, &updated_at_str)?,
        })
    }
}
