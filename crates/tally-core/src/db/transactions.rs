//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{conversion_error, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionUpdate};
use crate::period::MonthSelector;

/// Column list matching `row_to_transaction`
const TRANSACTION_COLUMNS: &str =
    "id, amount, date, description, category, created_at, updated_at";

impl Database {
    /// Insert a validated transaction and return the stored record
    pub fn create_transaction(&self, tx: &NewTransaction) -> Result<Transaction> {
        tx.validate()?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO transactions (amount, date, description, category) VALUES (?, ?, ?, ?)",
            params![
                tx.amount,
                tx.date.to_string(),
                tx.description.trim(),
                tx.category.as_str(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        info!(id, amount = tx.amount, category = %tx.category, "Transaction created");

        self.get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM transactions WHERE id = ?", TRANSACTION_COLUMNS);

        let transaction = conn
            .query_row(&sql, params![id], |row| Self::row_to_transaction(row))
            .optional()?;

        Ok(transaction)
    }

    /// List transactions for a month selector, newest first
    ///
    /// `year` only matters for a specific month; `MonthSelector::All` returns
    /// every transaction in every year.
    pub fn list_transactions(&self, selector: MonthSelector, year: i32) -> Result<Vec<Transaction>> {
        let range = selector.date_range(year)?;
        self.list_transactions_in_range(range, None)
    }

    /// List transactions in an optional inclusive date range, newest first
    pub(crate) fn list_transactions_in_range(
        &self,
        range: Option<(NaiveDate, NaiveDate)>,
        limit: Option<i64>,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some((from, to)) = range {
            conditions.push("date BETWEEN ? AND ?");
            params.push(Box::new(from.to_string()));
            params.push(Box::new(to.to_string()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit_clause = if let Some(n) = limit {
            params.push(Box::new(n));
            "LIMIT ?"
        } else {
            ""
        };

        let sql = format!(
            "SELECT {} FROM transactions {} ORDER BY date DESC, id DESC {}",
            TRANSACTION_COLUMNS, where_clause, limit_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let transactions = stmt
            .query_map(params_refs.as_slice(), |row| Self::row_to_transaction(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Apply a partial update; the merged record must still be valid
    ///
    /// Returns `Error::NotFound` if no transaction has this ID.
    pub fn update_transaction(&self, id: i64, update: &TransactionUpdate) -> Result<Transaction> {
        let existing = self
            .get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))?;

        if update.is_empty() {
            return Ok(existing);
        }

        let merged = update.apply_to(&existing);
        merged.validate()?;

        let conn = self.conn()?;
        let changed = conn.execute(
            r#"
            UPDATE transactions
            SET amount = ?, date = ?, description = ?, category = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![
                merged.amount,
                merged.date.to_string(),
                merged.description,
                merged.category.as_str(),
                id,
            ],
        )?;

        // Deleted between the read and the write
        if changed == 0 {
            return Err(Error::NotFound(format!("transaction {}", id)));
        }

        info!(id, "Transaction updated");

        self.get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))
    }

    /// Delete a transaction
    ///
    /// Returns `Error::NotFound` if no transaction has this ID.
    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("transaction {}", id)));
        }

        info!(id, "Transaction deleted");
        Ok(())
    }

    /// Count total transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Helper to convert a row to Transaction
    /// Column order: id, amount, date, description, category, created_at, updated_at
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let date_str: String = row.get(2)?;
        let category_str: String = row.get(4)?;
        let created_at_str: String = row.get(5)?;
        let updated_at_str: String = row.get(6)?;
        Ok(Transaction {
            id: row.get(0)?,
            amount: row.get(1)?,
            date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                .map_err(|e| conversion_error(2, e))?,
            description: row.get(3)?,
            category: category_str
                .parse()
                .map_err(|e: String| conversion_error(4, e))?,
            created_at: parse_datetime(5, &created_at_str)?,
            updated_at: parse_datetime(6, &updated_at_str)?,
        })
    }
}
