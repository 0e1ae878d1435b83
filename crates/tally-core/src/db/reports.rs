//! Expense summaries and budget comparison

use chrono::NaiveDate;

use super::{conversion_error, Database, DbConn};
use crate::comparison::{compare_budgets, BudgetComparison};
use crate::error::Result;
use crate::models::*;
use crate::period::MonthSelector;

impl Database {
    /// Summarize spending for a month selector
    ///
    /// `MonthSelector::All` covers every transaction and yields one monthly
    /// entry per (month, year) seen; a specific month of `year` yields exactly
    /// one monthly entry, even when nothing was spent.
    pub fn get_expense_summary(&self, selector: MonthSelector, year: i32) -> Result<ExpenseSummary> {
        let range = selector.date_range(year)?;
        let conn = self.conn()?;

        let total_expenses = Self::total_in_range(&conn, range)?;
        let category_breakdown = Self::category_breakdown_in_range(&conn, range)?;
        drop(conn);

        let recent_transactions =
            self.list_transactions_in_range(range, Some(RECENT_TRANSACTIONS_LIMIT))?;

        let monthly_expenses = match selector {
            MonthSelector::Month(month) => vec![MonthlyExpense {
                month,
                year,
                total: total_expenses,
            }],
            MonthSelector::All => self.monthly_expense_series()?,
        };

        Ok(ExpenseSummary {
            total_expenses,
            category_breakdown,
            recent_transactions,
            monthly_expenses,
        })
    }

    /// Compare one month's spending with the budgets set for it
    pub fn get_budget_comparison(&self, month: u32, year: i32) -> Result<BudgetComparison> {
        let budgets = self.list_budgets(month, year)?;

        let range = MonthSelector::from_number(i64::from(month))?.date_range(year)?;
        let conn = self.conn()?;
        let breakdown = Self::category_breakdown_in_range(&conn, range)?;

        Ok(compare_budgets(&breakdown, &budgets))
    }

    /// Per-month totals across every transaction, oldest month first
    fn monthly_expense_series(&self) -> Result<Vec<MonthlyExpense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT CAST(strftime('%m', date) AS INTEGER) AS month,
                   CAST(strftime('%Y', date) AS INTEGER) AS year,
                   SUM(amount) AS total
            FROM transactions
            GROUP BY year, month
            ORDER BY year ASC, month ASC
            "#,
        )?;

        let series = stmt
            .query_map([], |row| {
                Ok(MonthlyExpense {
                    month: row.get(0)?,
                    year: row.get(1)?,
                    total: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(series)
    }

    fn total_in_range(conn: &DbConn, range: Option<(NaiveDate, NaiveDate)>) -> Result<f64> {
        let total: f64 = match range {
            Some((from, to)) => conn.query_row(
                "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE date BETWEEN ?1 AND ?2",
                [from.to_string(), to.to_string()],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT COALESCE(SUM(amount), 0) FROM transactions",
                [],
                |row| row.get(0),
            )?,
        };
        Ok(total)
    }

    /// Category totals, largest first (ties by category name)
    fn category_breakdown_in_range(
        conn: &DbConn,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<CategoryTotal>> {
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        let where_clause = if let Some((from, to)) = range {
            params.push(Box::new(from.to_string()));
            params.push(Box::new(to.to_string()));
            "WHERE date BETWEEN ?1 AND ?2"
        } else {
            ""
        };

        let sql = format!(
            r#"
            SELECT category, SUM(amount) AS total
            FROM transactions
            {}
            GROUP BY category
            ORDER BY total DESC, category ASC
            "#,
            where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let breakdown = stmt
            .query_map(params_refs.as_slice(), |row| {
                let category_str: String = row.get(0)?;
                Ok(CategoryTotal {
                    category: category_str
                        .parse()
                        .map_err(|e: String| conversion_error(0, e))?,
                    total: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(breakdown)
    }
}
