//! Transaction command implementations

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use tally_core::db::Database;
use tally_core::models::{Category, NewTransaction, TransactionUpdate};
use tally_core::period::MonthSelector;

use super::{truncate, year_or_current};

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", value))
}

fn parse_category(value: &str) -> Result<Category> {
    value.parse().map_err(|e: String| anyhow!(e))
}

pub fn cmd_transactions_list(db: &Database, month: i64, year: Option<i32>) -> Result<()> {
    let selector = MonthSelector::from_number(month)?;
    let year = year_or_current(year);
    let transactions = db.list_transactions(selector, year)?;

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  tally transactions add 12.50 \"Lunch\" --category Food");
        return Ok(());
    }

    println!();
    match selector {
        MonthSelector::All => println!("📝 Transactions (all time)"),
        MonthSelector::Month(m) => println!("📝 Transactions ({}-{:02})", year, m),
    }
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in &transactions {
        println!(
            "   [{:>4}] {} │ {:>10.2} │ {:13} │ {}",
            tx.id,
            tx.date,
            tx.amount,
            tx.category,
            truncate(&tx.description, 35)
        );
    }

    let total: f64 = transactions.iter().map(|t| t.amount).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {} transaction(s), total {:.2}", transactions.len(), total);

    Ok(())
}

pub fn cmd_transactions_add(
    db: &Database,
    amount: f64,
    description: &str,
    category: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let category = category.map(parse_category).transpose()?.unwrap_or_default();
    let date = match date {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };

    let tx = db
        .create_transaction(&NewTransaction {
            amount,
            date,
            description: description.to_string(),
            category,
        })
        .context("Failed to record transaction")?;

    println!(
        "✅ Recorded #{}: {:.2} on {} ({}) - {}",
        tx.id, tx.amount, tx.date, tx.category, tx.description
    );

    Ok(())
}

pub fn cmd_transactions_edit(
    db: &Database,
    id: i64,
    amount: Option<f64>,
    description: Option<String>,
    category: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let update = TransactionUpdate {
        amount,
        date: date.map(parse_date).transpose()?,
        description,
        category: category.map(parse_category).transpose()?,
    };

    if update.is_empty() {
        println!("Nothing to change. Pass --amount, --description, --category or --date.");
        return Ok(());
    }

    let tx = db
        .update_transaction(id, &update)
        .with_context(|| format!("Failed to update transaction {}", id))?;

    println!(
        "✅ Updated #{}: {:.2} on {} ({}) - {}",
        tx.id, tx.amount, tx.date, tx.category, tx.description
    );

    Ok(())
}

pub fn cmd_transactions_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_transaction(id)
        .with_context(|| format!("Failed to delete transaction {}", id))?;

    println!("🗑️  Deleted transaction #{}", id);

    Ok(())
}
