//! Budget command implementations

use anyhow::{anyhow, Context, Result};
use tally_core::db::Database;
use tally_core::models::{Category, NewBudget};

use super::{month_or_current, year_or_current};

pub fn cmd_budgets_list(db: &Database, month: Option<u32>, year: Option<i32>) -> Result<()> {
    let month = month_or_current(month);
    let year = year_or_current(year);
    let budgets = db.list_budgets(month, year)?;

    if budgets.is_empty() {
        println!("No budgets set for {}-{:02}. Set one with:", year, month);
        println!("  tally budgets set Food 300 --month {} --year {}", month, year);
        return Ok(());
    }

    println!();
    println!("💰 Budgets for {}-{:02}", year, month);
    println!("   ─────────────────────────────────────────────────────────────");

    for budget in &budgets {
        println!("   {:13} │ {:>10.2}", budget.category, budget.limit);
    }

    let total: f64 = budgets.iter().map(|b| b.limit).sum();
    println!("   ──────────────┼────────────");
    println!("   {:13} │ {:>10.2}", "Total", total);

    Ok(())
}

pub fn cmd_budgets_set(
    db: &Database,
    category: &str,
    limit: f64,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let category: Category = category.parse().map_err(|e: String| anyhow!(e))?;

    let budget = db
        .upsert_budget(&NewBudget {
            category,
            limit,
            month: month_or_current(month),
            year: year_or_current(year),
        })
        .context("Failed to set budget")?;

    println!(
        "✅ Budget for {} in {}-{:02} set to {:.2}",
        budget.category, budget.year, budget.month, budget.limit
    );

    Ok(())
}
