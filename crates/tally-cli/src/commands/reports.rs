//! Summary and budget comparison commands

use anyhow::Result;
use tally_core::db::Database;
use tally_core::period::MonthSelector;

use super::{month_or_current, truncate, year_or_current};

pub fn cmd_summary(db: &Database, month: i64, year: Option<i32>, json: bool) -> Result<()> {
    let selector = MonthSelector::from_number(month)?;
    let year = year_or_current(year);
    let summary = db.get_expense_summary(selector, year)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    match selector {
        MonthSelector::All => println!("📊 Spending Summary (all time)"),
        MonthSelector::Month(m) => println!("📊 Spending Summary ({}-{:02})", year, m),
    }
    println!("   ─────────────────────────────────────────────────────────────");

    if summary.category_breakdown.is_empty() {
        println!("   No spending found in this period.");
        return Ok(());
    }

    println!("   Total: {:.2}", summary.total_expenses);
    println!();
    println!("   {:13} │ {:>10} │ {:>6}", "Category", "Amount", "%");
    println!("   ──────────────┼────────────┼────────");
    for entry in &summary.category_breakdown {
        let share = if summary.total_expenses > 0.0 {
            entry.total / summary.total_expenses * 100.0
        } else {
            0.0
        };
        println!(
            "   {:13} │ {:>10.2} │ {:>5.1}%",
            entry.category, entry.total, share
        );
    }

    println!();
    println!("   Recent");
    for tx in &summary.recent_transactions {
        println!(
            "   {} │ {:>10.2} │ {}",
            tx.date,
            tx.amount,
            truncate(&tx.description, 40)
        );
    }

    if summary.monthly_expenses.len() > 1 {
        println!();
        println!("   By month");
        for m in &summary.monthly_expenses {
            println!("   {}-{:02} │ {:>10.2}", m.year, m.month, m.total);
        }
    }

    Ok(())
}

pub fn cmd_compare(db: &Database, month: Option<u32>, year: Option<i32>, json: bool) -> Result<()> {
    let month = month_or_current(month);
    let year = year_or_current(year);
    let comparison = db.get_budget_comparison(month, year)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    println!();
    println!("📈 Budget vs. Spending ({}-{:02})", year, month);
    println!("   ─────────────────────────────────────────────────────────────");

    if comparison.rows.is_empty() {
        println!("   No budgets set for this month.");
        println!("   Spent: {:.2}", comparison.total_spent);
        return Ok(());
    }

    println!(
        "   {:13} │ {:>10} │ {:>10} │ {:>7}",
        "Category", "Spent", "Limit", "Used"
    );
    println!("   ──────────────┼────────────┼────────────┼─────────");
    for row in &comparison.rows {
        let used = format!("{:.0}%", row.actual_percentage);
        let used = if row.over_budget {
            format!("\x1b[31m{:>7}\x1b[0m", used) // Red when over
        } else {
            format!("{:>7}", used)
        };
        println!(
            "   {:13} │ {:>10.2} │ {:>10.2} │ {}",
            row.category, row.spent, row.limit, used
        );
    }

    println!();
    println!(
        "   Budgeted {:.2}, spent {:.2}, remaining {:.2}",
        comparison.total_limit, comparison.total_spent, comparison.remaining
    );

    for over in &comparison.over_budget {
        match over.over_percentage {
            Some(pct) => println!(
                "   ⚠️  {} over by {:.2} ({:.0}% over)",
                over.category, over.over_by, pct
            ),
            None => println!("   ⚠️  {} over by {:.2}", over.category, over.over_by),
        }
    }

    Ok(())
}
