//! Budget vs. spending comparison
//!
//! Combines a month's category breakdown with the budgets set for that month.
//! Rows follow the budgets: a category with spending but no budget gets no
//! row, while the aggregate `total_spent` still counts it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Budget, Category, CategoryTotal};

/// Spending against one budget entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetComparisonRow {
    pub category: Category,
    pub spent: f64,
    pub limit: f64,
    /// Share of the limit consumed, clamped to 0..=100 for progress display
    pub percentage: f64,
    /// Unclamped share of the limit consumed
    pub actual_percentage: f64,
    pub over_budget: bool,
}

/// A category whose spending exceeds its limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverBudget {
    pub category: Category,
    pub spent: f64,
    pub limit: f64,
    pub over_by: f64,
    /// `actual_percentage - 100`; absent for a zero limit
    pub over_percentage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetComparison {
    pub rows: Vec<BudgetComparisonRow>,
    pub total_limit: f64,
    pub total_spent: f64,
    /// `total_limit - total_spent`, negative when overspent overall
    pub remaining: f64,
    pub over_budget: Vec<OverBudget>,
}

impl BudgetComparisonRow {
    fn new(category: Category, spent: f64, limit: f64) -> Self {
        let actual_percentage = if limit > 0.0 {
            spent / limit * 100.0
        } else {
            0.0
        };

        Self {
            category,
            spent,
            limit,
            percentage: actual_percentage.clamp(0.0, 100.0),
            actual_percentage,
            over_budget: spent > limit,
        }
    }

    fn overage(&self) -> Option<OverBudget> {
        if !self.over_budget {
            return None;
        }
        Some(OverBudget {
            category: self.category,
            spent: self.spent,
            limit: self.limit,
            over_by: self.spent - self.limit,
            over_percentage: (self.limit > 0.0).then(|| self.actual_percentage - 100.0),
        })
    }
}

/// Compare a category breakdown against the budgets for the same period
pub fn compare_budgets(breakdown: &[CategoryTotal], budgets: &[Budget]) -> BudgetComparison {
    let mut spent_by_category: HashMap<Category, f64> = HashMap::new();
    for entry in breakdown {
        *spent_by_category.entry(entry.category).or_insert(0.0) += entry.total;
    }

    let rows: Vec<BudgetComparisonRow> = budgets
        .iter()
        .map(|budget| {
            let spent = spent_by_category
                .get(&budget.category)
                .copied()
                .unwrap_or(0.0);
            BudgetComparisonRow::new(budget.category, spent, budget.limit)
        })
        .collect();

    let over_budget = rows.iter().filter_map(|row| row.overage()).collect();

    let total_limit: f64 = budgets.iter().map(|b| b.limit).sum();
    let total_spent: f64 = breakdown.iter().map(|c| c.total).sum();

    BudgetComparison {
        rows,
        total_limit,
        total_spent,
        remaining: total_limit - total_spent,
        over_budget,
    }
}
