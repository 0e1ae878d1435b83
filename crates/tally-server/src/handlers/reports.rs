//! Summary and budget comparison handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use tally_core::comparison::BudgetComparison;
use tally_core::models::{validate_year, ExpenseSummary};
use tally_core::period::MonthSelector;

/// Query parameters shared by month-scoped endpoints
///
/// Both are taken as strings so malformed values produce a JSON 400 rather
/// than the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// 0 (or absent) for all time, 1-12 for a month
    pub month: Option<String>,
    /// Four-digit year; defaults to the current year
    pub year: Option<String>,
}

/// Resolve an optional year parameter, defaulting to the current UTC year
pub fn resolve_year(year: Option<&str>) -> Result<i32, AppError> {
    match year.map(str::trim).filter(|y| !y.is_empty()) {
        None => Ok(Utc::now().year()),
        Some(y) => {
            let year: i32 = y
                .parse()
                .map_err(|_| AppError::bad_request(&format!("Invalid year parameter: {}", y)))?;
            validate_year(year)?;
            Ok(year)
        }
    }
}

/// GET /api/summary - Totals, category breakdown, recent and monthly spending
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<ExpenseSummary>, AppError> {
    let selector = MonthSelector::parse(params.month.as_deref())?;
    let year = resolve_year(params.year.as_deref())?;

    let summary = state.db.get_expense_summary(selector, year)?;

    Ok(Json(summary))
}

#[derive(Serialize)]
pub struct BudgetComparisonResponse {
    pub month: u32,
    pub year: i32,
    #[serde(flatten)]
    pub comparison: BudgetComparison,
}

/// GET /api/budgets/comparison - Spending against budgets for one month
///
/// Defaults to the current month when `month` is absent.
pub async fn get_budget_comparison(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<BudgetComparisonResponse>, AppError> {
    let month = match params.month.as_deref() {
        None => Utc::now().month(),
        Some(_) => MonthSelector::parse(params.month.as_deref())?
            .month()
            .ok_or_else(|| AppError::bad_request("Budget comparison needs a month between 1 and 12"))?,
    };
    let year = resolve_year(params.year.as_deref())?;

    let comparison = state.db.get_budget_comparison(month, year)?;

    Ok(Json(BudgetComparisonResponse {
        month,
        year,
        comparison,
    }))
}
