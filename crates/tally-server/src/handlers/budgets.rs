//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::read_json;
use super::reports::PeriodQuery;
use crate::{AppError, AppState};
use tally_core::models::{Budget, Category, NewBudget};

#[derive(Serialize)]
pub struct BudgetListResponse {
    pub budgets: Vec<Budget>,
}

#[derive(Serialize)]
pub struct BudgetResponse {
    pub budget: Budget,
}

#[derive(Serialize)]
pub struct BudgetBatchResponse {
    pub budgets: Vec<Budget>,
    pub upserted: usize,
}

/// One budget entry in a request body
///
/// `month` and `year` may be left out on the `/budgets/:month/:year` route,
/// which supplies them.
#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    pub category: String,
    pub limit: f64,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct BudgetBatchRequest {
    pub budgets: Vec<BudgetRequest>,
}

impl BudgetRequest {
    fn into_new_budget(self, period: Option<(u32, i32)>) -> Result<NewBudget, AppError> {
        let category: Category = self
            .category
            .parse()
            .map_err(|e: String| AppError::bad_request(&e))?;
        let month = self
            .month
            .or(period.map(|(m, _)| m))
            .ok_or_else(|| AppError::bad_request("Budget month is required"))?;
        let year = self
            .year
            .or(period.map(|(_, y)| y))
            .ok_or_else(|| AppError::bad_request("Budget year is required"))?;

        Ok(NewBudget {
            category,
            limit: self.limit,
            month,
            year,
        })
    }
}

fn parse_month_year(month: &str, year: &str) -> Result<(u32, i32), AppError> {
    let month: u32 = month
        .trim()
        .parse()
        .map_err(|_| AppError::bad_request(&format!("Invalid month parameter: {}", month)))?;
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| AppError::bad_request(&format!("Invalid year parameter: {}", year)))?;
    Ok((month, year))
}

/// GET /api/budgets - List budgets for `?month=&year=`
///
/// Without both parameters the list is empty.
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<BudgetListResponse>, AppError> {
    let (Some(month), Some(year)) = (params.month.as_deref(), params.year.as_deref()) else {
        debug!("Budget list requested without month and year");
        return Ok(Json(BudgetListResponse { budgets: vec![] }));
    };

    let (month, year) = parse_month_year(month, year)?;
    let budgets = state.db.list_budgets(month, year)?;

    Ok(Json(BudgetListResponse { budgets }))
}

/// GET /api/budgets/:month/:year - List budgets for a month
pub async fn list_budgets_for_month(
    State(state): State<Arc<AppState>>,
    Path((month, year)): Path<(String, String)>,
) -> Result<Json<BudgetListResponse>, AppError> {
    let (month, year) = parse_month_year(&month, &year)?;
    let budgets = state.db.list_budgets(month, year)?;

    Ok(Json(BudgetListResponse { budgets }))
}

/// POST /api/budgets - Upsert one budget, or a batch under `budgets`
pub async fn upsert_budgets(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let body: serde_json::Value = read_json(request).await?;
    store_budgets(&state, body, None)
}

/// POST /api/budgets/:month/:year - Upsert budgets, defaulting their month and year
pub async fn upsert_budgets_for_month(
    State(state): State<Arc<AppState>>,
    Path((month, year)): Path<(String, String)>,
    request: Request,
) -> Result<Response, AppError> {
    let period = parse_month_year(&month, &year)?;
    let body: serde_json::Value = read_json(request).await?;
    store_budgets(&state, body, Some(period))
}

fn store_budgets(
    state: &AppState,
    body: serde_json::Value,
    period: Option<(u32, i32)>,
) -> Result<Response, AppError> {
    let is_batch = body.get("budgets").is_some_and(|b| b.is_array());

    if is_batch {
        let req: BudgetBatchRequest = serde_json::from_value(body)
            .map_err(|e| AppError::bad_request(&format!("Invalid budget batch: {}", e)))?;
        let entries = req
            .budgets
            .into_iter()
            .map(|b| b.into_new_budget(period))
            .collect::<Result<Vec<_>, _>>()?;

        let budgets = state.db.upsert_budgets(&entries)?;
        let upserted = budgets.len();

        Ok((
            StatusCode::CREATED,
            Json(BudgetBatchResponse { budgets, upserted }),
        )
            .into_response())
    } else {
        let req: BudgetRequest = serde_json::from_value(body)
            .map_err(|e| AppError::bad_request(&format!("Invalid budget: {}", e)))?;
        let budget = state.db.upsert_budget(&req.into_new_budget(period)?)?;

        Ok((StatusCode::CREATED, Json(BudgetResponse { budget })).into_response())
    }
}
