//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::read_json;
use super::reports::{resolve_year, PeriodQuery};
use crate::{AppError, AppState, SuccessResponse};
use tally_core::models::{Category, NewTransaction, Transaction, TransactionUpdate};
use tally_core::period::MonthSelector;

#[derive(Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub transaction: Transaction,
}

/// Request body for creating a transaction
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub amount: f64,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp; defaults to today
    pub date: Option<String>,
    pub description: String,
    pub category: Option<String>,
}

/// Request body for updating a transaction; absent fields are unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Accept plain dates and the ISO timestamps browsers send from date inputs
fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| AppError::bad_request(&format!("Invalid date: {} (use YYYY-MM-DD)", value)))
}

fn parse_category(value: &str) -> Result<Category, AppError> {
    value.parse().map_err(|e: String| AppError::bad_request(&e))
}

/// GET /api/transactions - List transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let selector = MonthSelector::parse(params.month.as_deref())?;
    let year = resolve_year(params.year.as_deref())?;

    let transactions = state.db.list_transactions(selector, year)?;

    Ok(Json(TransactionListResponse { transactions }))
}

/// GET /api/transactions/month/:month - List transactions for a month (0 = all)
pub async fn list_transactions_by_month(
    State(state): State<Arc<AppState>>,
    Path(month): Path<String>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<TransactionListResponse>, AppError> {
    let selector = MonthSelector::parse(Some(month.as_str()))?;
    let year = resolve_year(params.year.as_deref())?;

    let transactions = state.db.list_transactions(selector, year)?;

    Ok(Json(TransactionListResponse { transactions }))
}

/// POST /api/transactions - Record an expense
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let req: CreateTransactionRequest = read_json(request).await?;

    let date = match req.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };
    let category = match req.category.as_deref() {
        Some(c) => parse_category(c)?,
        None => Category::default(),
    };

    let transaction = state.db.create_transaction(&NewTransaction {
        amount: req.amount,
        date,
        description: req.description,
        category,
    })?;

    Ok((StatusCode::CREATED, Json(TransactionResponse { transaction })))
}

fn parse_id(id: &str) -> Result<i64, AppError> {
    id.trim()
        .parse()
        .map_err(|_| AppError::bad_request(&format!("Invalid transaction id: {}", id)))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = state
        .db
        .get_transaction(parse_id(&id)?)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;

    Ok(Json(TransactionResponse { transaction }))
}

/// PUT /api/transactions/:id - Update some or all fields of a transaction
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<TransactionResponse>, AppError> {
    let id = parse_id(&id)?;
    let req: UpdateTransactionRequest = read_json(request).await?;

    let update = TransactionUpdate {
        amount: req.amount,
        date: req.date.as_deref().map(parse_date).transpose()?,
        description: req.description,
        category: req.category.as_deref().map(parse_category).transpose()?,
    };

    let transaction = state.db.update_transaction(id, &update)?;

    Ok(Json(TransactionResponse { transaction }))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.db.delete_transaction(parse_id(&id)?)?;
    Ok(Json(SuccessResponse { success: true }))
}
