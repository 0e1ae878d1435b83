//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppState};

#[derive(Serialize)]
pub struct HealthResponse {
    pub health: &'static str,
}

/// GET /api/health - Verify the store is reachable
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, AppError> {
    state.db.health_check()?;
    Ok(Json(HealthResponse { health: "ok" }))
}
