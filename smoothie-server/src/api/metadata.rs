//! Fruit metadata passthrough

use axum::extract::State;
use serde_json::Value;
use shared::error::{ApiResponse, AppResult};

use crate::state::AppState;

/// GET /api/fruit-metadata
pub async fn fruit_metadata(State(state): State<AppState>) -> AppResult<ApiResponse<Value>> {
    let body = state.metadata.fetch_logged().await?;
    Ok(ApiResponse::success(body))
}
