//! JSON order API

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use shared::error::{ApiResponse, AppError, AppResult};
use shared::models::{FruitOptionList, OrderConfirmation, OrderCreate};

use crate::order::{FruitCatalog, OrderError, PendingSelection, submit_order};
use crate::state::AppState;

/// GET /api/fruit-options
///
/// Always 200; a failed read is reported in `warning` with an empty list.
pub async fn list_fruit_options(State(state): State<AppState>) -> ApiResponse<FruitOptionList> {
    let catalog = FruitCatalog::load(state.warehouse.as_ref()).await;
    ApiResponse::success(catalog.to_list())
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<OrderCreate>, JsonRejection>,
) -> AppResult<ApiResponse<OrderConfirmation>> {
    let Json(request) = payload.map_err(|e| AppError::invalid_request(e.body_text()))?;
    let selection = PendingSelection::from_request(request);

    let warehouse = state.warehouse.as_ref();
    let catalog = FruitCatalog::load(warehouse).await;

    match submit_order(warehouse, &catalog, &selection).await {
        Ok(confirmation) => Ok(ApiResponse::success_with_message(
            confirmation.message.clone(),
            confirmation,
        )),
        // Without options no ingredient can be checked; report the outage,
        // not the user's choice
        Err(OrderError::UnknownIngredient(name)) => Err(catalog
            .warning()
            .unwrap_or_else(|| OrderError::UnknownIngredient(name).into())),
        Err(e) => Err(e.into()),
    }
}
