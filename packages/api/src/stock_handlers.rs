// ABOUTME: HTTP request handlers for the blood stock ledger
// ABOUTME: Listing is public so the availability board needs no login

use axum::{extract::State, response::IntoResponse, Json};
use hemobank_core::BloodGroup;
use hemobank_stock::StockOperation;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::response::{ok, ApiError};
use crate::state::AppState;

/// Current stock levels per blood group.
pub async fn list_stock(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let stock = state.stock.list().await?;
    Ok(ok(stock))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdateRequest {
    pub blood_group: BloodGroup,
    pub quantity: i64,
    pub operation: StockOperation,
}

/// Admin adjustment of a group's counter.
pub async fn update_stock(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<StockUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let stock = state
        .stock
        .update(&user.context(), body.blood_group, body.quantity, body.operation)
        .await?;
    Ok(ok(stock))
}
