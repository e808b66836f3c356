// ABOUTME: HTTP request handlers for blood requests
// ABOUTME: New requests alert the admin inbox; resolution is admin-only

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use hemobank_notify::templates;
use hemobank_requests::{RequestCreateInput, ResolveAction};
use serde::Deserialize;
use tracing::info;

use crate::auth::CurrentUser;
use crate::response::{created, ok, ApiError};
use crate::state::AppState;
use crate::validation::validate_quantity;

/// Submit a blood request on behalf of a registered recipient.
pub async fn submit_request(
    State(state): State<AppState>,
    Json(input): Json<RequestCreateInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_quantity(input.quantity)?;

    let request = state.requests.submit(input).await?;
    info!("Blood request {} submitted", request.id);

    let (subject, text) = templates::new_request_alert(
        &request.recipient_name,
        request.blood_group.as_str(),
        request.quantity,
        &format!("{:?}", request.urgency),
    );
    state.mailer.send(&state.admin_email, &subject, &text).await;

    Ok(created(request))
}

pub async fn list_requests(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    user.context().require_admin()?;
    let requests = state.requests.list().await?;
    Ok(ok(requests))
}

#[derive(Deserialize)]
pub struct ResolveRequestBody {
    pub action: ResolveAction,
}

/// Approve (deducting stock) or reject a pending request.
pub async fn resolve_request(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<ResolveRequestBody>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state
        .requests
        .resolve(&user.context(), id, body.action)
        .await?;
    Ok(ok(request))
}
