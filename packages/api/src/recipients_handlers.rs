// ABOUTME: HTTP request handlers for recipient registration
// ABOUTME: Duplicate phone numbers conflict with the existing registration

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use hemobank_recipients::RecipientCreateInput;
use tracing::info;

use crate::auth::CurrentUser;
use crate::response::{created, ok, ApiError};
use crate::state::AppState;
use crate::validation::{validate_name, validate_phone, validate_recipient_age};

/// Register a recipient. No account is created; the id and name together
/// identify the recipient when submitting blood requests.
pub async fn register_recipient(
    State(state): State<AppState>,
    Json(input): Json<RecipientCreateInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&input.name)?;
    validate_phone(&input.phone)?;
    validate_recipient_age(input.age)?;

    let recipient = state.recipients.register(input).await?;
    info!("Recipient {} registered", recipient.id);

    Ok(created(recipient))
}

pub async fn list_recipients(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    user.context().require_admin()?;
    let recipients = state.recipients.list().await?;
    Ok(ok(recipients))
}

pub async fn get_recipient(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    user.context().require_admin()?;
    let recipient = state.recipients.get(id).await?;
    Ok(ok(recipient))
}
