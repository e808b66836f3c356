// ABOUTME: HTTP handler for the public eligibility self-check
// ABOUTME: Pure evaluation; nothing is stored

use axum::{response::IntoResponse, Json};
use hemobank_eligibility::{evaluate, EligibilityForm};

use crate::response::{ok, ApiError};

/// Evaluate a self-reported eligibility form.
pub async fn check_eligibility(
    Json(form): Json<EligibilityForm>,
) -> Result<impl IntoResponse, ApiError> {
    let report = evaluate(&form);
    Ok(ok(report))
}
