// ABOUTME: HTTP request handlers for donor registration and profiles
// ABOUTME: Registration requires a registration token from the OTP exchange

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use hemobank_auth::hash_password;
use hemobank_core::Role;
use hemobank_donors::{DonorCreateInput, DonorProfileUpdate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentUser;
use crate::response::{created, ok, ApiError};
use crate::state::AppState;
use crate::validation::{
    validate_donor_age, validate_donor_weight, validate_name, validate_password, validate_phone,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDonorRequest {
    pub registration_token: String,
    pub password: String,
    #[serde(flatten)]
    pub donor: DonorCreateInput,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredDonor {
    pub donor: hemobank_donors::Donor,
    pub token: String,
}

/// Register a donor account for a verified email address.
pub async fn register_donor(
    State(state): State<AppState>,
    Json(body): Json<RegisterDonorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let verified_email = state.keys.verify_registration(&body.registration_token)?;
    if !verified_email.eq_ignore_ascii_case(body.donor.email.trim()) {
        return Err(ApiError::Validation(
            "Registration token does not match this email".to_string(),
        ));
    }

    validate_name(&body.donor.name)?;
    validate_phone(&body.donor.phone)?;
    validate_donor_age(body.donor.age)?;
    validate_donor_weight(body.donor.weight)?;
    validate_password(&body.password)?;

    let hash = hash_password(&body.password)
        .map_err(|e| ApiError::Validation(format!("Could not hash password: {e}")))?;

    let donor = state.donors.create(body.donor, &hash).await?;
    let token = state.keys.sign_session(donor.id, Role::Donor, &donor.name)?;

    info!("Donor {} registered", donor.id);
    Ok(created(RegisteredDonor { donor, token }))
}

/// The logged-in donor's own profile.
pub async fn get_me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let donor_id = user.context().require_donor()?;
    let donor = state.donors.get(donor_id).await?;
    Ok(ok(donor))
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(update): Json<DonorProfileUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    validate_phone(&update.phone)?;
    validate_donor_age(update.age)?;
    validate_donor_weight(Some(update.weight))?;

    let donor = state.donors.update_profile(&user.context(), update).await?;
    Ok(ok(donor))
}

/// Admin listing of all donors.
pub async fn list_donors(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let donors = state.donors.list(&user.context()).await?;
    Ok(ok(donors))
}

pub async fn get_donor(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    user.context().require_admin()?;
    let donor = state.donors.get(id).await?;
    Ok(ok(donor))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deleted {
    pub deleted: bool,
}

pub async fn delete_donor(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.donors.delete(&user.context(), id).await?;
    Ok(ok(Deleted { deleted: true }))
}
