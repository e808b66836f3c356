// ABOUTME: HTTP handlers for OTP verification and account logins
// ABOUTME: Successful logins return a signed session token

use axum::{extract::State, response::IntoResponse, Json};
use hemobank_auth::{hash_password, verify_password};
use hemobank_core::Role;
use hemobank_notify::templates;
use serde::{Deserialize, Serialize};
use sqlx::Row;
use tracing::info;

use crate::response::{ok, ApiError};
use crate::state::AppState;
use crate::validation::{validate_email, validate_password};

#[derive(Deserialize)]
pub struct RequestOtpBody {
    pub email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequested {
    pub sent: bool,
}

/// Issue a verification code and mail it to the address.
pub async fn request_otp(
    State(state): State<AppState>,
    Json(body): Json<RequestOtpBody>,
) -> Result<impl IntoResponse, ApiError> {
    validate_email(&body.email)?;

    let code = state.otp.issue_code(&body.email).await?;
    let (subject, text) = templates::otp(&code);
    state.mailer.send(&body.email, &subject, &text).await;

    Ok(ok(OtpRequested { sent: true }))
}

#[derive(Deserialize)]
pub struct VerifyOtpBody {
    pub email: String,
    pub code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerified {
    pub registration_token: String,
}

/// Exchange a valid code for a short-lived registration token.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpBody>,
) -> Result<impl IntoResponse, ApiError> {
    state.otp.verify_code(&body.email, &body.code).await?;

    let registration_token = state.keys.sign_registration(&body.email)?;
    Ok(ok(OtpVerified { registration_token }))
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub id: i64,
    pub name: String,
    pub role: Role,
}

pub async fn donor_login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError> {
    let creds = state
        .donors
        .get_credentials(&body.email)
        .await?
        .ok_or(ApiError::InvalidLogin)?;

    if !verify_password(&body.password, &creds.password_hash) {
        return Err(ApiError::InvalidLogin);
    }

    let token = state.keys.sign_session(creds.id, Role::Donor, &creds.name)?;
    info!("Donor {} logged in", creds.id);

    Ok(ok(LoginResponse {
        token,
        id: creds.id,
        name: creds.name,
        role: Role::Donor,
    }))
}

pub async fn admin_login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError> {
    let row = sqlx::query("SELECT id, name, password_hash FROM admins WHERE email = ?")
        .bind(&body.email)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(ApiError::InvalidLogin)?;

    let id: i64 = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let password_hash: String = row.try_get("password_hash")?;

    if !verify_password(&body.password, &password_hash) {
        return Err(ApiError::InvalidLogin);
    }

    let token = state.keys.sign_session(id, Role::Admin, &name)?;
    info!("Admin {} logged in", id);

    Ok(ok(LoginResponse {
        token,
        id,
        name,
        role: Role::Admin,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordBody {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChanged {
    pub changed: bool,
}

/// OTP-verified password reset for donor accounts.
pub async fn reset_donor_password(
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordBody>,
) -> Result<impl IntoResponse, ApiError> {
    validate_password(&body.new_password)?;
    state.otp.verify_code(&body.email, &body.code).await?;

    let hash = hash_password(&body.new_password)
        .map_err(|e| ApiError::Validation(format!("Could not hash password: {e}")))?;

    let result = sqlx::query("UPDATE donors SET password_hash = ? WHERE email = ?")
        .bind(&hash)
        .bind(&body.email)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::Donor(hemobank_donors::DonorError::NotFound));
    }

    info!("Password reset for {}", body.email);
    Ok(ok(PasswordChanged { changed: true }))
}
