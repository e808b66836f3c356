// ABOUTME: Donor type definitions and errors
// ABOUTME: The password hash never leaves the credentials lookup

use chrono::{DateTime, NaiveDate, Utc};
use hemobank_core::{AuthError, BloodGroup, HealthLevel, Sex};
use hemobank_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub sex: Sex,
    pub phone: String,
    pub email: String,
    pub blood_group: BloodGroup,
    pub weight: Option<f64>,
    pub address: Option<String>,
    pub diseases: Option<String>,
    pub haemoglobin: Option<HealthLevel>,
    pub blood_sugar: Option<HealthLevel>,
    pub blood_pressure: Option<HealthLevel>,
    pub registered_at: DateTime<Utc>,
    pub last_donation: Option<NaiveDate>,
    /// Display string; always derived from last_donation or the health
    /// snapshot, never edited directly.
    pub eligibility: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorCreateInput {
    pub name: String,
    pub age: i64,
    pub sex: Sex,
    pub phone: String,
    pub email: String,
    pub blood_group: BloodGroup,
    pub weight: Option<f64>,
    pub address: Option<String>,
    pub diseases: Option<String>,
    pub haemoglobin: Option<HealthLevel>,
    pub blood_sugar: Option<HealthLevel>,
    pub blood_pressure: Option<HealthLevel>,
}

/// Donor-editable subset of the profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfileUpdate {
    pub phone: String,
    pub weight: f64,
    pub address: Option<String>,
    pub diseases: Option<String>,
    pub blood_group: BloodGroup,
    pub age: i64,
}

/// Login lookup result; the only place the hash is read back.
#[derive(Debug, Clone)]
pub struct DonorCredentials {
    pub id: i64,
    pub name: String,
    pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum DonorError {
    #[error("Donor not found")]
    NotFound,
    #[error("Donor with this phone or email already exists")]
    DuplicateContact,
    #[error(transparent)]
    Unauthorized(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for DonorError {
    fn from(err: sqlx::Error) -> Self {
        DonorError::Storage(StorageError::Sqlx(err))
    }
}
