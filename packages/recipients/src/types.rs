// ABOUTME: Recipient type definitions and errors
// ABOUTME: Phone is the unique contact field for recipients

use chrono::{DateTime, Utc};
use hemobank_core::{BloodGroup, Sex, UrgencyLevel};
use hemobank_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub sex: Sex,
    pub phone: String,
    pub blood_group: BloodGroup,
    pub hospital: Option<String>,
    pub doctor: Option<String>,
    pub address: Option<String>,
    pub urgency: UrgencyLevel,
    pub purpose: Option<String>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientCreateInput {
    pub name: String,
    pub age: i64,
    pub sex: Sex,
    pub phone: String,
    pub blood_group: BloodGroup,
    pub hospital: Option<String>,
    pub doctor: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub urgency: UrgencyLevel,
    pub purpose: Option<String>,
}

#[derive(Debug, Error)]
pub enum RecipientError {
    /// Carries the already-registered id so callers can surface it.
    #[error("A recipient with this phone number is already registered (id {existing_id})")]
    DuplicatePhone { existing_id: i64 },
    #[error("Recipient not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for RecipientError {
    fn from(err: sqlx::Error) -> Self {
        RecipientError::Storage(StorageError::Sqlx(err))
    }
}
