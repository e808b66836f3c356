// ABOUTME: Blood request types, the resolve action, and request errors
// ABOUTME: A resolved request keeps its row; only the status changes

use chrono::{DateTime, Utc};
use hemobank_core::{AuthError, BloodGroup, UrgencyLevel};
use hemobank_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    pub id: i64,
    pub recipient_id: i64,
    pub recipient_name: String,
    pub blood_group: BloodGroup,
    pub quantity: i64,
    pub urgency: UrgencyLevel,
    pub purpose: Option<String>,
    pub hospital: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCreateInput {
    pub recipient_id: i64,
    pub recipient_name: String,
    pub blood_group: BloodGroup,
    pub quantity: i64,
    #[serde(default)]
    pub urgency: UrgencyLevel,
    pub purpose: Option<String>,
    pub hospital: Option<String>,
}

/// Admin decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveAction {
    Approve,
    Reject,
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("No recipient matches that id and name")]
    InvalidRecipient,
    #[error("Blood request not found")]
    NotFound,
    #[error("Blood request has already been resolved")]
    AlreadyResolved,
    #[error("Insufficient stock of {blood_group}: have {available}, need {requested}")]
    InsufficientStock {
        blood_group: BloodGroup,
        available: i64,
        requested: i64,
    },
    #[error(transparent)]
    Unauthorized(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for RequestError {
    fn from(err: sqlx::Error) -> Self {
        RequestError::Storage(StorageError::Sqlx(err))
    }
}
