// ABOUTME: Appointment type definitions and errors
// ABOUTME: Status strings are stored uppercase to match the schema defaults

use chrono::{DateTime, Utc};
use hemobank_core::{AuthError, BloodGroup, DonationType};
use hemobank_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub donor_id: i64,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub donation_type: DonationType,
    pub units: i64,
    pub created_at: DateTime<Utc>,
}

/// Admin listing row joined with the donor's contact details, also used
/// when sending transition notifications.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentWithDonor {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_blood_group: BloodGroup,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub donation_type: DonationType,
    #[serde(default = "default_units")]
    pub units: i64,
}

fn default_units() -> i64 {
    1
}

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,
    #[error(transparent)]
    Unauthorized(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for AppointmentError {
    fn from(err: sqlx::Error) -> Self {
        AppointmentError::Storage(StorageError::Sqlx(err))
    }
}
