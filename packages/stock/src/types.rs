// ABOUTME: Stock ledger types and errors
// ABOUTME: One row per blood group, quantity clamped at zero

use chrono::{DateTime, Utc};
use hemobank_core::{AuthError, BloodGroup};
use hemobank_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodStock {
    pub blood_group: BloodGroup,
    pub quantity: i64,
    pub updated_at: DateTime<Utc>,
}

/// Admin-facing delta semantics for a stock update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockOperation {
    Add,
    Subtract,
    Set,
}

#[derive(Debug, Error)]
pub enum StockError {
    #[error("Stock quantity must not be negative")]
    NegativeQuantity,
    #[error(transparent)]
    Unauthorized(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for StockError {
    fn from(err: sqlx::Error) -> Self {
        StockError::Storage(StorageError::Sqlx(err))
    }
}
