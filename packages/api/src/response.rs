// ABOUTME: Shared API response types and error handling
// ABOUTME: Provides consistent response format across all API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use hemobank_appointments::AppointmentError;
use hemobank_auth::{OtpError, TokenError};
use hemobank_core::AuthError;
use hemobank_donors::DonorError;
use hemobank_recipients::RecipientError;
use hemobank_requests::RequestError;
use hemobank_stock::StockError;
use hemobank_storage::StorageError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> axum::response::Response {
    (StatusCode::OK, ResponseJson(ApiResponse::success(data))).into_response()
}

pub fn created<T: Serialize>(data: T) -> axum::response::Response {
    (StatusCode::CREATED, ResponseJson(ApiResponse::success(data))).into_response()
}

/// Unified error type for the HTTP layer. Domain errors convert into this
/// so handlers can use `?` throughout.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Missing or invalid credentials")]
    Unauthenticated,
    #[error("Invalid email or password")]
    InvalidLogin,
    #[error(transparent)]
    Donor(#[from] DonorError),
    #[error(transparent)]
    Appointment(#[from] AppointmentError),
    #[error(transparent)]
    Recipient(#[from] RecipientError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Stock(#[from] StockError),
    #[error(transparent)]
    Otp(#[from] OtpError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Role(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Storage(StorageError::Sqlx(err))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated | ApiError::InvalidLogin | ApiError::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Role(_) => StatusCode::FORBIDDEN,
            ApiError::Donor(e) => match e {
                DonorError::NotFound => StatusCode::NOT_FOUND,
                DonorError::DuplicateContact => StatusCode::CONFLICT,
                DonorError::Unauthorized(_) => StatusCode::FORBIDDEN,
                DonorError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Appointment(e) => match e {
                AppointmentError::NotFound => StatusCode::NOT_FOUND,
                AppointmentError::Unauthorized(_) => StatusCode::FORBIDDEN,
                AppointmentError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Recipient(e) => match e {
                RecipientError::NotFound => StatusCode::NOT_FOUND,
                RecipientError::DuplicatePhone { .. } => StatusCode::CONFLICT,
                RecipientError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Request(e) => match e {
                RequestError::NotFound => StatusCode::NOT_FOUND,
                RequestError::InvalidRecipient => StatusCode::BAD_REQUEST,
                RequestError::AlreadyResolved | RequestError::InsufficientStock { .. } => {
                    StatusCode::CONFLICT
                }
                RequestError::Unauthorized(_) => StatusCode::FORBIDDEN,
                RequestError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Stock(e) => match e {
                StockError::NegativeQuantity => StatusCode::BAD_REQUEST,
                StockError::Unauthorized(_) => StatusCode::FORBIDDEN,
                StockError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Otp(e) => match e {
                OtpError::InvalidCode | OtpError::Expired => StatusCode::BAD_REQUEST,
                OtpError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal error: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, ResponseJson(ApiResponse::<()>::error(message))).into_response()
    }
}
