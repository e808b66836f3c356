// ABOUTME: Email OTP issue/verify over the verification_tokens table
// ABOUTME: One live code per address; codes are consumed on first use

use chrono::{DateTime, Duration, Utc};
use hemobank_storage::StorageError;
use rand::Rng;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

pub const OTP_TTL_MINUTES: i64 = 10;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("Invalid verification code")]
    InvalidCode,
    #[error("Verification code expired")]
    Expired,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for OtpError {
    fn from(err: sqlx::Error) -> Self {
        OtpError::Storage(StorageError::Sqlx(err))
    }
}

pub struct OtpStorage {
    pool: SqlitePool,
}

impl OtpStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Issue a fresh six-digit code for the address, replacing any earlier
    /// codes so only the latest one can succeed. Returns the code for the
    /// mailer.
    pub async fn issue_code(&self, email: &str) -> Result<String, OtpError> {
        let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
        let code = code.to_string();
        let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);

        let mut tx = self.pool.begin().await.map_err(OtpError::from)?;

        sqlx::query("DELETE FROM verification_tokens WHERE identifier = ?")
            .bind(email)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO verification_tokens (identifier, token, expires_at) VALUES (?, ?, ?)",
        )
        .bind(email)
        .bind(&code)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(OtpError::from)?;

        info!("Issued verification code for {}", email);
        Ok(code)
    }

    /// Check a submitted code. Matching codes are deleted whether they are
    /// still valid or already expired, so each code works at most once.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), OtpError> {
        debug!("Verifying code for {}", email);

        let expires_at: Option<DateTime<Utc>> = sqlx::query_scalar(
            "SELECT expires_at FROM verification_tokens WHERE identifier = ? AND token = ?",
        )
        .bind(email)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        let Some(expires_at) = expires_at else {
            return Err(OtpError::InvalidCode);
        };

        sqlx::query("DELETE FROM verification_tokens WHERE identifier = ? AND token = ?")
            .bind(email)
            .bind(code)
            .execute(&self.pool)
            .await?;

        if expires_at < Utc::now() {
            return Err(OtpError::Expired);
        }

        info!("Verification code accepted for {}", email);
        Ok(())
    }
}
