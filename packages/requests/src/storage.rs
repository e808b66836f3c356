// ABOUTME: Blood request storage layer using SQLite
// ABOUTME: resolve() couples the status transition to the stock deduction

use hemobank_core::AuthContext;
use hemobank_stock::deduct_checked;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info, warn};

use crate::types::{
    BloodRequest, RequestCreateInput, RequestError, RequestStatus, ResolveAction,
};

pub struct RequestStorage {
    pool: SqlitePool,
}

impl RequestStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Submit a request on behalf of a registered recipient. The caller must
    /// supply the recipient's id and name together; a mismatch is rejected
    /// rather than guessed around.
    pub async fn submit(&self, input: RequestCreateInput) -> Result<BloodRequest, RequestError> {
        debug!(
            "Blood request: {} unit(s) of {} for recipient {}",
            input.quantity, input.blood_group, input.recipient_id
        );

        let known: Option<i64> =
            sqlx::query_scalar("SELECT id FROM recipients WHERE id = ? AND name = ?")
                .bind(input.recipient_id)
                .bind(&input.recipient_name)
                .fetch_optional(&self.pool)
                .await?;
        if known.is_none() {
            return Err(RequestError::InvalidRecipient);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO blood_requests
                (recipient_id, recipient_name, blood_group, quantity, urgency,
                 purpose, hospital, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, 'PENDING', ?)
            "#,
        )
        .bind(input.recipient_id)
        .bind(&input.recipient_name)
        .bind(input.blood_group)
        .bind(input.quantity)
        .bind(input.urgency)
        .bind(&input.purpose)
        .bind(&input.hospital)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!("Created blood request {}", id);

        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<BloodRequest, RequestError> {
        let row = sqlx::query("SELECT * FROM blood_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RequestError::NotFound)?;

        row_to_request(&row)
    }

    /// Approve or reject a pending request.
    ///
    /// Approval deducts stock in the same transaction that flips the status,
    /// with a conditional decrement that only fires when enough units remain.
    /// Either the status changes and the stock drops together, or neither
    /// happens. Resolving twice returns AlreadyResolved without touching
    /// stock.
    pub async fn resolve(
        &self,
        ctx: &AuthContext,
        id: i64,
        action: ResolveAction,
    ) -> Result<BloodRequest, RequestError> {
        ctx.require_admin()?;

        let mut tx = self.pool.begin().await.map_err(RequestError::from)?;

        let row = sqlx::query("SELECT * FROM blood_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RequestError::NotFound)?;
        let request = row_to_request(&row)?;

        if request.status != RequestStatus::Pending {
            return Err(RequestError::AlreadyResolved);
        }

        let new_status = match action {
            ResolveAction::Approve => {
                let deducted =
                    deduct_checked(&mut *tx, request.blood_group, request.quantity).await?;
                if !deducted {
                    let available: i64 = sqlx::query_scalar(
                        "SELECT quantity FROM blood_stock WHERE blood_group = ?",
                    )
                    .bind(request.blood_group)
                    .fetch_optional(&mut *tx)
                    .await?
                    .unwrap_or(0);

                    warn!(
                        "Request {} needs {} unit(s) of {}, only {} in stock",
                        id, request.quantity, request.blood_group, available
                    );
                    return Err(RequestError::InsufficientStock {
                        blood_group: request.blood_group,
                        available,
                        requested: request.quantity,
                    });
                }
                RequestStatus::Approved
            }
            ResolveAction::Reject => RequestStatus::Rejected,
        };

        // Guard against a concurrent resolve that slipped in between reads.
        let result =
            sqlx::query("UPDATE blood_requests SET status = ? WHERE id = ? AND status = 'PENDING'")
                .bind(new_status)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        if result.rows_affected() == 0 {
            return Err(RequestError::AlreadyResolved);
        }

        tx.commit().await.map_err(RequestError::from)?;

        info!("Blood request {} resolved: {:?}", id, new_status);

        self.get(id).await
    }

    /// All requests, newest first. Resolved requests stay listed.
    pub async fn list(&self) -> Result<Vec<BloodRequest>, RequestError> {
        let rows = sqlx::query("SELECT * FROM blood_requests ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_request).collect()
    }

    pub async fn count_pending(&self) -> Result<i64, RequestError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM blood_requests WHERE status = 'PENDING'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

fn row_to_request(row: &sqlx::sqlite::SqliteRow) -> Result<BloodRequest, RequestError> {
    Ok(BloodRequest {
        id: row.try_get("id").map_err(RequestError::from)?,
        recipient_id: row.try_get("recipient_id").map_err(RequestError::from)?,
        recipient_name: row.try_get("recipient_name").map_err(RequestError::from)?,
        blood_group: row.try_get("blood_group").map_err(RequestError::from)?,
        quantity: row.try_get("quantity").map_err(RequestError::from)?,
        urgency: row.try_get("urgency").map_err(RequestError::from)?,
        purpose: row.try_get("purpose").map_err(RequestError::from)?,
        hospital: row.try_get("hospital").map_err(RequestError::from)?,
        status: row.try_get("status").map_err(RequestError::from)?,
        created_at: row.try_get("created_at").map_err(RequestError::from)?,
    })
}
