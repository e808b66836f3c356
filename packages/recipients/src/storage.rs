// ABOUTME: Recipient storage layer using SQLite
// ABOUTME: Handles registration, lookups, and the blood-request identity check

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::types::{Recipient, RecipientCreateInput, RecipientError};

pub struct RecipientStorage {
    pool: SqlitePool,
}

impl RecipientStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a recipient. A duplicate phone number fails with the
    /// existing row's id so the caller can point the user at it.
    pub async fn register(
        &self,
        input: RecipientCreateInput,
    ) -> Result<Recipient, RecipientError> {
        debug!("Registering recipient: {}", input.name);

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM recipients WHERE phone = ?")
                .bind(&input.phone)
                .fetch_optional(&self.pool)
                .await?;

        if let Some(existing_id) = existing {
            return Err(RecipientError::DuplicatePhone { existing_id });
        }

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO recipients
                (name, age, sex, phone, blood_group, hospital, doctor, address,
                 urgency, purpose, registered_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.name)
        .bind(input.age)
        .bind(input.sex)
        .bind(&input.phone)
        .bind(input.blood_group)
        .bind(&input.hospital)
        .bind(&input.doctor)
        .bind(&input.address)
        .bind(input.urgency)
        .bind(&input.purpose)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!("Registered recipient {} ({})", id, input.name);

        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<Recipient, RecipientError> {
        let row = sqlx::query("SELECT * FROM recipients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RecipientError::NotFound)?;

        row_to_recipient(&row)
    }

    /// Soft identity check used by the blood request reconciler: both the
    /// numeric id and the exact name must match.
    pub async fn find_by_identity(
        &self,
        id: i64,
        name: &str,
    ) -> Result<Option<Recipient>, RecipientError> {
        let row = sqlx::query("SELECT * FROM recipients WHERE id = ? AND name = ?")
            .bind(id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_recipient(&r)).transpose()
    }

    /// Admin listing, newest first.
    pub async fn list(&self) -> Result<Vec<Recipient>, RecipientError> {
        let rows = sqlx::query("SELECT * FROM recipients ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_recipient).collect()
    }

    pub async fn count(&self) -> Result<i64, RecipientError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn row_to_recipient(row: &sqlx::sqlite::SqliteRow) -> Result<Recipient, RecipientError> {
    Ok(Recipient {
        id: row.try_get("id").map_err(RecipientError::from)?,
        name: row.try_get("name").map_err(RecipientError::from)?,
        age: row.try_get("age").map_err(RecipientError::from)?,
        sex: row.try_get("sex").map_err(RecipientError::from)?,
        phone: row.try_get("phone").map_err(RecipientError::from)?,
        blood_group: row.try_get("blood_group").map_err(RecipientError::from)?,
        hospital: row.try_get("hospital").map_err(RecipientError::from)?,
        doctor: row.try_get("doctor").map_err(RecipientError::from)?,
        address: row.try_get("address").map_err(RecipientError::from)?,
        urgency: row.try_get("urgency").map_err(RecipientError::from)?,
        purpose: row.try_get("purpose").map_err(RecipientError::from)?,
        registered_at: row.try_get("registered_at").map_err(RecipientError::from)?,
    })
}
