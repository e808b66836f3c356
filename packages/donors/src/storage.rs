// ABOUTME: Donor storage layer using SQLite
// ABOUTME: Registration snapshot eligibility plus the transactional lifecycle

use chrono::{NaiveDate, Utc};
use hemobank_core::AuthContext;
use hemobank_eligibility::{eligibility_label, next_eligible_date, snapshot_eligibility};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::types::{
    Donor, DonorCreateInput, DonorCredentials, DonorError, DonorProfileUpdate,
};

pub struct DonorStorage {
    pool: SqlitePool,
}

impl DonorStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a donor after email verification. Initial eligibility comes
    /// from the self-reported health snapshot alone; missing readings count
    /// as not-normal.
    pub async fn create(
        &self,
        input: DonorCreateInput,
        password_hash: &str,
    ) -> Result<Donor, DonorError> {
        debug!("Creating donor: {}", input.email);

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM donors WHERE phone = ? OR email = ?")
                .bind(&input.phone)
                .bind(&input.email)
                .fetch_optional(&self.pool)
                .await?;

        if existing.is_some() {
            return Err(DonorError::DuplicateContact);
        }

        let eligibility = match (input.haemoglobin, input.blood_sugar, input.blood_pressure) {
            (Some(h), Some(bs), Some(bp)) => snapshot_eligibility(h, bs, bp),
            _ => "Not Eligible!",
        };

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO donors
                (name, age, sex, phone, email, blood_group, weight, address, diseases,
                 haemoglobin, blood_sugar, blood_pressure, password_hash,
                 registered_at, eligibility)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.name)
        .bind(input.age)
        .bind(input.sex)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(input.blood_group)
        .bind(input.weight)
        .bind(&input.address)
        .bind(&input.diseases)
        .bind(input.haemoglobin)
        .bind(input.blood_sugar)
        .bind(input.blood_pressure)
        .bind(password_hash)
        .bind(now)
        .bind(eligibility)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!("Created donor {} ({})", id, input.email);

        self.get(id).await
    }

    pub async fn get(&self, id: i64) -> Result<Donor, DonorError> {
        let row = sqlx::query("SELECT * FROM donors WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DonorError::NotFound)?;

        row_to_donor(&row)
    }

    /// Admin listing, newest first.
    pub async fn list(&self, ctx: &AuthContext) -> Result<Vec<Donor>, DonorError> {
        ctx.require_admin()?;

        let rows = sqlx::query("SELECT * FROM donors ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_donor).collect()
    }

    /// Donor-initiated profile edit, scoped to the caller's own row.
    pub async fn update_profile(
        &self,
        ctx: &AuthContext,
        update: DonorProfileUpdate,
    ) -> Result<Donor, DonorError> {
        let donor_id = ctx.require_donor()?;

        let result = sqlx::query(
            r#"
            UPDATE donors
            SET phone = ?, weight = ?, address = ?, diseases = ?, blood_group = ?, age = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.phone)
        .bind(update.weight)
        .bind(&update.address)
        .bind(&update.diseases)
        .bind(update.blood_group)
        .bind(update.age)
        .bind(donor_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DonorError::NotFound);
        }

        self.get(donor_id).await
    }

    /// Admin deletion. Appointments go first to satisfy the foreign key.
    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> Result<(), DonorError> {
        ctx.require_admin()?;

        let mut tx = self.pool.begin().await.map_err(DonorError::from)?;

        sqlx::query("DELETE FROM appointments WHERE donor_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM donors WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DonorError::NotFound);
        }

        tx.commit().await.map_err(DonorError::from)?;

        info!("Deleted donor {}", id);
        Ok(())
    }

    /// Admin-confirmed donation completion.
    ///
    /// Advances the donor's earliest PENDING/APPROVED appointment to
    /// COMPLETED, or records a walk-in appointment dated today, then sets
    /// last_donation and the derived eligibility string in the same
    /// transaction.
    pub async fn complete_donation(
        &self,
        ctx: &AuthContext,
        donor_id: i64,
        today: NaiveDate,
    ) -> Result<Donor, DonorError> {
        ctx.require_admin()?;

        debug!("Completing donation for donor {}", donor_id);

        let mut tx = self.pool.begin().await.map_err(DonorError::from)?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM donors WHERE id = ?")
            .bind(donor_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(DonorError::NotFound);
        }

        let open_appointment: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM appointments
            WHERE donor_id = ? AND status IN ('APPROVED', 'PENDING')
            ORDER BY date ASC
            LIMIT 1
            "#,
        )
        .bind(donor_id)
        .fetch_optional(&mut *tx)
        .await?;

        match open_appointment {
            Some(appointment_id) => {
                sqlx::query("UPDATE appointments SET status = 'COMPLETED' WHERE id = ?")
                    .bind(appointment_id)
                    .execute(&mut *tx)
                    .await?;
            }
            None => {
                // Walk-in donation with no prior booking.
                sqlx::query(
                    r#"
                    INSERT INTO appointments (donor_id, date, status, created_at)
                    VALUES (?, ?, 'COMPLETED', ?)
                    "#,
                )
                .bind(donor_id)
                .bind(today.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
            }
        }

        let eligibility = eligibility_label(next_eligible_date(today));
        sqlx::query("UPDATE donors SET last_donation = ?, eligibility = ? WHERE id = ?")
            .bind(today)
            .bind(&eligibility)
            .bind(donor_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await.map_err(DonorError::from)?;

        info!("Donor {} donation recorded, {}", donor_id, eligibility);

        self.get(donor_id).await
    }

    pub async fn get_credentials(
        &self,
        email: &str,
    ) -> Result<Option<DonorCredentials>, DonorError> {
        let row = sqlx::query("SELECT id, name, password_hash FROM donors WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| {
            Ok(DonorCredentials {
                id: r.try_get("id").map_err(DonorError::from)?,
                name: r.try_get("name").map_err(DonorError::from)?,
                password_hash: r.try_get("password_hash").map_err(DonorError::from)?,
            })
        })
        .transpose()
    }

    pub async fn count(&self) -> Result<i64, DonorError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM donors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn row_to_donor(row: &sqlx::sqlite::SqliteRow) -> Result<Donor, DonorError> {
    Ok(Donor {
        id: row.try_get("id").map_err(DonorError::from)?,
        name: row.try_get("name").map_err(DonorError::from)?,
        age: row.try_get("age").map_err(DonorError::from)?,
        sex: row.try_get("sex").map_err(DonorError::from)?,
        phone: row.try_get("phone").map_err(DonorError::from)?,
        email: row.try_get("email").map_err(DonorError::from)?,
        blood_group: row.try_get("blood_group").map_err(DonorError::from)?,
        weight: row.try_get("weight").map_err(DonorError::from)?,
        address: row.try_get("address").map_err(DonorError::from)?,
        diseases: row.try_get("diseases").map_err(DonorError::from)?,
        haemoglobin: row.try_get("haemoglobin").map_err(DonorError::from)?,
        blood_sugar: row.try_get("blood_sugar").map_err(DonorError::from)?,
        blood_pressure: row.try_get("blood_pressure").map_err(DonorError::from)?,
        registered_at: row.try_get("registered_at").map_err(DonorError::from)?,
        last_donation: row.try_get("last_donation").map_err(DonorError::from)?,
        eligibility: row.try_get("eligibility").map_err(DonorError::from)?,
    })
}
