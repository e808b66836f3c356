// ABOUTME: Appointment storage layer using SQLite
// ABOUTME: Booking is donor-gated, transitions are admin-gated

use chrono::Utc;
use hemobank_core::AuthContext;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::types::{
    Appointment, AppointmentError, AppointmentStatus, AppointmentWithDonor, BookingInput,
};

pub struct AppointmentStorage {
    pool: SqlitePool,
}

impl AppointmentStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Book a PENDING slot for the calling donor. No eligibility-gap check
    /// happens here; the gap is only surfaced informationally.
    pub async fn book(
        &self,
        ctx: &AuthContext,
        input: BookingInput,
    ) -> Result<Appointment, AppointmentError> {
        let donor_id = ctx.require_donor()?;

        debug!("Booking appointment for donor {}", donor_id);

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO appointments (donor_id, date, status, donation_type, units, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(donor_id)
        .bind(input.date)
        .bind(AppointmentStatus::Pending)
        .bind(input.donation_type)
        .bind(input.units)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(result.last_insert_rowid()).await
    }

    pub async fn get(&self, id: i64) -> Result<Appointment, AppointmentError> {
        let row = sqlx::query("SELECT * FROM appointments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        row_to_appointment(&row)
    }

    /// Admin transition to APPROVED, REJECTED, or COMPLETED. Returns the
    /// updated row joined with donor details for the notification side
    /// effect, which the caller fires best-effort.
    pub async fn set_status(
        &self,
        ctx: &AuthContext,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<AppointmentWithDonor, AppointmentError> {
        ctx.require_admin()?;

        let result = sqlx::query("UPDATE appointments SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppointmentError::NotFound);
        }

        info!("Appointment {} set to {:?}", id, status);

        self.get_with_donor(id).await
    }

    pub async fn get_with_donor(
        &self,
        id: i64,
    ) -> Result<AppointmentWithDonor, AppointmentError> {
        let row = sqlx::query(
            r#"
            SELECT a.*, d.name AS donor_name, d.email AS donor_email,
                   d.blood_group AS donor_blood_group
            FROM appointments a
            JOIN donors d ON d.id = a.donor_id
            WHERE a.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppointmentError::NotFound)?;

        row_to_appointment_with_donor(&row)
    }

    /// Admin view: every appointment, earliest date first.
    pub async fn list_all(&self) -> Result<Vec<AppointmentWithDonor>, AppointmentError> {
        let rows = sqlx::query(
            r#"
            SELECT a.*, d.name AS donor_name, d.email AS donor_email,
                   d.blood_group AS donor_blood_group
            FROM appointments a
            JOIN donors d ON d.id = a.donor_id
            ORDER BY a.date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_appointment_with_donor).collect()
    }

    /// Donor view: own appointments, latest date first.
    pub async fn list_for_donor(
        &self,
        donor_id: i64,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let rows =
            sqlx::query("SELECT * FROM appointments WHERE donor_id = ? ORDER BY date DESC")
                .bind(donor_id)
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(row_to_appointment).collect()
    }

    pub async fn count_pending(&self) -> Result<i64, AppointmentError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE status = ?")
                .bind(AppointmentStatus::Pending)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Recent approved/completed activity for the admin dashboard.
    pub async fn recent_activity(
        &self,
        limit: i64,
    ) -> Result<Vec<AppointmentWithDonor>, AppointmentError> {
        let rows = sqlx::query(
            r#"
            SELECT a.*, d.name AS donor_name, d.email AS donor_email,
                   d.blood_group AS donor_blood_group
            FROM appointments a
            JOIN donors d ON d.id = a.donor_id
            WHERE a.status IN ('APPROVED', 'COMPLETED')
            ORDER BY a.created_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_appointment_with_donor).collect()
    }
}

fn row_to_appointment(row: &sqlx::sqlite::SqliteRow) -> Result<Appointment, AppointmentError> {
    Ok(Appointment {
        id: row.try_get("id").map_err(AppointmentError::from)?,
        donor_id: row.try_get("donor_id").map_err(AppointmentError::from)?,
        date: row.try_get("date").map_err(AppointmentError::from)?,
        status: row.try_get("status").map_err(AppointmentError::from)?,
        donation_type: row.try_get("donation_type").map_err(AppointmentError::from)?,
        units: row.try_get("units").map_err(AppointmentError::from)?,
        created_at: row.try_get("created_at").map_err(AppointmentError::from)?,
    })
}

fn row_to_appointment_with_donor(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<AppointmentWithDonor, AppointmentError> {
    Ok(AppointmentWithDonor {
        appointment: row_to_appointment(row)?,
        donor_name: row.try_get("donor_name").map_err(AppointmentError::from)?,
        donor_email: row.try_get("donor_email").map_err(AppointmentError::from)?,
        donor_blood_group: row
            .try_get("donor_blood_group")
            .map_err(AppointmentError::from)?,
    })
}
