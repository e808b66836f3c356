// ABOUTME: First-run seeding for the admin account and stock counters
// ABOUTME: Idempotent; existing rows are left untouched

use anyhow::{Context, Result};
use chrono::Utc;
use hemobank_core::BloodGroup;
use sqlx::SqlitePool;
use tracing::info;

/// Create the admin account (if absent) and a zeroed stock row for every
/// blood group.
pub async fn seed(pool: &SqlitePool, email: &str, password: &str) -> Result<()> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM admins WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    match existing {
        Some(id) => info!("Admin {} already exists (id {})", email, id),
        None => {
            let hash = hemobank_auth::hash_password(password)
                .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
            sqlx::query(
                "INSERT INTO admins (name, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind("Administrator")
            .bind(email)
            .bind(&hash)
            .bind(Utc::now())
            .execute(pool)
            .await
            .context("inserting admin account")?;
            info!("Created admin account {}", email);
        }
    }

    for group in BloodGroup::ALL {
        sqlx::query(
            "INSERT OR IGNORE INTO blood_stock (blood_group, quantity, updated_at) VALUES (?, 0, ?)",
        )
        .bind(group)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    }
    info!("Stock counters present for all {} groups", BloodGroup::ALL.len());

    Ok(())
}
