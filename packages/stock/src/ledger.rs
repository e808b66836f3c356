// ABOUTME: Stock ledger storage over the blood_stock table
// ABOUTME: Admin updates clamp at zero; approvals use a conditional decrement

use chrono::Utc;
use hemobank_core::{AuthContext, BloodGroup};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::types::{BloodStock, StockError, StockOperation};

pub struct StockLedger {
    pool: SqlitePool,
}

impl StockLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply an admin delta to a group's counter, creating the row when
    /// absent (an implicit `set`). The result never goes below zero: a
    /// subtract past zero silently loses the excess.
    pub async fn update(
        &self,
        ctx: &AuthContext,
        group: BloodGroup,
        quantity: i64,
        operation: StockOperation,
    ) -> Result<BloodStock, StockError> {
        ctx.require_admin()?;
        if quantity < 0 {
            return Err(StockError::NegativeQuantity);
        }

        debug!("Stock update: {} {:?} {}", group, operation, quantity);

        let mut tx = self.pool.begin().await?;

        let current: Option<i64> =
            sqlx::query_scalar("SELECT quantity FROM blood_stock WHERE blood_group = ?")
                .bind(group)
                .fetch_optional(&mut *tx)
                .await?;

        let new_quantity = match current {
            None => quantity,
            Some(base) => match operation {
                StockOperation::Add => base + quantity,
                StockOperation::Subtract => base - quantity,
                StockOperation::Set => quantity,
            },
        }
        .max(0);

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO blood_stock (blood_group, quantity, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(blood_group) DO UPDATE SET quantity = excluded.quantity,
                                                   updated_at = excluded.updated_at
            "#,
        )
        .bind(group)
        .bind(new_quantity)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Stock for {} now {} units", group, new_quantity);

        Ok(BloodStock {
            blood_group: group,
            quantity: new_quantity,
            updated_at: now,
        })
    }

    pub async fn get(&self, group: BloodGroup) -> Result<Option<BloodStock>, StockError> {
        let row = sqlx::query(
            "SELECT blood_group, quantity, updated_at FROM blood_stock WHERE blood_group = ?",
        )
        .bind(group)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_stock(&r)).transpose()
    }

    /// All groups, ordered by group label for stable dashboards.
    pub async fn list(&self) -> Result<Vec<BloodStock>, StockError> {
        let rows = sqlx::query(
            "SELECT blood_group, quantity, updated_at FROM blood_stock ORDER BY blood_group ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_stock).collect()
    }

    /// Total units across all groups.
    pub async fn total(&self) -> Result<i64, StockError> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(quantity) FROM blood_stock")
                .fetch_one(&self.pool)
                .await?;
        Ok(total.unwrap_or(0))
    }
}

fn row_to_stock(row: &sqlx::sqlite::SqliteRow) -> Result<BloodStock, StockError> {
    Ok(BloodStock {
        blood_group: row.try_get("blood_group").map_err(sqlx_err)?,
        quantity: row.try_get("quantity").map_err(sqlx_err)?,
        updated_at: row.try_get("updated_at").map_err(sqlx_err)?,
    })
}

fn sqlx_err(err: sqlx::Error) -> StockError {
    err.into()
}

/// Conditionally deduct `quantity` units inside the caller's transaction.
///
/// Returns false without mutating anything when the row is missing or holds
/// fewer units than requested. The `quantity >= ?` predicate makes the
/// check and the decrement a single statement, so two concurrent approvals
/// can never both succeed against the same stale balance.
pub async fn deduct_checked(
    conn: &mut SqliteConnection,
    group: BloodGroup,
    quantity: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE blood_stock
        SET quantity = quantity - ?1, updated_at = ?3
        WHERE blood_group = ?2 AND quantity >= ?1
        "#,
    )
    .bind(quantity)
    .bind(group)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
