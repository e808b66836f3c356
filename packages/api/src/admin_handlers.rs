// ABOUTME: HTTP handlers for the admin dashboard
// ABOUTME: Aggregate statistics and the donation-completion action

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use hemobank_appointments::AppointmentWithDonor;
use hemobank_stock::BloodStock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentUser;
use crate::response::{ok, ApiError};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub donors: i64,
    pub recipients: i64,
    pub pending_appointments: i64,
    pub pending_requests: i64,
    pub total_units: i64,
    pub stock: Vec<BloodStock>,
    /// Groups at or below the reorder threshold.
    pub low_stock: Vec<BloodStock>,
    pub recent_activity: Vec<AppointmentWithDonor>,
}

const RECENT_ACTIVITY_LIMIT: i64 = 10;
const LOW_STOCK_THRESHOLD: i64 = 5;

/// Counters and stock levels for the admin landing page.
pub async fn dashboard_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    user.context().require_admin()?;

    let stock = state.stock.list().await?;
    let low_stock = stock
        .iter()
        .filter(|s| s.quantity <= LOW_STOCK_THRESHOLD)
        .cloned()
        .collect();

    let stats = DashboardStats {
        donors: state.donors.count().await?,
        recipients: state.recipients.count().await?,
        pending_appointments: state.appointments.count_pending().await?,
        pending_requests: state.requests.count_pending().await?,
        total_units: state.stock.total().await?,
        stock,
        low_stock,
        recent_activity: state
            .appointments
            .recent_activity(RECENT_ACTIVITY_LIMIT)
            .await?,
    };

    Ok(ok(stats))
}

#[derive(Deserialize)]
pub struct CompleteDonationParams {
    /// Donation date override, ISO format. Defaults to today.
    pub date: Option<chrono::NaiveDate>,
}

/// Record that a donor has donated, completing their earliest open
/// appointment and restarting the eligibility clock.
pub async fn complete_donation(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(donor_id): Path<i64>,
    Query(params): Query<CompleteDonationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let today = params.date.unwrap_or_else(|| Utc::now().date_naive());

    let donor = state
        .donors
        .complete_donation(&user.context(), donor_id, today)
        .await?;

    info!("Donation recorded for donor {}", donor_id);
    Ok(ok(donor))
}
