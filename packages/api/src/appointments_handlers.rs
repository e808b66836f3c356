// ABOUTME: HTTP request handlers for donation appointments
// ABOUTME: Status transitions notify the donor by mail, best effort

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use hemobank_appointments::{AppointmentStatus, BookingInput};
use hemobank_notify::templates;
use serde::Deserialize;
use tracing::info;

use crate::auth::CurrentUser;
use crate::response::{created, ok, ApiError};
use crate::state::AppState;
use crate::validation::validate_units;

/// Book a donation slot for the logged-in donor.
pub async fn book_appointment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<BookingInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_units(input.units)?;

    let appointment = state.appointments.book(&user.context(), input).await?;
    info!("Appointment {} booked", appointment.id);

    Ok(created(appointment))
}

/// The logged-in donor's own appointments, newest first.
pub async fn my_appointments(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let donor_id = user.context().require_donor()?;
    let appointments = state.appointments.list_for_donor(donor_id).await?;
    Ok(ok(appointments))
}

/// Admin listing of all appointments with donor details.
pub async fn list_appointments(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    user.context().require_admin()?;
    let appointments = state.appointments.list_all().await?;
    Ok(ok(appointments))
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: AppointmentStatus,
}

/// Approve, reject, or complete an appointment.
pub async fn set_appointment_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<SetStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .appointments
        .set_status(&user.context(), id, body.status)
        .await?;

    let date = updated.appointment.date.format("%d/%m/%Y").to_string();
    match body.status {
        AppointmentStatus::Approved => {
            let (subject, text) = templates::appointment_approved(&updated.donor_name, &date);
            state.mailer.send(&updated.donor_email, &subject, &text).await;
        }
        AppointmentStatus::Rejected => {
            let (subject, text) = templates::appointment_rejected(&updated.donor_name, &date);
            state.mailer.send(&updated.donor_email, &subject, &text).await;
        }
        _ => {}
    }

    Ok(ok(updated))
}
