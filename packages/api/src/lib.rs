// ABOUTME: HTTP API layer providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;

pub mod admin_handlers;
pub mod appointments_handlers;
pub mod auth;
pub mod auth_handlers;
pub mod donors_handlers;
pub mod eligibility_handlers;
pub mod recipients_handlers;
pub mod requests_handlers;
pub mod response;
pub mod state;
pub mod stock_handlers;
pub mod validation;

pub use state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

async fn health() -> axum::response::Response {
    response::ok(HealthStatus { status: "ok" })
}

/// Assembles the full application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/auth", auth_router())
        .nest("/api/donors", donors_router())
        .nest("/api/appointments", appointments_router())
        .nest("/api/recipients", recipients_router())
        .nest("/api/requests", requests_router())
        .nest("/api/stock", stock_router())
        .nest("/api/admin", admin_router())
        .route(
            "/api/eligibility/check",
            post(eligibility_handlers::check_eligibility),
        )
        .with_state(state)
}

fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/otp/request", post(auth_handlers::request_otp))
        .route("/otp/verify", post(auth_handlers::verify_otp))
        .route("/login/donor", post(auth_handlers::donor_login))
        .route("/login/admin", post(auth_handlers::admin_login))
        .route("/password/reset", post(auth_handlers::reset_donor_password))
}

fn donors_router() -> Router<AppState> {
    Router::new()
        .route("/", post(donors_handlers::register_donor))
        .route("/", get(donors_handlers::list_donors))
        .route("/me", get(donors_handlers::get_me))
        .route("/me", put(donors_handlers::update_profile))
        .route("/{id}", get(donors_handlers::get_donor))
        .route("/{id}", delete(donors_handlers::delete_donor))
}

fn appointments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(appointments_handlers::book_appointment))
        .route("/", get(appointments_handlers::list_appointments))
        .route("/mine", get(appointments_handlers::my_appointments))
        .route(
            "/{id}/status",
            put(appointments_handlers::set_appointment_status),
        )
}

fn recipients_router() -> Router<AppState> {
    Router::new()
        .route("/", post(recipients_handlers::register_recipient))
        .route("/", get(recipients_handlers::list_recipients))
        .route("/{id}", get(recipients_handlers::get_recipient))
}

fn requests_router() -> Router<AppState> {
    Router::new()
        .route("/", post(requests_handlers::submit_request))
        .route("/", get(requests_handlers::list_requests))
        .route("/{id}/resolve", put(requests_handlers::resolve_request))
}

fn stock_router() -> Router<AppState> {
    Router::new()
        .route("/", get(stock_handlers::list_stock))
        .route("/", put(stock_handlers::update_stock))
}

fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin_handlers::dashboard_stats))
        .route(
            "/donors/{id}/complete-donation",
            post(admin_handlers::complete_donation),
        )
}
