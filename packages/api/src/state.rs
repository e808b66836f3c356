// ABOUTME: Shared application state injected into every handler
// ABOUTME: Owns the storage layers, mailer, and signing keys

use std::sync::Arc;

use hemobank_appointments::AppointmentStorage;
use hemobank_auth::{Keys, OtpStorage};
use hemobank_donors::DonorStorage;
use hemobank_notify::Mailer;
use hemobank_recipients::RecipientStorage;
use hemobank_requests::RequestStorage;
use hemobank_stock::StockLedger;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub donors: Arc<DonorStorage>,
    pub appointments: Arc<AppointmentStorage>,
    pub recipients: Arc<RecipientStorage>,
    pub requests: Arc<RequestStorage>,
    pub stock: Arc<StockLedger>,
    pub otp: Arc<OtpStorage>,
    pub mailer: Mailer,
    pub keys: Keys,
    /// Destination for new-request alerts.
    pub admin_email: String,
}

impl AppState {
    pub fn new(pool: SqlitePool, mailer: Mailer, keys: Keys, admin_email: String) -> Self {
        Self {
            donors: Arc::new(DonorStorage::new(pool.clone())),
            appointments: Arc::new(AppointmentStorage::new(pool.clone())),
            recipients: Arc::new(RecipientStorage::new(pool.clone())),
            requests: Arc::new(RequestStorage::new(pool.clone())),
            stock: Arc::new(StockLedger::new(pool.clone())),
            otp: Arc::new(OtpStorage::new(pool.clone())),
            pool,
            mailer,
            keys,
            admin_email,
        }
    }
}
