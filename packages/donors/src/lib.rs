// ABOUTME: Donor registration, profile management, and lifecycle
// ABOUTME: complete_donation advances appointments and the 90-day eligibility

pub mod storage;
pub mod types;

pub use storage::DonorStorage;
pub use types::{Donor, DonorCreateInput, DonorCredentials, DonorError, DonorProfileUpdate};
