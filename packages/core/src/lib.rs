// ABOUTME: Shared domain vocabulary for the blood bank
// ABOUTME: Blood groups, demographic enums, roles, and the caller auth context

pub mod auth;
pub mod types;

pub use auth::{AuthContext, AuthError};
pub use types::{
    BloodGroup, DonationType, HealthLevel, InvalidValue, Role, Sex, UrgencyLevel,
};
