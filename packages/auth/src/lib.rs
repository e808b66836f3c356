// ABOUTME: Authentication building blocks for the HTTP layer
// ABOUTME: Email OTP storage, argon2 password hashing, and JWT sessions

pub mod otp;
pub mod password;
pub mod tokens;

pub use otp::{OtpError, OtpStorage, OTP_TTL_MINUTES};
pub use password::{hash_password, verify_password};
pub use tokens::{Keys, RegistrationClaims, SessionClaims, TokenError};
