// ABOUTME: JWT signing and validation for sessions and email verification
// ABOUTME: HS256 with a shared secret; registration tokens live one hour

use chrono::{Duration, Utc};
use hemobank_core::Role;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const REGISTRATION_TTL_HOURS: i64 = 1;
const SESSION_TTL_HOURS: i64 = 24;

/// Proof that an email address passed OTP verification. Registration
/// endpoints accept this instead of re-running the OTP exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationClaims {
    pub email: String,
    pub verified: bool,
    pub exp: i64,
}

/// Logged-in session for an admin or donor account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: i64,
    pub role: Role,
    pub name: String,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Email not verified")]
    NotVerified,
    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// Paired signing and verification keys derived from one secret.
#[derive(Clone)]
pub struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn sign_registration(&self, email: &str) -> Result<String, TokenError> {
        let claims = RegistrationClaims {
            email: email.to_string(),
            verified: true,
            exp: (Utc::now() + Duration::hours(REGISTRATION_TTL_HOURS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::GenerationFailed(e.to_string()))
    }

    /// Validate a registration token and return the verified email.
    pub fn verify_registration(&self, token: &str) -> Result<String, TokenError> {
        let data = decode::<RegistrationClaims>(token, &self.decoding, &validation())
            .map_err(map_decode_err)?;
        if !data.claims.verified {
            return Err(TokenError::NotVerified);
        }
        Ok(data.claims.email)
    }

    pub fn sign_session(&self, sub: i64, role: Role, name: &str) -> Result<String, TokenError> {
        let claims = SessionClaims {
            sub,
            role,
            name: name.to_string(),
            exp: (Utc::now() + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::GenerationFailed(e.to_string()))
    }

    pub fn verify_session(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &validation())
            .map_err(map_decode_err)?;
        Ok(data.claims)
    }
}

fn validation() -> Validation {
    Validation::new(Algorithm::HS256)
}

fn map_decode_err(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_token_round_trip() {
        let keys = Keys::new("test-secret-at-least-32-characters!!");
        let token = keys.sign_registration("donor@example.com").unwrap();
        assert_eq!(keys.verify_registration(&token).unwrap(), "donor@example.com");
    }

    #[test]
    fn session_token_carries_role_and_subject() {
        let keys = Keys::new("test-secret-at-least-32-characters!!");
        let token = keys.sign_session(42, Role::Donor, "Rajan Kumar").unwrap();

        let claims = keys.verify_session(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Donor);
        assert_eq!(claims.name, "Rajan Kumar");
    }

    #[test]
    fn tokens_from_a_different_secret_are_rejected() {
        let keys = Keys::new("test-secret-at-least-32-characters!!");
        let other = Keys::new("another-secret-also-32-characters!!!");

        let token = other.sign_session(1, Role::Admin, "Admin").unwrap();
        assert!(matches!(
            keys.verify_session(&token).unwrap_err(),
            TokenError::Invalid(_)
        ));
    }

    #[test]
    fn session_token_is_not_a_registration_token() {
        let keys = Keys::new("test-secret-at-least-32-characters!!");
        let token = keys.sign_session(1, Role::Donor, "Rajan").unwrap();
        assert!(keys.verify_registration(&token).is_err());
    }
}
