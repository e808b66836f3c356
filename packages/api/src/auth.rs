// ABOUTME: Authentication context for API requests
// ABOUTME: Decodes the bearer session token into a CurrentUser extractor

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use hemobank_core::{AuthContext, Role};

use crate::response::ApiError;
use crate::state::AppState;

/// Current authenticated user, extracted from `Authorization: Bearer`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
    pub name: String,
}

impl CurrentUser {
    /// The role-checked context passed down into the storage layers.
    pub fn context(&self) -> AuthContext {
        match self.role {
            Role::Admin => AuthContext::admin(self.id),
            Role::Donor => AuthContext::donor(self.id),
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated)?;

        let claims = state.keys.verify_session(token)?;

        Ok(CurrentUser {
            id: claims.sub,
            role: claims.role,
            name: claims.name,
        })
    }
}
