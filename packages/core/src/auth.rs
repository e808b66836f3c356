// ABOUTME: Explicit caller context passed into role-gated core operations
// ABOUTME: Storage crates check preconditions here instead of reading a session

use thiserror::Error;

use crate::types::Role;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("operation requires the {0} role")]
    RoleRequired(&'static str),
}

/// Authenticated caller identity, resolved once at the HTTP layer and
/// handed to every role-gated operation as a plain parameter.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub role: Role,
    /// Set when the caller is a donor; admins carry their admin row id.
    pub subject_id: i64,
}

impl AuthContext {
    pub fn admin(admin_id: i64) -> Self {
        Self {
            role: Role::Admin,
            subject_id: admin_id,
        }
    }

    pub fn donor(donor_id: i64) -> Self {
        Self {
            role: Role::Donor,
            subject_id: donor_id,
        }
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        match self.role {
            Role::Admin => Ok(()),
            _ => Err(AuthError::RoleRequired("admin")),
        }
    }

    pub fn require_donor(&self) -> Result<i64, AuthError> {
        match self.role {
            Role::Donor => Ok(self.subject_id),
            _ => Err(AuthError::RoleRequired("donor")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_context_passes_admin_gate() {
        assert!(AuthContext::admin(1).require_admin().is_ok());
        assert!(AuthContext::admin(1).require_donor().is_err());
    }

    #[test]
    fn donor_context_yields_donor_id() {
        let ctx = AuthContext::donor(42);
        assert!(ctx.require_admin().is_err());
        assert_eq!(ctx.require_donor().unwrap(), 42);
    }
}
