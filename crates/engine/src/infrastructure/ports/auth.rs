//! Authentication provider port.

use async_trait::async_trait;
use questboard_domain::{Role, UserId};

use super::error::AuthError;

/// The identity an authenticated request acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Gate for admin-only surfaces.
    pub fn require_admin(&self) -> Result<(), AuthError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::User => Err(AuthError::Forbidden),
        }
    }
}

/// Verifies a caller's bearer credential and resolves identity and role.
///
/// Credential issuance (registration, passwords, confirmation) is owned by
/// the onboarding service; this seam only verifies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthPort: Send + Sync {
    async fn authenticate(&self, bearer_token: &str) -> Result<AuthenticatedUser, AuthError>;
}
