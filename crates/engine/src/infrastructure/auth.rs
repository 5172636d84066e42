//! User-store-backed authentication adapter.
//!
//! Resolves the bearer credential as a user id against the user store and
//! rejects unknown or inactive accounts. Credential issuance lives in the
//! onboarding service; swapping in a real token verifier only touches this
//! adapter.

use std::sync::Arc;

use async_trait::async_trait;
use questboard_domain::UserId;
use uuid::Uuid;

use crate::infrastructure::ports::{AuthError, AuthPort, AuthenticatedUser, UserRepo};

pub struct UserStoreAuth {
    users: Arc<dyn UserRepo>,
}

impl UserStoreAuth {
    pub fn new(users: Arc<dyn UserRepo>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl AuthPort for UserStoreAuth {
    async fn authenticate(&self, bearer_token: &str) -> Result<AuthenticatedUser, AuthError> {
        let uuid = Uuid::parse_str(bearer_token.trim()).map_err(|_| AuthError::Unauthorized)?;
        let user = self
            .users
            .get(UserId::from_uuid(uuid))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "User lookup failed during authentication");
                AuthError::Unauthorized
            })?
            .ok_or(AuthError::Unauthorized)?;

        if !user.is_active() {
            return Err(AuthError::Unauthorized);
        }

        Ok(AuthenticatedUser {
            user_id: user.id,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questboard_domain::{Role, User, UserStatus};

    use crate::infrastructure::ports::MockUserRepo;

    fn active_user() -> User {
        User::new("Ada Lovelace", "ada@example.com")
    }

    #[tokio::test]
    async fn test_valid_token_resolves_identity_and_role() {
        let user = active_user().with_role(Role::Admin);
        let user_id = user.id;

        let mut users = MockUserRepo::new();
        users
            .expect_get()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = UserStoreAuth::new(Arc::new(users));
        let identity = auth
            .authenticate(&user_id.to_string())
            .await
            .expect("authenticates");
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_malformed_token_is_unauthorized() {
        let users = MockUserRepo::new();
        let auth = UserStoreAuth::new(Arc::new(users));
        let err = auth.authenticate("not-a-uuid").await.expect_err("rejects");
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_unknown_user_is_unauthorized() {
        let mut users = MockUserRepo::new();
        users.expect_get().returning(|_| Ok(None));

        let auth = UserStoreAuth::new(Arc::new(users));
        let err = auth
            .authenticate(&Uuid::new_v4().to_string())
            .await
            .expect_err("rejects");
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_inactive_user_is_unauthorized() {
        let mut user = active_user();
        user.status = UserStatus::Inactive;
        let user_id = user.id;

        let mut users = MockUserRepo::new();
        users
            .expect_get()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = UserStoreAuth::new(Arc::new(users));
        let err = auth
            .authenticate(&user_id.to_string())
            .await
            .expect_err("rejects");
        assert!(matches!(err, AuthError::Unauthorized));
    }
}
