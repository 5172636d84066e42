//! Bearer authentication extractor.
//!
//! Pulls the `Authorization: Bearer ...` credential off the request and
//! resolves it through the app's authentication port. Handlers that take an
//! `AuthenticatedUser` parameter are authenticated; everything else is open.

use std::sync::Arc;

use axum::extract::FromRef;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::app::App;
use crate::infrastructure::ports::{AuthError, AuthenticatedUser};

use super::http::ApiError;

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<App>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = Arc::<App>::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::from(AuthError::Unauthorized))?;

        let identity = app.auth.authenticate(token).await?;
        Ok(identity)
    }
}
