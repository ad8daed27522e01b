//! Authentication extractor
//!
//! Resolves the bearer token on each request to its account.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};

use crate::AppState;
use crate::data::{Account, hash_access_token};
use crate::error::AppError;

/// Pull the bearer token out of the Authorization header, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
}

/// Extractor for the current authenticated account
///
/// Use in handlers that require authentication; unauthenticated
/// requests are rejected with 401.
///
/// # Usage
/// ```ignore
/// async fn handler(
///     CurrentUser(account): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}", account.handle)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Account);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    /// Resolve the bearer token to an account
    ///
    /// Revoked and unknown tokens are rejected.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let account = state
            .db
            .get_token_account(&hash_access_token(&token))
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser(account))
    }
}
