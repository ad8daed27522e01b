//! Token endpoints

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};

use crate::AppState;
use crate::api::dto::{MessageResponse, TokenResponse};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::AccountService;

/// POST /api/tokens
///
/// Mint an additional access token for the current account.
pub async fn create_token(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let service = AccountService::new(state.db.clone());
    let token = service.issue_token(&account.id).await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// POST /api/logout
///
/// Revoke the presented token. Revocation failure is reported in the
/// body but does not fail the request.
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let token = crate::auth::bearer_token(&headers).ok_or(AppError::Unauthorized)?;

    let service = AccountService::new(state.db.clone());
    let message = match service.revoke_token(&token).await {
        Ok(true) => "Logout successful".to_string(),
        Ok(false) => "Token was already revoked".to_string(),
        Err(error) => {
            tracing::error!(%error, account = %account.handle, "Token revocation failed");
            "Error revoking token".to_string()
        }
    };

    Ok(Json(MessageResponse { message }))
}
