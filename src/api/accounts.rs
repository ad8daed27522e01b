//! Account endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use crate::AppState;
use crate::api::converters::{account_to_response, load_account_response};
use crate::api::dto::{AccountResponse, FollowResponse, RegisterResponse};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::{AccountService, EngagementService};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub handle: String,
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// POST /api/accounts
///
/// Register a new account. Returns the profile and its first
/// access token.
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let service = AccountService::new(state.db.clone());
    let (account, token) = service.register(&request.handle, request.bio).await?;

    let response = RegisterResponse {
        account: account_to_response(&account, 0, 0),
        token,
        message: "Account registered successfully".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/accounts
///
/// List all accounts (authenticated).
pub async fn list_accounts(
    State(state): State<AppState>,
    CurrentUser(_account): CurrentUser,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let service = AccountService::new(state.db.clone());
    let accounts = service.list().await?;

    let mut responses = Vec::with_capacity(accounts.len());
    for account in &accounts {
        responses.push(load_account_response(&state, account).await?);
    }

    Ok(Json(responses))
}

/// GET /api/accounts/me
pub async fn get_me(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
) -> Result<Json<AccountResponse>, AppError> {
    Ok(Json(load_account_response(&state, &account).await?))
}

/// PATCH /api/accounts/me
///
/// Partial update of the caller's own profile.
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let service = AccountService::new(state.db.clone());
    let updated = service
        .update_profile(&account, request.bio, request.avatar_url)
        .await?;

    Ok(Json(load_account_response(&state, &updated).await?))
}

/// GET /api/accounts/:id
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, AppError> {
    let service = AccountService::new(state.db.clone());
    let account = service.get(&id).await?;

    Ok(Json(load_account_response(&state, &account).await?))
}

/// POST /api/accounts/:id/follow
pub async fn follow_account(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<FollowResponse>, AppError> {
    let engagement = EngagementService::new(state.db.clone(), &state.config.engagement);
    engagement.follow_user(&account, &id).await?;

    Ok(Json(FollowResponse {
        target_id: id,
        following: true,
    }))
}

/// POST /api/accounts/:id/unfollow
pub async fn unfollow_account(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<FollowResponse>, AppError> {
    let engagement = EngagementService::new(state.db.clone(), &state.config.engagement);
    engagement.unfollow_user(&account, &id).await?;

    Ok(Json(FollowResponse {
        target_id: id,
        following: false,
    }))
}

/// GET /api/accounts/:id/followers
pub async fn get_account_followers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let service = AccountService::new(state.db.clone());
    // 404 for unknown accounts rather than an empty list
    service.get(&id).await?;
    let followers = service.list_followers(&id).await?;

    let mut responses = Vec::with_capacity(followers.len());
    for account in &followers {
        responses.push(load_account_response(&state, account).await?);
    }

    Ok(Json(responses))
}

/// GET /api/accounts/:id/following
pub async fn get_account_following(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let service = AccountService::new(state.db.clone());
    service.get(&id).await?;
    let following = service.list_following(&id).await?;

    let mut responses = Vec::with_capacity(following.len());
    for account in &following {
        responses.push(load_account_response(&state, account).await?);
    }

    Ok(Json(responses))
}
