//! Post endpoints, including like/unlike

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use crate::AppState;
use crate::api::converters::{load_comment_response, load_post_response};
use crate::api::dto::{CommentResponse, FeedResponse, LikeResponse, PostResponse};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::{EngagementService, LikeOutcome, PageRequest, PostService};

#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub title: String,
    pub body: String,
}

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(request): Json<PostBody>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let service = PostService::new(state.db.clone());
    let post = service
        .create_post(&account, &request.title, &request.body)
        .await?;

    let response = load_post_response(&state, &post).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/posts
///
/// All posts newest-first, in the same pagination envelope as the feed.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(request): Query<PageRequest>,
) -> Result<Json<FeedResponse>, AppError> {
    let service = PostService::new(state.db.clone());
    let page = service.list_posts(request).await?;

    let mut items = Vec::with_capacity(page.items.len());
    for post in &page.items {
        items.push(load_post_response(&state, post).await?);
    }

    Ok(Json(FeedResponse {
        total: page.total,
        page: page.page,
        page_size: page.page_size,
        items,
    }))
}

/// GET /api/posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let service = PostService::new(state.db.clone());
    let post = service.get_post(&id).await?;

    Ok(Json(load_post_response(&state, &post).await?))
}

/// PUT /api/posts/:id
pub async fn update_post(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<PostBody>,
) -> Result<Json<PostResponse>, AppError> {
    let service = PostService::new(state.db.clone());
    let post = service
        .update_post(&account, &id, &request.title, &request.body)
        .await?;

    Ok(Json(load_post_response(&state, &post).await?))
}

/// DELETE /api/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let service = PostService::new(state.db.clone());
    service.delete_post(&account, &id).await?;

    Ok(Json(serde_json::json!({})))
}

/// GET /api/posts/:id/comments
pub async fn get_post_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let service = PostService::new(state.db.clone());
    // 404 for unknown posts rather than an empty list
    service.get_post(&id).await?;
    let comments = service.list_comments(Some(&id)).await?;

    let mut responses = Vec::with_capacity(comments.len());
    for comment in &comments {
        responses.push(load_comment_response(&state, comment).await?);
    }

    Ok(Json(responses))
}

/// POST /api/posts/:id/like
///
/// 201 on a new like, 200 when the post was already liked.
pub async fn like_post(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<LikeResponse>), AppError> {
    let engagement = EngagementService::new(state.db.clone(), &state.config.engagement);
    let outcome = engagement.like(&account, &id).await?;

    let (status, created) = match outcome {
        LikeOutcome::Created => (StatusCode::CREATED, true),
        LikeOutcome::AlreadyLiked => (StatusCode::OK, false),
    };

    Ok((
        status,
        Json(LikeResponse {
            post_id: id,
            liked: true,
            created,
        }),
    ))
}

/// POST /api/posts/:id/unlike
pub async fn unlike_post(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, AppError> {
    let engagement = EngagementService::new(state.db.clone(), &state.config.engagement);
    engagement.unlike(&account, &id).await?;

    Ok(Json(LikeResponse {
        post_id: id,
        liked: false,
        created: false,
    }))
}
