//! Comment endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use crate::AppState;
use crate::api::converters::load_comment_response;
use crate::api::dto::CommentResponse;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::{EngagementService, PostService};

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub post_id: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentListParams {
    /// Restrict the listing to one post
    pub post: Option<String>,
}

/// POST /api/comments
///
/// Creating a comment notifies the post author (unless they wrote it).
pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let service = PostService::new(state.db.clone());
    let post = service.get_post(&request.post_id).await?;
    let comment = service
        .create_comment(&account, &post.id, &request.body)
        .await?;

    let engagement = EngagementService::new(state.db.clone(), &state.config.engagement);
    engagement.comment_posted(&account, &comment, &post).await?;

    let response = load_comment_response(&state, &comment).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Query(params): Query<CommentListParams>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let service = PostService::new(state.db.clone());
    let comments = service.list_comments(params.post.as_deref()).await?;

    let mut responses = Vec::with_capacity(comments.len());
    for comment in &comments {
        responses.push(load_comment_response(&state, comment).await?);
    }

    Ok(Json(responses))
}

/// GET /api/comments/:id
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommentResponse>, AppError> {
    let service = PostService::new(state.db.clone());
    let comment = service.get_comment(&id).await?;

    Ok(Json(load_comment_response(&state, &comment).await?))
}

/// PUT /api/comments/:id
pub async fn update_comment(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let service = PostService::new(state.db.clone());
    let comment = service.update_comment(&account, &id, &request.body).await?;

    Ok(Json(load_comment_response(&state, &comment).await?))
}

/// DELETE /api/comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let service = PostService::new(state.db.clone());
    service.delete_comment(&account, &id).await?;

    Ok(Json(serde_json::json!({})))
}
