//! Notification endpoints

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::AppState;
use crate::api::converters::notification_to_response;
use crate::api::dto::{MarkAllReadResponse, MessageResponse, NotificationResponse, UnreadCountResponse};
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::NotificationService;

#[derive(Debug, Deserialize)]
pub struct NotificationListParams {
    /// Set to "true" to list only unread notifications
    pub unread: Option<String>,
}

/// GET /api/notifications
pub async fn get_notifications(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let unread_only = params
        .unread
        .as_deref()
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));

    let service = NotificationService::new(state.db.clone());
    let views = service.list_for(&account, unread_only).await?;

    Ok(Json(views.into_iter().map(notification_to_response).collect()))
}

/// POST /api/notifications/:id/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let service = NotificationService::new(state.db.clone());
    service.mark_read(&account, &id).await?;

    Ok(Json(MessageResponse {
        message: "Notification marked as read".to_string(),
    }))
}

/// POST /api/notifications/:id/unread
pub async fn mark_notification_unread(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let service = NotificationService::new(state.db.clone());
    service.mark_unread(&account, &id).await?;

    Ok(Json(MessageResponse {
        message: "Notification marked as unread".to_string(),
    }))
}

/// POST /api/notifications/read_all
///
/// One bulk update; returns how many notifications were unread.
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let service = NotificationService::new(state.db.clone());
    let updated = service.mark_all_read(&account).await?;

    Ok(Json(MarkAllReadResponse {
        updated,
        message: format!("{} notifications marked as read", updated),
    }))
}

/// GET /api/notifications/unread_count
pub async fn get_unread_count(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let service = NotificationService::new(state.db.clone());
    let count = service.unread_count(&account).await?;

    Ok(Json(UnreadCountResponse { count }))
}
