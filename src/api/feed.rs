//! Home feed endpoint

use axum::{
    extract::{Query, State},
    response::Json,
};

use crate::AppState;
use crate::api::converters::load_post_response;
use crate::api::dto::FeedResponse;
use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::service::{FeedService, PageRequest};

/// GET /api/feed?page=&page_size=
///
/// Posts from followed accounts, newest-first.
pub async fn get_feed(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Query(request): Query<PageRequest>,
) -> Result<Json<FeedResponse>, AppError> {
    let service = FeedService::new(state.db.clone());
    let page = service.feed(&account, request).await?;

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
