//! API layer
//!
//! HTTP handlers for accounts, posts, comments, engagement,
//! notifications, and the home feed.

mod accounts;
mod comments;
mod converters;
mod dto;
mod feed;
mod notifications;
mod posts;
mod tokens;

pub use converters::*;
pub use dto::*;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::AppState;

/// Create the API router
///
/// Routes are split into public and authenticated endpoints.
/// Authentication is enforced by the CurrentUser extractor in handlers.
pub fn api_router() -> Router<AppState> {
    // Public endpoints (no authentication required)
    let public_routes = Router::new()
        // Registration is public
        .route("/accounts", post(accounts::create_account))
        // Profile and relation reads are public
        .route("/accounts/:id", get(accounts::get_account))
        .route("/accounts/:id/followers", get(accounts::get_account_followers))
        .route("/accounts/:id/following", get(accounts::get_account_following))
        // Content reads are public
        .route("/posts", get(posts::list_posts))
        .route("/posts/:id", get(posts::get_post))
        .route("/posts/:id/comments", get(posts::get_post_comments))
        .route("/comments", get(comments::list_comments))
        .route("/comments/:id", get(comments::get_comment));

    // Authenticated endpoints (require valid token)
    let authenticated_routes = Router::new()
        // Accounts
        .route("/accounts", get(accounts::list_accounts))
        .route("/accounts/me", get(accounts::get_me))
        .route("/accounts/me", patch(accounts::update_me))
        .route("/accounts/:id/follow", post(accounts::follow_account))
        .route("/accounts/:id/unfollow", post(accounts::unfollow_account))
        // Posts
        .route("/posts", post(posts::create_post))
        .route("/posts/:id", put(posts::update_post))
        .route("/posts/:id", delete(posts::delete_post))
        .route("/posts/:id/like", post(posts::like_post))
        .route("/posts/:id/unlike", post(posts::unlike_post))
        // Comments
        .route("/comments", post(comments::create_comment))
        .route("/comments/:id", put(comments::update_comment))
        .route("/comments/:id", delete(comments::delete_comment))
        // Feed
        .route("/feed", get(feed::get_feed))
        // Notifications
        .route("/notifications", get(notifications::get_notifications))
        .route(
            "/notifications/:id/read",
            post(notifications::mark_notification_read),
        )
        .route(
            "/notifications/:id/unread",
            post(notifications::mark_notification_unread),
        )
        .route(
            "/notifications/read_all",
            post(notifications::mark_all_notifications_read),
        )
        .route(
            "/notifications/unread_count",
            get(notifications::get_unread_count),
        )
        // Tokens
        .route("/tokens", post(tokens::create_token))
        .route("/logout", post(tokens::logout));

    // Merge public and authenticated routes
    public_routes.merge(authenticated_routes)
}
