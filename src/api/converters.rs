//! Model-to-DTO converters

use crate::AppState;
use crate::api::dto::{AccountResponse, CommentResponse, NotificationResponse, PostResponse};
use crate::data::{Account, Comment, Post};
use crate::error::AppError;
use crate::service::NotificationView;

/// Convert an account with its relation counts
pub fn account_to_response(
    account: &Account,
    followers_count: i64,
    following_count: i64,
) -> AccountResponse {
    AccountResponse {
        id: account.id.clone(),
        handle: account.handle.clone(),
        bio: account.bio.clone(),
        avatar_url: account.avatar_url.clone(),
        followers_count,
        following_count,
        created_at: account.created_at,
    }
}

/// Build an account response, fetching relation counts
pub async fn load_account_response(
    state: &AppState,
    account: &Account,
) -> Result<AccountResponse, AppError> {
    let followers_count = state.db.count_followers(&account.id).await?;
    let following_count = state.db.count_following(&account.id).await?;
    Ok(account_to_response(account, followers_count, following_count))
}

/// Build a post response, fetching the author handle and like count
pub async fn load_post_response(state: &AppState, post: &Post) -> Result<PostResponse, AppError> {
    let author_handle = state.db.get_account(&post.author_id).await?.map(|a| a.handle);
    let likes_count = state.db.count_likes(&post.id).await?;
    Ok(PostResponse {
        id: post.id.clone(),
        author_id: post.author_id.clone(),
        author_handle,
        title: post.title.clone(),
        body: post.body.clone(),
        likes_count,
        created_at: post.created_at,
        updated_at: post.updated_at,
    })
}

/// Build a comment response, fetching the author handle
pub async fn load_comment_response(
    state: &AppState,
    comment: &Comment,
) -> Result<CommentResponse, AppError> {
    let author_handle = state
        .db
        .get_account(&comment.author_id)
        .await?
        .map(|a| a.handle);
    Ok(CommentResponse {
        id: comment.id.clone(),
        post_id: comment.post_id.clone(),
        author_id: comment.author_id.clone(),
        author_handle,
        body: comment.body.clone(),
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    })
}

/// Convert an already-resolved notification view
pub fn notification_to_response(view: NotificationView) -> NotificationResponse {
    NotificationResponse {
        id: view.id,
        actor_id: view.actor_id,
        actor_handle: view.actor_handle,
        verb: view.verb,
        target: view.target,
        read: view.read,
        created_at: view.created_at,
    }
}
