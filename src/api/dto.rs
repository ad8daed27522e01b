//! API response DTOs
//!
//! Data Transfer Objects for JSON API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub handle: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub followers_count: i64,
    pub following_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Registration response: profile plus the first access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub account: AccountResponse,
    pub token: String,
    pub message: String,
}

/// Token mint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Post response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub author_handle: Option<String>,
    pub title: String,
    pub body: String,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub author_handle: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a like request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub post_id: String,
    pub liked: bool,
    /// false when the post was already liked (idempotent repeat)
    pub created: bool,
}

/// Follow state after a follow/unfollow request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowResponse {
    pub target_id: String,
    pub following: bool,
}

/// One page of feed items plus the pre-pagination total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub items: Vec<PostResponse>,
}

/// Notification response
///
/// `target` is the display string of the target entity, or null when
/// the action had no target or the target no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub id: String,
    pub actor_id: String,
    pub actor_handle: Option<String>,
    pub verb: String,
    pub target: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Count of unread notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// Bulk mark-as-read result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
    pub message: String,
}

/// Generic message envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
