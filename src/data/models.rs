//! Data models
//!
//! Rust structs representing database entities.
//! All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Account
// =============================================================================

/// A registered account
///
/// Follow relationships are not stored on the account row;
/// they live in the `follows` edge table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    /// Unique handle (e.g. "alice")
    pub handle: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Follow edge
// =============================================================================

/// A directed follow edge: follower -> followed
///
/// The `followers` view of an account is the inverse traversal
/// of the same edge set. The pair (follower_id, followed_id) is unique.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FollowEdge {
    pub id: String,
    pub follower_id: String,
    pub followed_id: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Content
// =============================================================================

/// A post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment on a post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A like on a post
///
/// The pair (account_id, post_id) is unique: at most one like
/// per account per post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    pub id: String,
    pub account_id: String,
    pub post_id: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Notifications
// =============================================================================

/// Notification for user interactions
///
/// Records "actor did verb to target", addressed to a recipient.
/// The target is a soft reference: deleting the target row does not
/// cascade here, and rendering degrades to "no target".
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: String,
    pub recipient_id: String,
    pub actor_id: String,
    /// Action label, e.g. "liked", "commented on", "started following"
    pub verb: String,
    /// Target kind: "post" or "comment" (None for targetless actions)
    pub target_kind: Option<String>,
    pub target_id: Option<String>,
    /// Whether the recipient has seen this
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Kind tag for polymorphic notification targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Post,
    Comment,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "post" => Some(Self::Post),
            "comment" => Some(Self::Comment),
            _ => None,
        }
    }
}

/// Tagged reference to a notification target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    pub kind: TargetKind,
    pub id: String,
}

impl TargetRef {
    pub fn post(id: &str) -> Self {
        Self {
            kind: TargetKind::Post,
            id: id.to_string(),
        }
    }

    pub fn comment(id: &str) -> Self {
        Self {
            kind: TargetKind::Comment,
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Access tokens
// =============================================================================

/// Bearer access token
///
/// The `token` column holds a SHA-256 hash of the token value,
/// never the value itself.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessToken {
    pub id: String,
    pub account_id: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}
