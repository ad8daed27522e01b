//! Engagement service
//!
//! Coordinates like/unlike and follow/unfollow actions: mutates the
//! content store and user directory, and emits notification ledger
//! entries as a side effect. Duplicate engagement is idempotent, and
//! self-actions never notify.

use std::sync::Arc;

use crate::config::EngagementConfig;
use crate::data::{Account, Comment, Database, EntityId, Like, Post, TargetKind, TargetRef};
use crate::error::AppError;
use crate::service::{AccountService, NotificationService};

const VERB_LIKED: &str = "liked";
const VERB_COMMENTED: &str = "commented on";
const VERB_FOLLOWED: &str = "started following";

/// Outcome of a like request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// A new like was recorded
    Created,
    /// The pair was already liked; nothing changed
    AlreadyLiked,
}

/// Engagement service
pub struct EngagementService {
    db: Arc<Database>,
    accounts: AccountService,
    notifications: NotificationService,
    /// Whether unlike also retracts the matching "liked" notification
    retract_like_notifications: bool,
}

impl EngagementService {
    /// Create new engagement service
    pub fn new(db: Arc<Database>, config: &EngagementConfig) -> Self {
        Self {
            accounts: AccountService::new(db.clone()),
            notifications: NotificationService::new(db.clone()),
            db,
            retract_like_notifications: config.retract_like_notifications,
        }
    }

    // =========================================================================
    // Like / Unlike
    // =========================================================================

    /// Like a post
    ///
    /// Liking an already-liked post is a non-error no-op; the store's
    /// uniqueness constraint absorbs the duplicate (including the
    /// concurrent-request race). Only a first-time like notifies the
    /// post author, and self-likes never do.
    pub async fn like(&self, account: &Account, post_id: &str) -> Result<LikeOutcome, AppError> {
        let post = self.db.get_post(post_id).await?.ok_or(AppError::NotFound)?;

        let like = Like {
            id: EntityId::new().0,
            account_id: account.id.clone(),
            post_id: post.id.clone(),
            created_at: chrono::Utc::now(),
        };
        if !self.db.insert_like(&like).await? {
            return Ok(LikeOutcome::AlreadyLiked);
        }

        // Self-like suppression is the ledger's recipient == actor rule.
        self.notifications
            .create(
                &post.author_id,
                &account.id,
                VERB_LIKED,
                Some(TargetRef::post(&post.id)),
            )
            .await?;

        tracing::info!(post_id = %post.id, account = %account.handle, "Post liked");

        Ok(LikeOutcome::Created)
    }

    /// Unlike a post
    ///
    /// Fails with NotFound when no like exists for the pair. Depending
    /// on policy, also retracts the notification recorded for the like,
    /// matching it by the full (recipient, actor, verb, target) tuple.
    pub async fn unlike(&self, account: &Account, post_id: &str) -> Result<(), AppError> {
        let post = self.db.get_post(post_id).await?.ok_or(AppError::NotFound)?;

        if !self.db.delete_like(&account.id, &post.id).await? {
            return Err(AppError::NotFound);
        }

        if self.retract_like_notifications {
            let removed = self
                .db
                .delete_notifications_matching(
                    &post.author_id,
                    &account.id,
                    VERB_LIKED,
                    TargetKind::Post.as_str(),
                    &post.id,
                )
                .await?;
            if removed > 0 {
                tracing::debug!(post_id = %post.id, removed, "Retracted like notification");
            }
        }

        Ok(())
    }

    // =========================================================================
    // Follow / Unfollow
    // =========================================================================

    /// Follow another account
    ///
    /// Self-targeting is rejected before delegating to the directory.
    /// Only a newly created edge notifies the target; repeat follows
    /// are silent no-op successes.
    pub async fn follow_user(&self, account: &Account, target_id: &str) -> Result<(), AppError> {
        if account.id == target_id {
            return Err(AppError::Validation(
                "accounts cannot follow themselves".to_string(),
            ));
        }

        let created = self.accounts.follow(&account.id, target_id).await?;
        if created {
            self.notifications
                .create(target_id, &account.id, VERB_FOLLOWED, None)
                .await?;
            tracing::info!(target_id, account = %account.handle, "Follow created");
        }

        Ok(())
    }

    /// Unfollow another account
    ///
    /// Idempotent; unfollowing an account that was never followed
    /// succeeds without effect.
    pub async fn unfollow_user(&self, account: &Account, target_id: &str) -> Result<(), AppError> {
        if account.id == target_id {
            return Err(AppError::Validation(
                "accounts cannot unfollow themselves".to_string(),
            ));
        }

        self.accounts.unfollow(&account.id, target_id).await?;
        Ok(())
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Record the notification side effect of a new comment
    ///
    /// The post author is notified unless they wrote the comment.
    pub async fn comment_posted(
        &self,
        account: &Account,
        comment: &Comment,
        post: &Post,
    ) -> Result<(), AppError> {
        self.notifications
            .create(
                &post.author_id,
                &account.id,
                VERB_COMMENTED,
                Some(TargetRef::post(&post.id)),
            )
            .await?;

        tracing::debug!(comment_id = %comment.id, post_id = %post.id, "Comment recorded");
        Ok(())
    }
}
