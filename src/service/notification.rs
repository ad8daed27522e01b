//! Notification service
//!
//! The ledger of "actor did verb to target" records. Creation suppresses
//! self-actions; listing resolves the polymorphic target through an
//! explicit kind dispatch and degrades to no target when the referenced
//! row is gone.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::data::{Account, Database, EntityId, Notification, TargetKind, TargetRef};
use crate::error::AppError;

/// A notification prepared for rendering
#[derive(Debug, Clone)]
pub struct NotificationView {
    pub id: String,
    pub actor_id: String,
    pub actor_handle: Option<String>,
    pub verb: String,
    /// Display string of the target, or None if it was never set
    /// or no longer exists
    pub target: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification service
pub struct NotificationService {
    db: Arc<Database>,
}

impl NotificationService {
    /// Create new notification service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Record a notification
    ///
    /// An account is never notified of its own actions: when
    /// `recipient_id == actor_id` this is a silent no-op.
    pub async fn create(
        &self,
        recipient_id: &str,
        actor_id: &str,
        verb: &str,
        target: Option<TargetRef>,
    ) -> Result<(), AppError> {
        if recipient_id == actor_id {
            tracing::debug!(verb, "Skipping self-notification");
            return Ok(());
        }

        let notification = Notification {
            id: EntityId::new().0,
            recipient_id: recipient_id.to_string(),
            actor_id: actor_id.to_string(),
            verb: verb.to_string(),
            target_kind: target.as_ref().map(|t| t.kind.as_str().to_string()),
            target_id: target.map(|t| t.id),
            read: false,
            created_at: chrono::Utc::now(),
        };
        self.db.insert_notification(&notification).await
    }

    /// Mark one of the recipient's notifications as read
    ///
    /// Idempotent; the flag is only written on actual change.
    pub async fn mark_read(&self, recipient: &Account, id: &str) -> Result<bool, AppError> {
        self.db
            .get_notification(id, &recipient.id)
            .await?
            .ok_or(AppError::NotFound)?;
        self.db.mark_notification_read(id, &recipient.id).await
    }

    /// Mark one of the recipient's notifications as unread
    pub async fn mark_unread(&self, recipient: &Account, id: &str) -> Result<bool, AppError> {
        self.db
            .get_notification(id, &recipient.id)
            .await?
            .ok_or(AppError::NotFound)?;
        self.db.mark_notification_unread(id, &recipient.id).await
    }

    /// Mark all of the recipient's notifications as read
    ///
    /// # Returns
    /// Number of notifications that were unread.
    pub async fn mark_all_read(&self, recipient: &Account) -> Result<u64, AppError> {
        self.db.mark_all_notifications_read(&recipient.id).await
    }

    /// Count the recipient's unread notifications.
    pub async fn unread_count(&self, recipient: &Account) -> Result<u64, AppError> {
        let count = self.db.count_unread_notifications(&recipient.id).await?;
        Ok(count.max(0) as u64)
    }

    /// List the recipient's notifications, newest-first
    ///
    /// Target resolution failure never fails the listing.
    pub async fn list_for(
        &self,
        recipient: &Account,
        unread_only: bool,
    ) -> Result<Vec<NotificationView>, AppError> {
        let notifications = self.db.get_notifications(&recipient.id, unread_only).await?;

        let mut views = Vec::with_capacity(notifications.len());
        for notification in notifications {
            let actor_handle = self
                .db
                .get_account(&notification.actor_id)
                .await?
                .map(|a| a.handle);
            let target = self.resolve_target(&notification).await;
            views.push(NotificationView {
                id: notification.id,
                actor_id: notification.actor_id,
                actor_handle,
                verb: notification.verb,
                target,
                read: notification.read,
                created_at: notification.created_at,
            });
        }

        Ok(views)
    }

    /// Resolve a notification's target to its display string
    ///
    /// Stale references (deleted post/comment) and unknown kinds
    /// render as None.
    async fn resolve_target(&self, notification: &Notification) -> Option<String> {
        let kind = notification.target_kind.as_deref()?;
        let target_id = notification.target_id.as_deref()?;

        match TargetKind::parse(kind)? {
            TargetKind::Post => self
                .db
                .get_post(target_id)
                .await
                .ok()
                .flatten()
                .map(|post| post.title),
            TargetKind::Comment => self
                .db
                .get_comment(target_id)
                .await
                .ok()
                .flatten()
                .map(|comment| comment.body),
        }
    }
}
