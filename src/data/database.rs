//! SQLite database operations
//!
//! All database access goes through this module.
//! Uniqueness rules (one like per account/post pair, one follow edge per
//! direction) are enforced by the store, not by application-level locking:
//! idempotent inserts use INSERT OR IGNORE and report whether a row was
//! actually written.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite};
use std::path::Path;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

use super::models::*;
use crate::error::AppError;

const ACCESS_TOKEN_HASH_PREFIX: &str = "sha256:";

/// Hash an access token for storage.
///
/// Tokens are stored hashed so a leaked database does not leak
/// usable credentials.
pub fn hash_access_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{}{}", ACCESS_TOKEN_HASH_PREFIX, URL_SAFE_NO_PAD.encode(digest))
}

/// Database connection pool wrapper.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        // Foreign keys are off by default in SQLite; cascades depend on them.
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Migration failed: {}", e);
                AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
            })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Insert a new account
    ///
    /// # Returns
    /// `true` if inserted, `false` if the handle is already taken.
    pub async fn insert_account(&self, account: &Account) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO accounts (
                id, handle, bio, avatar_url, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.handle)
        .bind(&account.bio)
        .bind(&account.avatar_url)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get account by ID
    pub async fn get_account(&self, id: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Update account profile fields
    pub async fn update_account(&self, account: &Account) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE accounts SET bio = ?, avatar_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&account.bio)
        .bind(&account.avatar_url)
        .bind(account.updated_at)
        .bind(&account.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List all accounts, ordered by handle
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let accounts = sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY handle")
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }

    // =========================================================================
    // Follow edges
    // =========================================================================

    /// Insert a follow edge
    ///
    /// The (follower, followed) pair is unique; a concurrent duplicate
    /// insert is absorbed by the store rather than surfaced as an error.
    ///
    /// # Returns
    /// `true` if a new edge was created, `false` if it already existed.
    pub async fn insert_follow(&self, edge: &FollowEdge) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO follows (id, follower_id, followed_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&edge.id)
        .bind(&edge.follower_id)
        .bind(&edge.followed_id)
        .bind(edge.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a follow edge
    ///
    /// # Returns
    /// `true` if an edge was removed.
    pub async fn delete_follow(
        &self,
        follower_id: &str,
        followed_id: &str,
    ) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followed_id = ?")
                .bind(follower_id)
                .bind(followed_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a follow edge exists
    pub async fn is_following(
        &self,
        follower_id: &str,
        followed_id: &str,
    ) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ? AND followed_id = ?",
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Accounts the given account follows, ordered by handle
    pub async fn get_following(&self, account_id: &str) -> Result<Vec<Account>, AppError> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT a.* FROM accounts a
            JOIN follows f ON f.followed_id = a.id
            WHERE f.follower_id = ?
            ORDER BY a.handle
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    /// Accounts following the given account, ordered by handle
    pub async fn get_followers(&self, account_id: &str) -> Result<Vec<Account>, AppError> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT a.* FROM accounts a
            JOIN follows f ON f.follower_id = a.id
            WHERE f.followed_id = ?
            ORDER BY a.handle
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    /// Count accounts the given account follows.
    pub async fn count_following(&self, account_id: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ?",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count followers of the given account.
    pub async fn count_followers(&self, account_id: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM follows WHERE followed_id = ?",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Insert a new post
    pub async fn insert_post(&self, post: &Post) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, title, body, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.id)
        .bind(&post.author_id)
        .bind(&post.title)
        .bind(&post.body)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get post by ID
    pub async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    /// Update an existing post
    pub async fn update_post(&self, post: &Post) -> Result<(), AppError> {
        sqlx::query("UPDATE posts SET title = ?, body = ?, updated_at = ? WHERE id = ?")
            .bind(&post.title)
            .bind(&post.body)
            .bind(post.updated_at)
            .bind(&post.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a post (comments and likes cascade)
    pub async fn delete_post(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List posts newest-first (paginated)
    ///
    /// Ties on creation time are broken by ID descending so that
    /// pagination is deterministic.
    pub async fn list_posts(&self, limit: i64, offset: i64) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Count all posts.
    pub async fn count_posts(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Posts authored by any of the given accounts, newest-first (paginated)
    pub async fn get_posts_by_authors(
        &self,
        author_ids: &[String],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, AppError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder =
            QueryBuilder::<Sqlite>::new("SELECT * FROM posts WHERE author_id IN (");
        {
            let mut separated = query_builder.separated(", ");
            for author_id in author_ids {
                separated.push_bind(author_id);
            }
        }
        query_builder.push(") ORDER BY created_at DESC, id DESC LIMIT ");
        query_builder.push_bind(limit);
        query_builder.push(" OFFSET ");
        query_builder.push_bind(offset);

        let posts = query_builder
            .build_query_as::<Post>()
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    /// Count posts authored by any of the given accounts.
    pub async fn count_posts_by_authors(&self, author_ids: &[String]) -> Result<i64, AppError> {
        if author_ids.is_empty() {
            return Ok(0);
        }

        let mut query_builder =
            QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM posts WHERE author_id IN (");
        {
            let mut separated = query_builder.separated(", ");
            for author_id in author_ids {
                separated.push_bind(author_id);
            }
        }
        query_builder.push(")");

        let count = query_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Insert a new comment
    pub async fn insert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, body, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&comment.id)
        .bind(&comment.post_id)
        .bind(&comment.author_id)
        .bind(&comment.body)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get comment by ID
    pub async fn get_comment(&self, id: &str) -> Result<Option<Comment>, AppError> {
        let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(comment)
    }

    /// Update an existing comment
    pub async fn update_comment(&self, comment: &Comment) -> Result<(), AppError> {
        sqlx::query("UPDATE comments SET body = ?, updated_at = ? WHERE id = ?")
            .bind(&comment.body)
            .bind(comment.updated_at)
            .bind(&comment.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a comment
    pub async fn delete_comment(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List comments newest-first, optionally filtered by post
    pub async fn list_comments(&self, post_id: Option<&str>) -> Result<Vec<Comment>, AppError> {
        let comments = match post_id {
            Some(post_id) => {
                sqlx::query_as::<_, Comment>(
                    "SELECT * FROM comments WHERE post_id = ? ORDER BY created_at DESC, id DESC",
                )
                .bind(post_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Comment>(
                    "SELECT * FROM comments ORDER BY created_at DESC, id DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(comments)
    }

    // =========================================================================
    // Likes
    // =========================================================================

    /// Insert a like
    ///
    /// The (account, post) pair is unique. A duplicate insert, including
    /// one racing a concurrent request, is the idempotent "already liked"
    /// outcome, not an error.
    ///
    /// # Returns
    /// `true` if a new like was created, `false` if it already existed.
    pub async fn insert_like(&self, like: &Like) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO likes (id, account_id, post_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&like.id)
        .bind(&like.account_id)
        .bind(&like.post_id)
        .bind(like.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a like
    ///
    /// # Returns
    /// `true` if a like was removed.
    pub async fn delete_like(&self, account_id: &str, post_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM likes WHERE account_id = ? AND post_id = ?")
            .bind(account_id)
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether an account has liked a post
    pub async fn is_liked(&self, account_id: &str, post_id: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM likes WHERE account_id = ? AND post_id = ?",
        )
        .bind(account_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Count likes on a post.
    pub async fn count_likes(&self, post_id: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Insert notification
    pub async fn insert_notification(&self, notification: &Notification) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, recipient_id, actor_id, verb, target_kind, target_id, read, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&notification.id)
        .bind(&notification.recipient_id)
        .bind(&notification.actor_id)
        .bind(&notification.verb)
        .bind(&notification.target_kind)
        .bind(&notification.target_id)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a recipient's notifications, newest-first
    pub async fn get_notifications(
        &self,
        recipient_id: &str,
        unread_only: bool,
    ) -> Result<Vec<Notification>, AppError> {
        let notifications = if unread_only {
            sqlx::query_as::<_, Notification>(
                "SELECT * FROM notifications WHERE recipient_id = ? AND read = 0 ORDER BY created_at DESC, id DESC",
            )
            .bind(recipient_id)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Notification>(
                "SELECT * FROM notifications WHERE recipient_id = ? ORDER BY created_at DESC, id DESC",
            )
            .bind(recipient_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(notifications)
    }

    /// Get a single notification by ID, scoped to its recipient
    pub async fn get_notification(
        &self,
        id: &str,
        recipient_id: &str,
    ) -> Result<Option<Notification>, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE id = ? AND recipient_id = ?",
        )
        .bind(id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Mark a notification as read
    ///
    /// The write is guarded so an already-read notification is untouched.
    ///
    /// # Returns
    /// `true` if the flag actually changed.
    pub async fn mark_notification_read(
        &self,
        id: &str,
        recipient_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET read = 1 WHERE id = ? AND recipient_id = ? AND read = 0",
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark a notification as unread
    pub async fn mark_notification_unread(
        &self,
        id: &str,
        recipient_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET read = 0 WHERE id = ? AND recipient_id = ? AND read = 1",
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark all of a recipient's notifications as read
    ///
    /// A single bulk UPDATE; never a read-then-loop-write.
    ///
    /// # Returns
    /// Number of notifications that were unread.
    pub async fn mark_all_notifications_read(&self, recipient_id: &str) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE notifications SET read = 1 WHERE recipient_id = ? AND read = 0")
                .bind(recipient_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    /// Count a recipient's unread notifications.
    pub async fn count_unread_notifications(&self, recipient_id: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = ? AND read = 0",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Delete notifications matching an exact (recipient, actor, verb, target)
    /// tuple. Used to retract a "liked" notification on unlike.
    pub async fn delete_notifications_matching(
        &self,
        recipient_id: &str,
        actor_id: &str,
        verb: &str,
        target_kind: &str,
        target_id: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE recipient_id = ? AND actor_id = ? AND verb = ?
              AND target_kind = ? AND target_id = ?
            "#,
        )
        .bind(recipient_id)
        .bind(actor_id)
        .bind(verb)
        .bind(target_kind)
        .bind(target_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    // Access tokens
    // =========================================================================

    /// Insert an access token (pre-hashed)
    pub async fn insert_access_token(&self, token: &AccessToken) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO access_tokens (id, account_id, token, created_at, revoked) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&token.id)
        .bind(&token.account_id)
        .bind(&token.token)
        .bind(token.created_at)
        .bind(token.revoked)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Resolve a token hash to its account
    ///
    /// Revoked tokens do not resolve.
    pub async fn get_token_account(&self, token_hash: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT a.* FROM accounts a
            JOIN access_tokens t ON t.account_id = a.id
            WHERE t.token = ? AND t.revoked = 0
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Revoke an access token by its hash
    ///
    /// # Returns
    /// `true` if a live token was revoked.
    pub async fn revoke_access_token(&self, token_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE access_tokens SET revoked = 1 WHERE token = ? AND revoked = 0")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Test helpers
    // =========================================================================

    #[cfg(test)]
    pub async fn set_post_created_at_for_test(
        &self,
        post_id: &str,
        created_at: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE posts SET created_at = ? WHERE id = ?")
            .bind(created_at)
            .bind(post_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
