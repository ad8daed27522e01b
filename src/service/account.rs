//! Account service
//!
//! Handles registration, profiles, and the directed follow relation.

use std::sync::Arc;

use crate::auth::generate_token;
use crate::data::{AccessToken, Account, Database, EntityId, FollowEdge, hash_access_token};
use crate::error::AppError;

const MAX_HANDLE_LENGTH: usize = 30;
const MAX_BIO_LENGTH: usize = 500;

fn validate_handle(handle: &str) -> Result<&str, AppError> {
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(AppError::Validation("handle is required".to_string()));
    }
    if handle.len() > MAX_HANDLE_LENGTH {
        return Err(AppError::Validation(format!(
            "handle must be at most {} characters",
            MAX_HANDLE_LENGTH
        )));
    }
    if !handle
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::Validation(
            "handle may only contain letters, digits, '_' and '-'".to_string(),
        ));
    }
    Ok(handle)
}

/// Account service
pub struct AccountService {
    db: Arc<Database>,
}

impl AccountService {
    /// Create new account service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    // =========================================================================
    // Registration and profiles
    // =========================================================================

    /// Register a new account
    ///
    /// # Returns
    /// The created account plus its first access token (raw value,
    /// returned to the caller exactly once).
    pub async fn register(
        &self,
        handle: &str,
        bio: Option<String>,
    ) -> Result<(Account, String), AppError> {
        let handle = validate_handle(handle)?;
        if let Some(bio) = &bio {
            if bio.len() > MAX_BIO_LENGTH {
                return Err(AppError::Validation(format!(
                    "bio must be at most {} characters",
                    MAX_BIO_LENGTH
                )));
            }
        }

        let account = Account {
            id: EntityId::new().0,
            handle: handle.to_string(),
            bio,
            avatar_url: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        if !self.db.insert_account(&account).await? {
            return Err(AppError::Validation(format!(
                "handle '{}' is already taken",
                handle
            )));
        }

        let token = self.issue_token(&account.id).await?;

        tracing::info!(handle = %account.handle, "Account registered");

        Ok((account, token))
    }

    /// Get account by ID
    pub async fn get(&self, id: &str) -> Result<Account, AppError> {
        self.db.get_account(id).await?.ok_or(AppError::NotFound)
    }

    /// Update the caller's own profile (partial)
    pub async fn update_profile(
        &self,
        account: &Account,
        bio: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<Account, AppError> {
        if let Some(bio) = &bio {
            if bio.len() > MAX_BIO_LENGTH {
                return Err(AppError::Validation(format!(
                    "bio must be at most {} characters",
                    MAX_BIO_LENGTH
                )));
            }
        }

        let mut updated = account.clone();
        if bio.is_some() {
            updated.bio = bio;
        }
        if avatar_url.is_some() {
            updated.avatar_url = avatar_url;
        }
        updated.updated_at = chrono::Utc::now();

        self.db.update_account(&updated).await?;
        Ok(updated)
    }

    /// List all accounts
    pub async fn list(&self) -> Result<Vec<Account>, AppError> {
        self.db.list_accounts().await
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Mint a new access token for an account
    pub async fn issue_token(&self, account_id: &str) -> Result<String, AppError> {
        let token = generate_token();
        let record = AccessToken {
            id: EntityId::new().0,
            account_id: account_id.to_string(),
            token: hash_access_token(&token),
            created_at: chrono::Utc::now(),
            revoked: false,
        };
        self.db.insert_access_token(&record).await?;
        Ok(token)
    }

    /// Revoke an access token by raw value
    ///
    /// # Returns
    /// `true` if a live token was revoked.
    pub async fn revoke_token(&self, token: &str) -> Result<bool, AppError> {
        self.db.revoke_access_token(&hash_access_token(token)).await
    }

    // =========================================================================
    // Follow relation
    // =========================================================================

    /// Add a follow edge from `actor_id` to `target_id`
    ///
    /// Following an already-followed account is a no-op success.
    ///
    /// # Returns
    /// `true` if a new edge was created.
    pub async fn follow(&self, actor_id: &str, target_id: &str) -> Result<bool, AppError> {
        if actor_id == target_id {
            return Err(AppError::Validation(
                "accounts cannot follow themselves".to_string(),
            ));
        }

        // Target must exist; the edge table would otherwise accept any ID
        // until the foreign key fires with a less useful error.
        if self.db.get_account(target_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let edge = FollowEdge {
            id: EntityId::new().0,
            follower_id: actor_id.to_string(),
            followed_id: target_id.to_string(),
            created_at: chrono::Utc::now(),
        };
        self.db.insert_follow(&edge).await
    }

    /// Remove the follow edge from `actor_id` to `target_id`
    ///
    /// Unfollowing an account that was never followed is a no-op success.
    ///
    /// # Returns
    /// `true` if an edge was removed.
    pub async fn unfollow(&self, actor_id: &str, target_id: &str) -> Result<bool, AppError> {
        self.db.delete_follow(actor_id, target_id).await
    }

    /// Check whether `actor_id` follows `target_id`
    pub async fn is_following(&self, actor_id: &str, target_id: &str) -> Result<bool, AppError> {
        self.db.is_following(actor_id, target_id).await
    }

    /// Accounts `account_id` follows
    pub async fn list_following(&self, account_id: &str) -> Result<Vec<Account>, AppError> {
        self.db.get_following(account_id).await
    }

    /// Accounts following `account_id`
    pub async fn list_followers(&self, account_id: &str) -> Result<Vec<Account>, AppError> {
        self.db.get_followers(account_id).await
    }

    /// Follower/following counts for profile rendering.
    pub async fn relation_counts(&self, account_id: &str) -> Result<(i64, i64), AppError> {
        let followers = self.db.count_followers(account_id).await?;
        let following = self.db.count_following(account_id).await?;
        Ok((followers, following))
    }
}
