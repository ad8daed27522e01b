//! Post service
//!
//! Post and comment CRUD. Mutations are owner-only; reads are open.

use std::sync::Arc;

use crate::data::{Account, Comment, Database, EntityId, Post};
use crate::error::AppError;
use crate::service::{Page, PageRequest};

const MAX_TITLE_LENGTH: usize = 200;

fn validate_title(title: &str) -> Result<&str, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(AppError::Validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }
    Ok(title)
}

fn validate_body(body: &str) -> Result<&str, AppError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(AppError::Validation("body is required".to_string()));
    }
    Ok(body)
}

/// Post service
pub struct PostService {
    db: Arc<Database>,
}

impl PostService {
    /// Create new post service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Create a new post authored by `author`
    pub async fn create_post(
        &self,
        author: &Account,
        title: &str,
        body: &str,
    ) -> Result<Post, AppError> {
        let title = validate_title(title)?;
        let body = validate_body(body)?;

        let post = Post {
            id: EntityId::new().0,
            author_id: author.id.clone(),
            title: title.to_string(),
            body: body.to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        self.db.insert_post(&post).await?;

        tracing::info!(post_id = %post.id, author = %author.handle, "Post created");

        Ok(post)
    }

    /// Get post by ID
    pub async fn get_post(&self, id: &str) -> Result<Post, AppError> {
        self.db.get_post(id).await?.ok_or(AppError::NotFound)
    }

    /// Update a post; only its author may do so
    pub async fn update_post(
        &self,
        requester: &Account,
        id: &str,
        title: &str,
        body: &str,
    ) -> Result<Post, AppError> {
        let mut post = self.get_post(id).await?;
        if post.author_id != requester.id {
            return Err(AppError::Forbidden);
        }

        post.title = validate_title(title)?.to_string();
        post.body = validate_body(body)?.to_string();
        post.updated_at = chrono::Utc::now();
        self.db.update_post(&post).await?;

        Ok(post)
    }

    /// Delete a post; only its author may do so
    pub async fn delete_post(&self, requester: &Account, id: &str) -> Result<(), AppError> {
        let post = self.get_post(id).await?;
        if post.author_id != requester.id {
            return Err(AppError::Forbidden);
        }
        self.db.delete_post(id).await
    }

    /// List posts newest-first (paginated)
    pub async fn list_posts(&self, request: PageRequest) -> Result<Page<Post>, AppError> {
        let (page, page_size) = request.resolve();
        let total = self.db.count_posts().await?;
        let offset = (page - 1).saturating_mul(page_size);
        let items = self.db.list_posts(page_size, offset).await?;

        Ok(Page {
            total,
            page,
            page_size,
            items,
        })
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Create a comment on a post
    pub async fn create_comment(
        &self,
        author: &Account,
        post_id: &str,
        body: &str,
    ) -> Result<Comment, AppError> {
        let body = validate_body(body)?;

        // Parent post must exist
        let post = self.get_post(post_id).await?;

        let comment = Comment {
            id: EntityId::new().0,
            post_id: post.id,
            author_id: author.id.clone(),
            body: body.to_string(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        self.db.insert_comment(&comment).await?;

        Ok(comment)
    }

    /// Get comment by ID
    pub async fn get_comment(&self, id: &str) -> Result<Comment, AppError> {
        self.db.get_comment(id).await?.ok_or(AppError::NotFound)
    }

    /// Update a comment; only its author may do so
    pub async fn update_comment(
        &self,
        requester: &Account,
        id: &str,
        body: &str,
    ) -> Result<Comment, AppError> {
        let mut comment = self.get_comment(id).await?;
        if comment.author_id != requester.id {
            return Err(AppError::Forbidden);
        }

        comment.body = validate_body(body)?.to_string();
        comment.updated_at = chrono::Utc::now();
        self.db.update_comment(&comment).await?;

        Ok(comment)
    }

    /// Delete a comment; only its author may do so
    pub async fn delete_comment(&self, requester: &Account, id: &str) -> Result<(), AppError> {
        let comment = self.get_comment(id).await?;
        if comment.author_id != requester.id {
            return Err(AppError::Forbidden);
        }
        self.db.delete_comment(id).await
    }

    /// List comments newest-first, optionally scoped to one post
    pub async fn list_comments(&self, post_id: Option<&str>) -> Result<Vec<Comment>, AppError> {
        self.db.list_comments(post_id).await
    }
}
