//! Feed service
//!
//! Composes the home feed: posts authored by followed accounts,
//! newest-first, paginated.

use std::sync::Arc;

use serde::Deserialize;

use crate::data::{Account, Database, Post};
use crate::error::AppError;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Pagination request as it arrives from the caller
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageRequest {
    /// Resolve to effective (page, page_size)
    ///
    /// `page` below 1 is treated as 1. A missing or non-positive
    /// `page_size` falls back to the default; oversized values are
    /// clamped to the maximum.
    pub fn resolve(self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self
            .page_size
            .filter(|size| *size >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        (page, page_size)
    }
}

/// One page of results plus the pre-pagination total
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub items: Vec<T>,
}

/// Feed service
pub struct FeedService {
    db: Arc<Database>,
}

impl FeedService {
    /// Create new feed service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the home feed for `account`
    ///
    /// # Steps
    /// 1. Resolve the set of followed accounts
    /// 2. Select their posts, ordered by creation time descending
    ///    (ties broken by ID descending)
    /// 3. Slice out the requested page
    ///
    /// An account following nobody gets an empty feed with `total` 0.
    pub async fn feed(
        &self,
        account: &Account,
        request: PageRequest,
    ) -> Result<Page<Post>, AppError> {
        let (page, page_size) = request.resolve();

        let following = self.db.get_following(&account.id).await?;
        if following.is_empty() {
            return Ok(Page {
                total: 0,
                page,
                page_size,
                items: Vec::new(),
            });
        }

        let author_ids: Vec<String> = following.into_iter().map(|a| a.id).collect();
        let total = self.db.count_posts_by_authors(&author_ids).await?;
        let offset = (page - 1).saturating_mul(page_size);
        let items = self
            .db
            .get_posts_by_authors(&author_ids, page_size, offset)
            .await?;

        Ok(Page {
            total,
            page,
            page_size,
            items,
        })
    }
}
