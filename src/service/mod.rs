//! Service layer
//!
//! Business logic on top of the data layer.

mod account;
mod engagement;
mod feed;
mod notification;
mod post;

pub use account::AccountService;
pub use engagement::{EngagementService, LikeOutcome};
pub use feed::{FeedService, Page, PageRequest};
pub use notification::{NotificationService, NotificationView};
pub use post::PostService;

#[cfg(test)]
pub(crate) mod testutil;
