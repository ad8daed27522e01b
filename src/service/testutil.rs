//! Shared helpers for service tests

use std::sync::Arc;

use tempfile::TempDir;

use crate::data::{Account, Database, Post};
use crate::service::{AccountService, PostService};

/// Fresh on-disk database in a TempDir
pub(crate) async fn test_db() -> (Arc<Database>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::connect(&db_path).await.unwrap();
    (Arc::new(db), temp_dir)
}

pub(crate) async fn seed_account(service: &AccountService, handle: &str) -> Account {
    let (account, _token) = service.register(handle, None).await.unwrap();
    account
}

pub(crate) async fn seed_post(service: &PostService, author: &Account, title: &str) -> Post {
    service
        .create_post(author, title, "Body text")
        .await
        .unwrap()
}
