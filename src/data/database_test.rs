//! Database tests

use super::*;
use chrono::Utc;
use tempfile::TempDir;

/// Helper to create a test database
async fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::connect(&db_path).await.unwrap();
    (db, temp_dir)
}

fn test_account(handle: &str) -> Account {
    Account {
        id: EntityId::new().0,
        handle: handle.to_string(),
        bio: None,
        avatar_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn test_post(author: &Account, title: &str) -> Post {
    Post {
        id: EntityId::new().0,
        author_id: author.id.clone(),
        title: title.to_string(),
        body: "Body text".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_database_connection() {
    let (_db, _temp_dir) = create_test_db().await;
    // Connection successful if we get here without panicking
}

#[tokio::test]
async fn test_account_insert_and_get() {
    let (db, _temp_dir) = create_test_db().await;

    let account = Account {
        id: EntityId::new().0,
        handle: "testuser".to_string(),
        bio: Some("Test bio".to_string()),
        avatar_url: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    // Insert account
    assert!(db.insert_account(&account).await.unwrap());

    let retrieved = db.get_account(&account.id).await.unwrap().unwrap();
    assert_eq!(retrieved.handle, "testuser");
    assert_eq!(retrieved.bio, Some("Test bio".to_string()));

    // Duplicate handle is rejected as a non-insert
    let duplicate = test_account("testuser");
    assert!(!db.insert_account(&duplicate).await.unwrap());
}

#[tokio::test]
async fn test_account_update() {
    let (db, _temp_dir) = create_test_db().await;

    let mut account = test_account("editme");
    db.insert_account(&account).await.unwrap();

    account.bio = Some("New bio".to_string());
    account.avatar_url = Some("https://example.com/a.png".to_string());
    account.updated_at = Utc::now();
    db.update_account(&account).await.unwrap();

    let retrieved = db.get_account(&account.id).await.unwrap().unwrap();
    assert_eq!(retrieved.bio, Some("New bio".to_string()));
    assert_eq!(
        retrieved.avatar_url,
        Some("https://example.com/a.png".to_string())
    );
}

#[tokio::test]
async fn test_follow_edge_operations() {
    let (db, _temp_dir) = create_test_db().await;

    let alice = test_account("alice");
    let bob = test_account("bob");
    let carol = test_account("carol");
    for account in [&alice, &bob, &carol] {
        db.insert_account(account).await.unwrap();
    }

    let edge = FollowEdge {
        id: EntityId::new().0,
        follower_id: alice.id.clone(),
        followed_id: bob.id.clone(),
        created_at: Utc::now(),
    };
    assert!(db.insert_follow(&edge).await.unwrap());
    assert!(db.is_following(&alice.id, &bob.id).await.unwrap());
    assert!(!db.is_following(&bob.id, &alice.id).await.unwrap());

    // Duplicate edge is absorbed, not an error
    let duplicate = FollowEdge {
        id: EntityId::new().0,
        follower_id: alice.id.clone(),
        followed_id: bob.id.clone(),
        created_at: Utc::now(),
    };
    assert!(!db.insert_follow(&duplicate).await.unwrap());

    let edge2 = FollowEdge {
        id: EntityId::new().0,
        follower_id: carol.id.clone(),
        followed_id: bob.id.clone(),
        created_at: Utc::now(),
    };
    db.insert_follow(&edge2).await.unwrap();

    // Following / followers are the two directions of the edge set
    let following = db.get_following(&alice.id).await.unwrap();
    assert_eq!(following.len(), 1);
    assert_eq!(following[0].handle, "bob");

    let followers = db.get_followers(&bob.id).await.unwrap();
    let handles: Vec<_> = followers.iter().map(|a| a.handle.as_str()).collect();
    assert_eq!(handles, vec!["alice", "carol"]);

    assert_eq!(db.count_following(&alice.id).await.unwrap(), 1);
    assert_eq!(db.count_followers(&bob.id).await.unwrap(), 2);

    // Delete is idempotent
    assert!(db.delete_follow(&alice.id, &bob.id).await.unwrap());
    assert!(!db.delete_follow(&alice.id, &bob.id).await.unwrap());
    assert!(!db.is_following(&alice.id, &bob.id).await.unwrap());
}

#[tokio::test]
async fn test_post_crud() {
    let (db, _temp_dir) = create_test_db().await;

    let author = test_account("author");
    db.insert_account(&author).await.unwrap();

    let mut post = test_post(&author, "Hello");
    db.insert_post(&post).await.unwrap();

    let retrieved = db.get_post(&post.id).await.unwrap().unwrap();
    assert_eq!(retrieved.title, "Hello");

    post.title = "Hello, edited".to_string();
    post.updated_at = Utc::now();
    db.update_post(&post).await.unwrap();
    let retrieved = db.get_post(&post.id).await.unwrap().unwrap();
    assert_eq!(retrieved.title, "Hello, edited");

    let posts = db.list_posts(10, 0).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(db.count_posts().await.unwrap(), 1);

    db.delete_post(&post.id).await.unwrap();
    assert!(db.get_post(&post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_comment_crud() {
    let (db, _temp_dir) = create_test_db().await;

    let author = test_account("commenter");
    db.insert_account(&author).await.unwrap();
    let post = test_post(&author, "Commented");
    db.insert_post(&post).await.unwrap();
    let other_post = test_post(&author, "Quiet");
    db.insert_post(&other_post).await.unwrap();

    let mut comment = Comment {
        id: EntityId::new().0,
        post_id: post.id.clone(),
        author_id: author.id.clone(),
        body: "Nice post".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    db.insert_comment(&comment).await.unwrap();

    let retrieved = db.get_comment(&comment.id).await.unwrap().unwrap();
    assert_eq!(retrieved.body, "Nice post");

    comment.body = "Nice post indeed".to_string();
    db.update_comment(&comment).await.unwrap();
    let retrieved = db.get_comment(&comment.id).await.unwrap().unwrap();
    assert_eq!(retrieved.body, "Nice post indeed");

    // Filtering by post
    assert_eq!(db.list_comments(Some(&post.id)).await.unwrap().len(), 1);
    assert_eq!(
        db.list_comments(Some(&other_post.id)).await.unwrap().len(),
        0
    );
    assert_eq!(db.list_comments(None).await.unwrap().len(), 1);

    db.delete_comment(&comment.id).await.unwrap();
    assert!(db.get_comment(&comment.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_like_uniqueness() {
    let (db, _temp_dir) = create_test_db().await;

    let liker = test_account("liker");
    let author = test_account("liked");
    db.insert_account(&liker).await.unwrap();
    db.insert_account(&author).await.unwrap();
    let post = test_post(&author, "Likeable");
    db.insert_post(&post).await.unwrap();

    let like = Like {
        id: EntityId::new().0,
        account_id: liker.id.clone(),
        post_id: post.id.clone(),
        created_at: Utc::now(),
    };
    assert!(db.insert_like(&like).await.unwrap());
    assert!(db.is_liked(&liker.id, &post.id).await.unwrap());

    // Second insert for the same pair is absorbed
    let duplicate = Like {
        id: EntityId::new().0,
        account_id: liker.id.clone(),
        post_id: post.id.clone(),
        created_at: Utc::now(),
    };
    assert!(!db.insert_like(&duplicate).await.unwrap());
    assert_eq!(db.count_likes(&post.id).await.unwrap(), 1);

    assert!(db.delete_like(&liker.id, &post.id).await.unwrap());
    assert!(!db.delete_like(&liker.id, &post.id).await.unwrap());
    assert_eq!(db.count_likes(&post.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_notification_operations() {
    let (db, _temp_dir) = create_test_db().await;

    let recipient = test_account("recipient");
    let actor = test_account("actor");
    db.insert_account(&recipient).await.unwrap();
    db.insert_account(&actor).await.unwrap();

    let notification = Notification {
        id: EntityId::new().0,
        recipient_id: recipient.id.clone(),
        actor_id: actor.id.clone(),
        verb: "liked".to_string(),
        target_kind: Some("post".to_string()),
        target_id: Some("some-post".to_string()),
        read: false,
        created_at: Utc::now(),
    };
    db.insert_notification(&notification).await.unwrap();

    // Unread filter
    let unread = db.get_notifications(&recipient.id, true).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].verb, "liked");

    // Notifications are scoped to their recipient
    assert!(db
        .get_notification(&notification.id, &actor.id)
        .await
        .unwrap()
        .is_none());

    // Mark read reports an actual change exactly once
    assert!(db
        .mark_notification_read(&notification.id, &recipient.id)
        .await
        .unwrap());
    assert!(!db
        .mark_notification_read(&notification.id, &recipient.id)
        .await
        .unwrap());
    assert_eq!(db.get_notifications(&recipient.id, true).await.unwrap().len(), 0);

    // And back to unread
    assert!(db
        .mark_notification_unread(&notification.id, &recipient.id)
        .await
        .unwrap());
    assert_eq!(db.count_unread_notifications(&recipient.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_mark_all_notifications_read_counts() {
    let (db, _temp_dir) = create_test_db().await;

    let recipient = test_account("busy");
    let actor = test_account("noisy");
    db.insert_account(&recipient).await.unwrap();
    db.insert_account(&actor).await.unwrap();

    for verb in ["liked", "commented on", "started following"] {
        let notification = Notification {
            id: EntityId::new().0,
            recipient_id: recipient.id.clone(),
            actor_id: actor.id.clone(),
            verb: verb.to_string(),
            target_kind: None,
            target_id: None,
            read: false,
            created_at: Utc::now(),
        };
        db.insert_notification(&notification).await.unwrap();
    }

    assert_eq!(db.mark_all_notifications_read(&recipient.id).await.unwrap(), 3);
    assert_eq!(db.count_unread_notifications(&recipient.id).await.unwrap(), 0);
    // Second pass has nothing left to flip
    assert_eq!(db.mark_all_notifications_read(&recipient.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_notifications_matching() {
    let (db, _temp_dir) = create_test_db().await;

    let recipient = test_account("r");
    let actor = test_account("a");
    db.insert_account(&recipient).await.unwrap();
    db.insert_account(&actor).await.unwrap();

    let matching = Notification {
        id: EntityId::new().0,
        recipient_id: recipient.id.clone(),
        actor_id: actor.id.clone(),
        verb: "liked".to_string(),
        target_kind: Some("post".to_string()),
        target_id: Some("p1".to_string()),
        read: false,
        created_at: Utc::now(),
    };
    let other_verb = Notification {
        id: EntityId::new().0,
        verb: "commented on".to_string(),
        ..matching.clone()
    };
    db.insert_notification(&matching).await.unwrap();
    db.insert_notification(&other_verb).await.unwrap();

    let removed = db
        .delete_notifications_matching(&recipient.id, &actor.id, "liked", "post", "p1")
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let remaining = db.get_notifications(&recipient.id, false).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].verb, "commented on");
}

#[tokio::test]
async fn test_access_token_roundtrip() {
    let (db, _temp_dir) = create_test_db().await;

    let account = test_account("tokenuser");
    db.insert_account(&account).await.unwrap();

    let token_value = "opaque-token-value";
    let token = AccessToken {
        id: EntityId::new().0,
        account_id: account.id.clone(),
        token: hash_access_token(token_value),
        created_at: Utc::now(),
        revoked: false,
    };
    db.insert_access_token(&token).await.unwrap();

    // Raw value never resolves, only the hash does
    assert!(db.get_token_account(token_value).await.unwrap().is_none());
    let resolved = db
        .get_token_account(&hash_access_token(token_value))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.handle, "tokenuser");

    assert!(db
        .revoke_access_token(&hash_access_token(token_value))
        .await
        .unwrap());
    assert!(db
        .get_token_account(&hash_access_token(token_value))
        .await
        .unwrap()
        .is_none());
    // Revoking twice is a no-op
    assert!(!db
        .revoke_access_token(&hash_access_token(token_value))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_post_delete_cascades_but_notifications_stay() {
    let (db, _temp_dir) = create_test_db().await;

    let author = test_account("cascade_author");
    let fan = test_account("cascade_fan");
    db.insert_account(&author).await.unwrap();
    db.insert_account(&fan).await.unwrap();

    let post = test_post(&author, "Ephemeral");
    db.insert_post(&post).await.unwrap();

    let comment = Comment {
        id: EntityId::new().0,
        post_id: post.id.clone(),
        author_id: fan.id.clone(),
        body: "Here today".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    db.insert_comment(&comment).await.unwrap();

    let like = Like {
        id: EntityId::new().0,
        account_id: fan.id.clone(),
        post_id: post.id.clone(),
        created_at: Utc::now(),
    };
    db.insert_like(&like).await.unwrap();

    let notification = Notification {
        id: EntityId::new().0,
        recipient_id: author.id.clone(),
        actor_id: fan.id.clone(),
        verb: "liked".to_string(),
        target_kind: Some("post".to_string()),
        target_id: Some(post.id.clone()),
        read: false,
        created_at: Utc::now(),
    };
    db.insert_notification(&notification).await.unwrap();

    db.delete_post(&post.id).await.unwrap();

    // Comments and likes cascade with the post
    assert!(db.get_comment(&comment.id).await.unwrap().is_none());
    assert!(!db.is_liked(&fan.id, &post.id).await.unwrap());

    // The notification keeps its stale target reference
    let kept = db
        .get_notification(&notification.id, &author.id)
        .await
        .unwrap();
    assert!(kept.is_some());
    assert_eq!(kept.unwrap().target_id, Some(post.id.clone()));
}

#[tokio::test]
async fn test_posts_by_authors_order_and_pagination() {
    let (db, _temp_dir) = create_test_db().await;

    let bob = test_account("bob");
    let eve = test_account("eve");
    db.insert_account(&bob).await.unwrap();
    db.insert_account(&eve).await.unwrap();

    for (title, author, stamp) in [
        ("oldest", &bob, "2024-01-01 00:00:01+00:00"),
        ("middle", &bob, "2024-01-01 00:00:02+00:00"),
        ("newest", &eve, "2024-01-01 00:00:03+00:00"),
    ] {
        let post = test_post(author, title);
        db.insert_post(&post).await.unwrap();
        db.set_post_created_at_for_test(&post.id, stamp).await.unwrap();
    }

    let authors = vec![bob.id.clone(), eve.id.clone()];
    let all = db.get_posts_by_authors(&authors, 10, 0).await.unwrap();
    let titles: Vec<_> = all.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["newest", "middle", "oldest"]);
    assert_eq!(db.count_posts_by_authors(&authors).await.unwrap(), 3);

    // Second page of size one
    let page = db.get_posts_by_authors(&authors, 1, 1).await.unwrap();
    assert_eq!(page[0].title, "middle");

    // Only bob's posts
    let bob_only = vec![bob.id.clone()];
    assert_eq!(db.count_posts_by_authors(&bob_only).await.unwrap(), 2);

    // Nobody followed
    assert_eq!(db.get_posts_by_authors(&[], 10, 0).await.unwrap().len(), 0);
    assert_eq!(db.count_posts_by_authors(&[]).await.unwrap(), 0);
}
