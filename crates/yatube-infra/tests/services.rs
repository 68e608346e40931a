//! Service integration tests over the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use yatube_core::domain::{NewGroup, PostChanges, PostDraft};
use yatube_core::pagination::PageRequest;
use yatube_core::ports::GroupRepository;
use yatube_core::services::{
    AccountService, CommentService, FollowService, GroupService, PostService, Registration,
};
use yatube_core::validation::NON_FIELD_ERRORS;
use yatube_core::{Caller, DomainError};
use yatube_infra::{Argon2PasswordService, InMemoryStore};

struct Fixture {
    store: Arc<InMemoryStore>,
    accounts: AccountService,
    groups: GroupService,
    posts: PostService,
    comments: CommentService,
    follows: FollowService,
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let passwords = Arc::new(Argon2PasswordService::with_params(8, 1, 1).unwrap());

    Fixture {
        accounts: AccountService::new(store.clone(), passwords),
        groups: GroupService::new(store.clone()),
        posts: PostService::new(store.clone(), store.clone()),
        comments: CommentService::new(store.clone(), store.clone()),
        follows: FollowService::new(store.clone(), store.clone()),
        store,
    }
}

async fn register(fx: &Fixture, username: &str) -> Caller {
    let user = fx
        .accounts
        .register(Registration {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "correct-horse-battery".to_string(),
        })
        .await
        .unwrap();
    Caller {
        user_id: user.id,
        username: user.username,
    }
}

fn draft(text: &str) -> PostDraft {
    PostDraft {
        text: text.to_string(),
        ..Default::default()
    }
}

fn field_error(err: &DomainError, field: &str) -> Vec<String> {
    match err {
        DomainError::Validation(errors) => errors.get(field).unwrap_or_default().to_vec(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_register_and_authenticate() {
    let fx = fixture();
    let alice = register(&fx, "alice").await;

    let user = fx
        .accounts
        .authenticate("alice", "correct-horse-battery")
        .await
        .unwrap();
    assert_eq!(user.id, alice.user_id);

    assert!(matches!(
        fx.accounts.authenticate("alice", "wrong-password").await,
        Err(DomainError::InvalidCredentials)
    ));
    assert!(matches!(
        fx.accounts.authenticate("nobody", "whatever-pass").await,
        Err(DomainError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_register_rejects_taken_username() {
    let fx = fixture();
    register(&fx, "alice").await;

    let err = fx
        .accounts
        .register(Registration {
            username: "alice".to_string(),
            email: String::new(),
            password: "another-good-pass".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        field_error(&err, "username"),
        ["A user with that username already exists."]
    );
}

#[tokio::test]
async fn test_post_lifecycle_with_author_rules() {
    let fx = fixture();
    let alice = register(&fx, "alice").await;
    let bob = register(&fx, "bob").await;

    let post = fx.posts.create(&alice, draft("hello")).await.unwrap();
    assert_eq!(post.author, "alice");
    assert!(post.group_id.is_none());

    assert!(matches!(
        fx.posts.get_for_write(&bob, post.id).await,
        Err(DomainError::PermissionDenied)
    ));

    let post = fx.posts.get_for_write(&alice, post.id).await.unwrap();
    let updated = fx
        .posts
        .update(
            &post,
            PostChanges {
                text: Some("edited".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.text, "edited");
    assert_eq!(updated.pub_date, post.pub_date);

    fx.posts.delete(&updated).await.unwrap();
    assert!(matches!(
        fx.posts.get(post.id).await,
        Err(DomainError::NotFound { entity_type: "post", .. })
    ));
}

#[tokio::test]
async fn test_post_group_must_exist() {
    let fx = fixture();
    let alice = register(&fx, "alice").await;

    let err = fx
        .posts
        .create(
            &alice,
            PostDraft {
                group_id: Some(999),
                ..draft("x")
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        field_error(&err, "group"),
        ["Invalid pk \"999\" - object does not exist."]
    );

    let group = fx
        .store
        .create(NewGroup {
            title: "Cats".to_string(),
            slug: "cats".to_string(),
            description: "All about cats".to_string(),
        })
        .await
        .unwrap();
    let post = fx
        .posts
        .create(
            &alice,
            PostDraft {
                group_id: Some(group.id),
                ..draft("x")
            },
        )
        .await
        .unwrap();
    assert_eq!(post.group_id, Some(group.id));

    let cleared = fx
        .posts
        .update(
            &post,
            PostChanges {
                group_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.group_id.is_none());

    assert_eq!(fx.groups.list().await.unwrap().len(), 1);
    assert_eq!(fx.groups.get(group.id).await.unwrap().slug, "cats");
}

#[tokio::test]
async fn test_post_list_is_paginated() {
    let fx = fixture();
    let alice = register(&fx, "alice").await;
    for n in 0..3 {
        fx.posts
            .create(&alice, draft(&format!("post {n}")))
            .await
            .unwrap();
    }

    let page = fx
        .posts
        .list(PageRequest {
            limit: 2,
            offset: 0,
        })
        .await
        .unwrap();
    assert_eq!(page.count, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].text, "post 0");
}

#[tokio::test]
async fn test_comments_are_scoped_to_their_post() {
    let fx = fixture();
    let alice = register(&fx, "alice").await;
    let bob = register(&fx, "bob").await;

    let first = fx.posts.create(&alice, draft("first")).await.unwrap();
    let second = fx.posts.create(&alice, draft("second")).await.unwrap();

    let comment = fx
        .comments
        .create(&bob, first.id, "nice".to_string())
        .await
        .unwrap();
    assert_eq!(comment.author, "bob");
    assert_eq!(comment.post_id, first.id);

    assert_eq!(fx.comments.list(first.id).await.unwrap().len(), 1);
    assert!(fx.comments.list(second.id).await.unwrap().is_empty());
    assert!(matches!(
        fx.comments.get(second.id, comment.id).await,
        Err(DomainError::NotFound { entity_type: "comment", .. })
    ));
    assert!(matches!(
        fx.comments.list(9999).await,
        Err(DomainError::NotFound { entity_type: "post", .. })
    ));

    assert!(matches!(
        fx.comments.get_for_write(&alice, first.id, comment.id).await,
        Err(DomainError::PermissionDenied)
    ));

    let comment = fx
        .comments
        .get_for_write(&bob, first.id, comment.id)
        .await
        .unwrap();
    let edited = fx
        .comments
        .update(&comment, Some("nicer".to_string()))
        .await
        .unwrap();
    assert_eq!(edited.text, "nicer");
    assert_eq!(edited.created, comment.created);

    fx.posts.delete(&first).await.unwrap();
    assert!(matches!(
        fx.comments.get(first.id, comment.id).await,
        Err(DomainError::NotFound { entity_type: "post", .. })
    ));
}

#[tokio::test]
async fn test_follow_rules() {
    let fx = fixture();
    let alice = register(&fx, "alice").await;
    register(&fx, "bob").await;

    let follow = fx.follows.create(&alice, "bob").await.unwrap();
    assert_eq!(follow.user, "alice");
    assert_eq!(follow.following, "bob");

    let duplicate = fx.follows.create(&alice, "bob").await.unwrap_err();
    assert_eq!(
        field_error(&duplicate, NON_FIELD_ERRORS),
        ["You are already following this user."]
    );

    let own = fx.follows.create(&alice, "alice").await.unwrap_err();
    assert_eq!(
        field_error(&own, NON_FIELD_ERRORS),
        ["You cannot follow yourself."]
    );

    let unknown = fx.follows.create(&alice, "ghost").await.unwrap_err();
    assert_eq!(
        field_error(&unknown, "following"),
        ["Object with username=ghost does not exist."]
    );

    assert_eq!(fx.follows.list(&alice, None).await.unwrap().len(), 1);
    assert_eq!(fx.follows.list(&alice, Some("BO")).await.unwrap().len(), 1);
    assert!(fx.follows.list(&alice, Some("carol")).await.unwrap().is_empty());
}
