//! In-memory storage used when no database is configured, and in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use yatube_core::domain::{
    Comment, Follow, Group, NewComment, NewFollow, NewGroup, NewPost, NewUser, Post, PostChanges,
    User,
};
use yatube_core::error::RepoError;
use yatube_core::pagination::{Page, PageRequest};
use yatube_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

struct PostRow {
    text: String,
    pub_date: DateTime<Utc>,
    image: Option<String>,
    group_id: Option<i32>,
    author_id: i32,
}

struct CommentRow {
    text: String,
    post_id: i32,
    created: DateTime<Utc>,
    author_id: i32,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    groups: BTreeMap<i32, Group>,
    posts: BTreeMap<i32, PostRow>,
    comments: BTreeMap<i32, CommentRow>,
    follows: BTreeMap<i32, NewFollow>,
    last_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn username(&self, id: i32) -> Result<String, RepoError> {
        self.users
            .get(&id)
            .map(|u| u.username.clone())
            .ok_or_else(|| RepoError::Constraint(format!("user {id} does not exist")))
    }

    fn post(&self, id: i32) -> Result<Option<Post>, RepoError> {
        let Some(row) = self.posts.get(&id) else {
            return Ok(None);
        };
        Ok(Some(Post {
            id,
            text: row.text.clone(),
            pub_date: row.pub_date,
            image: row.image.clone(),
            group_id: row.group_id,
            author_id: row.author_id,
            author: self.username(row.author_id)?,
        }))
    }

    fn comment(&self, id: i32) -> Result<Option<Comment>, RepoError> {
        let Some(row) = self.comments.get(&id) else {
            return Ok(None);
        };
        Ok(Some(Comment {
            id,
            text: row.text.clone(),
            post_id: row.post_id,
            created: row.created,
            author_id: row.author_id,
            author: self.username(row.author_id)?,
        }))
    }

    fn follow(&self, id: i32, edge: NewFollow) -> Result<Follow, RepoError> {
        Ok(Follow {
            id,
            user_id: edge.user_id,
            user: self.username(edge.user_id)?,
            following_id: edge.following_id,
            following: self.username(edge.following_id)?,
        })
    }

    fn check_group(&self, group_id: Option<i32>) -> Result<(), RepoError> {
        match group_id {
            Some(id) if !self.groups.contains_key(&id) => Err(RepoError::Constraint(format!(
                "group {id} does not exist"
            ))),
            _ => Ok(()),
        }
    }
}

/// Storage backed by process memory. Ids come from one shared sequence,
/// so they are unique across tables and never reused.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == new.username) {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                new.username
            )));
        }

        let user = User {
            id: tables.next_id(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            date_joined: new.date_joined,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        Ok(self.tables.read().await.groups.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Group>, RepoError> {
        Ok(self.tables.read().await.groups.get(&id).cloned())
    }

    async fn create(&self, new: NewGroup) -> Result<Group, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.groups.values().any(|g| g.slug == new.slug) {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                new.slug
            )));
        }

        let group = Group {
            id: tables.next_id(),
            title: new.title,
            slug: new.slug,
            description: new.description,
        };
        tables.groups.insert(group.id, group.clone());
        Ok(group)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let tables = self.tables.read().await;
        let ids: Vec<i32> = tables
            .posts
            .keys()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .copied()
            .collect();

        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            items.extend(tables.post(id)?);
        }

        Ok(Page {
            count: tables.posts.len() as u64,
            items,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        self.tables.read().await.post(id)
    }

    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.username(new.author_id)?;
        tables.check_group(new.group_id)?;

        let id = tables.next_id();
        tables.posts.insert(
            id,
            PostRow {
                text: new.text,
                pub_date: new.pub_date,
                image: new.image,
                group_id: new.group_id,
                author_id: new.author_id,
            },
        );
        tables.post(id)?.ok_or(RepoError::NotFound)
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if let Some(group_id) = changes.group_id {
            tables.check_group(group_id)?;
        }

        let row = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        if let Some(text) = changes.text {
            row.text = text;
        }
        if let Some(image) = changes.image {
            row.image = image;
        }
        if let Some(group_id) = changes.group_id {
            row.group_id = group_id;
        }
        tables.post(id)?.ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments = Vec::new();
        for (&id, row) in &tables.comments {
            if row.post_id == post_id {
                comments.extend(tables.comment(id)?);
            }
        }
        Ok(comments)
    }

    async fn find_in_post(&self, post_id: i32, id: i32) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comment(id)?.filter(|c| c.post_id == post_id))
    }

    async fn create(&self, new: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        tables.username(new.author_id)?;
        if !tables.posts.contains_key(&new.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                new.post_id
            )));
        }

        let id = tables.next_id();
        tables.comments.insert(
            id,
            CommentRow {
                text: new.text,
                post_id: new.post_id,
                created: new.created,
                author_id: new.author_id,
            },
        );
        tables.comment(id)?.ok_or(RepoError::NotFound)
    }

    async fn update_text(&self, id: i32, text: String) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.get_mut(&id).ok_or(RepoError::NotFound)?.text = text;
        tables.comment(id)?.ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn list_for_user(
        &self,
        user_id: i32,
        terms: &[String],
    ) -> Result<Vec<Follow>, RepoError> {
        let tables = self.tables.read().await;
        let terms: Vec<String> = terms.iter().map(|t| t.to_lowercase()).collect();

        let mut follows = Vec::new();
        for (&id, &edge) in &tables.follows {
            if edge.user_id != user_id {
                continue;
            }
            let follow = tables.follow(id, edge)?;
            let followee = follow.following.to_lowercase();
            if terms.iter().all(|t| followee.contains(t.as_str())) {
                follows.push(follow);
            }
        }
        Ok(follows)
    }

    async fn exists(&self, user_id: i32, following_id: i32) -> Result<bool, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .follows
            .values()
            .any(|f| f.user_id == user_id && f.following_id == following_id))
    }

    async fn create(&self, new: NewFollow) -> Result<Follow, RepoError> {
        let mut tables = self.tables.write().await;
        if new.user_id == new.following_id {
            return Err(RepoError::Constraint("users cannot follow themselves".into()));
        }
        if tables
            .follows
            .values()
            .any(|f| f.user_id == new.user_id && f.following_id == new.following_id)
        {
            return Err(RepoError::Constraint("follow already exists".into()));
        }

        let id = tables.next_id();
        let follow = tables.follow(id, new)?;
        tables.follows.insert(id, new);
        Ok(follow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn user(store: &InMemoryStore, name: &str) -> User {
        UserRepository::create(
            store,
            NewUser::new(name.to_string(), String::new(), "hash".to_string()),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_constraint() {
        let store = InMemoryStore::new();
        user(&store, "alice").await;

        let result = UserRepository::create(
            &store,
            NewUser::new("alice".to_string(), String::new(), "hash".to_string()),
        )
        .await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_post_delete_cascades_comments() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let post = PostRepository::create(
            &store,
            NewPost::new(
                alice.id,
                yatube_core::domain::PostDraft {
                    text: "hello".to_string(),
                    ..Default::default()
                },
            ),
        )
        .await
        .unwrap();
        let comment = CommentRepository::create(
            &store,
            NewComment::new(alice.id, post.id, "first".to_string()),
        )
        .await
        .unwrap();

        PostRepository::delete(&store, post.id).await.unwrap();

        assert!(
            store
                .find_in_post(post.id, comment.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(matches!(
            PostRepository::delete(&store, post.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_posts_page_in_id_order() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        for n in 0..5 {
            PostRepository::create(
                &store,
                NewPost::new(
                    alice.id,
                    yatube_core::domain::PostDraft {
                        text: format!("post {n}"),
                        ..Default::default()
                    },
                ),
            )
            .await
            .unwrap();
        }

        let page = PostRepository::list(
            &store,
            PageRequest {
                limit: 2,
                offset: 3,
            },
        )
        .await
        .unwrap();

        assert_eq!(page.count, 5);
        let texts: Vec<_> = page.items.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, ["post 3", "post 4"]);
    }

    #[tokio::test]
    async fn test_comment_lookup_is_scoped_to_post() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let draft = || yatube_core::domain::PostDraft {
            text: "p".to_string(),
            ..Default::default()
        };
        let first = PostRepository::create(&store, NewPost::new(alice.id, draft()))
            .await
            .unwrap();
        let second = PostRepository::create(&store, NewPost::new(alice.id, draft()))
            .await
            .unwrap();
        let comment = CommentRepository::create(
            &store,
            NewComment::new(alice.id, first.id, "c".to_string()),
        )
        .await
        .unwrap();

        assert!(
            store
                .find_in_post(first.id, comment.id)
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .find_in_post(second.id, comment.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_follow_search_matches_all_terms() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "BobSmith").await;
        let carol = user(&store, "carol").await;
        for target in [&bob, &carol] {
            FollowRepository::create(
                &store,
                NewFollow {
                    user_id: alice.id,
                    following_id: target.id,
                },
            )
            .await
            .unwrap();
        }

        let all = store.list_for_user(alice.id, &[]).await.unwrap();
        assert_eq!(all.len(), 2);

        let terms = vec!["bob".to_string(), "SMITH".to_string()];
        let found = store.list_for_user(alice.id, &terms).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].following, "BobSmith");
        assert_eq!(found[0].user, "alice");

        assert!(store.list_for_user(bob.id, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_follow_pair_is_unique() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let edge = NewFollow {
            user_id: alice.id,
            following_id: bob.id,
        };

        FollowRepository::create(&store, edge).await.unwrap();
        assert!(store.exists(alice.id, bob.id).await.unwrap());
        assert!(!store.exists(bob.id, alice.id).await.unwrap());
        assert!(matches!(
            FollowRepository::create(&store, edge).await,
            Err(RepoError::Constraint(_))
        ));
    }
}
