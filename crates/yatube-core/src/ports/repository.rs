use async_trait::async_trait;

use crate::domain::{
    Comment, Follow, Group, NewComment, NewFollow, NewGroup, NewPost, NewUser, Post, PostChanges,
    User,
};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};

/// User accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Store a new user. Fails with [`RepoError::Constraint`] on a taken username.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
}

/// Groups, ordered by id.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Group>, RepoError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Group>, RepoError>;

    async fn create(&self, group: NewGroup) -> Result<Group, RepoError>;
}

/// Posts, ordered by id.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list(&self, page: PageRequest) -> Result<Page<Post>, RepoError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError>;

    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError>;

    /// Delete a post together with its comments.
    async fn delete(&self, id: i32) -> Result<(), RepoError>;
}

/// Comments, always addressed through their parent post.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError>;

    /// Find a comment only if it belongs to `post_id`.
    async fn find_in_post(&self, post_id: i32, id: i32) -> Result<Option<Comment>, RepoError>;

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    async fn update_text(&self, id: i32, text: String) -> Result<Comment, RepoError>;

    async fn delete(&self, id: i32) -> Result<(), RepoError>;
}

/// Follow edges.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Edges where `user_id` is the follower whose followee username
    /// contains every term, ignoring case.
    async fn list_for_user(&self, user_id: i32, terms: &[String])
    -> Result<Vec<Follow>, RepoError>;

    async fn exists(&self, user_id: i32, following_id: i32) -> Result<bool, RepoError>;

    /// Store an edge. Fails with [`RepoError::Constraint`] on a duplicate.
    async fn create(&self, follow: NewFollow) -> Result<Follow, RepoError>;
}
