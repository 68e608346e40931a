//! Comment service. Every operation is scoped to a parent post.

use std::sync::Arc;

use crate::domain::{Comment, NewComment, Post};
use crate::error::DomainError;
use crate::permissions::{Access, Caller, Policy};
use crate::ports::{CommentRepository, PostRepository};

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub const POLICY: Policy = Policy::AuthorOrReadOnly;

    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    /// Resolve the parent post from the URL.
    pub async fn parent(&self, post_id: i32) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    pub async fn list(&self, post_id: i32) -> Result<Vec<Comment>, DomainError> {
        let post = self.parent(post_id).await?;
        Ok(self.comments.list_for_post(post.id).await?)
    }

    pub async fn get(&self, post_id: i32, id: i32) -> Result<Comment, DomainError> {
        let post = self.parent(post_id).await?;
        self.comments
            .find_in_post(post.id, id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", id))
    }

    /// Load a comment the caller is about to modify.
    pub async fn get_for_write(
        &self,
        caller: &Caller,
        post_id: i32,
        id: i32,
    ) -> Result<Comment, DomainError> {
        let comment = self.get(post_id, id).await?;
        Self::POLICY.check_object(Access::Write, Some(caller), comment.author_id)?;
        Ok(comment)
    }

    /// Comment on `post_id` as the caller. Author and post come from the
    /// request context, never from the payload.
    pub async fn create(
        &self,
        caller: &Caller,
        post_id: i32,
        text: String,
    ) -> Result<Comment, DomainError> {
        let post = self.parent(post_id).await?;
        let comment = self
            .comments
            .create(NewComment::new(caller.user_id, post.id, text))
            .await?;
        tracing::info!(comment_id = comment.id, post_id = post.id, "Comment created");
        Ok(comment)
    }

    pub async fn update(
        &self,
        comment: &Comment,
        text: Option<String>,
    ) -> Result<Comment, DomainError> {
        match text {
            Some(text) => Ok(self.comments.update_text(comment.id, text).await?),
            None => Ok(comment.clone()),
        }
    }

    pub async fn delete(&self, comment: &Comment) -> Result<(), DomainError> {
        self.comments.delete(comment.id).await?;
        tracing::info!(comment_id = comment.id, "Comment deleted");
        Ok(())
    }
}
