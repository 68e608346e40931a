//! Post service.

use std::sync::Arc;

use crate::domain::{NewPost, Post, PostChanges, PostDraft};
use crate::error::DomainError;
use crate::pagination::{Page, PageRequest};
use crate::permissions::{Access, Caller, Policy};
use crate::ports::{GroupRepository, PostRepository};
use crate::validation::FieldErrors;

/// Posts: open reads, author-only writes.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl PostService {
    pub const POLICY: Policy = Policy::AuthorOrReadOnly;

    pub fn new(posts: Arc<dyn PostRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { posts, groups }
    }

    pub async fn list(&self, page: PageRequest) -> Result<Page<Post>, DomainError> {
        Ok(self.posts.list(page).await?)
    }

    pub async fn get(&self, id: i32) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    /// Load a post the caller is about to modify.
    pub async fn get_for_write(&self, caller: &Caller, id: i32) -> Result<Post, DomainError> {
        let post = self.get(id).await?;
        Self::POLICY.check_object(Access::Write, Some(caller), post.author_id)?;
        Ok(post)
    }

    /// Create a post authored by the caller.
    pub async fn create(&self, caller: &Caller, draft: PostDraft) -> Result<Post, DomainError> {
        self.ensure_group(draft.group_id).await?;

        let post = self.posts.create(NewPost::new(caller.user_id, draft)).await?;
        tracing::info!(post_id = post.id, author = %post.author, "Post created");
        Ok(post)
    }

    pub async fn update(&self, post: &Post, changes: PostChanges) -> Result<Post, DomainError> {
        if let Some(group_id) = changes.group_id {
            self.ensure_group(group_id).await?;
        }
        if changes.is_empty() {
            return Ok(post.clone());
        }

        let updated = self.posts.update(post.id, changes).await?;
        tracing::info!(post_id = updated.id, "Post updated");
        Ok(updated)
    }

    pub async fn delete(&self, post: &Post) -> Result<(), DomainError> {
        self.posts.delete(post.id).await?;
        tracing::info!(post_id = post.id, "Post deleted");
        Ok(())
    }

    async fn ensure_group(&self, group_id: Option<i32>) -> Result<(), DomainError> {
        let Some(group_id) = group_id else {
            return Ok(());
        };
        if self.groups.find_by_id(group_id).await?.is_none() {
            return Err(FieldErrors::single(
                "group",
                format!("Invalid pk \"{group_id}\" - object does not exist."),
            )
            .into());
        }
        Ok(())
    }
}
