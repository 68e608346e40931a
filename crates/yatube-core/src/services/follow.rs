//! Follow service.

use std::sync::Arc;

use crate::domain::{Follow, NewFollow};
use crate::error::{DomainError, RepoError};
use crate::permissions::{Caller, Policy};
use crate::ports::{FollowRepository, UserRepository};
use crate::validation::FieldErrors;

pub const ALREADY_FOLLOWING: &str = "You are already following this user.";
pub const SELF_FOLLOW: &str = "You cannot follow yourself.";

/// Follow edges of the calling user.
#[derive(Clone)]
pub struct FollowService {
    follows: Arc<dyn FollowRepository>,
    users: Arc<dyn UserRepository>,
}

impl FollowService {
    pub const POLICY: Policy = Policy::Authenticated;

    pub fn new(follows: Arc<dyn FollowRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { follows, users }
    }

    /// Edges where the caller is the follower, filtered by `search`.
    pub async fn list(
        &self,
        caller: &Caller,
        search: Option<&str>,
    ) -> Result<Vec<Follow>, DomainError> {
        let terms = search_terms(search);
        Ok(self.follows.list_for_user(caller.user_id, &terms).await?)
    }

    /// Follow the user named `username`.
    pub async fn create(&self, caller: &Caller, username: &str) -> Result<Follow, DomainError> {
        let target = self.users.find_by_username(username).await?.ok_or_else(|| {
            FieldErrors::single(
                "following",
                format!("Object with username={username} does not exist."),
            )
        })?;

        if target.id == caller.user_id {
            return Err(FieldErrors::non_field(SELF_FOLLOW).into());
        }
        if self.follows.exists(caller.user_id, target.id).await? {
            return Err(FieldErrors::non_field(ALREADY_FOLLOWING).into());
        }

        let follow = self
            .follows
            .create(NewFollow {
                user_id: caller.user_id,
                following_id: target.id,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with an identical request.
                RepoError::Constraint(_) => FieldErrors::non_field(ALREADY_FOLLOWING).into(),
                other => DomainError::from(other),
            })?;

        tracing::info!(user = %follow.user, following = %follow.following, "Follow created");
        Ok(follow)
    }
}

/// Split a search string into terms on whitespace and commas.
pub fn search_terms(search: Option<&str>) -> Vec<String> {
    search
        .unwrap_or_default()
        .replace('\0', "")
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_terms() {
        assert!(search_terms(None).is_empty());
        assert!(search_terms(Some("  , ")).is_empty());
        assert_eq!(search_terms(Some("bob")), vec!["bob"]);
        assert_eq!(search_terms(Some("bo, ob  x")), vec!["bo", "ob", "x"]);
    }
}
