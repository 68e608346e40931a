//! Group service.

use std::sync::Arc;

use crate::domain::Group;
use crate::error::DomainError;
use crate::permissions::Policy;
use crate::ports::GroupRepository;

/// Read-only access to groups.
#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub const POLICY: Policy = Policy::AuthenticatedOrReadOnly;

    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    pub async fn list(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.groups.list().await?)
    }

    pub async fn get(&self, id: i32) -> Result<Group, DomainError> {
        self.groups
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("group", id))
    }
}
