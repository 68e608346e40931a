use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity - always attached to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub post_id: i32,
    pub created: DateTime<Utc>,
    pub author_id: i32,
    pub author: String,
}

/// A comment ready to be stored.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub post_id: i32,
    pub created: DateTime<Utc>,
    pub author_id: i32,
}

impl NewComment {
    /// Create a comment on `post_id` by `author_id`, timestamped now.
    pub fn new(author_id: i32, post_id: i32, text: String) -> Self {
        Self {
            text,
            post_id,
            created: Utc::now(),
            author_id,
        }
    }
}
