use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity, with its author's username resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub group_id: Option<i32>,
    pub author_id: i32,
    pub author: String,
}

/// Client-controlled fields of a post being created.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub text: String,
    pub image: Option<String>,
    pub group_id: Option<i32>,
}

/// A post ready to be stored. Author and publication date are server-set.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub group_id: Option<i32>,
    pub author_id: i32,
}

impl NewPost {
    /// Create a post authored by `author_id`, published now.
    pub fn new(author_id: i32, draft: PostDraft) -> Self {
        Self {
            text: draft.text,
            pub_date: Utc::now(),
            image: draft.image,
            group_id: draft.group_id,
            author_id,
        }
    }
}

/// Partial update of a post. `None` leaves a field untouched; for the
/// nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub text: Option<String>,
    pub image: Option<Option<String>>,
    pub group_id: Option<Option<i32>>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.image.is_none() && self.group_id.is_none()
    }

    /// Apply the changes to an in-memory copy of a post.
    pub fn apply(self, post: &mut Post) {
        if let Some(text) = self.text {
            post.text = text;
        }
        if let Some(image) = self.image {
            post.image = image;
        }
        if let Some(group_id) = self.group_id {
            post.group_id = group_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post {
            id: 1,
            text: "original".to_string(),
            pub_date: Utc::now(),
            image: Some("posts/a.png".to_string()),
            group_id: Some(3),
            author_id: 7,
            author: "alice".to_string(),
        }
    }

    #[test]
    fn test_apply_leaves_unset_fields() {
        let mut post = sample();
        let pub_date = post.pub_date;

        PostChanges {
            text: Some("edited".to_string()),
            ..Default::default()
        }
        .apply(&mut post);

        assert_eq!(post.text, "edited");
        assert_eq!(post.image.as_deref(), Some("posts/a.png"));
        assert_eq!(post.group_id, Some(3));
        assert_eq!(post.pub_date, pub_date);
        assert_eq!(post.author, "alice");
    }

    #[test]
    fn test_apply_clears_nullable_fields() {
        let mut post = sample();

        PostChanges {
            image: Some(None),
            group_id: Some(None),
            ..Default::default()
        }
        .apply(&mut post);

        assert_eq!(post.text, "original");
        assert!(post.image.is_none());
        assert!(post.group_id.is_none());
    }

    #[test]
    fn test_is_empty() {
        assert!(PostChanges::default().is_empty());
        assert!(
            !PostChanges {
                group_id: Some(None),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
