//! Data Transfer Objects - request/response types for the API.
//!
//! Request types only carry client-writable fields; read-only fields
//! (`id`, `author`, `pub_date`, `post`, `created`, `user`) are dropped on
//! input because unknown keys are ignored. Every writable field is an
//! `Option` so that missing values surface as field errors instead of
//! parse failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Raw `limit`/`offset` query values; invalid values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i32,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub group: Option<i32>,
    /// Author's username.
    pub author: String,
}

/// Body of POST, PUT and PATCH on posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    pub text: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub group: Option<Option<i32>>,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i32,
    pub text: String,
    pub post: i32,
    pub created: DateTime<Utc>,
    pub author: String,
}

/// Body of POST, PUT and PATCH on comments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Follows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowResponse {
    /// Follower's username.
    pub user: String,
    /// Followee's username.
    pub following: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowRequest {
    pub following: Option<String>,
}

/// Query string of the follow list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowQuery {
    pub search: Option<String>,
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
}

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
}

/// Credentials exchanged for a token pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenObtainRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub refresh: String,
    pub access: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenRefreshRequest {
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenVerifyRequest {
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_request_distinguishes_null_from_absent() {
        let absent: PostRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(absent.text.as_deref(), Some("hi"));
        assert!(absent.group.is_none());
        assert!(absent.image.is_none());

        let cleared: PostRequest =
            serde_json::from_str(r#"{"group": null, "image": null}"#).unwrap();
        assert_eq!(cleared.group, Some(None));
        assert_eq!(cleared.image, Some(None));

        let set: PostRequest = serde_json::from_str(r#"{"group": 4}"#).unwrap();
        assert_eq!(set.group, Some(Some(4)));
    }

    #[test]
    fn test_read_only_fields_are_ignored() {
        let request: PostRequest = serde_json::from_str(
            r#"{"text": "hi", "author": "mallory", "pub_date": "2000-01-01T00:00:00Z", "id": 9}"#,
        )
        .unwrap();
        assert_eq!(request.text.as_deref(), Some("hi"));

        let comment: CommentRequest =
            serde_json::from_str(r#"{"text": "nice", "post": 42}"#).unwrap();
        assert_eq!(comment.text.as_deref(), Some("nice"));
    }

    #[test]
    fn test_register_request_validates_email() {
        let bad = RegisterUserRequest {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let good = RegisterUserRequest {
            email: Some("alice@example.com".to_string()),
            ..Default::default()
        };
        assert!(good.validate().is_ok());
    }
}
