//! Mapping between domain entities and wire DTOs.
//!
//! Inbound payloads are parsed here instead of through `web::Json` so that
//! authorization and object lookup run before the body is looked at.

use serde::de::DeserializeOwned;
use validator::Validate;

use yatube_core::domain::{Comment, Follow, Group, Post, PostChanges, PostDraft, User};
use yatube_core::services::Registration;
use yatube_core::validation::{BLANK, FieldErrors, REQUIRED, optional_text, required_text};
use yatube_shared::dto::{
    CommentRequest, CommentResponse, FollowRequest, FollowResponse, GroupResponse, PostRequest,
    PostResponse, RegisterUserRequest, TokenObtainRequest, UserResponse,
};

use crate::middleware::error::AppError;

const IMAGE_MAX_LEN: usize = 255;

/// Parse a JSON body. An empty body reads as an empty object.
pub fn parse<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("JSON parse error - {e}")))
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

pub fn group_response(group: Group) -> GroupResponse {
    GroupResponse {
        id: group.id,
        title: group.title,
        slug: group.slug,
        description: group.description,
    }
}

pub fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        text: post.text,
        pub_date: post.pub_date,
        image: post.image,
        group: post.group_id,
        author: post.author,
    }
}

pub fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        text: comment.text,
        post: comment.post_id,
        created: comment.created,
        author: comment.author,
    }
}

pub fn follow_response(follow: Follow) -> FollowResponse {
    FollowResponse {
        user: follow.user,
        following: follow.following,
    }
}

pub fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
    }
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Nullable image path; blank strings clear it.
fn image(errors: &mut FieldErrors, value: Option<String>) -> Option<String> {
    let value = value?.trim().to_string();
    if value.is_empty() {
        return None;
    }
    if value.chars().count() > IMAGE_MAX_LEN {
        errors.add(
            "image",
            format!("Ensure this field has no more than {IMAGE_MAX_LEN} characters."),
        );
        return None;
    }
    Some(value)
}

pub fn post_draft(request: PostRequest) -> Result<PostDraft, FieldErrors> {
    let mut errors = FieldErrors::new();
    let text = required_text(&mut errors, "text", request.text);
    let image = image(&mut errors, request.image.flatten());
    errors.into_result()?;

    Ok(PostDraft {
        text: text.unwrap_or_default(),
        image,
        group_id: request.group.flatten(),
    })
}

/// Changes for PUT (`partial == false`, text required) or PATCH.
pub fn post_changes(request: PostRequest, partial: bool) -> Result<PostChanges, FieldErrors> {
    let mut errors = FieldErrors::new();
    let text = if partial {
        optional_text(&mut errors, "text", request.text)
    } else {
        required_text(&mut errors, "text", request.text)
    };
    let image = request.image.map(|value| image(&mut errors, value));
    errors.into_result()?;

    Ok(PostChanges {
        text,
        image,
        group_id: request.group,
    })
}

pub fn comment_text(request: CommentRequest, partial: bool) -> Result<Option<String>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let text = if partial {
        optional_text(&mut errors, "text", request.text)
    } else {
        required_text(&mut errors, "text", request.text)
    };
    errors.into_result()?;
    Ok(text)
}

pub fn follow_target(request: FollowRequest) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    let following = required_text(&mut errors, "following", request.following);
    errors.into_result()?;
    Ok(following.unwrap_or_default())
}

/// Passwords are taken verbatim; only emptiness is checked.
fn password(errors: &mut FieldErrors, value: Option<String>) -> Option<String> {
    match value {
        None => {
            errors.add("password", REQUIRED);
            None
        }
        Some(p) if p.is_empty() => {
            errors.add("password", BLANK);
            None
        }
        Some(p) => Some(p),
    }
}

pub fn registration(mut request: RegisterUserRequest) -> Result<Registration, FieldErrors> {
    request.email = request
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    let mut errors = FieldErrors::new();
    if let Err(e) = request.validate() {
        errors.merge(e.into());
    }
    let username = required_text(&mut errors, "username", request.username);
    let password = password(&mut errors, request.password);
    errors.into_result()?;

    Ok(Registration {
        username: username.unwrap_or_default(),
        email: request.email.unwrap_or_default(),
        password: password.unwrap_or_default(),
    })
}

pub fn credentials(request: TokenObtainRequest) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::new();
    let username = required_text(&mut errors, "username", request.username);
    let password = password(&mut errors, request.password);
    errors.into_result()?;
    Ok((username.unwrap_or_default(), password.unwrap_or_default()))
}

/// A required token field of the JWT endpoints.
pub fn token_field(field: &str, value: Option<String>) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    let token = required_text(&mut errors, field, value);
    errors.into_result()?;
    Ok(token.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &FieldErrors, field: &str) -> Vec<String> {
        errors.get(field).unwrap_or_default().to_vec()
    }

    #[test]
    fn test_parse_empty_body_is_empty_object() {
        let request: PostRequest = parse(b"  ").unwrap();
        assert!(request.text.is_none());

        assert!(matches!(
            parse::<PostRequest>(b"{not json"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_post_draft_requires_text() {
        let errors = post_draft(PostRequest::default()).unwrap_err();
        assert_eq!(messages(&errors, "text"), [REQUIRED]);

        let errors = post_draft(PostRequest {
            text: Some("  ".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(messages(&errors, "text"), [BLANK]);
    }

    #[test]
    fn test_post_draft_trims_and_checks_image() {
        let draft = post_draft(PostRequest {
            text: Some("  hello ".to_string()),
            image: Some(Some("posts/cat.png".to_string())),
            group: Some(Some(2)),
        })
        .unwrap();
        assert_eq!(draft.text, "hello");
        assert_eq!(draft.image.as_deref(), Some("posts/cat.png"));
        assert_eq!(draft.group_id, Some(2));

        let errors = post_draft(PostRequest {
            text: Some("x".to_string()),
            image: Some(Some("a".repeat(256))),
            group: None,
        })
        .unwrap_err();
        assert_eq!(messages(&errors, "image").len(), 1);
    }

    #[test]
    fn test_post_changes_put_versus_patch() {
        assert!(post_changes(PostRequest::default(), false).is_err());

        let changes = post_changes(
            PostRequest {
                group: Some(None),
                ..Default::default()
            },
            true,
        )
        .unwrap();
        assert!(changes.text.is_none());
        assert_eq!(changes.group_id, Some(None));
        assert!(changes.image.is_none());
    }

    #[test]
    fn test_follow_target_is_trimmed() {
        let target = follow_target(FollowRequest {
            following: Some(" bob ".to_string()),
        })
        .unwrap();
        assert_eq!(target, "bob");

        let errors = follow_target(FollowRequest {
            following: Some("   ".to_string()),
        })
        .unwrap_err();
        assert_eq!(messages(&errors, "following"), [BLANK]);
    }

    #[test]
    fn test_registration_validation() {
        let errors = registration(RegisterUserRequest {
            email: Some("nope".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(messages(&errors, "username"), [REQUIRED]);
        assert_eq!(messages(&errors, "password"), [REQUIRED]);
        assert_eq!(messages(&errors, "email"), ["Enter a valid email address."]);

        let registration = registration(RegisterUserRequest {
            username: Some("alice".to_string()),
            password: Some(" spaced pass ".to_string()),
            email: Some("   ".to_string()),
        })
        .unwrap();
        assert_eq!(registration.password, " spaced pass ");
        assert_eq!(registration.email, "");
    }
}
