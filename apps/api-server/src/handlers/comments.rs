//! Comment handlers. Every route is nested under its parent post.

use actix_web::{HttpResponse, web};

use yatube_core::Access;
use yatube_core::services::CommentService;
use yatube_shared::dto::{CommentRequest, CommentResponse};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::serializers;
use crate::state::AppState;

/// GET /v1/posts/{post_id}/comments/
pub async fn list(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    CommentService::POLICY.check(Access::Read, identity.caller())?;

    let comments: Vec<CommentResponse> = state
        .comments
        .list(path.into_inner())
        .await?
        .into_iter()
        .map(serializers::comment_response)
        .collect();

    Ok(HttpResponse::Ok().json(comments))
}

/// POST /v1/posts/{post_id}/comments/
pub async fn create(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let caller = CommentService::POLICY.writer(identity.caller())?;

    let request: CommentRequest = serializers::parse(&body)?;
    let text = serializers::comment_text(request, false)?.unwrap_or_default();
    let comment = state
        .comments
        .create(caller, path.into_inner(), text)
        .await?;

    Ok(HttpResponse::Created().json(serializers::comment_response(comment)))
}

/// GET /v1/posts/{post_id}/comments/{id}/
pub async fn retrieve(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    CommentService::POLICY.check(Access::Read, identity.caller())?;

    let (post_id, id) = path.into_inner();
    let comment = state.comments.get(post_id, id).await?;

    Ok(HttpResponse::Ok().json(serializers::comment_response(comment)))
}

async fn save(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    (post_id, id): (i32, i32),
    body: web::Bytes,
    partial: bool,
) -> AppResult<HttpResponse> {
    let caller = CommentService::POLICY.writer(identity.caller())?;
    let comment = state.comments.get_for_write(caller, post_id, id).await?;

    let request: CommentRequest = serializers::parse(&body)?;
    let text = serializers::comment_text(request, partial)?;
    let comment = state.comments.update(&comment, text).await?;

    Ok(HttpResponse::Ok().json(serializers::comment_response(comment)))
}

/// PUT /v1/posts/{post_id}/comments/{id}/
pub async fn update(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    save(identity, state, path.into_inner(), body, false).await
}

/// PATCH /v1/posts/{post_id}/comments/{id}/
pub async fn partial_update(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    save(identity, state, path.into_inner(), body, true).await
}

/// DELETE /v1/posts/{post_id}/comments/{id}/
pub async fn destroy(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let caller = CommentService::POLICY.writer(identity.caller())?;
    let (post_id, id) = path.into_inner();
    let comment = state.comments.get_for_write(caller, post_id, id).await?;

    state.comments.delete(&comment).await?;

    Ok(HttpResponse::NoContent().finish())
}
