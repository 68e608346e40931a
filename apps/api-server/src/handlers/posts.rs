//! Post handlers.

use actix_web::{HttpRequest, HttpResponse, web};

use yatube_core::Access;
use yatube_core::pagination::PageRequest;
use yatube_core::services::PostService;
use yatube_shared::dto::{PageQuery, PostRequest};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::pagination::paginate;
use crate::serializers;
use crate::state::AppState;

/// GET /v1/posts/?limit=&offset=
pub async fn list(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    PostService::POLICY.check(Access::Read, identity.caller())?;

    let request = PageRequest::from_query(
        query.limit.as_deref(),
        query.offset.as_deref(),
        state.pagination,
    );
    let page = state.posts.list(request).await?;

    Ok(HttpResponse::Ok().json(paginate(
        &req,
        request,
        page.map(serializers::post_response),
    )))
}

/// POST /v1/posts/
pub async fn create(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let caller = PostService::POLICY.writer(identity.caller())?;

    let request: PostRequest = serializers::parse(&body)?;
    let draft = serializers::post_draft(request)?;
    let post = state.posts.create(caller, draft).await?;

    Ok(HttpResponse::Created().json(serializers::post_response(post)))
}

/// GET /v1/posts/{id}/
pub async fn retrieve(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    PostService::POLICY.check(Access::Read, identity.caller())?;

    let post = state.posts.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serializers::post_response(post)))
}

async fn save(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    id: i32,
    body: web::Bytes,
    partial: bool,
) -> AppResult<HttpResponse> {
    let caller = PostService::POLICY.writer(identity.caller())?;
    let post = state.posts.get_for_write(caller, id).await?;

    let request: PostRequest = serializers::parse(&body)?;
    let changes = serializers::post_changes(request, partial)?;
    let post = state.posts.update(&post, changes).await?;

    Ok(HttpResponse::Ok().json(serializers::post_response(post)))
}

/// PUT /v1/posts/{id}/
pub async fn update(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    save(identity, state, path.into_inner(), body, false).await
}

/// PATCH /v1/posts/{id}/
pub async fn partial_update(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    save(identity, state, path.into_inner(), body, true).await
}

/// DELETE /v1/posts/{id}/
pub async fn destroy(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let caller = PostService::POLICY.writer(identity.caller())?;
    let post = state.posts.get_for_write(caller, path.into_inner()).await?;

    state.posts.delete(&post).await?;

    Ok(HttpResponse::NoContent().finish())
}
