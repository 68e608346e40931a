//! Follow handlers. Only list and create are exposed.

use actix_web::{HttpResponse, web};

use yatube_core::Access;
use yatube_core::services::FollowService;
use yatube_shared::dto::{FollowQuery, FollowRequest, FollowResponse};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::serializers;
use crate::state::AppState;

/// GET /v1/follow/?search=
pub async fn list(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    query: web::Query<FollowQuery>,
) -> AppResult<HttpResponse> {
    let caller = FollowService::POLICY.require(Access::Read, identity.caller())?;

    let follows: Vec<FollowResponse> = state
        .follows
        .list(caller, query.search.as_deref())
        .await?
        .into_iter()
        .map(serializers::follow_response)
        .collect();

    Ok(HttpResponse::Ok().json(follows))
}

/// POST /v1/follow/
pub async fn create(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let caller = FollowService::POLICY.writer(identity.caller())?;

    let request: FollowRequest = serializers::parse(&body)?;
    let following = serializers::follow_target(request)?;
    let follow = state.follows.create(caller, &following).await?;

    Ok(HttpResponse::Created().json(serializers::follow_response(follow)))
}
