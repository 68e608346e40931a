//! Read-only group handlers.

use actix_web::{HttpResponse, web};

use yatube_core::Access;
use yatube_core::services::GroupService;
use yatube_shared::dto::GroupResponse;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::serializers;
use crate::state::AppState;

/// GET /v1/groups/
pub async fn list(identity: OptionalIdentity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    GroupService::POLICY.check(Access::Read, identity.caller())?;

    let groups: Vec<GroupResponse> = state
        .groups
        .list()
        .await?
        .into_iter()
        .map(serializers::group_response)
        .collect();

    Ok(HttpResponse::Ok().json(groups))
}

/// GET /v1/groups/{id}/
pub async fn retrieve(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    GroupService::POLICY.check(Access::Read, identity.caller())?;

    let group = state.groups.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serializers::group_response(group)))
}
