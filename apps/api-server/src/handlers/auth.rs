//! Token and account handlers.

use actix_web::{HttpResponse, web};
use serde_json::json;
use std::sync::Arc;

use yatube_core::ports::TokenService;
use yatube_shared::dto::{
    AccessTokenResponse, RegisterUserRequest, TokenObtainRequest, TokenPairResponse,
    TokenRefreshRequest, TokenVerifyRequest,
};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::serializers;
use crate::state::AppState;

/// POST /v1/jwt/create/
pub async fn jwt_create(
    state: web::Data<AppState>,
    tokens: web::Data<Arc<dyn TokenService>>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let request: TokenObtainRequest = serializers::parse(&body)?;
    let (username, password) = serializers::credentials(request)?;

    let user = state.accounts.authenticate(&username, &password).await?;
    let pair = tokens.issue_pair(user.id, &user.username)?;
    tracing::info!(user_id = user.id, "Token pair issued");

    Ok(HttpResponse::Ok().json(TokenPairResponse {
        refresh: pair.refresh,
        access: pair.access,
    }))
}

/// POST /v1/jwt/refresh/
pub async fn jwt_refresh(
    tokens: web::Data<Arc<dyn TokenService>>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let request: TokenRefreshRequest = serializers::parse(&body)?;
    let refresh = serializers::token_field("refresh", request.refresh)?;

    let access = tokens.refresh(&refresh)?;

    Ok(HttpResponse::Ok().json(AccessTokenResponse { access }))
}

/// POST /v1/jwt/verify/
pub async fn jwt_verify(
    tokens: web::Data<Arc<dyn TokenService>>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let request: TokenVerifyRequest = serializers::parse(&body)?;
    let token = serializers::token_field("token", request.token)?;

    tokens.verify(&token)?;

    Ok(HttpResponse::Ok().json(json!({})))
}

/// POST /v1/users/
pub async fn register(
    _identity: OptionalIdentity,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let request: RegisterUserRequest = serializers::parse(&body)?;
    let registration = serializers::registration(request)?;

    let user = state.accounts.register(registration).await?;

    Ok(HttpResponse::Created().json(serializers::user_response(user)))
}

/// GET /v1/users/me/
pub async fn me(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let user = state.accounts.current(&identity.0).await?;

    Ok(HttpResponse::Ok().json(serializers::user_response(user)))
}
