//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod follows;
mod groups;
mod health;
mod posts;


use std::sync::Arc;

use actix_web::http::{Method, header};
use actix_web::{HttpResponse, Route, web};
use serde_json::json;

use yatube_core::ports::TokenService;
use yatube_core::services::{CommentService, FollowService, GroupService, PostService};
use yatube_core::{Access, Policy};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, NOT_FOUND};
use crate::state::AppState;

/// Register shared data, extractor settings and routes.
pub fn configure_app(
    state: AppState,
    tokens: Arc<dyn TokenService>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .app_data(web::Data::new(tokens))
            // Non-numeric ids in the path are unknown objects.
            .app_data(
                web::PathConfig::default()
                    .error_handler(|_, _| AppError::NotFound(NOT_FOUND.to_string()).into()),
            )
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                AppError::BadRequest(format!("Invalid query string: {err}")).into()
            }))
            .configure(configure_routes)
            .default_service(web::to(not_found));
    }
}

/// Configure all application routes.
///
/// Resources that answer GET also answer HEAD through the same handler.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .route("/health", web::head().to(health::health_check))
        .service(
            web::scope("/v1")
                // Tokens and accounts
                .service(
                    web::resource("/jwt/create/")
                        .route(web::post().to(auth::jwt_create))
                        .route(options("Token Obtain Pair", "POST, OPTIONS", None))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/jwt/refresh/")
                        .route(web::post().to(auth::jwt_refresh))
                        .route(options("Token Refresh", "POST, OPTIONS", None))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/jwt/verify/")
                        .route(web::post().to(auth::jwt_verify))
                        .route(options("Token Verify", "POST, OPTIONS", None))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/users/")
                        .route(web::post().to(auth::register))
                        .route(options("User List", "POST, OPTIONS", None))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/users/me/")
                        .route(web::get().to(auth::me))
                        .route(web::head().to(auth::me))
                        .route(options(
                            "User Me",
                            "GET, HEAD, OPTIONS",
                            Some(Policy::Authenticated),
                        ))
                        .default_service(web::to(method_not_allowed)),
                )
                // Posts
                .service(
                    web::resource("/posts/")
                        .route(web::get().to(posts::list))
                        .route(web::head().to(posts::list))
                        .route(web::post().to(posts::create))
                        .route(options(
                            "Post List",
                            "GET, POST, HEAD, OPTIONS",
                            Some(PostService::POLICY),
                        ))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/posts/{id}/")
                        .route(web::get().to(posts::retrieve))
                        .route(web::head().to(posts::retrieve))
                        .route(web::put().to(posts::update))
                        .route(web::patch().to(posts::partial_update))
                        .route(web::delete().to(posts::destroy))
                        .route(options(
                            "Post Instance",
                            DETAIL_METHODS,
                            Some(PostService::POLICY),
                        ))
                        .default_service(web::to(method_not_allowed)),
                )
                // Comments, scoped to their post
                .service(
                    web::resource("/posts/{post_id}/comments/")
                        .route(web::get().to(comments::list))
                        .route(web::head().to(comments::list))
                        .route(web::post().to(comments::create))
                        .route(options(
                            "Comment List",
                            "GET, POST, HEAD, OPTIONS",
                            Some(CommentService::POLICY),
                        ))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/posts/{post_id}/comments/{id}/")
                        .route(web::get().to(comments::retrieve))
                        .route(web::head().to(comments::retrieve))
                        .route(web::put().to(comments::update))
                        .route(web::patch().to(comments::partial_update))
                        .route(web::delete().to(comments::destroy))
                        .route(options(
                            "Comment Instance",
                            DETAIL_METHODS,
                            Some(CommentService::POLICY),
                        ))
                        .default_service(web::to(method_not_allowed)),
                )
                // Groups (read-only)
                .service(
                    web::resource("/groups/")
                        .route(web::get().to(groups::list))
                        .route(web::head().to(groups::list))
                        .route(options(
                            "Group List",
                            "GET, HEAD, OPTIONS",
                            Some(GroupService::POLICY),
                        ))
                        .default_service(web::to(method_not_allowed)),
                )
                .service(
                    web::resource("/groups/{id}/")
                        .route(web::get().to(groups::retrieve))
                        .route(web::head().to(groups::retrieve))
                        .route(options(
                            "Group Instance",
                            "GET, HEAD, OPTIONS",
                            Some(GroupService::POLICY),
                        ))
                        .default_service(web::to(method_not_allowed)),
                )
                // Follows (list and create only)
                .service(
                    web::resource("/follow/")
                        .route(web::get().to(follows::list))
                        .route(web::head().to(follows::list))
                        .route(web::post().to(follows::create))
                        .route(options(
                            "Follow List",
                            "GET, POST, HEAD, OPTIONS",
                            Some(FollowService::POLICY),
                        ))
                        .default_service(web::to(method_not_allowed)),
                ),
        );
}

const DETAIL_METHODS: &str = "GET, PUT, PATCH, DELETE, HEAD, OPTIONS";

/// OPTIONS route describing a resource. Runs the resource's view-level read
/// check when it has a policy.
fn options(name: &'static str, allow: &'static str, policy: Option<Policy>) -> Route {
    web::method(Method::OPTIONS).to(move |identity: OptionalIdentity| async move {
        if let Some(policy) = policy {
            policy.check(Access::Read, identity.caller())?;
        }

        Ok::<_, AppError>(
            HttpResponse::Ok()
                .insert_header((header::ALLOW, allow))
                .json(json!({
                    "name": name,
                    "renders": ["application/json"],
                    "parses": ["application/json"],
                })),
        )
    })
}

async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound(NOT_FOUND.to_string()))
}
