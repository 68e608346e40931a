//! Authentication extractors.
//!
//! A request without an `Authorization` header, or with a scheme other than
//! `Bearer`, is anonymous. A `Bearer` credential that does not validate as
//! an access token fails the request with 401.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};
use std::sync::Arc;

use yatube_core::Caller;
use yatube_core::ports::{AuthError, TokenKind, TokenService};

use crate::middleware::error::AppError;

const BEARER: &str = "Bearer";

/// Extract the raw Bearer token, if the request carries one.
fn bearer_token(req: &HttpRequest) -> Result<Option<&str>, AuthError> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| {
        AuthError::InvalidToken("Authorization header is not valid ASCII".to_string())
    })?;

    let mut parts = value.split_whitespace();
    if parts.next() != Some(BEARER) {
        return Ok(None);
    }

    match (parts.next(), parts.next()) {
        (Some(token), None) => Ok(Some(token)),
        _ => Err(AuthError::InvalidToken(
            "Authorization header must contain two space-delimited values".to_string(),
        )),
    }
}

fn authenticate(req: &HttpRequest) -> Result<Option<Caller>, AppError> {
    let Some(token) = bearer_token(req)? else {
        return Ok(None);
    };

    let tokens = req
        .app_data::<web::Data<Arc<dyn TokenService>>>()
        .ok_or_else(|| AppError::Internal("TokenService not found in app data".to_string()))?;

    let claims = tokens.validate(token, TokenKind::Access)?;
    Ok(Some(Caller {
        user_id: claims.user_id,
        username: claims.username,
    }))
}

/// Caller of the request, or `None` for anonymous requests.
///
/// Handlers pass it to their resource policy:
/// ```ignore
/// async fn create(identity: OptionalIdentity) -> AppResult<HttpResponse> {
///     let caller = PostService::POLICY.writer(identity.caller())?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<Caller>);

impl OptionalIdentity {
    pub fn caller(&self) -> Option<&Caller> {
        self.0.as_ref()
    }
}

impl FromRequest for OptionalIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map(OptionalIdentity))
    }
}

/// Authenticated caller; anonymous requests are rejected with 401.
#[derive(Debug, Clone)]
pub struct Identity(pub Caller);

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(match authenticate(req) {
            Ok(Some(caller)) => Ok(Identity(caller)),
            Ok(None) => Err(AuthError::MissingAuth.into()),
            Err(e) => Err(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default().to_http_request();
        assert!(bearer_token(&req).unwrap().is_none());

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert!(bearer_token(&req).unwrap().is_none());

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), Some("abc.def"));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer"))
            .to_http_request();
        assert!(bearer_token(&req).is_err());

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer a b"))
            .to_http_request();
        assert!(bearer_token(&req).is_err());
    }
}
