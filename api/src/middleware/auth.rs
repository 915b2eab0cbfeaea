//! Session authentication middleware for protected endpoints.
//!
//! Reads the token from the `Authorization` header, resolves it to a user
//! through the [`SessionVerifier`] registered as app data and injects an
//! [`AuthContext`] into the request. Any failure is answered with 401.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::{debug, error};
use uuid::Uuid;

use mt_core::domain::entities::user::User;
use mt_core::errors::{DomainError, TokenError};
use mt_core::services::SessionVerifier;

use crate::handlers::handle_domain_error;

/// Authenticated caller injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID the session token was issued for
    pub user_id: Uuid,
    /// The user as loaded while validating the token
    pub user: User,
}

impl AuthContext {
    pub fn new(user: User) -> Self {
        Self { user_id: user.id, user }
    }
}

/// JWT authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = match extract_token(&req) {
                Some(token) => token,
                None => {
                    debug!("Missing authorization header");
                    return Ok(reject(req));
                }
            };

            let verifier = match req.app_data::<web::Data<Arc<dyn SessionVerifier>>>() {
                Some(verifier) => Arc::clone(verifier.get_ref()),
                None => {
                    error!("No SessionVerifier registered as app data");
                    return Ok(reject(req));
                }
            };

            let user = match verifier.verify_session(&token).await {
                Ok(user) => user,
                Err(e) => {
                    debug!(error = %e, "Session token rejected");
                    return Ok(reject(req));
                }
            };

            req.extensions_mut().insert(AuthContext::new(user));

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Token from `Authorization: Bearer <token>` or a bare `Authorization: <token>`
fn extract_token(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let parts: Vec<&str> = header.split_whitespace().collect();

    match parts.as_slice() {
        ["Bearer", token] => Some(token.to_string()),
        [token] if *token != "Bearer" => Some(token.to_string()),
        _ => None,
    }
}

/// Answer the request with the 401 session error body
fn reject<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
    let response = handle_domain_error(DomainError::Token(TokenError::SessionInvalid));
    req.into_response(response).map_into_right_body()
}

fn unauthorized(reason: &'static str) -> Error {
    let response = handle_domain_error(DomainError::Token(TokenError::SessionInvalid));
    InternalError::from_response(reason, response).into()
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| unauthorized("Authentication required"));

        ready(result)
    }
}
