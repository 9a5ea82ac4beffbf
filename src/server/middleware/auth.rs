//! Authentication middleware

use super::helpers::{REFRESHED_TOKEN_HEADER, ROLE_HEADER, USERNAME_HEADER, is_public_route};
use crate::auth::token::extract_bearer;
use crate::auth::{SessionClaims, TrustSystem};
use crate::utils::error::{GENERIC_AUTH_FAILURE, TrustError};
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use actix_web::{HttpMessage, HttpRequest, ResponseError};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Auth middleware for Actix-web.
///
/// Identity headers supplied by the client are always discarded. On
/// protected routes the bearer token is verified and `X-Username` /
/// `X-User-Role` are rebuilt from its claims, which are also stored in the
/// request extensions.
pub struct AuthMiddleware {
    trust: TrustSystem,
}

impl AuthMiddleware {
    pub fn new(trust: TrustSystem) -> Self {
        Self { trust }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            trust: self.trust.clone(),
        }))
    }
}

/// Service implementation for auth middleware
pub struct AuthMiddlewareService<S> {
    service: S,
    trust: TrustSystem,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let headers = req.headers_mut();
        headers.remove(USERNAME_HEADER);
        headers.remove(ROLE_HEADER);

        if is_public_route(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer)
            .map(str::to_owned);

        let Some(token) = token else {
            debug!("No bearer token on protected route {}", req.path());
            return Box::pin(ready(Ok(unauthenticated(req))));
        };

        let claims = match self.trust.tokens.validate_token(&token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Rejected session token on {}: {}", req.path(), e);
                return Box::pin(ready(Ok(unauthenticated(req))));
            }
        };

        if set_identity(&mut req, &claims).is_err() {
            warn!("Session claims for {} cannot be carried in headers", claims.sub);
            return Box::pin(ready(Ok(unauthenticated(req))));
        }

        let refreshed = if self.trust.tokens.needs_refresh(&token) {
            self.trust.tokens.refresh_token(&token).ok()
        } else {
            None
        };

        req.extensions_mut().insert(claims);
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            if let Some(refreshed) = refreshed.and_then(|t| HeaderValue::from_str(&t).ok()) {
                debug!("Issued refreshed session token");
                res.headers_mut()
                    .insert(HeaderName::from_static(REFRESHED_TOKEN_HEADER), refreshed);
            }
            Ok(res.map_into_left_body())
        })
    }
}

fn set_identity(
    req: &mut ServiceRequest,
    claims: &SessionClaims,
) -> Result<(), actix_web::http::header::InvalidHeaderValue> {
    let username = HeaderValue::from_str(&claims.username)?;
    let role = HeaderValue::from_str(&claims.role)?;

    let headers = req.headers_mut();
    headers.insert(HeaderName::from_static(USERNAME_HEADER), username);
    headers.insert(HeaderName::from_static(ROLE_HEADER), role);
    Ok(())
}

fn unauthenticated<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
    let response = TrustError::unauthorized(GENERIC_AUTH_FAILURE).error_response();
    req.into_response(response.map_into_right_body())
}

/// Session claims attached to the request by [`AuthMiddleware`]
pub fn get_session_claims(req: &HttpRequest) -> Option<SessionClaims> {
    req.extensions().get::<SessionClaims>().cloned()
}
