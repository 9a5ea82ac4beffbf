//! Rate limiting middleware

use super::helpers::{client_identifier, is_api_endpoint, is_auth_endpoint};
use crate::auth::TrustSystem;
use crate::protection::RateLimiter;
use crate::utils::current_timestamp;
use crate::utils::error::TrustError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderName, HeaderValue, RETRY_AFTER};
use actix_web::{HttpResponse, ResponseError};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Rate limit middleware for Actix-web.
///
/// Credential endpoints draw from the auth limiter, every other `/api/` path
/// from the API limiter. Anything else passes through unthrottled.
pub struct RateLimitMiddleware {
    trust: TrustSystem,
}

impl RateLimitMiddleware {
    pub fn new(trust: TrustSystem) -> Self {
        Self { trust }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service,
            trust: self.trust.clone(),
        }))
    }
}

/// Service implementation for rate limit middleware
pub struct RateLimitMiddlewareService<S> {
    service: S,
    trust: TrustSystem,
}

impl<S> RateLimitMiddlewareService<S> {
    fn limiter_for(&self, path: &str) -> Option<(&'static str, &Arc<RateLimiter>)> {
        if !self.trust.rate_limit_enabled {
            None
        } else if is_auth_endpoint(path) {
            Some(("auth", &self.trust.auth_limiter))
        } else if is_api_endpoint(path) {
            Some(("api", &self.trust.api_limiter))
        } else {
            None
        }
    }
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some((kind, limiter)) = self.limiter_for(req.path()) {
            let client_id = client_identifier(req.headers(), req.peer_addr());
            if !limiter.allow(&client_id) {
                let retry_after = limiter.retry_after(&client_id);
                warn!(
                    "Rate limit exceeded for {} on {} endpoints ({})",
                    client_id,
                    kind,
                    req.path()
                );
                let response = too_many_requests(kind, limiter.limit(), retry_after);
                return Box::pin(ready(Ok(
                    req.into_response(response.map_into_right_body())
                )));
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

/// 429 response carrying `Retry-After` (whole seconds, at least one),
/// `X-RateLimit-Limit` and `X-RateLimit-Reset` (unix seconds)
fn too_many_requests(kind: &str, limit: u32, retry_after: Duration) -> HttpResponse {
    let retry_secs = retry_after.as_secs().max(1);
    let reset_at = current_timestamp()
        .saturating_add(i64::try_from(retry_after.as_secs()).unwrap_or(i64::MAX));

    let mut response = TrustError::rate_limit(format!(
        "too many requests to {} endpoints, retry in {}s",
        kind, retry_secs
    ))
    .error_response();

    let headers = response.headers_mut();
    headers.insert(RETRY_AFTER, HeaderValue::from(retry_secs));
    headers.insert(
        HeaderName::from_static("x-ratelimit-limit"),
        HeaderValue::from(limit),
    );
    headers.insert(
        HeaderName::from_static("x-ratelimit-reset"),
        HeaderValue::from(reset_at),
    );
    response
}
