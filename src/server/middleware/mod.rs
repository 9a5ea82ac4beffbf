//! HTTP middleware implementations
//!
//! Applied outermost first:
//! - Rate limiting (auth and API limiters)
//! - Session token authentication
//! - Per-route authorization and feature guards

mod auth;
mod authz;
mod helpers;
mod rate_limit;


pub use auth::{AuthMiddleware, AuthMiddlewareService, get_session_claims};
pub use authz::{AuthzGuard, FeatureGate, GuardService};
pub use helpers::{
    REFRESHED_TOKEN_HEADER, ROLE_HEADER, USERNAME_HEADER, client_identifier, client_ip,
    header_str, is_api_endpoint, is_auth_endpoint, is_public_route,
};
pub use rate_limit::{RateLimitMiddleware, RateLimitMiddlewareService};
