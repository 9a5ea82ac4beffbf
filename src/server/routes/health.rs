//! Health check endpoint

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Basic health check endpoint
///
/// Returns a simple health status indicating if the service is running,
/// plus a few counters from the protection layer. It is exempt from
/// authentication and rate limiting.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    let trust = &state.trust;
    let health_status = HealthStatus {
        status: Cow::Borrowed("healthy"),
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        roles: trust.authorizer.list_roles().len(),
        pending_access_requests: trust.access.get_pending_requests().len(),
        blocks_issued: trust.brute_force.blocks_issued(),
        rate_limiting: state.config().rate_limit().enabled,
    };

    HttpResponse::Ok().json(ApiResponse::success(health_status))
}

/// Basic health status
#[derive(Debug, Clone, serde::Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
    roles: usize,
    pending_access_requests: usize,
    blocks_issued: u64,
    rate_limiting: bool,
}
