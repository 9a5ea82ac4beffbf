//! Access request workflow endpoints

use crate::auth::{AccessRequest, Action, Feature};
use crate::server::middleware::FeatureGate;
use crate::server::routes::{ApiResponse, Caller};
use crate::server::state::AppState;
use crate::utils::error::TrustError;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configure access request routes.
///
/// Approving and denying require the `settings_admin` feature.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/access")
            .route("/request", web::post().to(create_request))
            .route("/requests", web::get().to(list_requests))
            .service(
                web::resource("/approve/{id}")
                    .wrap(FeatureGate::new(Feature::SettingsAdmin))
                    .route(web::post().to(approve_request)),
            )
            .service(
                web::resource("/deny/{id}")
                    .wrap(FeatureGate::new(Feature::SettingsAdmin))
                    .route(web::post().to(deny_request)),
            ),
    );
}

/// Body of `POST /api/access/request`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccessRequest {
    pub action: String,
    pub resource: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub reason: String,
}

/// Body of the approve and deny endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub note: String,
}

/// Outcome of a workflow step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRequestStatus {
    pub id: String,
    pub status: String,
}

/// Listing of pending requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRequests {
    pub requests: Vec<AccessRequest>,
    pub total: usize,
}

/// File a request for a temporary grant on behalf of the caller
pub async fn create_request(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<CreateAccessRequest>,
) -> ActixResult<HttpResponse> {
    let body = body.into_inner();
    if body.action.is_empty() || body.resource.is_empty() {
        return Err(TrustError::bad_request("action and resource are required").into());
    }
    let action: Action = body.action.parse().map_err(TrustError::bad_request)?;
    if action == Action::Any {
        return Err(TrustError::bad_request("action must name a single operation").into());
    }

    let caller = Caller::from_request(&req, &state.trust.default_role);
    let id = state.trust.access.create_request(
        &caller.username,
        action,
        &body.resource,
        &body.namespace,
        &body.reason,
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(AccessRequestStatus {
        id,
        status: "pending".to_string(),
    })))
}

/// List pending requests, expiring stale ones first
pub async fn list_requests(state: web::Data<AppState>) -> HttpResponse {
    let access = &state.trust.access;
    let expired = access.cleanup_expired();
    if expired > 0 {
        info!("Expired {} access requests before listing", expired);
    }

    let requests = access.get_pending_requests();
    let total = requests.len();
    HttpResponse::Ok().json(ApiResponse::success(PendingRequests { requests, total }))
}

/// Approve a pending request; reviewers cannot approve their own
pub async fn approve_request(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Option<web::Json<ReviewRequest>>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    let note = body.map(|b| b.into_inner().note).unwrap_or_default();
    let caller = Caller::from_request(&req, &state.trust.default_role);

    state
        .trust
        .access
        .approve_request(&id, &caller.username, &note)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(AccessRequestStatus {
        id,
        status: "approved".to_string(),
    })))
}

/// Deny a pending request
pub async fn deny_request(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Option<web::Json<ReviewRequest>>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    let note = body.map(|b| b.into_inner().note).unwrap_or_default();
    let caller = Caller::from_request(&req, &state.trust.default_role);

    state.trust.access.deny_request(&id, &caller.username, &note)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(AccessRequestStatus {
        id,
        status: "denied".to_string(),
    })))
}
