//! Role management and feature permission endpoints

use crate::auth::Feature;
use crate::auth::rbac::{ResourceRule, RoleDefinition};
use crate::server::middleware::FeatureGate;
use crate::server::routes::{ApiResponse, Caller};
use crate::server::state::AppState;
use crate::utils::error::TrustError;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, guard, web};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

/// Configure role routes.
///
/// Reads are open to any authenticated caller; mutations require the
/// `settings_admin` feature.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/features", web::get().to(feature_permissions))
        .service(
            web::scope("/api/roles")
                .service(
                    web::resource("")
                        .guard(guard::Get())
                        .route(web::get().to(list_roles)),
                )
                .service(
                    web::resource("")
                        .guard(guard::Post())
                        .wrap(FeatureGate::new(Feature::SettingsAdmin))
                        .route(web::post().to(create_role)),
                )
                .service(
                    web::resource("/{name}")
                        .guard(guard::Get())
                        .route(web::get().to(get_role)),
                )
                .service(
                    web::resource("/{name}")
                        .guard(guard::Any(guard::Put()).or(guard::Delete()))
                        .wrap(FeatureGate::new(Feature::SettingsAdmin))
                        .route(web::put().to(update_role))
                        .route(web::delete().to(delete_role)),
                ),
        );
}

/// Role body for create and update; on update the path names the role
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub allow: Vec<ResourceRule>,
    #[serde(default)]
    pub deny: Vec<ResourceRule>,
    #[serde(default)]
    pub allowed_features: Vec<Feature>,
    #[serde(default)]
    pub denied_features: Vec<Feature>,
}

impl RoleRequest {
    fn into_role(self, name: String) -> RoleDefinition {
        RoleDefinition {
            name,
            description: self.description,
            allow: self.allow,
            deny: self.deny,
            allowed_features: self.allowed_features,
            denied_features: self.denied_features,
            is_custom: true,
        }
    }
}

/// Every registered role
#[derive(Debug, Clone, Serialize)]
pub struct RoleList<'a> {
    pub roles: Vec<&'a RoleDefinition>,
    pub total: usize,
}

/// Outcome of a role mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleStatus {
    pub name: String,
    pub status: String,
}

/// Feature map for the caller's role
#[derive(Debug, Clone, Serialize)]
pub struct FeaturePermissions {
    pub role: String,
    pub features: BTreeMap<Feature, bool>,
}

/// List built-in and custom roles
pub async fn list_roles(state: web::Data<AppState>) -> HttpResponse {
    let roles = state.trust.authorizer.list_roles();
    let roles: Vec<&RoleDefinition> = roles.iter().map(Arc::as_ref).collect();
    let total = roles.len();
    HttpResponse::Ok().json(ApiResponse::success(RoleList { roles, total }))
}

/// Fetch one role
pub async fn get_role(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let name = path.into_inner();
    let role = state
        .trust
        .authorizer
        .get_role(&name)
        .ok_or_else(|| TrustError::not_found(format!("role not found: {}", name)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(role.as_ref())))
}

/// Create a custom role, persisting it before it takes effect
pub async fn create_role(
    state: web::Data<AppState>,
    body: web::Json<RoleRequest>,
) -> ActixResult<HttpResponse> {
    let body = body.into_inner();
    if body.name.trim().is_empty() {
        return Err(TrustError::bad_request("role name is required").into());
    }

    let name = body.name.clone();
    state
        .trust
        .authorizer
        .create_custom_role(body.into_role(name.clone()))
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(RoleStatus {
        name,
        status: "created".to_string(),
    })))
}

/// Replace a custom role; built-in roles cannot be modified
pub async fn update_role(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<RoleRequest>,
) -> ActixResult<HttpResponse> {
    let name = path.into_inner();
    state
        .trust
        .authorizer
        .save_custom_role(body.into_inner().into_role(name.clone()))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(RoleStatus {
        name,
        status: "updated".to_string(),
    })))
}

/// Delete a custom role from the store and the registry
pub async fn delete_role(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let name = path.into_inner();
    if let Err(e) = state.trust.authorizer.remove_custom_role(&name).await {
        warn!("Failed to delete role {}: {}", name, e);
        return Err(e.into());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(RoleStatus {
        name,
        status: "deleted".to_string(),
    })))
}

/// Feature permissions of the caller's role
pub async fn feature_permissions(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let caller = Caller::from_request(&req, &state.trust.default_role);
    let features = state.trust.authorizer.feature_permissions(&caller.role);
    HttpResponse::Ok().json(ApiResponse::success(FeaturePermissions {
        role: caller.role,
        features,
    }))
}
