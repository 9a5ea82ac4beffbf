//! Per-route authorization guards

use super::helpers::{ROLE_HEADER, USERNAME_HEADER, header_str};
use crate::auth::{Action, Feature, TrustSystem};
use crate::server::state::AppState;
use crate::utils::error::TrustError;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{ResponseError, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::error;

/// What a guard checks before letting a request through
#[derive(Debug, Clone)]
enum Requirement {
    Operation { resource: String, action: Action },
    Feature(Feature),
}

/// Namespace named by the `namespace` (or `ns`) query parameter.
///
/// Repeated keys resolve to their first value.
fn requested_namespace(query_string: &str) -> Result<String, TrustError> {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(query_string)
        .map_err(|e| TrustError::bad_request(format!("invalid query string: {}", e)))?
        .into_inner();

    Ok(first_value(&pairs, "namespace")
        .or_else(|| first_value(&pairs, "ns"))
        .unwrap_or_default()
        .to_string())
}

fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .filter(|v| !v.is_empty())
}

/// Guard requiring the caller's role to permit `action` on `resource`.
///
/// The namespace comes from the `namespace` (or `ns`) query parameter. An
/// approved access request for the caller also lets the request through.
pub struct AuthzGuard {
    requirement: Rc<Requirement>,
}

impl AuthzGuard {
    pub fn new(resource: impl Into<String>, action: Action) -> Self {
        Self {
            requirement: Rc::new(Requirement::Operation {
                resource: resource.into(),
                action,
            }),
        }
    }
}

/// Guard requiring the caller's role to have a UI feature enabled
pub struct FeatureGate {
    requirement: Rc<Requirement>,
}

impl FeatureGate {
    pub fn new(feature: Feature) -> Self {
        Self {
            requirement: Rc::new(Requirement::Feature(feature)),
        }
    }
}

macro_rules! guard_transform {
    ($guard:ty) => {
        impl<S, B> Transform<S, ServiceRequest> for $guard
        where
            S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
            S::Future: 'static,
            B: 'static,
        {
            type Response = ServiceResponse<EitherBody<B>>;
            type Error = actix_web::Error;
            type InitError = ();
            type Transform = GuardService<S>;
            type Future = Ready<Result<Self::Transform, Self::InitError>>;

            fn new_transform(&self, service: S) -> Self::Future {
                ready(Ok(GuardService {
                    service,
                    requirement: Rc::clone(&self.requirement),
                }))
            }
        }
    };
}

guard_transform!(AuthzGuard);
guard_transform!(FeatureGate);

/// Service implementation shared by [`AuthzGuard`] and [`FeatureGate`]
pub struct GuardService<S> {
    service: S,
    requirement: Rc<Requirement>,
}

impl<S> GuardService<S> {
    fn check(&self, trust: &TrustSystem, req: &ServiceRequest) -> Result<(), TrustError> {
        let user = header_str(req.headers(), USERNAME_HEADER).unwrap_or_default();
        let role = header_str(req.headers(), ROLE_HEADER)
            .filter(|role| !role.is_empty())
            .unwrap_or(trust.default_role.as_str());

        match self.requirement.as_ref() {
            Requirement::Operation { resource, action } => {
                let namespace = requested_namespace(req.query_string())?;
                let decision = trust.authorize(user, role, resource, *action, &namespace);
                if decision.allowed {
                    Ok(())
                } else {
                    Err(TrustError::forbidden(decision.reason))
                }
            }
            Requirement::Feature(feature) => {
                if trust.check_feature(user, role, *feature) {
                    Ok(())
                } else {
                    Err(TrustError::forbidden(format!(
                        "role {} does not have access to feature {}",
                        role, feature
                    )))
                }
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for GuardService<S>
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
        let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
            error!("Authorization guard mounted without application state");
            let response = TrustError::internal("missing application state").error_response();
            return Box::pin(ready(Ok(req.into_response(response.map_into_right_body()))));
        };

        if let Err(e) = self.check(&state.trust, &req) {
            let response = e.error_response();
            return Box::pin(ready(Ok(req.into_response(response.map_into_right_body()))));
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
