//! HTTP route modules
//!
//! This module contains all HTTP route handlers organized by functionality.

pub mod access;
pub mod auth;
pub mod health;
pub mod roles;

use crate::server::middleware::{ROLE_HEADER, USERNAME_HEADER, header_str};
use crate::utils::error::TrustError;
use actix_web::{HttpRequest, web};

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

/// Caller identity as set by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub username: String,
    pub role: String,
}

impl Caller {
    /// Read the caller from the request, falling back to `default_role`
    pub fn from_request(req: &HttpRequest, default_role: &str) -> Self {
        let username = header_str(req.headers(), USERNAME_HEADER)
            .unwrap_or_default()
            .to_string();
        let role = header_str(req.headers(), ROLE_HEADER)
            .filter(|role| !role.is_empty())
            .unwrap_or(default_role)
            .to_string();
        Self { username, role }
    }
}

/// JSON extractor configuration answering malformed bodies with the crate
/// error format
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            TrustError::bad_request(format!("invalid request body: {}", err)).into()
        })
}
