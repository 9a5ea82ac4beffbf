//! Helper functions for middleware

use actix_web::http::header::HeaderMap;
use std::net::SocketAddr;

/// Authenticated username, set by the auth middleware from the token claims
pub const USERNAME_HEADER: &str = "x-username";
/// Authenticated role, set by the auth middleware from the token claims
pub const ROLE_HEADER: &str = "x-user-role";
/// Replacement token returned when the presented one is close to expiry
pub const REFRESHED_TOKEN_HEADER: &str = "x-refreshed-token";

const AUTH_ENDPOINTS: &[&str] = &[
    "/api/auth/login",
    "/api/auth/logout",
    "/api/auth/kubeconfig",
    "/api/auth/oidc/login",
    "/api/auth/oidc/callback",
];

/// Check if a path is one of the credential endpoints
pub fn is_auth_endpoint(path: &str) -> bool {
    AUTH_ENDPOINTS.contains(&path)
}

/// Check if a path is a throttled API endpoint (any other `/api/` path)
pub fn is_api_endpoint(path: &str) -> bool {
    path.len() > 5 && path.starts_with("/api/") && !is_auth_endpoint(path)
}

/// Check if a route is public (doesn't require a session token)
pub fn is_public_route(path: &str) -> bool {
    const PUBLIC_ROUTES: &[&str] = &[
        "/health",
        "/api/auth/login",
        "/api/auth/oidc/login",
        "/api/auth/oidc/callback",
    ];

    PUBLIC_ROUTES.contains(&path)
}

/// Originating client address.
///
/// First `X-Forwarded-For` entry, else `X-Real-IP`, else the peer address
/// without its port.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = header_str(headers, "x-real-ip") {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limiting key: the client address, suffixed with `:username` when
/// the request names one
pub fn client_identifier(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let ip = client_ip(headers, peer);
    match header_str(headers, USERNAME_HEADER) {
        Some(username) if !username.is_empty() => format!("{}:{}", ip, username),
        _ => ip,
    }
}

/// Value of a header as `&str`, when present and valid ASCII
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
