//! Login and session token endpoints

use crate::auth::LoginOutcome;
use crate::server::middleware::{client_ip, get_session_claims};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::{GENERIC_AUTH_FAILURE, TrustError};
use actix_web::http::header::{AUTHORIZATION, HeaderValue, RETRY_AFTER};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Configure authentication routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh))
            .route("/me", web::get().to(current_session)),
    );
}

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub username: String,
    pub role: String,
    /// Unix seconds
    pub expires_at: i64,
}

/// Exchange credentials for a session token.
///
/// Failed attempts are answered only after the brute-force delay has
/// elapsed; blocked clients get a 429 without their credentials being
/// checked.
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let body = body.into_inner();
    if body.username.is_empty() || body.password.is_empty() {
        return Err(TrustError::bad_request("username and password are required").into());
    }

    let client_id = client_ip(req.headers(), req.peer_addr());
    debug!("Login attempt for {} from {}", body.username, client_id);

    match state
        .trust
        .login(&client_id, &body.username, &body.password)
        .await?
    {
        LoginOutcome::Success {
            identity,
            token,
            expires_at,
        } => {
            info!("Issued session token for {}", identity.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success(TokenResponse {
                token,
                username: identity.username,
                role: identity.role,
                expires_at,
            })))
        }
        LoginOutcome::Failed { delay } => {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Err(TrustError::unauthorized("invalid credentials").into())
        }
        LoginOutcome::Blocked { retry_after } => Ok(login_blocked(retry_after)),
    }
}

fn login_blocked(retry_after: Duration) -> HttpResponse {
    let retry_secs = retry_after.as_secs().max(1);
    let mut response = TrustError::rate_limit(format!(
        "too many failed login attempts, retry in {}s",
        retry_secs
    ))
    .error_response();
    response
        .headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(retry_secs));
    response
}

/// Re-sign the presented token when it is inside its refresh window
pub async fn refresh(req: HttpRequest, state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(crate::auth::token::extract_bearer)
        .ok_or_else(|| TrustError::unauthorized(GENERIC_AUTH_FAILURE))?;

    let tokens = &state.trust.tokens;
    let refreshed = tokens
        .refresh_token(token)
        .and_then(|refreshed| Ok((tokens.validate_token(&refreshed)?, refreshed)));

    match refreshed {
        Ok((claims, token)) => Ok(HttpResponse::Ok().json(ApiResponse::success(TokenResponse {
            token,
            username: claims.username,
            role: claims.role,
            expires_at: claims.exp,
        }))),
        Err(e) if e.is_authentication_failure() => {
            debug!("Token refresh rejected: {}", e);
            Err(TrustError::unauthorized(GENERIC_AUTH_FAILURE).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Session details for the presented token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub subject: String,
    pub username: String,
    pub role: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Describe the caller's session
pub async fn current_session(req: HttpRequest) -> ActixResult<HttpResponse> {
    let claims =
        get_session_claims(&req).ok_or_else(|| TrustError::unauthorized(GENERIC_AUTH_FAILURE))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(SessionInfo {
        subject: claims.sub,
        username: claims.username,
        role: claims.role,
        issued_at: claims.iat,
        expires_at: claims.exp,
    })))
}
