//! HTTP response handling for errors

use super::types::TrustError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

/// Message returned for every token verification failure
pub(crate) const GENERIC_AUTH_FAILURE: &str = "invalid or expired token";

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail carried in [`ErrorResponse`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl TrustError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            TrustError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            TrustError::InvalidState(_) => (StatusCode::FORBIDDEN, "INVALID_STATE"),
            TrustError::BuiltinRole(_) => (StatusCode::FORBIDDEN, "BUILTIN_ROLE"),
            TrustError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            TrustError::SelfApproval => (StatusCode::FORBIDDEN, "SELF_APPROVAL"),
            TrustError::PolicyViolation(_) => (StatusCode::FORBIDDEN, "POLICY_VIOLATION"),
            TrustError::RequestExpired(_) => (StatusCode::FORBIDDEN, "REQUEST_EXPIRED"),
            TrustError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            TrustError::MalformedToken(_) => (StatusCode::BAD_REQUEST, "MALFORMED_TOKEN"),
            TrustError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            TrustError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            TrustError::Serialization(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            TrustError::TokenExpired | TrustError::SignatureMismatch => {
                (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED")
            }
            TrustError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            TrustError::RateLimit(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
            TrustError::Config(_)
            | TrustError::Yaml(_)
            | TrustError::Io(_)
            | TrustError::Storage(_)
            | TrustError::Crypto(_)
            | TrustError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    pub(super) fn public_message(&self) -> String {
        match self {
            TrustError::TokenExpired | TrustError::SignatureMismatch => {
                GENERIC_AUTH_FAILURE.to_string()
            }
            TrustError::Unauthorized(message) => message.clone(),
            TrustError::Config(_)
            | TrustError::Yaml(_)
            | TrustError::Io(_)
            | TrustError::Storage(_)
            | TrustError::Crypto(_)
            | TrustError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for TrustError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, code) = self.status_and_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.public_message(),
            },
        })
    }
}
