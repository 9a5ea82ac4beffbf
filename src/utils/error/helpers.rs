//! Helper functions for creating specific error types

use super::types::TrustError;
use jsonwebtoken::errors::ErrorKind;

impl TrustError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn policy<S: Into<String>>(message: S) -> Self {
        Self::PolicyViolation(message.into())
    }

    pub fn malformed_token<S: Into<String>>(message: S) -> Self {
        Self::MalformedToken(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn rate_limit<S: Into<String>>(message: S) -> Self {
        Self::RateLimit(message.into())
    }

    pub fn crypto<S: Into<String>>(message: S) -> Self {
        Self::Crypto(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error means "the caller is not authenticated".
    ///
    /// Expired tokens and bad signatures are reported identically so a client
    /// cannot tell which check failed.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::TokenExpired | Self::SignatureMismatch | Self::MalformedToken(_)
        )
    }
}

impl From<jsonwebtoken::errors::Error> for TrustError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            ErrorKind::InvalidSignature => Self::SignatureMismatch,
            ErrorKind::InvalidKeyFormat => Self::crypto(format!("invalid signing key: {}", err)),
            _ => Self::malformed_token(err.to_string()),
        }
    }
}
