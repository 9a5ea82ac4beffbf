//! Session token types

use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identity carried by a session token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user id)
    pub sub: String,
    pub username: String,
    pub role: String,
    /// Session id
    pub sid: String,
    /// Issued at, unix seconds; 0 means "fill on signing"
    pub iat: i64,
    /// Expires at, unix seconds; 0 means "fill on signing"
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(
        subject: impl Into<String>,
        username: impl Into<String>,
        role: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            sub: subject.into(),
            username: username.into(),
            role: role.into(),
            sid: session_id.into(),
            iat: 0,
            exp: 0,
        }
    }
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct TokenManager {
    /// Key for signing tokens
    pub(super) encoding_key: EncodingKey,
    /// Key for verifying tokens
    pub(super) decoding_key: DecodingKey,
    /// Token lifetime
    pub(super) duration: Duration,
    /// Remaining lifetime at or below which a token is refreshed
    pub(super) refresh_window: Duration,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("algorithm", &Self::ALGORITHM)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .field("duration", &self.duration)
            .field("refresh_window", &self.refresh_window)
            .finish()
    }
}
