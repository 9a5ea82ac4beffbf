//! Token manager implementation

use super::types::{SessionClaims, TokenManager};
use crate::config::TokenConfig;
use crate::utils::current_timestamp;
use crate::utils::error::{Result, TrustError};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use std::time::Duration;
use tracing::{debug, warn};

impl TokenManager {
    pub(super) const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Create a token manager from configuration.
    ///
    /// Without a configured secret a random 256-bit one is generated, so tokens
    /// do not survive a restart.
    pub fn new(config: &TokenConfig) -> Self {
        let secret = match &config.secret {
            Some(secret) if !secret.is_empty() => secret.as_bytes().to_vec(),
            _ => {
                warn!("No token secret configured, generating an ephemeral one");
                let mut secret = vec![0u8; 32];
                rand::thread_rng().fill_bytes(&mut secret);
                secret
            }
        };

        Self::with_secret(secret, config.duration(), config.refresh_window())
    }

    /// Create a token manager with an explicit secret
    pub fn with_secret(
        secret: impl Into<Vec<u8>>,
        duration: Duration,
        refresh_window: Duration,
    ) -> Self {
        let secret = secret.into();
        Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            duration,
            refresh_window,
        }
    }

    /// Configured token lifetime
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Sign `claims`, filling unset timestamps from the configured lifetime
    pub fn generate_token(&self, mut claims: SessionClaims) -> Result<String> {
        let now = current_timestamp();
        if claims.iat == 0 {
            claims.iat = now;
        }
        if claims.exp == 0 {
            claims.exp = i64::try_from(self.duration.as_secs())
                .ok()
                .and_then(|lifetime| now.checked_add(lifetime))
                .ok_or_else(|| {
                    TrustError::config(format!(
                        "token lifetime of {}s overflows the expiry timestamp",
                        self.duration.as_secs()
                    ))
                })?;
        }

        let token = encode(&Header::new(Self::ALGORITHM), &claims, &self.encoding_key)?;

        debug!("Issued token for {} (session {})", claims.username, claims.sid);
        Ok(token)
    }

    /// Verify a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Self::ALGORITHM);
        validation.leeway = 0;

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Whether a valid token is within its refresh window
    pub fn needs_refresh(&self, token: &str) -> bool {
        match self.validate_token(token) {
            Ok(claims) => self.in_refresh_window(&claims),
            Err(_) => false,
        }
    }

    /// Re-sign a token that is within its refresh window.
    ///
    /// A token outside the window is returned unchanged.
    pub fn refresh_token(&self, token: &str) -> Result<String> {
        let claims = self.validate_token(token)?;
        if !self.in_refresh_window(&claims) {
            return Ok(token.to_string());
        }

        debug!("Refreshing token for session {}", claims.sid);
        self.generate_token(SessionClaims::new(
            claims.sub,
            claims.username,
            claims.role,
            claims.sid,
        ))
    }

    fn in_refresh_window(&self, claims: &SessionClaims) -> bool {
        let window = i64::try_from(self.refresh_window.as_secs()).unwrap_or(i64::MAX);
        claims.exp.saturating_sub(current_timestamp()) <= window
    }
}
