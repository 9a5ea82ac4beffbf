//! Session token configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session token configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// HMAC signing secret. When absent a random secret is generated at startup,
    /// which invalidates every previously issued token on restart.
    #[serde(default)]
    pub secret: Option<String>,
    /// Token lifetime in seconds
    #[serde(default = "default_token_duration_secs")]
    pub duration_secs: u64,
    /// Remaining lifetime at or below which a token is refreshed, in seconds
    #[serde(default = "default_refresh_window_secs")]
    pub refresh_window_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: None,
            duration_secs: default_token_duration_secs(),
            refresh_window_secs: default_refresh_window_secs(),
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("duration_secs", &self.duration_secs)
            .field("refresh_window_secs", &self.refresh_window_secs)
            .finish()
    }
}

impl TokenConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn refresh_window(&self) -> Duration {
        Duration::from_secs(self.refresh_window_secs)
    }
}
