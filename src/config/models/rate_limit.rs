//! Rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate limiting configuration for both endpoint classes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Budget for login/logout/credential endpoints
    #[serde(default = "LimiterConfig::auth_default")]
    pub auth: LimiterConfig,
    /// Budget for every other `/api/` endpoint
    #[serde(default = "LimiterConfig::api_default")]
    pub api: LimiterConfig,
    /// Interval of the stale-visitor sweep, in seconds
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth: LimiterConfig::auth_default(),
            api: LimiterConfig::api_default(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl RateLimitConfig {
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

/// One token bucket budget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LimiterConfig {
    /// Requests allowed per window
    pub limit: u32,
    /// Window length in seconds
    #[serde(default = "default_rate_window_secs")]
    pub window_secs: u64,
}

impl LimiterConfig {
    pub fn auth_default() -> Self {
        Self {
            limit: default_auth_rate_limit(),
            window_secs: default_rate_window_secs(),
        }
    }

    pub fn api_default() -> Self {
        Self {
            limit: default_api_rate_limit(),
            window_secs: default_rate_window_secs(),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}
