//! Access request workflow configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Access request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRequestConfig {
    /// Lifetime of a request (pending or approved) in seconds
    #[serde(default = "default_access_request_ttl_secs")]
    pub ttl_secs: u64,
    /// Interval of the background expiry sweep in seconds
    #[serde(default = "default_access_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl Default for AccessRequestConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_access_request_ttl_secs(),
            cleanup_interval_secs: default_access_cleanup_interval_secs(),
        }
    }
}

impl AccessRequestConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}
