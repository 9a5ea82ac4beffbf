//! Login brute-force protection configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Brute-force protection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BruteForceConfig {
    /// Consecutive failures before the client is blocked
    #[serde(default = "default_max_failures")]
    pub max_failures: u32,
    /// How long a block lasts, in seconds
    #[serde(default = "default_block_duration_secs")]
    pub block_duration_secs: u64,
    /// Delay applied after the 1st, 2nd, ... failure; the last entry repeats
    #[serde(default = "default_failure_delays_secs")]
    pub delays_secs: Vec<u64>,
    /// Interval of the stale-entry sweep, in seconds
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl Default for BruteForceConfig {
    fn default() -> Self {
        Self {
            max_failures: default_max_failures(),
            block_duration_secs: default_block_duration_secs(),
            delays_secs: default_failure_delays_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl BruteForceConfig {
    pub fn block_duration(&self) -> Duration {
        Duration::from_secs(self.block_duration_secs)
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays_secs
            .iter()
            .copied()
            .map(Duration::from_secs)
            .collect()
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}
