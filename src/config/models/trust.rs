//! Root configuration document

use super::*;
use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrustConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub access_requests: AccessRequestConfig,
    #[serde(default)]
    pub brute_force: BruteForceConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub rbac: RbacConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}
