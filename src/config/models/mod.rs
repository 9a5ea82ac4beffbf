//! Configuration data models
//!
//! This module defines all configuration structures used by the trust layer.

pub mod access;
pub mod brute_force;
pub mod credentials;
pub mod rate_limit;
pub mod rbac;
pub mod server;
pub mod token;
pub mod trust;

pub use access::*;
pub use brute_force::*;
pub use credentials::*;
pub use rate_limit::*;
pub use rbac::*;
pub use server::*;
pub use token::*;
pub use trust::*;

/// Default bind address
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default log filter
pub fn default_log_level() -> String {
    "info".to_string()
}

/// Default token lifetime (1 hour)
pub fn default_token_duration_secs() -> u64 {
    3600
}

/// Default refresh window before token expiry (15 minutes)
pub fn default_refresh_window_secs() -> u64 {
    900
}

/// Default access request lifetime (30 minutes)
pub fn default_access_request_ttl_secs() -> u64 {
    1800
}

/// Default interval of the access request expiry sweep
pub fn default_access_cleanup_interval_secs() -> u64 {
    60
}

/// Consecutive failures before a client is blocked
pub fn default_max_failures() -> u32 {
    5
}

/// Default brute-force block duration (15 minutes)
pub fn default_block_duration_secs() -> u64 {
    900
}

/// Delay per failure number, starting at the first failure
pub fn default_failure_delays_secs() -> Vec<u64> {
    vec![0, 1, 3, 5]
}

/// Default sweep interval for the abuse-protection maps (5 minutes)
pub fn default_cleanup_interval_secs() -> u64 {
    300
}

/// Default window for both rate limiters
pub fn default_rate_window_secs() -> u64 {
    60
}

/// Requests per window on authentication endpoints
pub fn default_auth_rate_limit() -> u32 {
    10
}

/// Requests per window on general API endpoints
pub fn default_api_rate_limit() -> u32 {
    600
}

/// Role assumed when a request carries none
pub fn default_role() -> String {
    "viewer".to_string()
}

pub fn default_true() -> bool {
    true
}
