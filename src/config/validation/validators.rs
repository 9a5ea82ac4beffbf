//! Validators for every configuration section

use super::Validate;
use crate::auth::rbac::is_builtin_role;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

/// Minimum length of an explicitly configured signing secret
const MIN_SECRET_LEN: usize = 32;

/// Longest accepted duration setting (ten years)
pub(super) const MAX_DURATION_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Require `secs` to be non-zero and at most [`MAX_DURATION_SECS`]
fn check_duration(what: &str, secs: u64) -> Result<(), String> {
    if secs == 0 {
        return Err(format!("{} must be greater than 0", what));
    }
    if secs > MAX_DURATION_SECS {
        return Err(format!(
            "{} must be at most {} seconds",
            what, MAX_DURATION_SECS
        ));
    }
    Ok(())
}

impl Validate for TrustConfig {
    fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.token.validate()?;
        self.access_requests.validate()?;
        self.brute_force.validate()?;
        self.rate_limit.validate()?;
        self.rbac.validate()?;
        self.credentials.validate()?;
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("Server port cannot be 0".to_string());
        }
        if self.workers == Some(0) {
            return Err("Worker count must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for TokenConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating token configuration");

        if let Some(secret) = &self.secret {
            if secret.len() < MIN_SECRET_LEN {
                return Err(format!(
                    "Token secret should be at least {} characters long",
                    MIN_SECRET_LEN
                ));
            }
        }

        check_duration("Token duration", self.duration_secs)?;

        if self.refresh_window_secs >= self.duration_secs {
            return Err("Refresh window must be shorter than the token duration".to_string());
        }

        Ok(())
    }
}

impl Validate for AccessRequestConfig {
    fn validate(&self) -> Result<(), String> {
        check_duration("Access request TTL", self.ttl_secs)?;
        check_duration(
            "Access request cleanup interval",
            self.cleanup_interval_secs,
        )
    }
}

impl Validate for BruteForceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_failures == 0 {
            return Err("Brute-force max_failures must be greater than 0".to_string());
        }
        check_duration("Brute-force block duration", self.block_duration_secs)?;
        if self.delays_secs.iter().any(|delay| *delay > MAX_DURATION_SECS) {
            return Err(format!(
                "Brute-force delays must be at most {} seconds",
                MAX_DURATION_SECS
            ));
        }
        check_duration("Brute-force cleanup interval", self.cleanup_interval_secs)
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        self.auth
            .validate()
            .map_err(|e| format!("auth limiter: {}", e))?;
        self.api.validate().map_err(|e| format!("api limiter: {}", e))?;
        check_duration("Rate limit cleanup interval", self.cleanup_interval_secs)
    }
}

impl Validate for LimiterConfig {
    fn validate(&self) -> Result<(), String> {
        if self.limit == 0 {
            return Err("limit must be greater than 0".to_string());
        }
        check_duration("window", self.window_secs)
    }
}

impl Validate for RbacConfig {
    fn validate(&self) -> Result<(), String> {
        if self.default_role.is_empty() {
            return Err("Default role cannot be empty".to_string());
        }

        let mut seen = HashSet::new();
        for role in &self.custom_roles {
            if role.name.is_empty() {
                return Err("Custom role name cannot be empty".to_string());
            }
            if is_builtin_role(&role.name) {
                return Err(format!(
                    "Custom role cannot use built-in name: {}",
                    role.name
                ));
            }
            if !seen.insert(role.name.as_str()) {
                return Err(format!("Duplicate custom role: {}", role.name));
            }
        }

        let default_known = is_builtin_role(&self.default_role)
            || self.custom_roles.iter().any(|r| r.name == self.default_role);
        if !default_known {
            return Err(format!("Unknown default role: {}", self.default_role));
        }

        Ok(())
    }
}

impl Validate for CredentialsConfig {
    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for user in &self.users {
            if user.username.is_empty() {
                return Err("Username cannot be empty".to_string());
            }
            if user.password_hash.is_empty() {
                return Err(format!("Password hash missing for user {}", user.username));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(format!("Duplicate user: {}", user.username));
            }
        }
        Ok(())
    }
}
