//! Environment variable overrides

use super::Config;
use crate::utils::error::{Result, TrustError};
use std::env;
use std::str::FromStr;
use tracing::debug;

impl Config {
    /// Apply `TRUSTGATE_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    /// Apply overrides read through `lookup`
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TRUSTGATE_HOST") {
            self.trust.server.host = host;
        }
        if let Some(port) = lookup("TRUSTGATE_PORT") {
            self.trust.server.port = parse_var("TRUSTGATE_PORT", &port)?;
        }
        if let Some(secret) = lookup("TRUSTGATE_TOKEN_SECRET") {
            self.trust.token.secret = Some(secret);
        }
        if let Some(ttl) = lookup("TRUSTGATE_TOKEN_TTL_SECS") {
            self.trust.token.duration_secs = parse_var("TRUSTGATE_TOKEN_TTL_SECS", &ttl)?;
        }
        if let Some(ttl) = lookup("TRUSTGATE_ACCESS_REQUEST_TTL_SECS") {
            self.trust.access_requests.ttl_secs =
                parse_var("TRUSTGATE_ACCESS_REQUEST_TTL_SECS", &ttl)?;
        }
        if let Some(json) = lookup("TRUSTGATE_LOG_JSON") {
            self.trust.logging.json = parse_var("TRUSTGATE_LOG_JSON", &json)?;
        }

        debug!("Environment overrides applied");
        Ok(())
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| TrustError::Config(format!("Invalid {}: {}", key, e)))
}
