//! Configuration management for the trust layer
//!
//! This module handles loading, validation, and management of all configuration.

mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, TrustError};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Trust layer configuration
    pub trust: TrustConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TrustError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_yaml_str(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse configuration from YAML text without validating it
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let trust: TrustConfig = serde_yaml::from_str(content)
            .map_err(|e| TrustError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(Self { trust })
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn server(&self) -> &ServerConfig {
        &self.trust.server
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.trust.logging
    }

    pub fn token(&self) -> &TokenConfig {
        &self.trust.token
    }

    pub fn access_requests(&self) -> &AccessRequestConfig {
        &self.trust.access_requests
    }

    pub fn brute_force(&self) -> &BruteForceConfig {
        &self.trust.brute_force
    }

    pub fn rate_limit(&self) -> &RateLimitConfig {
        &self.trust.rate_limit
    }

    pub fn rbac(&self) -> &RbacConfig {
        &self.trust.rbac
    }

    pub fn credentials(&self) -> &CredentialsConfig {
        &self.trust.credentials
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.trust.validate().map_err(TrustError::Config)?;
        if self.trust.token.secret.is_none() {
            tracing::warn!(
                "No token secret configured; tokens will not survive a restart"
            );
        }
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.trust)?)
    }
}
