//! Application state shared across HTTP handlers

use crate::auth::TrustSystem;
use crate::config::Config;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Holds the explicitly constructed trust components; handlers and guards
/// reach them through `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Configuration (shared read-only)
    pub config: Arc<Config>,
    /// Authorizer, access requests, tokens and login protections
    pub trust: TrustSystem,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config, trust: TrustSystem) -> Self {
        Self {
            config: Arc::new(config),
            trust,
        }
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
