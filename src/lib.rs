//! # trustgate
//!
//! In-process trust and access-control layer for a cluster administration
//! tool.
//!
//! ## Components
//!
//! - **Authorizer**: role-based rules with deny precedence and UI feature gates
//! - **Access requests**: time-boxed, reviewer-approved temporary grants
//! - **Session tokens**: HMAC-SHA256 signed three-segment tokens with refresh
//! - **Brute-force protection**: per-client failure delays and blocking
//! - **Rate limiting**: fixed-window token buckets for auth and API endpoints
//!
//! Every component is constructed explicitly and shared through [`TrustSystem`];
//! the optional HTTP surface in [`server`] exposes them through actix-web.
//!
//! ```rust,no_run
//! use trustgate::{Config, Trustgate};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/trustgate.yaml").await?;
//!     let app = Trustgate::new(config).await?;
//!     app.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod protection;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use auth::{Collaborators, TrustSystem};
pub use config::Config;
pub use utils::error::{Result, TrustError};

use tracing::info;

/// Trust system plus its HTTP server and background sweeps
pub struct Trustgate {
    config: Config,
    trust: TrustSystem,
}

impl Trustgate {
    /// Build the trust system with the collaborators named by `config`
    pub async fn new(config: Config) -> Result<Self> {
        let collaborators = Collaborators::from_config(&config);
        Self::with_collaborators(config, collaborators).await
    }

    /// Build the trust system with explicit collaborators
    pub async fn with_collaborators(config: Config, collaborators: Collaborators) -> Result<Self> {
        info!("Creating trustgate instance");
        let trust = TrustSystem::new(&config, collaborators).await?;
        Ok(Self { config, trust })
    }

    pub fn trust(&self) -> &TrustSystem {
        &self.trust
    }

    /// Serve HTTP until shutdown; the cleanup sweeps run for the lifetime of
    /// the server and are stopped before returning
    pub async fn run(self) -> Result<()> {
        info!("Starting trustgate");

        let sweeps = self.trust.start_sweeps(&self.config);
        let result = server::HttpServer::new(self.config, self.trust).start().await;
        sweeps.stop().await;

        result
    }
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
