//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and the application factory.

use crate::auth::TrustSystem;
use crate::config::{Config, ServerConfig};
use crate::server::middleware::{AuthMiddleware, RateLimitMiddleware};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{Result, TrustError};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use tracing::info;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server around an already constructed trust system
    pub fn new(config: Config, trust: TrustSystem) -> Self {
        info!("Creating HTTP server");
        Self {
            config: config.server().clone(),
            state: AppState::new(config, trust),
        }
    }

    /// Start the HTTP server and run until it is shut down
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.bind_address();

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let mut server = ActixHttpServer::new(move || create_app(state.clone()));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| TrustError::internal(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| TrustError::internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Create the Actix-web application.
///
/// Rate limiting wraps authentication, so throttled requests never reach
/// token verification.
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let trust = state.trust.clone();

    App::new()
        .app_data(state)
        .app_data(routes::json_config())
        .wrap(AuthMiddleware::new(trust.clone()))
        .wrap(RateLimitMiddleware::new(trust))
        .wrap(Logger::default())
        .wrap(DefaultHeaders::new().add(("Server", "trustgate")))
        .configure(routes::health::configure_routes)
        .configure(routes::auth::configure_routes)
        .configure(routes::access::configure_routes)
        .configure(routes::roles::configure_routes)
}
