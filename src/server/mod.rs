//! HTTP server implementation
//!
//! This module provides the HTTP surface over the trust system: middleware,
//! routes and the server itself.

pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{HttpServer, create_app};
pub use state::AppState;
