//! Error handling for the trust layer
//!
//! This module defines the crate error type, its constructor helpers and the
//! mapping to HTTP responses.

mod helpers;
mod response;
mod types;

pub(crate) use response::GENERIC_AUTH_FAILURE;
pub use response::ErrorResponse;
pub use types::{Result, TrustError};
