//! Utility modules for the trust layer
//!
//! - **error**: crate error type and HTTP mapping
//! - **logging**: tracing subscriber setup
//! - **sweep**: cancelable periodic background tasks

pub mod error;
pub mod logging;
pub mod sweep;

pub use sweep::SweepHandle;

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in seconds
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
