//! Session token handling
//!
//! Tokens are HS256 JWTs. No other algorithm is ever produced or accepted.

mod manager;
pub mod types;
mod utils;


pub use types::{SessionClaims, TokenManager};
pub use utils::{extract_bearer, generate_session_id};
