//! Time-boxed elevated access requests
//!
//! A request moves `pending -> approved | denied | expired`. An approved,
//! unexpired request overrides an authorizer deny for its requester.

mod manager;
mod types;

pub use manager::AccessRequestManager;
pub use types::{AccessRequest, AccessRequestState};
