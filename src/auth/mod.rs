//! Authentication and authorization system
//!
//! Bundles the authorizer, access request workflow, session tokens and the
//! login protections behind one explicitly constructed [`TrustSystem`].

pub mod access;
pub mod credentials;
pub mod rbac;
mod system;
pub mod token;
mod types;


pub use access::{AccessRequest, AccessRequestManager, AccessRequestState};
pub use credentials::{CredentialVerifier, Identity, StaticCredentialVerifier};
pub use rbac::{Action, Authorizer, AuthzDecision, Feature};
pub use system::{Sweeps, TrustSystem};
pub use token::{SessionClaims, TokenManager};
pub use types::{Collaborators, LoginOutcome};
