//! Role-Based Access Control (RBAC) system
//!
//! Roles carry allow and deny rules over (resource, action, namespace) plus
//! allowed/denied feature lists. A matching deny rule always wins over a
//! matching allow rule, and anything not explicitly allowed is denied.

mod matcher;
mod permissions;
mod roles;
mod system;
mod types;

pub use matcher::Pattern;
pub use system::{Authorizer, BUILTIN_ROLES, is_builtin_role};
pub use types::{Action, AuthzDecision, Feature, ResourceRule, RoleDefinition};
