//! RBAC configuration

use super::*;
use crate::auth::rbac::RoleDefinition;
use serde::{Deserialize, Serialize};

/// RBAC configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbacConfig {
    /// Role assumed for requests that carry none
    #[serde(default = "default_role")]
    pub default_role: String,
    /// Custom roles declared in configuration, merged over the built-ins
    #[serde(default)]
    pub custom_roles: Vec<RoleDefinition>,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            default_role: default_role(),
            custom_roles: Vec::new(),
        }
    }
}
