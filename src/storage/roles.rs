//! Durable storage for custom role definitions

use crate::auth::rbac::RoleDefinition;
use crate::utils::error::Result;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// Storage backend for custom roles
#[async_trait::async_trait]
pub trait RoleStore: Send + Sync {
    /// All persisted custom roles
    async fn list_custom_roles(&self) -> Result<Vec<RoleDefinition>>;

    /// Insert or replace a custom role
    async fn save_custom_role(&self, role: &RoleDefinition) -> Result<()>;

    /// Remove a custom role; removing a missing role is not an error
    async fn delete_custom_role(&self, name: &str) -> Result<()>;
}

/// In-memory role store
#[derive(Debug, Default)]
pub struct MemoryRoleStore {
    roles: RwLock<BTreeMap<String, RoleDefinition>>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RoleStore for MemoryRoleStore {
    async fn list_custom_roles(&self) -> Result<Vec<RoleDefinition>> {
        Ok(self.roles.read().values().cloned().collect())
    }

    async fn save_custom_role(&self, role: &RoleDefinition) -> Result<()> {
        debug!("Persisting custom role {}", role.name);
        self.roles.write().insert(role.name.clone(), role.clone());
        Ok(())
    }

    async fn delete_custom_role(&self, name: &str) -> Result<()> {
        self.roles.write().remove(name);
        Ok(())
    }
}
