//! Role registry management

use crate::utils::error::{Result, TrustError};
use std::sync::Arc;
use tracing::{info, warn};

use super::system::{Authorizer, is_builtin_role};
use super::types::RoleDefinition;

impl Authorizer {
    /// Get a snapshot of a role by name
    pub fn get_role(&self, name: &str) -> Option<Arc<RoleDefinition>> {
        self.lookup(name)
    }

    /// List all registered roles, sorted by name
    pub fn list_roles(&self) -> Vec<Arc<RoleDefinition>> {
        let mut roles: Vec<_> = self.roles.read().values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        roles
    }

    /// Insert or replace a custom role.
    ///
    /// Built-in names are rejected; the stored role is always marked custom.
    pub fn register_role(&self, mut role: RoleDefinition) -> Result<()> {
        if role.name.trim().is_empty() {
            return Err(TrustError::validation("role name cannot be empty"));
        }
        if is_builtin_role(&role.name) {
            warn!("Rejected attempt to overwrite built-in role {}", role.name);
            return Err(TrustError::BuiltinRole(role.name));
        }

        role.is_custom = true;
        let name = role.name.clone();
        let replaced = self
            .roles
            .write()
            .insert(name.clone(), Arc::new(role))
            .is_some();

        if replaced {
            info!("Replaced custom role {}", name);
        } else {
            info!("Registered custom role {}", name);
        }
        Ok(())
    }

    /// Remove a custom role
    pub fn delete_role(&self, name: &str) -> Result<()> {
        if is_builtin_role(name) {
            warn!("Rejected attempt to delete built-in role {}", name);
            return Err(TrustError::BuiltinRole(name.to_string()));
        }

        match self.roles.write().remove(name) {
            Some(_) => {
                info!("Deleted custom role {}", name);
                Ok(())
            }
            None => Err(TrustError::not_found(format!("role not found: {}", name))),
        }
    }

    /// Rehydrate custom roles from the role store.
    ///
    /// Returns how many roles were loaded. Stored roles using a built-in name
    /// are skipped.
    pub async fn load_from_store(&self) -> Result<usize> {
        let roles = self.store()?.list_custom_roles().await?;
        let mut loaded = 0;
        for role in roles {
            let name = role.name.clone();
            match self.register_role(role) {
                Ok(()) => loaded += 1,
                Err(e) => warn!("Skipping stored role {}: {}", name, e),
            }
        }

        info!("Loaded {} custom roles from store", loaded);
        Ok(loaded)
    }

    /// Persist a custom role, then register it
    pub async fn save_custom_role(&self, mut role: RoleDefinition) -> Result<()> {
        if role.name.trim().is_empty() {
            return Err(TrustError::validation("role name cannot be empty"));
        }
        if is_builtin_role(&role.name) {
            return Err(TrustError::BuiltinRole(role.name));
        }
        role.is_custom = true;

        if let Some(store) = &self.store {
            store.save_custom_role(&role).await?;
        }
        self.register_role(role)
    }

    /// Persist and register a custom role that does not exist yet
    pub async fn create_custom_role(&self, role: RoleDefinition) -> Result<()> {
        if !is_builtin_role(&role.name) && self.lookup(&role.name).is_some() {
            return Err(TrustError::conflict(format!(
                "role already exists: {}",
                role.name
            )));
        }
        self.save_custom_role(role).await
    }

    /// Remove a custom role from the store and the registry
    pub async fn remove_custom_role(&self, name: &str) -> Result<()> {
        if is_builtin_role(name) {
            return Err(TrustError::BuiltinRole(name.to_string()));
        }
        if self.lookup(name).is_none() {
            return Err(TrustError::not_found(format!("role not found: {}", name)));
        }

        if let Some(store) = &self.store {
            store.delete_custom_role(name).await?;
        }
        self.delete_role(name)
    }
}
