//! RBAC system core functionality

use crate::storage::RoleStore;
use crate::utils::error::{Result, TrustError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use super::types::{Action, Feature, ResourceRule, RoleDefinition};

/// Names of the roles created at startup; never deleted or overwritten
pub const BUILTIN_ROLES: [&str; 3] = ["admin", "user", "viewer"];

/// Whether `name` is one of the built-in roles
pub fn is_builtin_role(name: &str) -> bool {
    BUILTIN_ROLES.contains(&name)
}

/// Role registry and authorization engine.
///
/// Role definitions are stored behind `Arc` so a check clones the pointer under
/// the read lock and evaluates against that snapshot without holding it.
pub struct Authorizer {
    pub(super) roles: RwLock<HashMap<String, Arc<RoleDefinition>>>,
    pub(super) store: Option<Arc<dyn RoleStore>>,
}

impl Authorizer {
    /// Create an authorizer holding only the built-in roles
    pub fn new() -> Self {
        let mut roles = HashMap::new();
        for role in default_roles() {
            roles.insert(role.name.clone(), Arc::new(role));
        }

        debug!("Registered {} built-in roles", roles.len());
        Self {
            roles: RwLock::new(roles),
            store: None,
        }
    }

    /// Create an authorizer with custom roles merged over the built-ins
    pub fn with_roles(custom: Vec<RoleDefinition>) -> Result<Self> {
        let authorizer = Self::new();
        let count = custom.len();
        for role in custom {
            authorizer.register_role(role)?;
        }

        if count > 0 {
            info!("Loaded {} custom roles from configuration", count);
        }
        Ok(authorizer)
    }

    /// Attach a persistence collaborator for custom roles
    pub fn with_store(mut self, store: Arc<dyn RoleStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub(super) fn store(&self) -> Result<&Arc<dyn RoleStore>> {
        self.store
            .as_ref()
            .ok_or_else(|| TrustError::storage("no role store configured"))
    }

    pub(super) fn lookup(&self, name: &str) -> Option<Arc<RoleDefinition>> {
        self.roles.read().get(name).cloned()
    }
}

impl Default for Authorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorizer")
            .field("roles", &self.roles.read().len())
            .field("store", &self.store.is_some())
            .finish()
    }
}

fn default_roles() -> Vec<RoleDefinition> {
    let mut viewer = RoleDefinition::new("viewer", "Read-only access with limited features")
        .with_allow(ResourceRule::new(
            &["*"],
            &[Action::View, Action::Logs],
            &["*"],
        ))
        .with_allowed_features(&[
            Feature::Dashboard,
            Feature::Topology,
            Feature::Metrics,
            Feature::EventTimeline,
            Feature::AuditLogs,
            Feature::SettingsGeneral,
        ]);
    viewer.is_custom = false;

    let mut user = RoleDefinition::new("user", "Standard user with broad access")
        .with_allow(ResourceRule::new(
            &["*"],
            &[
                Action::View,
                Action::Logs,
                Action::Scale,
                Action::Restart,
                Action::Create,
                Action::Apply,
                Action::Edit,
                Action::PortForward,
            ],
            &["*"],
        ))
        // No shell access to system workloads
        .with_deny(ResourceRule::new(&["*"], &[Action::Exec], &["kube-system"]))
        .with_deny(ResourceRule::new(
            &["nodes", "namespaces"],
            &[Action::Delete],
            &["*"],
        ))
        .with_allowed_features(&[Feature::Any])
        .with_denied_features(&[Feature::SettingsAdmin, Feature::SettingsSecurity]);
    user.is_custom = false;

    let mut admin = RoleDefinition::new("admin", "Full access to all resources and features")
        .with_allow(ResourceRule::new(&["*"], &Action::ALL, &["*"]))
        .with_allowed_features(&[Feature::Any]);
    admin.is_custom = false;

    vec![viewer, user, admin]
}
