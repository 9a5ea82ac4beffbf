//! Authentication and authorization types

use super::credentials::{CredentialVerifier, Identity, StaticCredentialVerifier};
use crate::config::Config;
use crate::storage::{AuditSink, RoleStore, TracingAuditSink};
use std::sync::Arc;
use std::time::Duration;

/// External collaborators the trust system calls out to
#[derive(Clone)]
pub struct Collaborators {
    /// Destination for audit records
    pub audit: Arc<dyn AuditSink>,
    /// Durable custom role storage, if any
    pub roles: Option<Arc<dyn RoleStore>>,
    /// Username/password checker for the login flow
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl Collaborators {
    /// Tracing audit sink, no role store, users from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            audit: Arc::new(TracingAuditSink),
            roles: None,
            credentials: Arc::new(StaticCredentialVerifier::from_config(config.credentials())),
        }
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_role_store(mut self, roles: Arc<dyn RoleStore>) -> Self {
        self.roles = Some(roles);
        self
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialVerifier>) -> Self {
        self.credentials = credentials;
        self
    }
}

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted and a session token issued
    Success {
        identity: Identity,
        token: String,
        expires_at: i64,
    },
    /// Wrong credentials; the caller stalls for `delay` before answering
    Failed { delay: Duration },
    /// Client is blocked; no credentials were checked
    Blocked { retry_after: Duration },
}
