//! Audit records for security-relevant decisions

use crate::auth::rbac::Action;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Kind of security decision being recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditActionType {
    AccessRequest,
    AccessApproved,
    AccessDenied,
    AuthzDenied,
    FeatureDenied,
    BruteForceBlocked,
    Login,
}

impl AuditActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditActionType::AccessRequest => "access_request",
            AuditActionType::AccessApproved => "access_approved",
            AuditActionType::AccessDenied => "access_denied",
            AuditActionType::AuthzDenied => "authz_denied",
            AuditActionType::FeatureDenied => "feature_denied",
            AuditActionType::BruteForceBlocked => "brute_force_blocked",
            AuditActionType::Login => "login",
        }
    }
}

/// One audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Identity that triggered the event
    pub user: String,
    /// Short verb, e.g. `approve`, `login`
    pub action: String,
    pub resource: String,
    pub details: String,
    pub action_type: AuditActionType,
    /// Component that produced the record
    pub source: String,
    pub client_ip: Option<String>,
    pub success: bool,
    pub error_msg: Option<String>,
    pub requested_action: Option<Action>,
    pub target_resource: Option<String>,
    pub target_namespace: Option<String>,
    pub access_request_id: Option<String>,
    pub reviewer_user: Option<String>,
    /// Reason string from the authorizer, for denials
    pub authz_decision: Option<String>,
}

impl AuditEntry {
    pub fn new(
        action_type: AuditActionType,
        user: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user: user.into(),
            action: action.into(),
            resource: String::new(),
            details: String::new(),
            action_type,
            source: "trustgate".to_string(),
            client_ip: None,
            success: true,
            error_msg: None,
            requested_action: None,
            target_resource: None,
            target_namespace: None,
            access_request_id: None,
            reviewer_user: None,
            authz_decision: None,
        }
    }

    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// Mark the record as a failed or denied operation
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error_msg = Some(error.into());
        self
    }

    /// Requested action and its target
    pub fn target(mut self, action: Action, resource: &str, namespace: &str) -> Self {
        self.requested_action = Some(action);
        self.target_resource = Some(resource.to_string());
        self.target_namespace = Some(namespace.to_string());
        self
    }

    pub fn access_request(mut self, id: impl Into<String>) -> Self {
        self.access_request_id = Some(id.into());
        self
    }

    pub fn reviewer(mut self, reviewer: impl Into<String>) -> Self {
        self.reviewer_user = Some(reviewer.into());
        self
    }

    pub fn decision(mut self, reason: impl Into<String>) -> Self {
        self.authz_decision = Some(reason.into());
        self
    }
}

/// Destination for audit records
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry) -> Result<()>;
}

/// Record `entry`, logging instead of failing when the sink errors
pub fn emit(sink: &dyn AuditSink, entry: AuditEntry) {
    let action_type = entry.action_type;
    let id = entry.id;
    if let Err(e) = sink.record(entry) {
        warn!(
            audit_id = %id,
            action_type = action_type.as_str(),
            "Failed to write audit record: {}",
            e
        );
    }
}

/// Writes each record as a structured log line under the `audit` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: AuditEntry) -> Result<()> {
        let payload = serde_json::to_string(&entry)?;
        info!(
            target: "audit",
            action_type = entry.action_type.as_str(),
            user = %entry.user,
            success = entry.success,
            "{}",
            payload
        );
        Ok(())
    }
}

/// Keeps records in memory
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every record so far, oldest first
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }

    /// Records of one kind
    pub fn entries_of(&self, action_type: AuditActionType) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.action_type == action_type)
            .cloned()
            .collect()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, entry: AuditEntry) -> Result<()> {
        self.entries.lock().push(entry);
        Ok(())
    }
}
