//! Access request types

use crate::auth::rbac::Action;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an access request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRequestState {
    Pending,
    Approved,
    Denied,
    Expired,
}

impl fmt::Display for AccessRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccessRequestState::Pending => "pending",
            AccessRequestState::Approved => "approved",
            AccessRequestState::Denied => "denied",
            AccessRequestState::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// A request for an action the requester's role does not permit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub id: String,
    pub requested_by: String,
    pub action: Action,
    pub resource: String,
    pub namespace: String,
    pub reason: String,
    pub state: AccessRequestState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

impl AccessRequest {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether this approved grant covers the queried operation
    pub(super) fn grants(&self, resource: &str, action: Action, namespace: &str) -> bool {
        self.action == action
            && (self.resource == resource || self.resource == "*")
            && (namespace.is_empty() || self.namespace == namespace || self.namespace == "*")
    }
}
