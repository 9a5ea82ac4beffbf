//! Access request workflow

use super::types::{AccessRequest, AccessRequestState};
use crate::auth::rbac::Action;
use crate::auth::token::generate_session_id;
use crate::config::AccessRequestConfig;
use crate::storage::{AuditActionType, AuditEntry, AuditSink, emit};
use crate::utils::SweepHandle;
use crate::utils::error::{Result, TrustError};
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Owns every access request and its state transitions
pub struct AccessRequestManager {
    requests: Mutex<HashMap<String, AccessRequest>>,
    ttl: TimeDelta,
    audit: Arc<dyn AuditSink>,
}

impl AccessRequestManager {
    /// Create a manager; a zero `ttl` falls back to 30 minutes
    pub fn new(ttl: Duration, audit: Arc<dyn AuditSink>) -> Self {
        let ttl = if ttl.is_zero() { DEFAULT_TTL } else { ttl };
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::minutes(30));

        Self {
            requests: Mutex::new(HashMap::new()),
            ttl,
            audit,
        }
    }

    pub fn from_config(config: &AccessRequestConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self::new(config.ttl(), audit)
    }

    /// Submit a new pending request and return its id
    pub fn create_request(
        &self,
        requester: &str,
        action: Action,
        resource: &str,
        namespace: &str,
        reason: &str,
    ) -> String {
        let now = Utc::now();
        let id = new_request_id();
        let request = AccessRequest {
            id: id.clone(),
            requested_by: requester.to_string(),
            action,
            resource: resource.to_string(),
            namespace: namespace.to_string(),
            reason: reason.to_string(),
            state: AccessRequestState::Pending,
            reviewed_by: None,
            review_note: None,
            created_at: now,
            reviewed_at: None,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        self.requests.lock().insert(id.clone(), request);

        info!(
            request_id = %id,
            requester,
            %action,
            resource,
            namespace,
            "Access request created"
        );
        emit(
            self.audit.as_ref(),
            AuditEntry::new(AuditActionType::AccessRequest, requester, "access_request_created")
                .source("access_requests")
                .resource(resource)
                .details(format!(
                    "Requested {} on {}/{}: {}",
                    action, namespace, resource, reason
                ))
                .target(action, resource, namespace)
                .access_request(&id),
        );
        id
    }

    /// Approve a pending request.
    ///
    /// The reviewer must differ from the requester. A request found past its
    /// expiry is moved to `expired` and the approval fails.
    pub fn approve_request(&self, id: &str, reviewer: &str, note: &str) -> Result<()> {
        let approved = {
            let mut requests = self.requests.lock();
            let request = pending_request(&mut requests, id)?;

            if request.requested_by == reviewer {
                warn!(request_id = id, reviewer, "Self-approval attempt rejected");
                return Err(TrustError::SelfApproval);
            }

            let now = Utc::now();
            if request.is_expired_at(now) {
                request.state = AccessRequestState::Expired;
                return Err(TrustError::RequestExpired(id.to_string()));
            }

            review(request, AccessRequestState::Approved, reviewer, note, now);
            request.clone()
        };

        info!(request_id = id, reviewer, "Access request approved");
        emit(
            self.audit.as_ref(),
            AuditEntry::new(AuditActionType::AccessApproved, reviewer, "access_request_approved")
                .source("access_requests")
                .resource(&approved.resource)
                .details(format!(
                    "Approved {} on {}/{} for {}",
                    approved.action, approved.namespace, approved.resource, approved.requested_by
                ))
                .target(approved.action, &approved.resource, &approved.namespace)
                .access_request(id)
                .reviewer(reviewer)
                .decision("approved"),
        );
        Ok(())
    }

    /// Deny a pending request; requesters may deny their own
    pub fn deny_request(&self, id: &str, reviewer: &str, note: &str) -> Result<()> {
        let denied = {
            let mut requests = self.requests.lock();
            let request = pending_request(&mut requests, id)?;
            review(request, AccessRequestState::Denied, reviewer, note, Utc::now());
            request.clone()
        };

        info!(request_id = id, reviewer, "Access request denied");
        emit(
            self.audit.as_ref(),
            AuditEntry::new(AuditActionType::AccessDenied, reviewer, "access_request_denied")
                .source("access_requests")
                .resource(&denied.resource)
                .details(format!(
                    "Denied {} on {}/{} for {}: {}",
                    denied.action, denied.namespace, denied.resource, denied.requested_by, note
                ))
                .target(denied.action, &denied.resource, &denied.namespace)
                .access_request(id)
                .reviewer(reviewer)
                .decision("denied"),
        );
        Ok(())
    }

    /// Whether `requester` holds an unexpired approved grant for the operation.
    ///
    /// An empty `namespace` matches a grant for any namespace.
    pub fn is_approved(
        &self,
        requester: &str,
        resource: &str,
        action: Action,
        namespace: &str,
    ) -> bool {
        let now = Utc::now();
        self.requests.lock().values().any(|request| {
            request.requested_by == requester
                && request.state == AccessRequestState::Approved
                && !request.is_expired_at(now)
                && request.grants(resource, action, namespace)
        })
    }

    /// Pending requests that have not yet expired, oldest first
    pub fn get_pending_requests(&self) -> Vec<AccessRequest> {
        let now = Utc::now();
        let mut pending: Vec<_> = self
            .requests
            .lock()
            .values()
            .filter(|r| r.state == AccessRequestState::Pending && !r.is_expired_at(now))
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.created_at);
        pending
    }

    pub fn get_request(&self, id: &str) -> Option<AccessRequest> {
        self.requests.lock().get(id).cloned()
    }

    /// Every request in any state, newest first
    pub fn list_requests(&self) -> Vec<AccessRequest> {
        let mut all: Vec<_> = self.requests.lock().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    /// Move every pending request past its expiry to `expired`.
    ///
    /// Returns how many requests changed state.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut expired = 0;
        for request in self.requests.lock().values_mut() {
            if request.state == AccessRequestState::Pending && request.is_expired_at(now) {
                request.state = AccessRequestState::Expired;
                expired += 1;
            }
        }

        if expired > 0 {
            debug!("Expired {} pending access requests", expired);
        }
        expired
    }

    /// Run `cleanup_expired` every `interval` until the handle is stopped
    pub fn start_cleanup_task(self: Arc<Self>, interval: Duration) -> SweepHandle {
        SweepHandle::spawn("access-request", interval, move || {
            let manager = Arc::clone(&self);
            async move {
                manager.cleanup_expired();
            }
        })
    }
}

impl std::fmt::Debug for AccessRequestManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessRequestManager")
            .field("requests", &self.requests.lock().len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn new_request_id() -> String {
    let mut id = generate_session_id();
    id.truncate(20);
    format!("ar-{}", id)
}

fn pending_request<'a>(
    requests: &'a mut HashMap<String, AccessRequest>,
    id: &str,
) -> Result<&'a mut AccessRequest> {
    let request = requests
        .get_mut(id)
        .ok_or_else(|| TrustError::not_found(format!("access request not found: {}", id)))?;

    if request.state != AccessRequestState::Pending {
        return Err(TrustError::invalid_state(format!(
            "access request is not pending: {} (current state: {})",
            id, request.state
        )));
    }
    Ok(request)
}

fn review(
    request: &mut AccessRequest,
    state: AccessRequestState,
    reviewer: &str,
    note: &str,
    at: DateTime<Utc>,
) {
    request.state = state;
    request.reviewed_by = Some(reviewer.to_string());
    request.review_note = Some(note.to_string());
    request.reviewed_at = Some(at);
}
