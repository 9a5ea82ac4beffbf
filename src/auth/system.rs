//! Core trust system implementation

use super::access::AccessRequestManager;
use super::credentials::CredentialVerifier;
use super::rbac::{Action, Authorizer, AuthzDecision, Feature};
use super::token::{SessionClaims, TokenManager, generate_session_id};
use super::types::{Collaborators, LoginOutcome};
use crate::config::Config;
use crate::protection::{BruteForceProtector, RateLimiter};
use crate::storage::{AuditActionType, AuditEntry, AuditSink, emit};
use crate::utils::SweepHandle;
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Every trust component, explicitly constructed and shared through `Arc`
#[derive(Clone)]
pub struct TrustSystem {
    pub authorizer: Arc<Authorizer>,
    pub access: Arc<AccessRequestManager>,
    pub tokens: Arc<TokenManager>,
    pub brute_force: Arc<BruteForceProtector>,
    /// Limiter for login/logout/credential endpoints
    pub auth_limiter: Arc<RateLimiter>,
    /// Limiter for every other API endpoint
    pub api_limiter: Arc<RateLimiter>,
    pub audit: Arc<dyn AuditSink>,
    pub credentials: Arc<dyn CredentialVerifier>,
    /// Role assumed when a request carries none
    pub default_role: String,
    /// Whether the rate limiting middleware throttles at all
    pub rate_limit_enabled: bool,
}

impl TrustSystem {
    /// Create a new trust system
    pub async fn new(config: &Config, collaborators: Collaborators) -> Result<Self> {
        info!("Initializing trust system");

        let mut authorizer = Authorizer::with_roles(config.rbac().custom_roles.clone())?;
        if let Some(store) = collaborators.roles.clone() {
            authorizer = authorizer.with_store(store);
            authorizer.load_from_store().await?;
        }

        let rate_limit = config.rate_limit();
        let system = Self {
            authorizer: Arc::new(authorizer),
            access: Arc::new(AccessRequestManager::from_config(
                config.access_requests(),
                collaborators.audit.clone(),
            )),
            tokens: Arc::new(TokenManager::new(config.token())),
            brute_force: Arc::new(BruteForceProtector::from_config(config.brute_force())),
            auth_limiter: Arc::new(RateLimiter::from_config(&rate_limit.auth)),
            api_limiter: Arc::new(RateLimiter::from_config(&rate_limit.api)),
            audit: collaborators.audit,
            credentials: collaborators.credentials,
            default_role: config.rbac().default_role.clone(),
            rate_limit_enabled: rate_limit.enabled,
        };

        info!("Trust system initialized successfully");
        Ok(system)
    }

    /// Start the periodic cleanup sweeps with the configured intervals
    pub fn start_sweeps(&self, config: &Config) -> Sweeps {
        let rate_interval = config.rate_limit().cleanup_interval();
        let login_interval = config.brute_force().cleanup_interval();
        let access_interval = config.access_requests().cleanup_interval();
        Sweeps(vec![
            Arc::clone(&self.brute_force).start_cleanup_task(login_interval),
            Arc::clone(&self.auth_limiter).start_cleanup_task(rate_interval),
            Arc::clone(&self.api_limiter).start_cleanup_task(rate_interval),
            Arc::clone(&self.access).start_cleanup_task(access_interval),
        ])
    }

    /// Authorize an operation, honouring approved access requests.
    ///
    /// Denials are audited.
    pub fn authorize(
        &self,
        user: &str,
        role: &str,
        resource: &str,
        action: Action,
        namespace: &str,
    ) -> AuthzDecision {
        let decision = self.authorizer.is_allowed(role, resource, action, namespace);
        if decision.allowed {
            return decision;
        }

        if self.access.is_approved(user, resource, action, namespace) {
            return AuthzDecision {
                allowed: true,
                reason: "allowed by approved access request".to_string(),
            };
        }

        warn!(
            user,
            role,
            %action,
            resource,
            namespace,
            "Authorization denied: {}",
            decision.reason
        );
        emit(
            self.audit.as_ref(),
            AuditEntry::new(AuditActionType::AuthzDenied, user, action.as_str())
                .source("authorizer")
                .resource(resource)
                .details(format!("role {}", role))
                .target(action, resource, namespace)
                .decision(&decision.reason)
                .failed("forbidden"),
        );
        decision
    }

    /// Check a feature gate; denials are audited
    pub fn check_feature(&self, user: &str, role: &str, feature: Feature) -> bool {
        if self.authorizer.is_feature_allowed(role, feature) {
            return true;
        }

        warn!(user, role, %feature, "Feature access denied");
        emit(
            self.audit.as_ref(),
            AuditEntry::new(AuditActionType::FeatureDenied, user, feature.as_str())
                .source("authorizer")
                .resource(feature.as_str())
                .details(format!("role {}", role))
                .decision(format!("feature {} not allowed for role {}", feature, role))
                .failed("forbidden"),
        );
        false
    }

    /// Run the login flow for `client_id`.
    ///
    /// Blocked clients are refused without checking credentials. A failure
    /// returns the delay the caller must wait before answering.
    pub async fn login(
        &self,
        client_id: &str,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome> {
        if self.brute_force.is_blocked(client_id) {
            return Ok(self.blocked(client_id, username));
        }

        match self.credentials.verify(username, password).await? {
            Some(identity) => {
                self.brute_force.record_success(client_id);
                let claims = SessionClaims::new(
                    identity.subject.clone(),
                    identity.username.clone(),
                    identity.role.clone(),
                    generate_session_id(),
                );
                let token = self.tokens.generate_token(claims)?;
                let expires_at = self.tokens.validate_token(&token)?.exp;

                info!("User {} logged in", identity.username);
                emit(
                    self.audit.as_ref(),
                    AuditEntry::new(AuditActionType::Login, &identity.username, "login")
                        .source("login")
                        .client_ip(client_id),
                );
                Ok(LoginOutcome::Success {
                    identity,
                    token,
                    expires_at,
                })
            }
            None => {
                let delay = self.brute_force.record_failure(client_id);
                emit(
                    self.audit.as_ref(),
                    AuditEntry::new(AuditActionType::Login, username, "login")
                        .source("login")
                        .client_ip(client_id)
                        .failed("invalid credentials"),
                );
                if self.brute_force.is_blocked(client_id) {
                    return Ok(self.blocked(client_id, username));
                }
                Ok(LoginOutcome::Failed { delay })
            }
        }
    }

    fn blocked(&self, client_id: &str, username: &str) -> LoginOutcome {
        let retry_after = self
            .brute_force
            .remaining_block(client_id)
            .unwrap_or(Duration::from_secs(1));

        warn!("Login refused for blocked client {}", client_id);
        emit(
            self.audit.as_ref(),
            AuditEntry::new(AuditActionType::BruteForceBlocked, username, "login")
                .source("brute_force")
                .client_ip(client_id)
                .details(format!("blocked for another {}s", retry_after.as_secs()))
                .failed("too many failed login attempts"),
        );
        LoginOutcome::Blocked { retry_after }
    }
}

impl std::fmt::Debug for TrustSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustSystem")
            .field("authorizer", &self.authorizer)
            .field("access", &self.access)
            .field("tokens", &self.tokens)
            .field("brute_force", &self.brute_force)
            .field("auth_limiter", &self.auth_limiter)
            .field("api_limiter", &self.api_limiter)
            .field("default_role", &self.default_role)
            .finish()
    }
}

/// Running cleanup sweeps
#[derive(Debug)]
pub struct Sweeps(Vec<SweepHandle>);

impl Sweeps {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stop every sweep and wait for them to exit
    pub async fn stop(self) {
        for handle in self.0 {
            handle.stop().await;
        }
        info!("Background sweeps stopped");
    }
}
