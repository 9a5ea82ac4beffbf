//! Test fixtures and factories

use actix_web::dev::ServiceResponse;
use actix_web::test;
use std::collections::HashMap;
use std::sync::Arc;
use trustgate::auth::{CredentialVerifier, Identity, SessionClaims};
use trustgate::storage::{MemoryAuditSink, MemoryRoleStore};
use trustgate::{Collaborators, Config, TrustSystem};

/// Signing secret shared by every test configuration
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Defaults with a fixed secret and no failure delays
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.trust.token.secret = Some(TEST_SECRET.to_string());
    config.trust.brute_force.delays_secs = vec![0];
    config
}

/// Plain-text credential verifier; avoids argon2 cost in request-level tests
#[derive(Debug, Default)]
pub struct PlainCredentials {
    users: HashMap<String, (String, String)>,
}

impl PlainCredentials {
    pub fn with_user(mut self, username: &str, password: &str, role: &str) -> Self {
        self.users.insert(
            username.to_string(),
            (password.to_string(), role.to_string()),
        );
        self
    }
}

#[async_trait::async_trait]
impl CredentialVerifier for PlainCredentials {
    async fn verify(&self, username: &str, password: &str) -> trustgate::Result<Option<Identity>> {
        Ok(self
            .users
            .get(username)
            .filter(|(expected, _)| expected == password)
            .map(|(_, role)| Identity {
                subject: format!("uid-{}", username),
                username: username.to_string(),
                role: role.to_string(),
            }))
    }
}

/// Trust system plus handles on its in-memory collaborators
pub struct TestEnv {
    pub config: Config,
    pub trust: TrustSystem,
    pub audit: Arc<MemoryAuditSink>,
    pub roles: Arc<MemoryRoleStore>,
}

impl TestEnv {
    /// Users: `alice` and `bob` (user), `root` (admin), `vera` (viewer)
    pub async fn new(config: Config) -> Self {
        let audit = Arc::new(MemoryAuditSink::new());
        let roles = Arc::new(MemoryRoleStore::new());
        let credentials = PlainCredentials::default()
            .with_user("alice", "wonderland", "user")
            .with_user("bob", "builder", "user")
            .with_user("root", "toor", "admin")
            .with_user("vera", "readonly", "viewer");

        let collaborators = Collaborators::from_config(&config)
            .with_audit(audit.clone())
            .with_role_store(roles.clone())
            .with_credentials(Arc::new(credentials));
        let trust = TrustSystem::new(&config, collaborators)
            .await
            .expect("trust system");

        Self {
            config,
            trust,
            audit,
            roles,
        }
    }

    pub async fn standard() -> Self {
        Self::new(test_config()).await
    }

    /// Signed token for `username` with `role`
    pub fn token(&self, username: &str, role: &str) -> String {
        self.trust
            .tokens
            .generate_token(SessionClaims::new(
                format!("uid-{}", username),
                username,
                role,
                "test-session",
            ))
            .expect("token")
    }
}

/// `Authorization` header pair for a token
pub fn bearer(token: &str) -> (&'static str, String) {
    ("authorization", format!("Bearer {}", token))
}

/// Read a response body as JSON
pub async fn read_json<B>(resp: ServiceResponse<B>) -> serde_json::Value
where
    B: actix_web::body::MessageBody,
{
    test::read_body_json(resp).await
}

/// Build the full application for a test environment
#[macro_export]
macro_rules! init_app {
    ($env:expr) => {
        actix_web::test::init_service(trustgate::server::create_app(actix_web::web::Data::new(
            trustgate::server::AppState::new($env.config.clone(), $env.trust.clone()),
        )))
        .await
    };
}
