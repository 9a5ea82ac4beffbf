//! Cross-component scenarios
//!
//! Role changes, throttling, background sweeps and concurrent use observed
//! through the assembled trust system.

#[cfg(test)]
mod tests {
    use crate::common::{TestEnv, bearer, read_json, test_config};
    use crate::init_app;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use trustgate::auth::rbac::{ResourceRule, RoleDefinition};
    use trustgate::auth::{AccessRequestState, Action};

    #[actix_web::test]
    async fn test_dev_role_scenario() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let root = env.token("root", "admin");

        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/roles")
                .insert_header(bearer(&root))
                .set_json(json!({
                    "name": "dev",
                    "allow": [{
                        "resources": ["pods", "deployments"],
                        "actions": ["view", "scale"],
                        "namespaces": ["dev-*", "staging"]
                    }]
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let authorizer = &env.trust.authorizer;
        assert!(authorizer.is_allowed("dev", "pods", Action::View, "dev-team1").allowed);
        assert!(authorizer.is_allowed("dev", "deployments", Action::Scale, "staging").allowed);
        assert!(!authorizer.is_allowed("dev", "pods", Action::View, "production").allowed);
        assert!(!authorizer.is_allowed("dev", "pods", Action::Delete, "dev-team1").allowed);
        assert!(!authorizer.is_allowed("dev", "secrets", Action::View, "dev-team1").allowed);
    }

    #[actix_web::test]
    async fn test_deny_overrides_allow_in_either_order() {
        let env = TestEnv::standard().await;
        let allow_all = ResourceRule::new(&["*"], &[Action::Any], &["*"]);
        let deny_secrets = ResourceRule::new(&["secrets"], &[Action::View], &["*"]);

        let deny_first = RoleDefinition::new("deny-first", "")
            .with_deny(deny_secrets.clone())
            .with_allow(allow_all.clone());
        let allow_first = RoleDefinition::new("allow-first", "")
            .with_allow(allow_all)
            .with_deny(deny_secrets);

        env.trust.authorizer.save_custom_role(deny_first).await.unwrap();
        env.trust.authorizer.save_custom_role(allow_first).await.unwrap();

        for role in ["deny-first", "allow-first"] {
            let decision = env
                .trust
                .authorize("alice", role, "secrets", Action::View, "prod");
            assert!(!decision.allowed, "{}", role);
            assert!(decision.reason.contains("deny rule"), "{}", decision.reason);
            assert!(
                env.trust
                    .authorize("alice", role, "configmaps", Action::View, "prod")
                    .allowed
            );
        }
    }

    #[actix_web::test]
    async fn test_api_quota_through_the_app() {
        let mut config = test_config();
        config.trust.rate_limit.api.limit = 3;
        config.trust.rate_limit.api.window_secs = 1;
        let env = TestEnv::new(config).await;
        let app = init_app!(env);
        let token = env.token("alice", "user");

        let features = || {
            TestRequest::get()
                .uri("/api/features")
                .insert_header(bearer(&token))
                .insert_header(("x-forwarded-for", "198.51.100.7"))
                .to_request()
        };

        for _ in 0..3 {
            let resp = test::call_service(&app, features()).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
        let resp = test::call_service(&app, features()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(read_json(resp).await["error"]["code"], "RATE_LIMIT_EXCEEDED");

        // Health checks are never throttled
        let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        let resp = test::call_service(&app, features()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_sweeps_expire_pending_requests() {
        let mut config = test_config();
        config.trust.access_requests.ttl_secs = 1;
        config.trust.access_requests.cleanup_interval_secs = 1;
        let env = TestEnv::new(config).await;

        let sweeps = env.trust.start_sweeps(&env.config);
        assert_eq!(sweeps.len(), 4);

        let access = &env.trust.access;
        let id = access.create_request("alice", Action::Exec, "pods", "kube-system", "debug");
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(
            access.get_request(&id).unwrap().state,
            AccessRequestState::Expired
        );
        sweeps.stop().await;
    }

    #[actix_web::test]
    async fn test_systems_do_not_share_state() {
        let first = TestEnv::standard().await;
        let second = TestEnv::standard().await;

        first
            .trust
            .authorizer
            .save_custom_role(RoleDefinition::new("ops", "Operators"))
            .await
            .unwrap();
        first
            .trust
            .access
            .create_request("alice", Action::Delete, "pods", "default", "cleanup");
        for _ in 0..5 {
            first.trust.brute_force.record_failure("10.1.1.1");
        }

        assert!(second.trust.authorizer.get_role("ops").is_none());
        assert!(second.trust.access.get_pending_requests().is_empty());
        assert!(!second.trust.brute_force.is_blocked("10.1.1.1"));
        assert!(first.trust.brute_force.is_blocked("10.1.1.1"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_authorization_during_role_churn() {
        let env = TestEnv::standard().await;
        let trust = Arc::new(env.trust.clone());

        let writer = {
            let trust = trust.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    let name = format!("churn-{}", i % 5);
                    let role = RoleDefinition::new(name.clone(), "")
                        .with_allow(ResourceRule::new(&["pods"], &[Action::View], &["*"]));
                    trust.authorizer.save_custom_role(role).await.unwrap();
                    if i % 2 == 0 {
                        let _ = trust.authorizer.remove_custom_role(&name).await;
                    }
                    tokio::task::yield_now().await;
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let trust = trust.clone();
                tokio::spawn(async move {
                    for _ in 0..200 {
                        let authorizer = &trust.authorizer;
                        let decision = authorizer.is_allowed("admin", "nodes", Action::Delete, "");
                        assert!(decision.allowed);
                        assert!(
                            !authorizer
                                .is_allowed("viewer", "pods", Action::Delete, "default")
                                .allowed
                        );
                        assert!(
                            !trust
                                .authorizer
                                .is_allowed("user", "pods", Action::Exec, "kube-system")
                                .allowed
                        );
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
