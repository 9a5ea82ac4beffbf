//! Login, brute-force protection and session token tests

#[cfg(test)]
mod tests {
    use crate::common::{TestEnv, bearer, read_json, test_config};
    use crate::init_app;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use serde_json::json;
    use std::time::{Duration, Instant};
    use trustgate::auth::SessionClaims;
    use trustgate::storage::AuditActionType;

    fn login_request(client: &str, username: &str, password: &str) -> TestRequest {
        TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("x-forwarded-for", client))
            .set_json(json!({ "username": username, "password": password }))
    }

    #[actix_web::test]
    async fn test_login_then_session_lookup() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);

        let resp = test::call_service(
            &app,
            login_request("10.0.0.1", "alice", "wonderland").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["username"], "alice");
        assert_eq!(body["data"]["role"], "user");
        let token = body["data"]["token"].as_str().unwrap().to_string();
        assert_eq!(token.split('.').count(), 3);

        let resp = test::call_service(
            &app,
            TestRequest::get()
                .uri("/api/auth/me")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["username"], "alice");
        assert_eq!(body["data"]["subject"], "uid-alice");
        assert_eq!(body["data"]["role"], "user");

        assert_eq!(env.audit.entries_of(AuditActionType::Login).len(), 1);
    }

    #[actix_web::test]
    async fn test_wrong_password_is_unauthorized() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);

        let resp = test::call_service(
            &app,
            login_request("10.0.0.2", "alice", "nope").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(resp).await;
        assert_eq!(body["error"]["code"], "UNAUTHENTICATED");

        // Unknown users get the same answer
        let resp = test::call_service(
            &app,
            login_request("10.0.0.2", "mallory", "nope").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(env.trust.brute_force.failure_count("10.0.0.2"), 2);
    }

    #[actix_web::test]
    async fn test_missing_fields_are_bad_request() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);

        let resp = test::call_service(
            &app,
            login_request("10.0.0.3", "alice", "").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/auth/login")
                .insert_header(("content-type", "application/json"))
                .set_payload("{\"username\": 42")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_repeated_failures_block_the_client() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);

        for _ in 0..4 {
            let resp = test::call_service(
                &app,
                login_request("10.0.0.4", "alice", "guess").to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }

        // The fifth failure trips the block
        let resp = test::call_service(
            &app,
            login_request("10.0.0.4", "alice", "guess").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry: u64 = resp
            .headers()
            .get("retry-after")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!((1..=900).contains(&retry));

        // Correct credentials are not even checked while blocked
        let resp = test::call_service(
            &app,
            login_request("10.0.0.4", "alice", "wonderland").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        // Other clients are unaffected
        let resp = test::call_service(
            &app,
            login_request("10.0.0.5", "alice", "wonderland").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        assert_eq!(
            env.audit.entries_of(AuditActionType::BruteForceBlocked).len(),
            2
        );
        assert_eq!(env.trust.brute_force.blocks_issued(), 1);
    }

    #[actix_web::test]
    async fn test_success_resets_failure_count() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);

        for _ in 0..3 {
            test::call_service(&app, login_request("10.0.0.6", "bob", "x").to_request()).await;
        }
        assert_eq!(env.trust.brute_force.failure_count("10.0.0.6"), 3);

        let resp = test::call_service(
            &app,
            login_request("10.0.0.6", "bob", "builder").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(env.trust.brute_force.failure_count("10.0.0.6"), 0);
    }

    #[actix_web::test]
    async fn test_failed_login_waits_out_the_delay() {
        let mut config = test_config();
        config.trust.brute_force.delays_secs = vec![1];
        let env = TestEnv::new(config).await;
        let app = init_app!(env);

        let started = Instant::now();
        let resp = test::call_service(
            &app,
            login_request("10.0.0.7", "alice", "bad").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[actix_web::test]
    async fn test_refresh_inside_window() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);

        let mut claims = SessionClaims::new("uid-bob", "bob", "user", "sid-1");
        claims.exp = chrono::Utc::now().timestamp() + 60;
        let near_expiry = env.trust.tokens.generate_token(claims).unwrap();

        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/auth/refresh")
                .insert_header(bearer(&near_expiry))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["username"], "bob");
        let expires_at = body["data"]["expires_at"].as_i64().unwrap();
        assert!(expires_at > chrono::Utc::now().timestamp() + 600);
    }

    #[actix_web::test]
    async fn test_refresh_outside_window_returns_same_token() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let token = env.token("bob", "user");

        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/auth/refresh")
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("x-refreshed-token").is_none());
        let body = read_json(resp).await;
        assert_eq!(body["data"]["token"], token.as_str());
    }

    #[actix_web::test]
    async fn test_refresh_requires_a_valid_token() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);

        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/auth/refresh")
                .insert_header(bearer("not.a.token"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(resp).await;
        assert_eq!(body["error"]["message"], "invalid or expired token");
    }

    #[actix_web::test]
    async fn test_protected_routes_require_a_token() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);

        for uri in ["/api/auth/me", "/api/roles", "/api/access/requests"] {
            let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }

        let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_spoofed_role_header_is_ignored() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let token = env.token("vera", "viewer");

        let resp = test::call_service(
            &app,
            TestRequest::get()
                .uri("/api/features")
                .insert_header(bearer(&token))
                .insert_header(("x-user-role", "admin"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["role"], "viewer");
        assert_eq!(body["data"]["features"]["settings_admin"], false);
    }
}
