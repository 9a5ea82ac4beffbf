//! Access request workflow integration tests
//!
//! Covers filing, reviewing and expiring requests over HTTP, and the effect
//! of an approved request on authorization.

#[cfg(test)]
mod tests {
    use crate::common::{TestEnv, bearer, read_json, test_config};
    use crate::init_app;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use serde_json::{Value, json};
    use std::time::Duration;
    use trustgate::auth::{AccessRequestState, Action};
    use trustgate::storage::AuditActionType;

    fn file_request(token: &str, body: Value) -> TestRequest {
        TestRequest::post()
            .uri("/api/access/request")
            .insert_header(bearer(token))
            .set_json(body)
    }

    fn review(token: &str, verb: &str, id: &str) -> TestRequest {
        TestRequest::post()
            .uri(&format!("/api/access/{}/{}", verb, id))
            .insert_header(bearer(token))
            .set_json(json!({ "note": "reviewed" }))
    }

    fn exec_in_kube_system() -> Value {
        json!({
            "action": "exec",
            "resource": "pods",
            "namespace": "kube-system",
            "reason": "debug dns"
        })
    }

    #[actix_web::test]
    async fn test_create_and_list_requests() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let alice = env.token("alice", "user");

        let req = file_request(&alice, exec_in_kube_system()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["status"], "pending");
        let id = body["data"]["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("ar-"));
        assert_eq!(id.len(), 23);

        let resp = test::call_service(
            &app,
            TestRequest::get()
                .uri("/api/access/requests")
                .insert_header(bearer(&alice))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["total"], 1);
        let listed = &body["data"]["requests"][0];
        assert_eq!(listed["id"], id.as_str());
        assert_eq!(listed["requested_by"], "alice");
        assert_eq!(listed["action"], "exec");
        assert_eq!(listed["state"], "pending");

        assert_eq!(env.audit.entries_of(AuditActionType::AccessRequest).len(), 1);
    }

    #[actix_web::test]
    async fn test_create_rejects_bad_input() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let alice = env.token("alice", "user");

        let resp = test::call_service(
            &app,
            file_request(&alice, json!({ "action": "exec", "resource": "" })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(
            &app,
            file_request(&alice, json!({ "action": "teleport", "resource": "pods" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(
            &app,
            file_request(&alice, json!({ "action": "*", "resource": "pods" })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(env.trust.access.list_requests().is_empty());
    }

    #[actix_web::test]
    async fn test_approval_grants_the_operation() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let alice = env.token("alice", "user");
        let root = env.token("root", "admin");

        assert!(
            !env.trust
                .authorize("alice", "user", "pods", Action::Exec, "kube-system")
                .allowed
        );

        let req = file_request(&alice, exec_in_kube_system()).to_request();
        let resp = test::call_service(&app, req).await;
        let id = read_json(resp).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = test::call_service(&app, review(&root, "approve", &id).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["status"], "approved");

        let request = env.trust.access.get_request(&id).unwrap();
        assert_eq!(request.state, AccessRequestState::Approved);
        assert_eq!(request.reviewed_by.as_deref(), Some("root"));
        assert_eq!(request.review_note.as_deref(), Some("reviewed"));

        // The deny rule is overridden only for the approved requester
        assert!(
            env.trust
                .authorize("alice", "user", "pods", Action::Exec, "kube-system")
                .allowed
        );
        assert!(
            !env.trust
                .authorize("bob", "user", "pods", Action::Exec, "kube-system")
                .allowed
        );

        // A reviewed request cannot be reviewed again
        let resp = test::call_service(&app, review(&root, "approve", &id).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = read_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_STATE");

        let resp = test::call_service(&app, review(&root, "deny", &id).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let approvals = env.audit.entries_of(AuditActionType::AccessApproved);
        assert_eq!(approvals.len(), 1);
        assert_eq!(approvals[0].source, "access_requests");
        assert_eq!(approvals[0].reviewer_user.as_deref(), Some("root"));
        assert_eq!(approvals[0].access_request_id.as_deref(), Some(id.as_str()));
    }

    #[actix_web::test]
    async fn test_review_requires_settings_admin() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let alice = env.token("alice", "user");
        let bob = env.token("bob", "user");

        let req = file_request(&alice, exec_in_kube_system()).to_request();
        let resp = test::call_service(&app, req).await;
        let id = read_json(resp).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = test::call_service(&app, review(&bob, "approve", &id).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = read_json(resp).await;
        assert_eq!(body["error"]["code"], "FORBIDDEN");
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("role user does not have access to feature settings_admin")
        );

        let request = env.trust.access.get_request(&id).unwrap();
        assert_eq!(request.state, AccessRequestState::Pending);
    }

    #[actix_web::test]
    async fn test_self_approval_is_rejected() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let root = env.token("root", "admin");

        let resp = test::call_service(
            &app,
            file_request(
                &root,
                json!({ "action": "delete", "resource": "nodes", "reason": "decommission" }),
            )
            .to_request(),
        )
        .await;
        let id = read_json(resp).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = test::call_service(&app, review(&root, "approve", &id).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = read_json(resp).await;
        assert_eq!(body["error"]["code"], "SELF_APPROVAL");
        assert_eq!(
            env.trust.access.get_request(&id).unwrap().state,
            AccessRequestState::Pending
        );

        // Withdrawing one's own request is allowed
        let resp = test::call_service(&app, review(&root, "deny", &id).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            env.trust.access.get_request(&id).unwrap().state,
            AccessRequestState::Denied
        );
    }

    #[actix_web::test]
    async fn test_denied_request_grants_nothing() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let alice = env.token("alice", "user");
        let root = env.token("root", "admin");

        let req = file_request(&alice, exec_in_kube_system()).to_request();
        let resp = test::call_service(&app, req).await;
        let id = read_json(resp).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = test::call_service(&app, review(&root, "deny", &id).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await["data"]["status"], "denied");

        assert!(
            !env.trust
                .authorize("alice", "user", "pods", Action::Exec, "kube-system")
                .allowed
        );
        assert_eq!(env.audit.entries_of(AuditActionType::AccessDenied).len(), 1);
    }

    #[actix_web::test]
    async fn test_unknown_request_is_not_found() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let root = env.token("root", "admin");

        for verb in ["approve", "deny"] {
            let resp =
                test::call_service(&app, review(&root, verb, "ar-missing").to_request()).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", verb);
        }
    }

    #[actix_web::test]
    async fn test_expired_request_cannot_be_approved() {
        let mut config = test_config();
        config.trust.access_requests.ttl_secs = 1;
        let env = TestEnv::new(config).await;
        let app = init_app!(env);
        let alice = env.token("alice", "user");
        let root = env.token("root", "admin");

        let req = file_request(&alice, exec_in_kube_system()).to_request();
        let resp = test::call_service(&app, req).await;
        let id = read_json(resp).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        let resp = test::call_service(&app, review(&root, "approve", &id).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = read_json(resp).await;
        assert_eq!(body["error"]["code"], "REQUEST_EXPIRED");
        assert_eq!(
            env.trust.access.get_request(&id).unwrap().state,
            AccessRequestState::Expired
        );

        let resp = test::call_service(
            &app,
            TestRequest::get()
                .uri("/api/access/requests")
                .insert_header(bearer(&root))
                .to_request(),
        )
        .await;
        assert_eq!(read_json(resp).await["data"]["total"], 0);
    }

    #[actix_web::test]
    async fn test_listing_sweeps_expired_requests() {
        let mut config = test_config();
        config.trust.access_requests.ttl_secs = 1;
        let env = TestEnv::new(config).await;
        let app = init_app!(env);
        let alice = env.token("alice", "user");

        let req = file_request(&alice, exec_in_kube_system()).to_request();
        let resp = test::call_service(&app, req).await;
        let id = read_json(resp).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        let resp = test::call_service(
            &app,
            TestRequest::get()
                .uri("/api/access/requests")
                .insert_header(bearer(&alice))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            env.trust.access.get_request(&id).unwrap().state,
            AccessRequestState::Expired
        );
    }
}
