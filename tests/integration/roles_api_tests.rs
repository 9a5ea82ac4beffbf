//! Role management API integration tests

#[cfg(test)]
mod tests {
    use crate::common::{TestEnv, bearer, read_json};
    use crate::init_app;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use serde_json::{Value, json};
    use trustgate::auth::{Action, Feature};
    use trustgate::storage::RoleStore;

    fn developer_role() -> Value {
        json!({
            "name": "developer",
            "description": "Full access to dev namespaces",
            "allow": [
                { "resources": ["*"], "actions": ["*"], "namespaces": ["dev-*"] },
                { "resources": ["pods"], "actions": ["view", "logs"], "namespaces": ["*"] }
            ],
            "deny": [
                { "resources": ["secrets"], "actions": ["*"], "namespaces": ["*"] }
            ],
            "allowed_features": ["dashboard", "topology"]
        })
    }

    #[actix_web::test]
    async fn test_list_and_get_roles() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let vera = env.token("vera", "viewer");

        let resp = test::call_service(
            &app,
            TestRequest::get()
                .uri("/api/roles")
                .insert_header(bearer(&vera))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["total"], 3);
        let names: Vec<&str> = body["data"]["roles"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        for builtin in ["admin", "user", "viewer"] {
            assert!(names.contains(&builtin), "missing {}", builtin);
        }

        let resp = test::call_service(
            &app,
            TestRequest::get()
                .uri("/api/roles/user")
                .insert_header(bearer(&vera))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["name"], "user");
        assert_eq!(body["data"]["is_custom"], false);

        let resp = test::call_service(
            &app,
            TestRequest::get()
                .uri("/api/roles/ghost")
                .insert_header(bearer(&vera))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = read_json(resp).await;
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("role not found: ghost")
        );
    }

    #[actix_web::test]
    async fn test_custom_role_lifecycle() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let root = env.token("root", "admin");

        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/roles")
                .insert_header(bearer(&root))
                .set_json(developer_role())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["name"], "developer");
        assert_eq!(body["data"]["status"], "created");

        // Persisted and live
        let stored = env.roles.list_custom_roles().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].is_custom);
        let authorizer = &env.trust.authorizer;
        assert!(
            authorizer
                .is_allowed("developer", "deployments", Action::Delete, "dev-api")
                .allowed
        );
        assert!(!authorizer.is_allowed("developer", "secrets", Action::View, "dev-api").allowed);
        assert!(authorizer.is_feature_allowed("developer", Feature::Topology));

        // Replace it with a narrower definition
        let resp = test::call_service(
            &app,
            TestRequest::put()
                .uri("/api/roles/developer")
                .insert_header(bearer(&root))
                .set_json(json!({
                    "description": "Read-only dev access",
                    "allow": [
                        { "resources": ["*"], "actions": ["view"], "namespaces": ["dev-*"] }
                    ]
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await["data"]["status"], "updated");
        assert!(
            !authorizer
                .is_allowed("developer", "deployments", Action::Delete, "dev-api")
                .allowed
        );
        assert!(authorizer.is_allowed("developer", "deployments", Action::View, "dev-api").allowed);
        let stored = env.roles.list_custom_roles().await.unwrap();
        assert_eq!(stored[0].description, "Read-only dev access");

        let resp = test::call_service(
            &app,
            TestRequest::delete()
                .uri("/api/roles/developer")
                .insert_header(bearer(&root))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await["data"]["status"], "deleted");
        assert!(authorizer.get_role("developer").is_none());
        assert!(env.roles.list_custom_roles().await.unwrap().is_empty());

        // Unknown roles deny everything
        let decision = authorizer.is_allowed("developer", "pods", Action::View, "dev-api");
        assert!(!decision.allowed);
        assert_eq!(decision.reason, "unknown role: developer");
    }

    #[actix_web::test]
    async fn test_create_refuses_existing_custom_role() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let root = env.token("root", "admin");

        let create = |body: Value| {
            TestRequest::post()
                .uri("/api/roles")
                .insert_header(bearer(&root))
                .set_json(body)
                .to_request()
        };

        let resp = test::call_service(&app, create(developer_role())).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            create(json!({ "name": "developer", "description": "takeover" })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = read_json(resp).await;
        assert_eq!(body["error"]["code"], "CONFLICT");

        let stored = env.roles.list_custom_roles().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].description, "Full access to dev namespaces");
        assert!(
            env.trust
                .authorizer
                .is_allowed("developer", "deployments", Action::Delete, "dev-api")
                .allowed
        );
    }

    #[actix_web::test]
    async fn test_builtin_roles_are_immutable() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let root = env.token("root", "admin");

        let resp = test::call_service(
            &app,
            TestRequest::delete()
                .uri("/api/roles/admin")
                .insert_header(bearer(&root))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(read_json(resp).await["error"]["code"], "BUILTIN_ROLE");

        let resp = test::call_service(
            &app,
            TestRequest::put()
                .uri("/api/roles/viewer")
                .insert_header(bearer(&root))
                .set_json(json!({ "allowed_features": ["*"] }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/roles")
                .insert_header(bearer(&root))
                .set_json(json!({ "name": "user" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        assert!(env.roles.list_custom_roles().await.unwrap().is_empty());
        assert!(!env.trust.authorizer.is_feature_allowed("viewer", Feature::SettingsAdmin));
    }

    #[actix_web::test]
    async fn test_role_mutations_require_settings_admin() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let alice = env.token("alice", "user");

        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/roles")
                .insert_header(bearer(&alice))
                .set_json(developer_role())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(env.trust.authorizer.get_role("developer").is_none());

        let resp = test::call_service(
            &app,
            TestRequest::delete()
                .uri("/api/roles/viewer")
                .insert_header(bearer(&alice))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(read_json(resp).await["error"]["code"], "FORBIDDEN");
    }

    #[actix_web::test]
    async fn test_create_role_requires_a_name() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);
        let root = env.token("root", "admin");

        let resp = test::call_service(
            &app,
            TestRequest::post()
                .uri("/api/roles")
                .insert_header(bearer(&root))
                .set_json(json!({ "description": "nameless" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_feature_permissions_for_caller() {
        let env = TestEnv::standard().await;
        let app = init_app!(env);

        let features = |role: &'static str| {
            TestRequest::get()
                .uri("/api/features")
                .insert_header(bearer(&env.token(role, role)))
                .to_request()
        };

        let body = read_json(test::call_service(&app, features("admin")).await).await;
        assert_eq!(body["data"]["role"], "admin");
        assert_eq!(body["data"]["features"]["settings_admin"], true);

        let body = read_json(test::call_service(&app, features("user")).await).await;
        assert_eq!(body["data"]["features"]["dashboard"], true);
        assert_eq!(body["data"]["features"]["settings_admin"], false);
        assert_eq!(body["data"]["features"]["settings_security"], false);
    }
}
