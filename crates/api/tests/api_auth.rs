use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use loadstar_api::config::{AppConfig, Environment};
use loadstar_auth::{Role, SessionClaims, UserId};
use reqwest::StatusCode;
use serde_json::json;

const JWT_SECRET: &str = "black-box-test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_in(Environment::Development).await
    }

    async fn spawn_in(environment: Environment) -> Self {
        // Build the app (same router as prod), but bind to an ephemeral port.
        let config = AppConfig {
            signing_secret: JWT_SECRET.to_string(),
            environment,
            port: 0,
        };
        let app = loadstar_api::app::build_app(config).expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(secret: &str, user_id: UserId, roles: Vec<Role>, ttl: ChronoDuration) -> String {
    let claims = SessionClaims {
        user_id,
        roles,
        exp: (Utc::now() + ttl).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// Register an identity and return (user_id, bearer token, session cookie).
async fn register(
    client: &reqwest::Client,
    base_url: &str,
    username: &str,
    email: &str,
) -> (String, String, String) {
    let res = client
        .post(format!("{}/api/auth/register", base_url))
        .json(&json!({
            "username": username,
            "email": email,
            "password": "red-october-77",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);

    let cookie = session_cookie_from(&res);
    let body: serde_json::Value = res.json().await.unwrap();
    let user_id = body["user"]["id"].as_str().unwrap().to_string();
    let token = body["token"].as_str().unwrap().to_string();

    (user_id, token, cookie)
}

/// Bootstrap the first admin and log in on the admin surface; returns
/// (admin bearer token, admin cookie pair).
async fn bootstrap_admin(client: &reqwest::Client, base_url: &str) -> (String, String) {
    let res = client
        .post(format!("{}/admin/setup", base_url))
        .json(&json!({
            "username": "root",
            "email": "root@example.com",
            "password": "first-admin-pass",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/admin/login", base_url))
        .json(&json!({
            "email": "root@example.com",
            "password": "first-admin-pass",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let cookie = session_cookie_from(&res);
    assert!(cookie.starts_with("admin_auth_token="));

    let body: serde_json::Value = res.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    (token, cookie)
}

/// First name=value pair of the Set-Cookie header.
fn session_cookie_from(res: &reqwest::Response) -> String {
    res.headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("response should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn error_code(res: reqwest::Response) -> String {
    let body: serde_json::Value = res.json().await.unwrap();
    body["error"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in ["/api/auth/me", "/api/shipments", "/superadmin/users"] {
        let res = client
            .get(format!("{}{}", srv.base_url, path))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "path {path}");
        assert_eq!(error_code(res).await, "auth_required", "path {path}");
    }
}

#[tokio::test]
async fn health_needs_no_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_issues_a_working_session() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (user_id, token, _) = register(&client, &srv.base_url, "dispatch", "d@example.com").await;

    let res = client
        .get(format!("{}/api/auth/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user_id"].as_str().unwrap(), user_id);
    assert_eq!(body["roles"], json!(["shipper"]));
}

#[tokio::test]
async fn session_cookie_is_preferred_over_bearer() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (user_id, _, cookie) = register(&client, &srv.base_url, "dispatch", "d@example.com").await;
    assert!(cookie.starts_with("auth_token="));

    // A garbage bearer header must not shadow the valid cookie.
    let res = client
        .get(format!("{}/api/auth/me", srv.base_url))
        .header(reqwest::header::COOKIE, &cookie)
        .bearer_auth("garbage")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user_id"].as_str().unwrap(), user_id);
}

#[tokio::test]
async fn logout_expires_the_cookie() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/logout", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let set_cookie = res
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("auth_token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn login_accepts_only_the_registered_credentials() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    register(&client, &srv.base_url, "dispatch", "d@example.com").await;

    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "email": "d@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "invalid_credentials");

    // Unknown email is indistinguishable from a wrong password.
    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "email": "nobody@example.com", "password": "red-october-77" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "invalid_credentials");

    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "email": "d@example.com", "password": "red-october-77" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["token"].as_str().is_some());
    assert!(body["user"]["last_login"].is_null() || body["user"]["last_login"].is_string());
}

#[tokio::test]
async fn shipper_permissions_follow_the_catalog() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, token, _) = register(&client, &srv.base_url, "dispatch", "d@example.com").await;

    // Shipper may post freight.
    let res = client
        .post(format!("{}/api/shipments", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "origin": "Columbus, OH", "destination": "Nashville, TN", "weight_lbs": 42000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "draft");

    // And read rates.
    let res = client
        .get(format!("{}/api/rates", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // But not quote them.
    let res = client
        .post(format!("{}/api/rates", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "lane": "CMH-BNA", "rate_per_mile": 2.85 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "forbidden");
}

#[tokio::test]
async fn carrier_board_requires_the_carrier_role() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (_, shipper_token, _) =
        register(&client, &srv.base_url, "dispatch", "d@example.com").await;

    let res = client
        .get(format!("{}/api/carrier/loads", srv.base_url))
        .bearer_auth(&shipper_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Admin passes any role gate.
    let (admin_token, _) = bootstrap_admin(&client, &srv.base_url).await;
    let res = client
        .get(format!("{}/api/carrier/loads", srv.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_token_is_rejected_as_expired() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = mint_jwt(
        JWT_SECRET,
        UserId::new(),
        vec![Role::new("shipper")],
        ChronoDuration::seconds(-1),
    );

    let res = client
        .get(format!("{}/api/auth/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "token_expired");
}

#[tokio::test]
async fn foreign_signature_is_rejected_as_invalid() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = mint_jwt(
        "some-other-secret",
        UserId::new(),
        vec![Role::new("admin")],
        ChronoDuration::minutes(10),
    );

    let res = client
        .get(format!("{}/api/auth/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "token_invalid");
}

#[tokio::test]
async fn mis_shaped_claims_are_rejected_as_malformed() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Correctly signed, but the subject is a number and roles is a scalar.
    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &json!({
            "user_id": 7,
            "roles": "shipper",
            "exp": (Utc::now() + ChronoDuration::minutes(10)).timestamp(),
        }),
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let res = client
        .get(format!("{}/api/auth/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "claims_malformed");
}

#[tokio::test]
async fn admin_setup_closes_after_the_first_admin() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    bootstrap_admin(&client, &srv.base_url).await;

    let res = client
        .post(format!("{}/admin/setup", srv.base_url))
        .json(&json!({
            "username": "usurper",
            "email": "usurper@example.com",
            "password": "let-me-in",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "setup_closed");
}

#[tokio::test]
async fn admin_dashboard_sits_behind_the_admin_cookie() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/admin/dashboard", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let (admin_token, admin_cookie) = bootstrap_admin(&client, &srv.base_url).await;

    // The admin surface ignores bearer tokens and the API session cookie.
    let res = client
        .get(format!("{}/admin/dashboard", srv.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/admin/dashboard", srv.base_url))
        .header(
            reqwest::header::COOKIE,
            admin_cookie.replace("admin_auth_token=", "auth_token="),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/admin/dashboard", srv.base_url))
        .header(reqwest::header::COOKIE, &admin_cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["totals"]["admins"], 1);
    assert_eq!(body["totals"]["identities"], 1);
}

#[tokio::test]
async fn deactivated_identity_fails_permission_gates() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (admin_token, _) = bootstrap_admin(&client, &srv.base_url).await;
    let (user_id, user_token, _) =
        register(&client, &srv.base_url, "dispatch", "d@example.com").await;

    let res = client
        .patch(format!("{}/superadmin/users/{}/active", srv.base_url, user_id))
        .bearer_auth(&admin_token)
        .json(&json!({ "active": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The still-valid token no longer clears any permission gate.
    let res = client
        .post(format!("{}/api/shipments", srv.base_url))
        .bearer_auth(&user_token)
        .json(&json!({ "origin": "Columbus, OH", "destination": "Nashville, TN" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "identity_inactive");

    // The roster shows the flag flipped.
    let res = client
        .get(format!("{}/superadmin/users", srv.base_url))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let user = body["users"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["id"] == user_id.as_str())
        .expect("deactivated user should still be listed");
    assert_eq!(user["active"], false);
}

#[tokio::test]
async fn deleted_identity_leaves_a_dangling_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (admin_token, _) = bootstrap_admin(&client, &srv.base_url).await;
    let (user_id, user_token, _) =
        register(&client, &srv.base_url, "dispatch", "d@example.com").await;

    let res = client
        .delete(format!("{}/superadmin/users/{}", srv.base_url, user_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(format!("{}/superadmin/users/{}", srv.base_url, user_id))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/api/shipments", srv.base_url))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "token_invalid");
}

#[tokio::test]
async fn dev_superadmin_is_blocked_in_production() {
    let srv = TestServer::spawn_in(Environment::Production).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/admin/dev/superadmin", srv.base_url))
        .json(&json!({
            "username": "dev",
            "email": "dev@example.com",
            "password": "dev-pass",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_code(res).await, "disabled_in_production");
}

#[tokio::test]
async fn direct_permission_grants_work_without_roles() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/admin/dev/superadmin", srv.base_url))
        .json(&json!({
            "username": "dev",
            "email": "dev@example.com",
            "password": "dev-pass",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let user_id: UserId = body["user"]["id"].as_str().unwrap().parse().unwrap();
    assert!(body["user"]["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p == "system_admin"));

    // A session that carries no roles at all still passes the gate through
    // the identity's direct system_admin grant.
    let token = mint_jwt(JWT_SECRET, user_id, Vec::new(), ChronoDuration::minutes(10));

    let res = client
        .get(format!("{}/superadmin/users", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}
