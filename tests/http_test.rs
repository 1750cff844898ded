use serde_json::{json, Value};
use std::sync::Arc;
use warp::http::StatusCode;

use hello_gate::auth::AuthService;
use hello_gate::config::ServerConfig;
use hello_gate::routes;

const SIGNING_KEY: &str = "integration-signing-key-7c1e9a4b2d8f6e3a5b0c9d1e2f3a4b5c";

fn test_service() -> Arc<AuthService> {
    let config = ServerConfig::new(SIGNING_KEY).unwrap().with_fast_hashing();
    Arc::new(AuthService::from_config(&config).unwrap())
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

async fn login_token(service: &Arc<AuthService>, username: &str, password: &str) -> String {
    let api = routes(service.clone(), false);
    let resp = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&json!({ "username": username, "password": password }))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp.body())["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_login_success() {
    let api = routes(test_service(), false);

    let resp = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&json!({ "username": "test", "password": "123456" }))
        .reply(&api)
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp.body());
    assert_eq!(body["username"], "test");
    assert_eq!(body["expiresIn"], 86_400_000);
    assert!(body["message"].is_string());
    assert!(body["token"].as_str().unwrap().split('.').count() == 3);
}

#[tokio::test]
async fn test_login_failures_share_status_and_body() {
    let api = routes(test_service(), false);

    let wrong_password = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&json!({ "username": "test", "password": "wrong" }))
        .reply(&api)
        .await;
    let unknown_user = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&json!({ "username": "ghost", "password": "wrong" }))
        .reply(&api)
        .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body(), unknown_user.body());
    assert_eq!(
        body_json(wrong_password.body())["error"],
        "Invalid username or password"
    );
}

#[tokio::test]
async fn test_login_rejects_bad_bodies() {
    let api = routes(test_service(), false);

    let blank = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&json!({ "username": "", "password": "123456" }))
        .reply(&api)
        .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(blank.body())["error"].is_string());

    let whitespace_password = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&json!({ "username": "test", "password": "   " }))
        .reply(&api)
        .await;
    assert_eq!(whitespace_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(whitespace_password.body())["error"],
        "Password must not be blank"
    );

    let missing_field = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&json!({ "username": "test" }))
        .reply(&api)
        .await;
    assert_eq!(missing_field.status(), StatusCode::BAD_REQUEST);

    let oversized = warp::test::request()
        .method("POST")
        .path("/api/auth/login")
        .json(&json!({ "username": "test", "password": "x".repeat(8 * 1024) }))
        .reply(&api)
        .await;
    assert_eq!(oversized.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_validate_issued_token() {
    let service = test_service();
    let token = login_token(&service, "test", "123456").await;
    let api = routes(service, false);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/auth/validate")
        .header("authorization", format!("Bearer {}", token))
        .reply(&api)
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp.body());
    assert_eq!(body["valid"], true);
    assert_eq!(body["username"], "test");
    assert!(body["expiration"].as_i64().unwrap() > chrono::Utc::now().timestamp_millis());
}

#[tokio::test]
async fn test_validate_header_problems() {
    let api = routes(test_service(), false);

    let missing = warp::test::request()
        .method("GET")
        .path("/api/auth/validate")
        .reply(&api)
        .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let not_bearer = warp::test::request()
        .method("GET")
        .path("/api/auth/validate")
        .header("authorization", "Basic dGVzdDoxMjM0NTY=")
        .reply(&api)
        .await;
    assert_eq!(not_bearer.status(), StatusCode::BAD_REQUEST);

    let garbage = warp::test::request()
        .method("GET")
        .path("/api/auth/validate")
        .header("authorization", "Bearer not.a.token")
        .reply(&api)
        .await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(garbage.body())["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_hello_requires_authentication() {
    let service = test_service();
    let token = login_token(&service, "test", "123456").await;
    let api = routes(service, false);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/hello")
        .header("authorization", format!("Bearer {}", token))
        .reply(&api)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let greeting = String::from_utf8(resp.body().to_vec()).unwrap();
    assert!(greeting.contains("test"));

    let anonymous = warp::test::request()
        .method("GET")
        .path("/api/hello")
        .reply(&api)
        .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(anonymous.body())["error"], "Authentication required");

    let bad_token = warp::test::request()
        .method("GET")
        .path("/api/hello")
        .header("authorization", "Bearer abc.def.ghi")
        .reply(&api)
        .await;
    assert_eq!(bad_token.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_endpoint_lists_roles() {
    let service = test_service();
    let token = login_token(&service, "admin", "admin123").await;
    let api = routes(service, false);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/user")
        .header("authorization", format!("Bearer {}", token))
        .reply(&api)
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        String::from_utf8(resp.body().to_vec()).unwrap(),
        "Current user: admin, roles: [ADMIN, USER]"
    );
}

#[tokio::test]
async fn test_help_endpoint() {
    let service = test_service();

    let production = warp::test::request()
        .method("GET")
        .path("/api/auth/help")
        .reply(&routes(service.clone(), false))
        .await;
    assert_eq!(production.status(), StatusCode::OK);
    let body = body_json(production.body());
    assert_eq!(body["loginUrl"], "/api/auth/login");
    assert!(body.get("demoUsers").is_none());

    let development = warp::test::request()
        .method("GET")
        .path("/api/auth/help")
        .reply(&routes(service, true))
        .await;
    assert_eq!(body_json(development.body())["demoUsers"][0]["password"], "123456");
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let api = routes(test_service(), false);

    for path in ["/health", "/api/hello", "/does-not-exist"] {
        let resp = warp::test::request().method("GET").path(path).reply(&api).await;
        assert_eq!(resp.headers()["x-content-type-options"], "nosniff", "{}", path);
        assert_eq!(resp.headers()["x-frame-options"], "DENY", "{}", path);
    }
}

#[tokio::test]
async fn test_routing_errors() {
    let api = routes(test_service(), false);

    let not_found = warp::test::request()
        .method("GET")
        .path("/api/nothing")
        .reply(&api)
        .await;
    assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

    let wrong_method = warp::test::request()
        .method("GET")
        .path("/api/auth/login")
        .reply(&api)
        .await;
    assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);

    let health = warp::test::request().method("GET").path("/health").reply(&api).await;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.body(), "OK");
}
