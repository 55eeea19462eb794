#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use lingo_api::auth::jwt::{generate_access_token, JwtConfig};
use lingo_api::config::ServerConfig;
use lingo_api::router::build_app_router;
use lingo_api::state::AppState;
use lingo_core::repository::Repositories;
use serde_json::Value;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_max_connections: 1,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// Uses the same `build_app_router` as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app() -> Router {
    let config = test_config();
    let state = AppState {
        repos: Repositories::in_memory(),
        pool: None,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Issue a valid access token for `user_id`.
pub fn token_for(user_id: &str) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, user: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {}", token_for(user)))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(app: Router, uri: &str, user: &str, body: Value) -> Response<Body> {
    json_request(app, "POST", uri, user, body).await
}

pub async fn put_json_auth(app: Router, uri: &str, user: &str, body: Value) -> Response<Body> {
    json_request(app, "PUT", uri, user, body).await
}

pub async fn post_auth(app: Router, uri: &str, user: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header("authorization", format!("Bearer {}", token_for(user)))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, user: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header("authorization", format!("Bearer {}", token_for(user)))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(
    app: Router,
    method: &str,
    uri: &str,
    user: &str,
    body: Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token_for(user)))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Create a project as `owner` and return its id.
pub async fn create_project(app: &Router, owner: &str, name: &str) -> i64 {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/projects",
        owner,
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Invite `user` with `role` as `owner` and accept as `user`.
pub async fn add_member(app: &Router, project_id: i64, owner: &str, user: &str, role: &str) {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/invitations"),
        owner,
        serde_json::json!({ "guest_id": user, "role": role }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let invitation_id = body_json(response).await["id"].as_i64().unwrap();

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/invitations/{invitation_id}/accept"),
        user,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
