#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use barber_api::auth::jwt::JwtConfig;
use barber_api::auth::password::hash_password;
use barber_api::config::{DefaultAdmin, ServerConfig};
use barber_api::router::build_app_router;
use barber_api::state::AppState;
use barber_db::models::admin::{Admin, CreateAdmin};
use barber_db::repositories::AdminRepo;
use barber_events::BookingNotifier;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "owner";
pub const ADMIN_PASSWORD: &str = "test_password_123!";

/// A far-future date that always passes the past-date check.
pub const FUTURE_DATE: &str = "2099-06-15";

/// Build a test `ServerConfig` with safe defaults and no webhook.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig::new("test-secret-that-is-long-enough", 24),
        notification_webhook_url: None,
        default_admin: DefaultAdmin {
            username: ADMIN_USERNAME.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            email: "owner@test.com".to_string(),
        },
    }
}

/// Build the full application router, the same one `main.rs` serves.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifier: Arc::new(BookingNotifier::new(None)),
    };
    build_app_router(state, &config)
}

/// Insert an admin directly and return the row.
pub async fn create_admin(pool: &PgPool, username: &str) -> Admin {
    let input = CreateAdmin {
        username: username.to_string(),
        password_hash: hash_password(ADMIN_PASSWORD).expect("hashing should succeed"),
        email: format!("{username}@test.com"),
    };
    AdminRepo::create(pool, &input)
        .await
        .expect("admin creation should succeed")
}

/// Create an admin and log in through the API, returning the bearer token.
pub async fn admin_token(pool: &PgPool) -> String {
    create_admin(pool, ADMIN_USERNAME).await;
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD });
    let response = post_json(app, "/api/v1/admin/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["token"].as_str().expect("token").to_string()
}

/// A complete booking request body for `date`/`time`.
pub fn booking_body(date: &str, time: &str) -> serde_json::Value {
    serde_json::json!({
        "name": "Carlos Souza",
        "phone": "(71) 98888-7777",
        "email": "carlos@example.com",
        "service": "haircut",
        "date": date,
        "time": time,
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
