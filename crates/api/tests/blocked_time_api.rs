//! Blocking and unblocking slots.

mod common;

use axum::http::StatusCode;
use barber_db::models::blocked_time::DEFAULT_BLOCK_REASON;
use common::{body_json, delete_auth, get, post_json, post_json_auth, FUTURE_DATE};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn create_blocked_time_uses_default_reason(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "date": FUTURE_DATE, "time": "9:00" });
    let response = post_json_auth(app, "/api/v1/blocked-times", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["time"], "09:00");
    assert_eq!(json["data"]["reason"], DEFAULT_BLOCK_REASON);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_blocked_time_requires_admin(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "date": FUTURE_DATE, "time": "09:00" });
    let response = post_json(app, "/api/v1/blocked-times", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blocking_twice_returns_409(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let body = serde_json::json!({ "date": FUTURE_DATE, "time": "11:00", "reason": "Dentist" });

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/blocked-times", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/blocked-times", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "Time slot is already blocked"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blocking_outside_schedule_returns_400(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "date": FUTURE_DATE, "time": "20:00" });
    let response = post_json_auth(app, "/api/v1/blocked-times", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blocking_without_time_returns_validation_error(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "date": FUTURE_DATE, "reason": "Dentist" });
    let response = post_json_auth(app, "/api/v1/blocked-times", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("time"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unblocking_non_numeric_id_returns_validation_error(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = delete_auth(app, "/api/v1/blocked-times/all", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_public_and_filters_by_date(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    for (date, time) in [(FUTURE_DATE, "15:00"), (FUTURE_DATE, "09:00"), ("2099-07-01", "10:00")] {
        let app = common::build_test_app(pool.clone());
        let body = serde_json::json!({ "date": date, "time": time });
        let response = post_json_auth(app, "/api/v1/blocked-times", body, &token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/blocked-times").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/blocked-times?date={FUTURE_DATE}");
    let json = body_json(get(app, &uri).await).await;
    let times: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["time"].as_str().unwrap())
        .collect();
    assert_eq!(times, vec!["09:00", "15:00"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_blocked_time(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "date": FUTURE_DATE, "time": "10:00" });
    let created = body_json(post_json_auth(app, "/api/v1/blocked-times", body, &token).await).await;
    let uri = format!("/api/v1/blocked-times/{}", created["data"]["id"]);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
