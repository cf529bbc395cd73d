//! HTTP error envelope for the booking API.
//!
//! Every failure leaves the server as `{ "error": <message>, "code": <CODE> }`,
//! including bodies, query strings and path segments axum could not decode.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use barber_core::error::CoreError;
use serde::Serialize;

/// Message sent to clients in place of internal failure details.
const HIDDEN_DETAIL: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Domain failure raised by `barber_core` rules or by a handler.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No route matched the request.
    #[error("No route for {0}")]
    UnknownRoute(Uri),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

struct Reply {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Reply {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn hidden() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            HIDDEN_DETAIL,
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let reply = match &self {
            AppError::Core(err) => core_reply(err),
            AppError::Database(err) => database_reply(err),
            AppError::UnknownRoute(uri) => Reply::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("No route for {}", uri.path()),
            ),
        };

        let body = ErrorBody {
            error: reply.message,
            code: reply.code,
        };
        (reply.status, Json(body)).into_response()
    }
}

fn core_reply(err: &CoreError) -> Reply {
    match err {
        CoreError::NotFound { entity, id } => Reply::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            Reply::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.as_str())
        }
        CoreError::Conflict(msg) => Reply::new(StatusCode::CONFLICT, "CONFLICT", msg.as_str()),
        CoreError::Unauthorized(msg) => {
            Reply::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.as_str())
        }
        CoreError::Forbidden(msg) => Reply::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.as_str()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Request failed");
            Reply::hidden()
        }
    }
}

/// Unique violations on `uq_*` indexes surface as 409 and check violations as
/// 400. Anything else is logged and hidden.
fn database_reply(err: &sqlx::Error) -> Reply {
    match err {
        sqlx::Error::RowNotFound => {
            Reply::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or_default();
            if db_err.is_unique_violation() && constraint.starts_with("uq_") {
                return Reply::new(StatusCode::CONFLICT, "CONFLICT", conflict_message(constraint));
            }
            if db_err.is_check_violation() {
                return Reply::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value rejected by constraint {constraint}"),
                );
            }
            tracing::error!(error = %db_err, constraint, "Database error");
            Reply::hidden()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            Reply::hidden()
        }
    }
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_bookings_active_slot" => "Time slot is already booked".to_string(),
        "uq_blocked_times_date_time" => "Time slot is already blocked".to_string(),
        "uq_admins_username" => "Username is already taken".to_string(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn status_and_body(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_maps_to_400() {
        let (status, body) =
            status_and_body(CoreError::Validation("name is required".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"], "name is required");
    }

    #[tokio::test]
    async fn not_found_names_entity() {
        let (status, body) = status_and_body(
            CoreError::NotFound {
                entity: "Booking",
                id: 12,
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Booking with id 12 not found");
    }

    #[tokio::test]
    async fn internal_errors_are_sanitized() {
        let (status, body) =
            status_and_body(CoreError::Internal("secret detail".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"], HIDDEN_DETAIL);
    }

    #[tokio::test]
    async fn row_not_found_maps_to_404() {
        let (status, _) = status_and_body(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_route_reports_path_only() {
        let uri: Uri = "/api/v1/nowhere?x=1".parse().unwrap();
        let (status, body) = status_and_body(AppError::UnknownRoute(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["error"], "No route for /api/v1/nowhere");
    }

    #[test]
    fn conflict_messages_for_known_constraints() {
        assert_eq!(
            conflict_message("uq_bookings_active_slot"),
            "Time slot is already booked"
        );
        assert!(conflict_message("uq_other").contains("uq_other"));
    }
}
