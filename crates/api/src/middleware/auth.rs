//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use barber_core::error::CoreError;
use barber_core::types::DbId;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated admin extracted from a JWT Bearer token in the `Authorization` header.
///
/// Add it as a handler parameter to make a route admin-only:
///
/// ```ignore
/// async fn my_handler(admin: AuthAdmin) -> AppResult<Json<()>> {
///     tracing::info!(admin_id = admin.admin_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AuthAdmin {
    #[serde(rename = "id")]
    pub admin_id: DbId,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = state.config.jwt.verify(token)?;

        Ok(AuthAdmin {
            admin_id: claims.sub,
            username: claims.username,
        })
    }
}
