//! Handlers for admin authentication (login, token check).

use axum::extract::State;
use axum::Json;
use barber_core::error::CoreError;
use barber_core::types::DbId;
use barber_db::repositories::AdminRepo;
use serde::{Deserialize, Serialize};

use crate::auth::password::password_matches;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub admin: AdminInfo,
}

/// Public admin info embedded in [`LoginResponse`].
#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub id: DbId,
    pub username: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/login
///
/// Authenticate with username + password and receive a bearer token.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = input.username.trim();
    if username.is_empty() || input.password.is_empty() {
        return Err(CoreError::Validation("Username and password are required".into()).into());
    }

    let invalid = || CoreError::Unauthorized("Invalid username or password".into());

    let admin = AdminRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(invalid)?;

    if !password_matches(&input.password, &admin.password_hash)? {
        tracing::warn!(username = %admin.username, "Failed admin login");
        return Err(invalid().into());
    }

    let issued = state.config.jwt.issue(admin.id, &admin.username)?;
    tracing::info!(admin_id = admin.id, "Admin logged in");

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_in: issued.expires_in,
        admin: AdminInfo {
            id: admin.id,
            username: admin.username,
            email: admin.email,
        },
    }))
}

/// GET /api/v1/admin/verify
///
/// Echo the admin identity carried by a valid token.
pub async fn verify(admin: AuthAdmin) -> Json<DataResponse<AuthAdmin>> {
    Json(DataResponse { data: admin })
}
