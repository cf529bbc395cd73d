//! Handlers for business settings (admin only).

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use barber_core::error::CoreError;
use barber_core::settings::{setting_text, validate_update};
use barber_db::repositories::SettingRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings
///
/// All settings as a flat `{ key: value }` object.
pub async fn get_settings(
    _admin: AuthAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BTreeMap<String, String>>>> {
    let settings = SettingRepo::all(&state.pool).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/settings
///
/// Upsert every key in the body. Non-string JSON values are stored in
/// their JSON encoding. Returns the full settings map afterwards.
pub async fn update_settings(
    admin: AuthAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<BTreeMap<String, serde_json::Value>>,
) -> AppResult<Json<DataResponse<BTreeMap<String, String>>>> {
    if input.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No settings provided".into(),
        )));
    }

    let updates: BTreeMap<String, String> = input
        .iter()
        .map(|(k, v)| (k.clone(), setting_text(v)))
        .collect();

    let current = SettingRepo::all(&state.pool).await?;
    let updates = validate_update(&current, updates)?;

    SettingRepo::upsert_many(&state.pool, &updates).await?;

    tracing::info!(
        keys = ?updates.keys().collect::<Vec<_>>(),
        admin_id = admin.admin_id,
        "Settings updated",
    );

    let settings = SettingRepo::all(&state.pool).await?;
    Ok(Json(DataResponse { data: settings }))
}
