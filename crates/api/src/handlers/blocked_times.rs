//! Handlers for administrator-blocked slots.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use barber_core::error::CoreError;
use barber_core::schedule::{format_slot_time, parse_slot_time};
use barber_core::types::DbId;
use barber_db::models::blocked_time::{CreateBlockedTime, DEFAULT_BLOCK_REASON};
use barber_db::repositories::BlockedTimeRepo;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::availability::load_schedule;
use crate::middleware::auth::AuthAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BlockedTimeParams {
    pub date: Option<NaiveDate>,
}

/// GET /api/v1/blocked-times?date=
///
/// Public: the booking form greys these slots out.
pub async fn list_blocked_times(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<BlockedTimeParams>,
) -> AppResult<impl IntoResponse> {
    let blocked = BlockedTimeRepo::list(&state.pool, params.date).await?;
    Ok(Json(DataResponse { data: blocked }))
}

/// POST /api/v1/blocked-times
///
/// Block one slot of the schedule. Blocking the same slot twice is a 409.
pub async fn create_blocked_time(
    admin: AuthAdmin,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateBlockedTime>,
) -> AppResult<impl IntoResponse> {
    let time = parse_slot_time(&input.time)?;
    let schedule = load_schedule(&state.pool).await?;
    if !schedule.is_slot(time) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Time {} is outside the booking schedule",
            input.time
        ))));
    }

    let reason = input
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_BLOCK_REASON);

    let blocked =
        BlockedTimeRepo::create(&state.pool, input.date, &format_slot_time(time), reason).await?;

    tracing::info!(
        blocked_time_id = blocked.id,
        date = %blocked.date,
        time = %blocked.time,
        admin_id = admin.admin_id,
        "Slot blocked",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: blocked })))
}

/// DELETE /api/v1/blocked-times/{id}
pub async fn delete_blocked_time(
    admin: AuthAdmin,
    State(state): State<AppState>,
    AppPath(blocked_time_id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    let deleted = BlockedTimeRepo::delete(&state.pool, blocked_time_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "BlockedTime",
            id: blocked_time_id,
        }));
    }

    tracing::info!(blocked_time_id, admin_id = admin.admin_id, "Slot unblocked");
    Ok(StatusCode::NO_CONTENT)
}
