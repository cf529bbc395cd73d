//! Handler for the public slot availability query.

use axum::extract::State;
use axum::Json;
use barber_core::error::CoreError;
use barber_core::schedule::{resolve_availability, Availability, DailySchedule};
use barber_core::settings::SCHEDULE_KEYS;
use barber_db::repositories::{BlockedTimeRepo, BookingRepo, SettingRepo};
use barber_db::DbPool;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppQuery;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub date: Option<NaiveDate>,
}

/// GET /api/v1/available-times?date=YYYY-MM-DD
///
/// Slots of the day's schedule not held by an active booking or a block.
pub async fn available_times(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<AvailabilityParams>,
) -> AppResult<Json<DataResponse<Availability>>> {
    let date = params
        .date
        .ok_or_else(|| AppError::Core(CoreError::Validation("date is required".into())))?;

    let schedule = load_schedule(&state.pool).await?;
    let (booked, blocked) = tokio::try_join!(
        BookingRepo::active_times_on(&state.pool, date),
        BlockedTimeRepo::times_on(&state.pool, date),
    )?;

    let availability = resolve_availability(date, &schedule, &booked, &blocked);
    Ok(Json(DataResponse { data: availability }))
}

/// Read the current schedule from settings.
pub(crate) async fn load_schedule(pool: &DbPool) -> AppResult<DailySchedule> {
    let settings = SettingRepo::get_many(pool, &SCHEDULE_KEYS).await?;
    let schedule = DailySchedule::from_settings(&settings);
    if let Err(e) = schedule.validate() {
        tracing::warn!(error = %e, "Stored schedule is invalid, using defaults");
        return Ok(DailySchedule::default());
    }
    Ok(schedule)
}
