//! Handlers for the `/bookings` resource.
//!
//! Creating a booking is public (the booking form); reading and changing
//! bookings is admin-only.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use barber_core::booking::{validate_booking_slot, NewBooking, MAX_NOTES_LEN};
use barber_core::error::CoreError;
use barber_core::types::DbId;
use barber_db::models::booking::{BookingFilter, CreateBooking, UpdateBookingStatus};
use barber_db::repositories::{BlockedTimeRepo, BookingRepo};
use barber_events::BookingNotice;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::availability::load_schedule;
use crate::middleware::auth::AuthAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/bookings
///
/// Book a slot. The slot must be on the schedule, not blocked and not held
/// by another active booking. The owner is notified in the background.
pub async fn create_booking(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewBooking>,
) -> AppResult<impl IntoResponse> {
    let input = input.validated()?;

    let schedule = load_schedule(&state.pool).await?;
    let today = chrono::Local::now().date_naive();
    let time = validate_booking_slot(input.date, &input.time, &schedule, today)?;
    let input = NewBooking { time, ..input };

    if BlockedTimeRepo::is_blocked(&state.pool, input.date, &input.time).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Time slot is not available".into(),
        )));
    }

    if BookingRepo::is_slot_taken(&state.pool, input.date, &input.time).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Time slot is already booked".into(),
        )));
    }

    // A concurrent insert for the same slot still fails on
    // `uq_bookings_active_slot` and maps to 409.
    let booking = BookingRepo::create(&state.pool, &CreateBooking::from(input)).await?;

    tracing::info!(
        booking_id = booking.id,
        date = %booking.date,
        time = %booking.time,
        "Booking created",
    );

    state
        .notifier
        .spawn_notify(state.pool.clone(), BookingNotice::from(&booking));

    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// GET /api/v1/bookings?date=&status=
///
/// List bookings, newest slot first.
pub async fn list_bookings(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<BookingFilter>,
) -> AppResult<impl IntoResponse> {
    let bookings = BookingRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/bookings/{id}
pub async fn get_booking(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    AppPath(booking_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let booking = BookingRepo::find_by_id(&state.pool, booking_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        }))?;

    Ok(Json(DataResponse { data: booking }))
}

/// PATCH /api/v1/bookings/{id}
///
/// Change a booking's status and optionally its notes. Reactivating a
/// cancelled booking whose slot has since been taken is a conflict.
pub async fn update_booking(
    admin: AuthAdmin,
    State(state): State<AppState>,
    AppPath(booking_id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateBookingStatus>,
) -> AppResult<impl IntoResponse> {
    if input
        .notes
        .as_ref()
        .is_some_and(|n| n.chars().count() as u64 > MAX_NOTES_LEN)
    {
        return Err(AppError::Core(CoreError::Validation(format!(
            "notes must be at most {MAX_NOTES_LEN} characters"
        ))));
    }

    let booking = BookingRepo::update_status(&state.pool, booking_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        }))?;

    tracing::info!(
        booking_id,
        status = %input.status,
        admin_id = admin.admin_id,
        "Booking status updated",
    );

    Ok(Json(DataResponse { data: booking }))
}
