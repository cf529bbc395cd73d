//! Repository for the `bookings` table.

use barber_core::booking::BookingStatus;
use barber_core::types::DbId;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::booking::{Booking, BookingFilter, CreateBooking, UpdateBookingStatus};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, phone, email, service, barber, date, time, notes, \
                        status, created_at, updated_at";

/// Provides CRUD operations and slot lookups for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new booking with status `pending`.
    ///
    /// A second active booking for the same slot violates
    /// `uq_bookings_active_slot`.
    pub async fn create(pool: &PgPool, input: &CreateBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings (name, phone, email, service, barber, date, time, notes, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.service)
            .bind(&input.barber)
            .bind(input.date)
            .bind(&input.time)
            .bind(&input.notes)
            .bind(BookingStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a booking by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List bookings matching the filter, newest slot first.
    pub async fn list(pool: &PgPool, filter: &BookingFilter) -> Result<Vec<Booking>, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM bookings WHERE TRUE"));

        if let Some(date) = filter.date {
            builder.push(" AND date = ").push_bind(date);
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        builder.push(" ORDER BY date DESC, time DESC");

        builder.build_query_as::<Booking>().fetch_all(pool).await
    }

    /// Change a booking's status, and its notes when provided.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBookingStatus,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET
                status = $2,
                notes = CASE WHEN $3 THEN $4 ELSE notes END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(input.status.as_str())
            .bind(input.notes.is_some())
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Times on `date` held by non-cancelled bookings.
    pub async fn active_times_on(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT time FROM bookings
             WHERE date = $1 AND status <> 'cancelled'
             ORDER BY time",
        )
        .bind(date)
        .fetch_all(pool)
        .await
    }

    /// Whether a non-cancelled booking holds the slot.
    pub async fn is_slot_taken(
        pool: &PgPool,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE date = $1 AND time = $2 AND status <> 'cancelled'
             )",
        )
        .bind(date)
        .bind(time)
        .fetch_one(pool)
        .await
    }
}
