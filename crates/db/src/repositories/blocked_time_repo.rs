//! Repository for the `blocked_times` table.

use barber_core::types::DbId;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::blocked_time::BlockedTime;

const COLUMNS: &str = "id, date, time, reason, created_at";

/// Provides data access for administrator-blocked slots.
pub struct BlockedTimeRepo;

impl BlockedTimeRepo {
    /// Block a slot. A duplicate violates `uq_blocked_times_date_time`.
    pub async fn create(
        pool: &PgPool,
        date: NaiveDate,
        time: &str,
        reason: &str,
    ) -> Result<BlockedTime, sqlx::Error> {
        let query = format!(
            "INSERT INTO blocked_times (date, time, reason)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlockedTime>(&query)
            .bind(date)
            .bind(time)
            .bind(reason)
            .fetch_one(pool)
            .await
    }

    /// List blocked slots, optionally for a single date, in calendar order.
    pub async fn list(
        pool: &PgPool,
        date: Option<NaiveDate>,
    ) -> Result<Vec<BlockedTime>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blocked_times
             WHERE ($1::DATE IS NULL OR date = $1)
             ORDER BY date, time"
        );
        sqlx::query_as::<_, BlockedTime>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Remove a blocked slot. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blocked_times WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Blocked times on `date`.
    pub async fn times_on(pool: &PgPool, date: NaiveDate) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT time FROM blocked_times WHERE date = $1 ORDER BY time")
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Whether the slot is blocked.
    pub async fn is_blocked(
        pool: &PgPool,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM blocked_times WHERE date = $1 AND time = $2)",
        )
        .bind(date)
        .bind(time)
        .fetch_one(pool)
        .await
    }
}
