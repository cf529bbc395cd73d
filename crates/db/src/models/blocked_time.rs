//! Blocked time model and DTOs.

use barber_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reason stored when the administrator gives none.
pub const DEFAULT_BLOCK_REASON: &str = "Blocked by administrator";

/// A row from the `blocked_times` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BlockedTime {
    pub id: DbId,
    pub date: NaiveDate,
    pub time: String,
    pub reason: String,
    pub created_at: Timestamp,
}

/// DTO for blocking a slot.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlockedTime {
    pub date: NaiveDate,
    pub time: String,
    pub reason: Option<String>,
}
