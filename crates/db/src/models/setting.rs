//! Key/value business settings.

use barber_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `settings` table.
#[derive(Debug, Clone, FromRow)]
pub struct Setting {
    pub key_name: String,
    pub key_value: String,
    pub updated_at: Timestamp,
}
