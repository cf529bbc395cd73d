//! Admin account model and DTOs.

use barber_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full row from the `admins` table.
///
/// Contains the password hash -- never serialize this to API responses.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an admin account.
#[derive(Debug)]
pub struct CreateAdmin {
    pub username: String,
    pub password_hash: String,
    pub email: String,
}
