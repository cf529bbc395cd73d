//! Repository for the `admins` table.

use barber_core::types::DbId;
use sqlx::PgPool;

use crate::models::admin::{Admin, CreateAdmin};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, password_hash, email, created_at, updated_at";

/// Provides data access for admin accounts.
pub struct AdminRepo;

impl AdminRepo {
    /// Insert a new admin, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAdmin) -> Result<Admin, sqlx::Error> {
        let query = format!(
            "INSERT INTO admins (username, password_hash, email)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Admin>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    /// Find an admin by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE id = $1");
        sqlx::query_as::<_, Admin>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an admin by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE username = $1");
        sqlx::query_as::<_, Admin>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Number of admin accounts.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
