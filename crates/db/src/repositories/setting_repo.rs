//! Repository for the `settings` key/value table.

use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::models::setting::Setting;

/// Provides data access for business settings.
pub struct SettingRepo;

impl SettingRepo {
    /// Every setting row, ordered by key.
    pub async fn list(pool: &PgPool) -> Result<Vec<Setting>, sqlx::Error> {
        sqlx::query_as::<_, Setting>(
            "SELECT key_name, key_value, updated_at FROM settings ORDER BY key_name",
        )
        .fetch_all(pool)
        .await
    }

    /// All settings as a key → value map.
    pub async fn all(pool: &PgPool) -> Result<BTreeMap<String, String>, sqlx::Error> {
        let rows = Self::list(pool).await?;
        Ok(rows.into_iter().map(|s| (s.key_name, s.key_value)).collect())
    }

    /// The subset of settings named in `keys`. Absent keys are omitted.
    pub async fn get_many(
        pool: &PgPool,
        keys: &[&str],
    ) -> Result<BTreeMap<String, String>, sqlx::Error> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT key_name, key_value FROM settings WHERE key_name = ANY($1)")
                .bind(&keys)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().collect())
    }

    /// Insert or replace every pair in one transaction.
    pub async fn upsert_many(
        pool: &PgPool,
        values: &BTreeMap<String, String>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for (key, value) in values {
            sqlx::query(
                "INSERT INTO settings (key_name, key_value) VALUES ($1, $2)
                 ON CONFLICT (key_name) DO UPDATE SET key_value = EXCLUDED.key_value",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::debug!(count = values.len(), "Settings upserted");
        Ok(())
    }
}
