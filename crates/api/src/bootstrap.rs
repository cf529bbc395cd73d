//! First-run seeding of the admin account.

use barber_db::models::admin::{Admin, CreateAdmin};
use barber_db::repositories::AdminRepo;
use barber_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::{DefaultAdmin, FALLBACK_ADMIN_PASSWORD};
use crate::error::AppResult;

/// Create the configured admin when no admin account exists yet.
///
/// Returns the created row, or `None` if admins were already present.
pub async fn ensure_default_admin(
    pool: &DbPool,
    admin: &DefaultAdmin,
) -> AppResult<Option<Admin>> {
    if AdminRepo::count(pool).await? > 0 {
        return Ok(None);
    }

    if admin.password == FALLBACK_ADMIN_PASSWORD {
        tracing::warn!(
            username = %admin.username,
            "Seeding admin with the built-in default password; set ADMIN_PASSWORD"
        );
    }

    let password_hash = hash_password(&admin.password)?;

    let created = AdminRepo::create(
        pool,
        &CreateAdmin {
            username: admin.username.clone(),
            password_hash,
            email: admin.email.clone(),
        },
    )
    .await?;

    tracing::info!(admin_id = created.id, username = %created.username, "Default admin created");
    Ok(Some(created))
}
