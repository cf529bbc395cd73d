use crate::auth::jwt::JwtConfig;

/// Credentials used to seed the first admin account.
#[derive(Debug, Clone)]
pub struct DefaultAdmin {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Default admin password when `ADMIN_PASSWORD` is unset. Logged as a
/// warning at startup.
pub const FALLBACK_ADMIN_PASSWORD: &str = "admin123";

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Where new-booking notifications are POSTed. `None` disables them.
    pub notification_webhook_url: Option<String>,
    /// Account created when the `admins` table is empty.
    pub default_admin: DefaultAdmin,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `NOTIFICATION_WEBHOOK_URL` | unset                   |
    /// | `ADMIN_USERNAME`           | `admin`                 |
    /// | `ADMIN_PASSWORD`           | `admin123`              |
    /// | `ADMIN_EMAIL`              | `admin@example.com`     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let notification_webhook_url = std::env::var("NOTIFICATION_WEBHOOK_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let default_admin = DefaultAdmin {
            username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| FALLBACK_ADMIN_PASSWORD.into()),
            email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".into()),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            notification_webhook_url,
            default_admin,
        }
    }
}
