use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use barber_api::bootstrap::ensure_default_admin;
use barber_api::config::ServerConfig;
use barber_api::error::AppError;
use barber_api::router::build_app_router;
use barber_api::state::AppState;
use barber_db::DbPool;
use barber_events::BookingNotifier;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Anything that stops the server before it can take requests.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("invalid HOST {0:?}")]
    InvalidHost(String),
    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migrations failed: {0}")]
    Migrations(#[from] sqlx::migrate::MigrateError),
    #[error("could not seed the admin account: {0}")]
    Seed(#[from] AppError),
    #[error("server I/O: {0}")]
    Io(#[from] std::io::Error),
}

const POOL_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let pool = prepare_database(&config).await?;

    let notifier = BookingNotifier::new(config.notification_webhook_url.clone());
    if notifier.webhook_url().is_none() {
        tracing::warn!("NOTIFICATION_WEBHOOK_URL not set, booking notifications disabled");
    }

    let host: IpAddr = config
        .host
        .parse()
        .map_err(|_| StartupError::InvalidHost(config.host.clone()))?;
    let addr = SocketAddr::new(host, config.port);

    let app = build_app_router(
        AppState {
            pool: pool.clone(),
            config: Arc::new(config.clone()),
            notifier: Arc::new(notifier),
        },
        &config,
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Booking API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if tokio::time::timeout(POOL_CLOSE_TIMEOUT, pool.close())
        .await
        .is_err()
    {
        tracing::warn!("Database pool did not close in time");
    }
    tracing::info!("Booking API stopped");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "barber_api=debug,barber_events=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, migrate and make sure an admin can log in.
async fn prepare_database(config: &ServerConfig) -> Result<DbPool, StartupError> {
    let url = std::env::var("DATABASE_URL").map_err(|_| StartupError::MissingDatabaseUrl)?;

    let pool = barber_db::create_pool(&url).await?;
    barber_db::health_check(&pool).await?;
    barber_db::run_migrations(&pool).await?;
    tracing::info!("Database ready");

    ensure_default_admin(&pool, &config.default_admin).await?;
    Ok(pool)
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    let _ = tokio::signal::ctrl_c().await;

    tracing::info!("Shutdown requested, draining connections");
}
