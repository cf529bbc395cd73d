//! `barber-sync` -- replays offline bookings once the API is reachable.
//!
//! # Environment variables
//!
//! | Variable             | Default                 |
//! |----------------------|-------------------------|
//! | `API_BASE_URL`       | `http://localhost:3000` |
//! | `OFFLINE_QUEUE_PATH` | `offline_bookings.json` |
//! | `SYNC_INTERVAL_SECS` | `30`                    |

use std::time::Duration;

use barber_client::{run_sync_loop, ApiClient, OfflineQueue};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_INTERVAL_SECS: u64 = 30;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "barber_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url =
        std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into());
    let queue_path =
        std::env::var("OFFLINE_QUEUE_PATH").unwrap_or_else(|_| "offline_bookings.json".into());
    let interval_secs: u64 = std::env::var("SYNC_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    let client = ApiClient::new(base_url.clone()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });

    let mut queue = OfflineQueue::open(&queue_path).unwrap_or_else(|e| {
        tracing::error!(path = %queue_path, error = %e, "Failed to open offline queue");
        std::process::exit(1);
    });

    tracing::info!(
        api = %base_url,
        queue = %queue_path,
        pending = queue.len(),
        interval_secs,
        "Starting barber-sync",
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received SIGINT (Ctrl-C), stopping");
                on_signal.cancel();
            }
            Err(e) => tracing::error!(error = %e, "Failed to install Ctrl-C handler"),
        }
    });

    run_sync_loop(
        &client,
        &mut queue,
        Duration::from_secs(interval_secs),
        cancel,
    )
    .await;
}
