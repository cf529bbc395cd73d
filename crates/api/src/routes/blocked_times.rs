use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::blocked_times;
use crate::state::AppState;

/// Blocked slot routes mounted at `/blocked-times`.
///
/// ```text
/// GET    /      -> list_blocked_times
/// POST   /      -> create_blocked_time
/// DELETE /{id}  -> delete_blocked_time
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(blocked_times::list_blocked_times).post(blocked_times::create_blocked_time),
        )
        .route("/{id}", delete(blocked_times::delete_blocked_time))
}
