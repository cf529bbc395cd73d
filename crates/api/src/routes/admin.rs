use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Admin session routes mounted at `/admin`.
///
/// ```text
/// POST /login   -> login
/// GET  /verify  -> verify
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/verify", get(auth::verify))
}
