use axum::routing::get;
use axum::Router;

use crate::handlers::availability;
use crate::state::AppState;

/// `GET /available-times?date=YYYY-MM-DD`
pub fn router() -> Router<AppState> {
    Router::new().route("/available-times", get(availability::available_times))
}
