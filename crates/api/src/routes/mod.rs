pub mod admin;
pub mod availability;
pub mod blocked_times;
pub mod bookings;
pub mod health;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /admin/login                 login (public)
/// /admin/verify                verify token (admin)
///
/// /settings                    get, update (admin)
///
/// /blocked-times               list (public), create (admin)
/// /blocked-times/{id}          delete (admin)
///
/// /bookings                    list (admin), create (public)
/// /bookings/{id}               get, update status (admin)
///
/// /available-times?date=       free/booked/blocked slots (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/admin", admin::router())
        .nest("/settings", settings::router())
        .nest("/blocked-times", blocked_times::router())
        .nest("/bookings", bookings::router())
        .merge(availability::router())
}
