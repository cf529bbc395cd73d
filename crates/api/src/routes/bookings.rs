use axum::routing::get;
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Booking routes mounted at `/bookings`.
///
/// ```text
/// GET   /      -> list_bookings
/// POST  /      -> create_booking
/// GET   /{id}  -> get_booking
/// PATCH /{id}  -> update_booking
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/{id}",
            get(bookings::get_booking).patch(bookings::update_booking),
        )
}
