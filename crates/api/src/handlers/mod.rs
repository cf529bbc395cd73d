pub mod auth;
pub mod availability;
pub mod blocked_times;
pub mod bookings;
pub mod settings;
