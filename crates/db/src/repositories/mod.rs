//! Repository layer: one zero-sized struct per table with async
//! associated functions taking a `&PgPool`.

mod admin_repo;
mod blocked_time_repo;
mod booking_repo;
mod setting_repo;

pub use admin_repo::AdminRepo;
pub use blocked_time_repo::BlockedTimeRepo;
pub use booking_repo::BookingRepo;
pub use setting_repo::SettingRepo;
