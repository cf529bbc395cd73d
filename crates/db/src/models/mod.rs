pub mod admin;
pub mod blocked_time;
pub mod booking;
pub mod setting;
