//! Domain logic for the barbershop booking service.
//!
//! This crate has zero internal dependencies so the API server, the
//! repository layer and the offline client can all share it.

pub mod booking;
pub mod error;
pub mod schedule;
pub mod settings;
pub mod types;
