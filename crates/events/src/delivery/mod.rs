//! External delivery channels for booking notifications.

pub mod webhook;
