//! Request extractors enforcing authentication.
//!
//! - [`auth::AuthAdmin`] -- Extracts the authenticated admin from a JWT Bearer token.

pub mod auth;
