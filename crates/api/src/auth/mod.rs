//! Authentication primitives for the admin role.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.

pub mod jwt;
pub mod password;
