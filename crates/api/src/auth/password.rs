//! Admin password storage.
//!
//! Stored values are Argon2id PHC strings, so the salt and cost parameters
//! travel with each hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use barber_core::error::CoreError;

/// Hash a new admin password with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))
}

/// Compare a login attempt with the stored hash.
///
/// A wrong password is `Ok(false)`. A stored value that is not a PHC string
/// is an internal error, never a silent mismatch.
pub fn password_matches(plain: &str, stored: &str) -> Result<bool, CoreError> {
    let stored = PasswordHash::new(stored)
        .map_err(|e| CoreError::Internal(format!("Stored password hash is unreadable: {e}")))?;

    match Argon2::default().verify_password(plain.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CoreError::Internal(format!("Password check failed: {e}"))),
    }
}
