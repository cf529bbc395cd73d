//! Admin session tokens.
//!
//! HS256 JWTs issued at login and checked by
//! [`AuthAdmin`](crate::middleware::auth::AuthAdmin). Signing keys and the
//! validation rules are derived once, when the configuration is built.

use std::fmt;

use barber_core::error::CoreError;
use barber_core::types::DbId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// `iss` claim stamped on, and required of, every token.
pub const ISSUER: &str = "barber-api";

const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Payload of an admin session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin row id.
    pub sub: DbId,
    pub username: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Keys and lifetime for admin tokens.
#[derive(Clone)]
pub struct JwtConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiry_hours: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("expiry_hours", &self.expiry_hours)
            .finish_non_exhaustive()
    }
}

impl JwtConfig {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_hours,
        }
    }

    /// Read `JWT_SECRET` (required, non-empty) and `JWT_EXPIRY_HOURS`
    /// (default 24).
    ///
    /// # Panics
    ///
    /// Panics when the secret is missing or the expiry is not an integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .expect("JWT_SECRET must be set to a non-empty value");

        let expiry_hours = match std::env::var("JWT_EXPIRY_HOURS") {
            Ok(raw) => raw
                .parse()
                .expect("JWT_EXPIRY_HOURS must be a whole number of hours"),
            Err(_) => DEFAULT_EXPIRY_HOURS,
        };

        Self::new(&secret, expiry_hours)
    }

    pub fn expires_in(&self) -> i64 {
        self.expiry_hours * 3600
    }

    /// Sign a session token for an admin.
    pub fn issue(&self, admin_id: DbId, username: &str) -> Result<IssuedToken, CoreError> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: admin_id,
            username: username.to_string(),
            iss: ISSUER.to_string(),
            iat,
            exp: iat + self.expires_in(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| CoreError::Internal(format!("Token signing failed: {e}")))?;

        Ok(IssuedToken {
            token,
            expires_in: self.expires_in(),
        })
    }

    /// Check signature, issuer and expiry. Every failure is `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, CoreError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected admin token");
                CoreError::Unauthorized("Invalid or expired token".into())
            })
    }
}
