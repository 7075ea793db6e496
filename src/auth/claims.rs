/// JWT Claims structure
///
/// Registered claims (RFC 7519) carried by an access token. `jti` is fresh
/// per token, so two tokens minted in the same second never collide.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwt::TokenError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Token ID
    pub jti: String,
}

impl Claims {
    /// Claims for `user_id`, valid from `issued_at` for `expiry_seconds`
    pub fn new(user_id: Uuid, issued_at: DateTime<Utc>, expiry_seconds: i64, issuer: String) -> Self {
        let now = issued_at.timestamp();
        Self {
            sub: user_id.to_string(),
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns `TokenError::Malformed` if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Malformed)
    }
}
