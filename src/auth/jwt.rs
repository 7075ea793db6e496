/// JWT Token Generation and Validation
///
/// HS256 access tokens. Validation checks signature, issuer and expiry
/// (no leeway) and hands back the subject as a user id.

use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::configuration::AuthSettings;
use crate::error::AppError;

/// Why an access token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    InvalidSignature,
    Expired,
    Malformed,
    IssuerMismatch,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::InvalidSignature => write!(f, "invalid signature"),
            TokenError::Expired => write!(f, "token expired"),
            TokenError::Malformed => write!(f, "malformed token"),
            TokenError::IssuerMismatch => write!(f, "issuer mismatch"),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidIssuer => TokenError::IssuerMismatch,
            _ => TokenError::Malformed,
        }
    }
}

/// Generate a new access token for a user
///
/// # Arguments
/// * `user_id` - User's UUID
/// * `ttl_seconds` - Lifetime; callers resolve overrides with `AuthSettings::access_token_ttl`
/// * `config` - Auth settings holding the signing secret and issuer
///
/// # Errors
/// Returns error if token encoding fails
pub fn generate_access_token(
    user_id: Uuid,
    ttl_seconds: i64,
    config: &AuthSettings,
) -> Result<String, AppError> {
    generate_access_token_at(user_id, Utc::now(), ttl_seconds, config)
}

pub(crate) fn generate_access_token_at(
    user_id: Uuid,
    issued_at: DateTime<Utc>,
    ttl_seconds: i64,
    config: &AuthSettings,
) -> Result<String, AppError> {
    let claims = Claims::new(user_id, issued_at, ttl_seconds, config.issuer.clone());

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate an access token and return the user it was issued to
///
/// # Errors
/// Returns the precise `TokenError`; the HTTP layer collapses all of them to 401
pub fn validate_access_token(token: &str, config: &AuthSettings) -> Result<Uuid, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[&config.issuer]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    data.claims.user_id()
}
