/// Authorization header parsing
///
/// `Authorization: Bearer <token>` for access and refresh tokens,
/// `Authorization: ApiKey <key>` for the partner webhook.

use std::fmt;

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use uuid::Uuid;

use crate::auth::jwt::validate_access_token;
use crate::configuration::{AuthSettings, WebhookSettings};
use crate::error::AuthError;

const BEARER_SCHEME: &str = "Bearer";
const API_KEY_SCHEME: &str = "ApiKey";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    Missing,
    Malformed,
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::Missing => write!(f, "authorization header missing"),
            HeaderError::Malformed => write!(f, "authorization header malformed"),
        }
    }
}

impl std::error::Error for HeaderError {}

/// Split `<scheme> <credential>` and require the expected scheme.
fn credential_for_scheme<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, HeaderError> {
    let value = headers.get(AUTHORIZATION).ok_or(HeaderError::Missing)?;
    let value = value.to_str().map_err(|_| HeaderError::Malformed)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(found), Some(credential), None) if found == scheme => Ok(credential),
        _ => Err(HeaderError::Malformed),
    }
}

/// Extract the raw bearer credential
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, HeaderError> {
    credential_for_scheme(headers, BEARER_SCHEME)
}

/// Extract the raw API key
pub fn extract_api_key(headers: &HeaderMap) -> Result<&str, HeaderError> {
    credential_for_scheme(headers, API_KEY_SCHEME)
}

/// Authorize a request as a user from its bearer access token
///
/// Header problems become `AuthError::MissingToken` and codec failures
/// `AuthError::AccessToken`; both answer 401.
pub fn authorize_access(headers: &HeaderMap, config: &AuthSettings) -> Result<Uuid, AuthError> {
    let token = extract_bearer(headers).map_err(AuthError::MissingToken)?;
    validate_access_token(token, config).map_err(AuthError::AccessToken)
}

/// Check the partner webhook's shared key
pub fn authorize_api_key(headers: &HeaderMap, config: &WebhookSettings) -> Result<(), AuthError> {
    let key = extract_api_key(headers).map_err(|_| AuthError::InvalidApiKey)?;
    if key != config.polka_key {
        return Err(AuthError::InvalidApiKey);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_access_token, TokenError};
    use actix_web::http::header::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(HeaderError::Missing));
    }

    #[test]
    fn test_malformed_headers() {
        let malformed = vec![
            "Bearer",
            "Basic dXNlcjpwYXNz",
            "BearerToken",
            "",
            "Bearer one two",
            "bearer lowercase-scheme",
        ];

        for value in malformed {
            assert_eq!(
                extract_bearer(&headers_with(value)),
                Err(HeaderError::Malformed),
                "Should reject malformed header: {:?}",
                value
            );
        }
    }

    #[test]
    fn test_extract_api_key() {
        let headers = headers_with("ApiKey f271c81ff7084ee5b99a5091b42d486e");
        assert_eq!(extract_api_key(&headers), Ok("f271c81ff7084ee5b99a5091b42d486e"));
        assert_eq!(extract_bearer(&headers), Err(HeaderError::Malformed));
    }

    #[test]
    fn test_authorize_access_with_valid_token() {
        let config = AuthSettings::new("gate-test-secret");
        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, 3600, &config).unwrap();

        let headers = headers_with(&format!("Bearer {}", token));
        assert_eq!(authorize_access(&headers, &config), Ok(user_id));
    }

    #[test]
    fn test_authorize_access_rejects_foreign_key() {
        let token = generate_access_token(Uuid::new_v4(), 3600, &AuthSettings::new("key-one"))
            .unwrap();

        let headers = headers_with(&format!("Bearer {}", token));
        assert_eq!(
            authorize_access(&headers, &AuthSettings::new("key-two")),
            Err(AuthError::AccessToken(TokenError::InvalidSignature))
        );
    }

    #[test]
    fn test_authorize_access_without_header() {
        let config = AuthSettings::new("gate-test-secret");
        assert_eq!(
            authorize_access(&HeaderMap::new(), &config),
            Err(AuthError::MissingToken(HeaderError::Missing))
        );
    }

    #[test]
    fn test_api_key_comparison() {
        let config = WebhookSettings {
            polka_key: "expected-key".to_string(),
        };

        assert!(authorize_api_key(&headers_with("ApiKey expected-key"), &config).is_ok());
        assert_eq!(
            authorize_api_key(&headers_with("ApiKey other-key"), &config),
            Err(AuthError::InvalidApiKey)
        );
        assert_eq!(
            authorize_api_key(&HeaderMap::new(), &config),
            Err(AuthError::InvalidApiKey)
        );
    }
}
