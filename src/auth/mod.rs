/// Authentication module
///
/// Password hashing, access token signing/validation, refresh token
/// management, authorization header parsing and the session flows built on them.

mod bearer;
mod claims;
mod jwt;
mod password;
mod refresh_token;
pub mod session;

pub use bearer::{authorize_access, authorize_api_key, extract_api_key, extract_bearer, HeaderError};
pub use claims::Claims;
pub use jwt::{generate_access_token, validate_access_token, TokenError};
pub use password::{hash_password, verify_password};
pub use refresh_token::{
    generate_refresh_token, issue_refresh_token, resolve_refresh_token, revoke_refresh_token,
    RefreshTokenError,
};
