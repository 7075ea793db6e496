/// Application error handling
///
/// One error type for the whole service:
/// 1. Domain-specific error enums (validation, database, authentication)
/// 2. A unified `AppError` used for control flow
/// 3. HTTP response mapping with structured, secret-free logging
/// 4. Error context enrichment for handlers

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

use crate::auth::{HeaderError, RefreshTokenError, TokenError};

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Validation errors for input data
#[derive(Debug, Clone)]
pub enum ValidationError {
    EmptyField(String),
    TooShort(String, usize),
    TooLong(String, usize),
    InvalidFormat(String),
    SuspiciousContent(String),
    /// New password matches the one already stored
    PasswordReused,
    /// Request body could not be decoded
    MalformedBody(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooShort(field, min) => {
                write!(f, "{} is too short (minimum {} characters)", field, min)
            }
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
            ValidationError::SuspiciousContent(field) => {
                write!(f, "{} contains suspicious content", field)
            }
            ValidationError::PasswordReused => write!(f, "please use a different password"),
            ValidationError::MalformedBody(reason) => write!(f, "malformed request body: {}", reason),
        }
    }
}

impl StdError for ValidationError {}

/// Database operation errors
#[derive(Debug)]
pub enum DatabaseError {
    UniqueConstraintViolation(String),
    NotFound(String),
    ConnectionPool(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueConstraintViolation(msg) => {
                write!(f, "Duplicate entry: {}", msg)
            }
            DatabaseError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::UnexpectedError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

/// Authentication errors
///
/// The wrapped component errors keep the exact cause available to logs and
/// tests; clients only ever see the status code and a generic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are never told apart
    InvalidCredentials,
    /// Bearer header missing or malformed on an endpoint that takes a refresh token
    Header(HeaderError),
    /// Bearer header missing or malformed on an access-token protected endpoint
    MissingToken(HeaderError),
    AccessToken(TokenError),
    RefreshToken(RefreshTokenError),
    InvalidApiKey,
    /// Password hashing backend rejected the input
    Hashing(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::Header(e) => write!(f, "Bad authorization header: {}", e),
            AuthError::MissingToken(e) => write!(f, "Missing access token: {}", e),
            AuthError::AccessToken(e) => write!(f, "Access token rejected: {}", e),
            AuthError::RefreshToken(e) => write!(f, "Refresh token rejected: {}", e),
            AuthError::InvalidApiKey => write!(f, "Invalid API key"),
            AuthError::Hashing(msg) => write!(f, "Password hashing failed: {}", msg),
        }
    }
}

impl StdError for AuthError {}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

/// Central error type that all application errors map to
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Database(DatabaseError),
    Auth(AuthError),
    /// Valid identity, action not allowed
    Forbidden(String),
    NotFound(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

// ============================================================================
// FROM IMPLEMENTATIONS
// ============================================================================

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Auth(AuthError::AccessToken(err))
    }
}

impl From<RefreshTokenError> for AppError {
    fn from(err: RefreshTokenError) -> Self {
        AppError::Auth(AuthError::RefreshToken(err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => {
                return AppError::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                return AppError::Database(DatabaseError::ConnectionPool(err.to_string()))
            }
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                return AppError::Database(DatabaseError::UniqueConstraintViolation(
                    "Email already registered".to_string(),
                ))
            }
            _ => {}
        }
        AppError::Database(DatabaseError::UnexpectedError(err.to_string()))
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
    /// HTTP status code
    pub status: u16,
    /// Timestamp when error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Trait for converting errors to HTTP responses with proper logging
pub trait ErrorHandler {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse);
    fn log_error(&self, request_id: &str);
}

impl AppError {
    /// Status code plus the client-facing code and message.
    ///
    /// Messages are generic: the exact token or credential failure stays in logs.
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),

            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) => {
                    (StatusCode::CONFLICT, "DUPLICATE_ENTRY", e.to_string())
                }
                DatabaseError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found".to_string())
                }
                DatabaseError::ConnectionPool(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Database service temporarily unavailable".to_string(),
                ),
                DatabaseError::UnexpectedError(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error occurred".to_string(),
                ),
            },

            AppError::Auth(e) => match e {
                AuthError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Incorrect email or password".to_string(),
                ),
                AuthError::Header(_) => (
                    StatusCode::BAD_REQUEST,
                    "MALFORMED_HEADER",
                    "Missing or malformed authorization header".to_string(),
                ),
                AuthError::MissingToken(_) => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Missing or invalid authorization header".to_string(),
                ),
                AuthError::AccessToken(_) => (
                    StatusCode::UNAUTHORIZED,
                    "TOKEN_INVALID",
                    "Invalid or expired token".to_string(),
                ),
                AuthError::RefreshToken(_) => (
                    StatusCode::UNAUTHORIZED,
                    "REFRESH_TOKEN_INVALID",
                    "Invalid, expired or revoked refresh token".to_string(),
                ),
                AuthError::InvalidApiKey => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_API_KEY",
                    "Invalid API key".to_string(),
                ),
                AuthError::Hashing(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                ),
            },

            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),

            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        }
    }
}

impl ErrorHandler for AppError {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse) {
        let (status, code, message) = self.classify();
        let error_response =
            ErrorResponse::new(request_id.to_string(), message, code.to_string(), status.as_u16());
        (status, error_response)
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Validation error");
            }
            AppError::Database(DatabaseError::UniqueConstraintViolation(_)) => {
                tracing::warn!(request_id = request_id, error = %self, "Duplicate entry attempt");
            }
            AppError::Database(DatabaseError::NotFound(_)) | AppError::NotFound(_) => {
                tracing::info!(request_id = request_id, error = %self, "Resource not found");
            }
            AppError::Database(e) => {
                tracing::error!(request_id = request_id, error = %e, "Database error");
            }
            AppError::Auth(AuthError::Hashing(msg)) => {
                tracing::error!(request_id = request_id, error = %msg, "Password hashing error");
            }
            AppError::Auth(AuthError::InvalidCredentials) => {
                tracing::warn!(request_id = request_id, "Invalid credentials attempt");
            }
            AppError::Auth(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Authentication error");
            }
            AppError::Forbidden(msg) => {
                tracing::warn!(request_id = request_id, error = %msg, "Forbidden action");
            }
            AppError::Internal(msg) => {
                tracing::error!(request_id = request_id, error = %msg, "Internal error");
            }
        }
    }
}

/// Implement ResponseError for Actix-web integration
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&request_id);

        let (status, error_response) = <Self as ErrorHandler>::error_response(self, &request_id);

        HttpResponse::build(status).json(error_response)
    }

    fn status_code(&self) -> StatusCode {
        self.classify().0
    }
}
