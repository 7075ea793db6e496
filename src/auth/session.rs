/// Session lifecycle
///
/// Login, refresh, revoke and the two user mutations that sit behind an
/// authenticated identity. Handlers call these and only shape HTTP.

use actix_web::http::header::HeaderMap;
use uuid::Uuid;

use crate::audit::{log_audit, AuditAction, AuditLog};
use crate::auth::bearer::extract_bearer;
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::refresh_token::{issue_refresh_token, resolve_refresh_token, revoke_refresh_token};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError, ValidationError};
use crate::store::{Store, User};
use crate::validators::{is_valid_email, is_valid_password};

/// Everything a successful login hands back
#[derive(Debug)]
pub struct LoginSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Create a user account
///
/// # Errors
/// - Validation errors for a bad email or weak password
/// - `DatabaseError::UniqueConstraintViolation` when the email is taken
pub async fn register<S>(store: &S, email: &str, password: &str) -> Result<User, AppError>
where
    S: Store + ?Sized,
{
    let email = is_valid_email(email)?;
    is_valid_password(password)?;
    let hashed_password = hash_password(password)?;

    let user = store.create_user(&email, &hashed_password).await?;

    log_audit(&AuditLog::success(AuditAction::Register, user.id));
    Ok(user)
}

/// Authenticate with email and password and open a new session
///
/// An unknown email and a wrong password fail identically with
/// `AuthError::InvalidCredentials`.
pub async fn login<S>(
    store: &S,
    config: &AuthSettings,
    email: &str,
    password: &str,
    expires_in_seconds: Option<i64>,
) -> Result<LoginSession, AppError>
where
    S: Store + ?Sized,
{
    let user = match store.get_user_by_email(email.trim()).await? {
        Some(user) => user,
        None => {
            log_audit(&AuditLog::failure(AuditAction::Login, "unknown email"));
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    if !verify_password(password, &user.hashed_password)? {
        log_audit(&AuditLog::failure(AuditAction::Login, "password mismatch").with_user_id(user.id));
        return Err(AuthError::InvalidCredentials.into());
    }

    let ttl = config.access_token_ttl(expires_in_seconds);
    let access_token = generate_access_token(user.id, ttl, config)?;
    let refresh_token =
        issue_refresh_token(store, user.id, config.refresh_token_expiry_days).await?;

    log_audit(&AuditLog::success(AuditAction::Login, user.id));
    Ok(LoginSession {
        user,
        access_token,
        refresh_token,
    })
}

/// Mint a new access token from the refresh token in the bearer header
///
/// The refresh token itself stays valid; it is neither rotated nor consumed.
pub async fn refresh<S>(store: &S, config: &AuthSettings, headers: &HeaderMap) -> Result<String, AppError>
where
    S: Store + ?Sized,
{
    let token = extract_bearer(headers).map_err(AuthError::Header)?;

    let user_id = resolve_refresh_token(store, token).await.map_err(|e| {
        log_audit(&AuditLog::failure(AuditAction::Refresh, e.to_string()));
        e
    })?;

    let access_token = generate_access_token(user_id, config.access_token_ttl(None), config)?;

    log_audit(&AuditLog::success(AuditAction::Refresh, user_id));
    Ok(access_token)
}

/// Revoke the refresh token in the bearer header
pub async fn revoke<S>(store: &S, headers: &HeaderMap) -> Result<(), AppError>
where
    S: Store + ?Sized,
{
    let token = extract_bearer(headers).map_err(AuthError::Header)?;

    let user_id = revoke_refresh_token(store, token).await.map_err(|e| {
        log_audit(&AuditLog::failure(AuditAction::Revoke, e.to_string()));
        e
    })?;

    log_audit(&AuditLog::success(AuditAction::Revoke, user_id));
    Ok(())
}

/// Change the email and password of an authenticated user
///
/// The new password must differ from the current one. The check verifies the
/// plaintext against the stored digest, since a fresh salted hash never equals it.
pub async fn update_profile<S>(
    store: &S,
    user_id: Uuid,
    email: &str,
    password: &str,
) -> Result<User, AppError>
where
    S: Store + ?Sized,
{
    let email = is_valid_email(email)?;
    is_valid_password(password)?;

    let current = store
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user".to_string()))?;

    if verify_password(password, &current.hashed_password)? {
        log_audit(&AuditLog::failure(AuditAction::UpdateProfile, "password reused").with_user_id(user_id));
        return Err(ValidationError::PasswordReused.into());
    }

    let hashed_password = hash_password(password)?;
    let user = store
        .update_login_details(user_id, &email, &hashed_password)
        .await?
        .ok_or_else(|| AppError::NotFound("user".to_string()))?;

    log_audit(&AuditLog::success(AuditAction::UpdateProfile, user_id));
    Ok(user)
}

/// Flag a user as a Chirpy Red member
pub async fn upgrade_membership<S>(store: &S, user_id: Uuid) -> Result<User, AppError>
where
    S: Store + ?Sized,
{
    let user = store
        .upgrade_to_chirpy_red(user_id)
        .await?
        .ok_or_else(|| {
            log_audit(&AuditLog::failure(AuditAction::UpgradeMembership, "unknown user"));
            AppError::NotFound("user".to_string())
        })?;

    log_audit(&AuditLog::success(AuditAction::UpgradeMembership, user_id));
    Ok(user)
}
