/// Refresh Token Management
///
/// Handles secure refresh token generation, storage, validation, and revocation.
/// Refresh tokens are:
/// - 32 bytes from the OS-seeded CSPRNG, hex encoded
/// - Hashed with SHA-256 before storage (never store plaintext)
/// - Long lived and not rotated on use; only revocation or expiry ends them
/// - Database-backed for revocation support

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::AppError;
use crate::store::{RefreshToken, RefreshTokenRepository};

const REFRESH_TOKEN_BYTES: usize = 32;

/// Why a refresh token could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenError {
    NotFound,
    Expired,
    Revoked,
}

impl fmt::Display for RefreshTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshTokenError::NotFound => write!(f, "refresh token not found"),
            RefreshTokenError::Expired => write!(f, "refresh token expired"),
            RefreshTokenError::Revoked => write!(f, "refresh token revoked"),
        }
    }
}

impl std::error::Error for RefreshTokenError {}

/// Generate a new cryptographically secure refresh token
///
/// The token is returned in plaintext (this is what the client stores).
/// The server stores only the SHA-256 hash.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a refresh token using SHA-256
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Decide whether a stored record still authorizes its owner at `now`
fn check_refresh_token(
    record: Option<&RefreshToken>,
    now: DateTime<Utc>,
) -> Result<Uuid, RefreshTokenError> {
    let record = record.ok_or(RefreshTokenError::NotFound)?;

    if record.revoked_at.is_some() {
        return Err(RefreshTokenError::Revoked);
    }

    if record.expires_at <= now {
        return Err(RefreshTokenError::Expired);
    }

    Ok(record.user_id)
}

/// Issue and persist a new refresh token for `user_id`
///
/// # Returns
/// The plaintext token to hand to the client
///
/// # Errors
/// Returns error if the repository write fails
pub async fn issue_refresh_token<R>(
    repo: &R,
    user_id: Uuid,
    expiry_days: i64,
) -> Result<String, AppError>
where
    R: RefreshTokenRepository + ?Sized,
{
    let token = generate_refresh_token();
    let now = Utc::now();

    let record = RefreshToken {
        token_hash: hash_token(&token),
        user_id,
        created_at: now,
        updated_at: now,
        expires_at: now + Duration::days(expiry_days),
        revoked_at: None,
    };
    repo.insert_refresh_token(&record).await?;

    Ok(token)
}

/// Resolve a refresh token to the user that owns it
///
/// Checks:
/// 1. Token exists
/// 2. Token has not been revoked
/// 3. Token has not expired
///
/// # Errors
/// `RefreshTokenError` (as `AppError::Auth`) for unusable tokens, database errors otherwise
pub async fn resolve_refresh_token<R>(repo: &R, token: &str) -> Result<Uuid, AppError>
where
    R: RefreshTokenRepository + ?Sized,
{
    let record = repo.find_refresh_token(&hash_token(token)).await?;

    check_refresh_token(record.as_ref(), Utc::now()).map_err(|e| {
        match record.as_ref() {
            Some(r) => tracing::warn!(user_id = %r.user_id, reason = %e, "Refresh token rejected"),
            None => tracing::warn!(reason = %e, "Refresh token rejected"),
        }
        AppError::from(e)
    })
}

/// Revoke a refresh token
///
/// Only a currently usable token can be revoked: unknown, expired or already
/// revoked tokens fail the same way `resolve_refresh_token` does.
///
/// # Returns
/// The owner of the revoked token
pub async fn revoke_refresh_token<R>(repo: &R, token: &str) -> Result<Uuid, AppError>
where
    R: RefreshTokenRepository + ?Sized,
{
    let user_id = resolve_refresh_token(repo, token).await?;

    let revoked = repo
        .mark_refresh_token_revoked(&hash_token(token), Utc::now())
        .await?;
    if !revoked {
        // Lost a race with another revoke of the same token
        return Err(RefreshTokenError::Revoked.into());
    }

    tracing::info!(user_id = %user_id, "Refresh token revoked");
    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::store::InMemoryStore;

    fn refresh_error(result: Result<Uuid, AppError>) -> RefreshTokenError {
        match result {
            Err(AppError::Auth(AuthError::RefreshToken(e))) => e,
            other => panic!("Expected refresh token error, got {:?}", other),
        }
    }

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token();

        // 32 bytes, hex encoded
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_hashing() {
        let token = generate_refresh_token();
        let hash1 = hash_token(&token);
        let hash2 = hash_token(&token);

        assert_eq!(hash1, hash2);
        assert_ne!(token, hash1);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_tokens_different_hashes() {
        let token1 = generate_refresh_token();
        let token2 = generate_refresh_token();

        assert_ne!(token1, token2);
        assert_ne!(hash_token(&token1), hash_token(&token2));
    }

    #[tokio::test]
    async fn test_issue_then_resolve() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();

        let token = issue_refresh_token(&store, user_id, 60).await.unwrap();
        let resolved = resolve_refresh_token(&store, &token).await.unwrap();

        assert_eq!(resolved, user_id);
    }

    #[tokio::test]
    async fn test_issued_token_expires_in_sixty_days() {
        let store = InMemoryStore::new();
        let token = issue_refresh_token(&store, Uuid::new_v4(), 60).await.unwrap();

        let record = store
            .find_refresh_token(&hash_token(&token))
            .await
            .unwrap()
            .expect("token should be stored");

        assert_eq!(record.expires_at - record.created_at, Duration::days(60));
        assert!(record.revoked_at.is_none());
        // Plaintext never reaches the store
        assert_ne!(record.token_hash, token);
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let store = InMemoryStore::new();
        let result = resolve_refresh_token(&store, "no-such-token").await;

        assert_eq!(refresh_error(result), RefreshTokenError::NotFound);
    }

    #[tokio::test]
    async fn test_revoked_token_no_longer_resolves() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let token = issue_refresh_token(&store, user_id, 60).await.unwrap();

        assert_eq!(revoke_refresh_token(&store, &token).await.unwrap(), user_id);

        for _ in 0..3 {
            let result = resolve_refresh_token(&store, &token).await;
            assert_eq!(refresh_error(result), RefreshTokenError::Revoked);
        }
    }

    #[tokio::test]
    async fn test_revoking_twice_fails() {
        let store = InMemoryStore::new();
        let token = issue_refresh_token(&store, Uuid::new_v4(), 60).await.unwrap();

        revoke_refresh_token(&store, &token).await.unwrap();
        let second = revoke_refresh_token(&store, &token).await;

        assert_eq!(refresh_error(second), RefreshTokenError::Revoked);
    }

    #[tokio::test]
    async fn test_revoking_unknown_token_fails() {
        let store = InMemoryStore::new();
        let result = revoke_refresh_token(&store, "no-such-token").await;

        assert_eq!(refresh_error(result), RefreshTokenError::NotFound);
    }

    #[tokio::test]
    async fn test_expired_token_fails_without_revocation() {
        let store = InMemoryStore::new();
        let token = generate_refresh_token();
        let created = Utc::now() - Duration::days(61);

        store
            .insert_refresh_token(&RefreshToken {
                token_hash: hash_token(&token),
                user_id: Uuid::new_v4(),
                created_at: created,
                updated_at: created,
                expires_at: created + Duration::days(60),
                revoked_at: None,
            })
            .await
            .unwrap();

        let result = resolve_refresh_token(&store, &token).await;
        assert_eq!(refresh_error(result), RefreshTokenError::Expired);

        let revoke = revoke_refresh_token(&store, &token).await;
        assert_eq!(refresh_error(revoke), RefreshTokenError::Expired);
    }

    #[test]
    fn test_check_prefers_revoked_over_expired() {
        let now = Utc::now();
        let record = RefreshToken {
            token_hash: "hash".to_string(),
            user_id: Uuid::new_v4(),
            created_at: now - Duration::days(90),
            updated_at: now - Duration::days(80),
            expires_at: now - Duration::days(30),
            revoked_at: Some(now - Duration::days(80)),
        };

        assert_eq!(
            check_refresh_token(Some(&record), now),
            Err(RefreshTokenError::Revoked)
        );
    }
}
