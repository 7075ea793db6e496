/// Persistence
///
/// Repository traits for users, refresh tokens and chirps, with a Postgres
/// implementation and an in-memory one for local runs and tests.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub hashed_password: String,
    pub is_chirpy_red: bool,
}

/// Stored refresh token; `token_hash` is the SHA-256 hex digest of the client's token
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    pub token_hash: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Chirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DatabaseError::UniqueConstraintViolation` if the email is taken
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn update_login_details(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, AppError>;

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert_refresh_token(&self, token: &RefreshToken) -> Result<(), AppError>;

    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshToken>, AppError>;

    /// Set `revoked_at` on a live (unrevoked, unexpired) token.
    /// Returns `false` when no live row matched.
    async fn mark_refresh_token_revoked(
        &self,
        token_hash: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ChirpRepository: Send + Sync {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, AppError>;

    /// Oldest first, optionally only one author's
    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>, AppError>;

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, AppError>;

    /// Returns `false` if there was nothing to delete
    async fn delete_chirp(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Everything the service persists
pub trait Store: UserRepository + RefreshTokenRepository + ChirpRepository {}

impl<T> Store for T where T: UserRepository + RefreshTokenRepository + ChirpRepository {}
