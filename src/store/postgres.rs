use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::store::{Chirp, ChirpRepository, RefreshToken, RefreshTokenRepository, User, UserRepository};

/// Postgres-backed store
///
/// Every statement is a single parameterized query; there are no
/// multi-statement transactions.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, created_at, updated_at, email, hashed_password)
            VALUES ($1, NOW(), NOW(), $2, $3)
            RETURNING id, created_at, updated_at, email, hashed_password, is_chirpy_red
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, created_at, updated_at, email, hashed_password, is_chirpy_red
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, created_at, updated_at, email, hashed_password, is_chirpy_red
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_login_details(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $2, hashed_password = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, created_at, updated_at, email, hashed_password, is_chirpy_red
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(hashed_password)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_chirpy_red = TRUE, updated_at = NOW()
            WHERE id = $1
            RETURNING id, created_at, updated_at, email, hashed_password, is_chirpy_red
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresStore {
    async fn insert_refresh_token(&self, token: &RefreshToken) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token_hash, user_id, created_at, updated_at, expires_at, revoked_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&token.token_hash)
        .bind(token.user_id)
        .bind(token.created_at)
        .bind(token.updated_at)
        .bind(token.expires_at)
        .bind(token.revoked_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshToken>, AppError> {
        let token = sqlx::query_as::<_, RefreshToken>(
            r#"
            SELECT token_hash, user_id, created_at, updated_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn mark_refresh_token_revoked(
        &self,
        token_hash: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $2, updated_at = $2
            WHERE token_hash = $1 AND revoked_at IS NULL AND expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(revoked_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl ChirpRepository for PostgresStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, AppError> {
        let chirp = sqlx::query_as::<_, Chirp>(
            r#"
            INSERT INTO chirps (id, created_at, updated_at, body, user_id)
            VALUES ($1, NOW(), NOW(), $2, $3)
            RETURNING id, created_at, updated_at, body, user_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(chirp)
    }

    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>, AppError> {
        let chirps = sqlx::query_as::<_, Chirp>(
            r#"
            SELECT id, created_at, updated_at, body, user_id
            FROM chirps
            WHERE $1::uuid IS NULL OR user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(chirps)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, AppError> {
        let chirp = sqlx::query_as::<_, Chirp>(
            r#"
            SELECT id, created_at, updated_at, body, user_id
            FROM chirps
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(chirp)
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
