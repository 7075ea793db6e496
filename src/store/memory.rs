use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, DatabaseError};
use crate::store::{Chirp, ChirpRepository, RefreshToken, RefreshTokenRepository, User, UserRepository};

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    users_by_email: HashMap<String, Uuid>,
    refresh_tokens: HashMap<String, RefreshToken>,
    // Insertion order doubles as creation order
    chirps: Vec<Chirp>,
}

/// Process-local store
///
/// Each operation takes the lock once, so every read-modify-write is atomic
/// the same way a single SQL statement is.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_email() -> AppError {
    AppError::Database(DatabaseError::UniqueConstraintViolation(
        "Email already registered".to_string(),
    ))
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError> {
        let mut state = self.state.write().await;
        if state.users_by_email.contains_key(email) {
            return Err(duplicate_email());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };
        state.users_by_email.insert(user.email.clone(), user.id);
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .users_by_email
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn update_login_details(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, AppError> {
        let mut state = self.state.write().await;
        let state = &mut *state;

        if let Some(owner) = state.users_by_email.get(email) {
            if *owner != id {
                return Err(duplicate_email());
            }
        }

        let user = match state.users.get_mut(&id) {
            Some(user) => user,
            None => return Ok(None),
        };

        state.users_by_email.remove(&user.email);
        state.users_by_email.insert(email.to_string(), id);
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(&id).map(|user| {
            user.is_chirpy_red = true;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryStore {
    async fn insert_refresh_token(&self, token: &RefreshToken) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if state.refresh_tokens.contains_key(&token.token_hash) {
            return Err(AppError::Database(DatabaseError::UnexpectedError(
                "refresh token collision".to_string(),
            )));
        }
        state
            .refresh_tokens
            .insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshToken>, AppError> {
        Ok(self.state.read().await.refresh_tokens.get(token_hash).cloned())
    }

    async fn mark_refresh_token_revoked(
        &self,
        token_hash: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        match state.refresh_tokens.get_mut(token_hash) {
            Some(token) if token.revoked_at.is_none() && token.expires_at > revoked_at => {
                token.revoked_at = Some(revoked_at);
                token.updated_at = revoked_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl ChirpRepository for InMemoryStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, AppError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(AppError::Database(DatabaseError::UnexpectedError(
                "chirp author does not exist".to_string(),
            )));
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        state.chirps.push(chirp.clone());

        Ok(chirp)
    }

    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .chirps
            .iter()
            .filter(|chirp| author_id.map_or(true, |author| chirp.user_id == author))
            .cloned()
            .collect())
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, AppError> {
        let state = self.state.read().await;
        Ok(state.chirps.iter().find(|chirp| chirp.id == id).cloned())
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let before = state.chirps.len();
        state.chirps.retain(|chirp| chirp.id != id);
        Ok(state.chirps.len() != before)
    }
}
