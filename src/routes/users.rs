/// User Routes
///
/// Registration and credential updates.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::session;
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::store::{Store, User};

/// Email and password, used by both registration and update
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user; never includes the password hash
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: Invalid email or weak password
/// - 409: Email already registered
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let user = session::register(store.get_ref(), &form.email, &form.password).await?;

    tracing::info!(user_id = %user.id, "User registered successfully");

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// PUT /api/users
///
/// **Requires valid JWT access token** in Authorization header.
///
/// # Errors
/// - 400: Invalid email, weak password, or password unchanged
/// - 401: Missing or invalid token (handled by middleware)
/// - 409: Email belongs to another user
pub async fn update_user(
    identity: web::ReqData<AuthenticatedUser>,
    form: web::Json<CredentialsRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let user =
        session::update_profile(store.get_ref(), identity.user_id, &form.email, &form.password)
            .await?;

    tracing::info!(user_id = %user.id, "User credentials updated");

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
