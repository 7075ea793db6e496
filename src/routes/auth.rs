/// Authentication Routes
///
/// Login, access token refresh and refresh token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::session;
use crate::configuration::AuthSettings;
use crate::error::AppError;
use crate::routes::users::UserResponse;
use crate::store::Store;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Optional shorter access token lifetime
    pub expires_in_seconds: Option<i64>,
}

/// Profile plus both tokens
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// POST /api/login
///
/// # Errors
/// - 400: Malformed body
/// - 401: Invalid credentials (email not found or wrong password, indistinguishable)
pub async fn login(
    form: web::Json<LoginRequest>,
    store: web::Data<dyn Store>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let login = session::login(
        store.get_ref(),
        auth_config.get_ref(),
        &form.email,
        &form.password,
        form.expires_in_seconds,
    )
    .await?;

    tracing::info!(user_id = %login.user.id, "User logged in successfully");

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: login.user.into(),
        token: login.access_token,
        refresh_token: login.refresh_token,
    }))
}

/// POST /api/refresh
///
/// Takes the refresh token as `Authorization: Bearer <refresh_token>` and
/// returns a new access token. The refresh token is not rotated.
///
/// # Errors
/// - 400: Missing or malformed authorization header
/// - 401: Unknown, expired, or revoked refresh token
pub async fn refresh(
    req: HttpRequest,
    store: web::Data<dyn Store>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let token = session::refresh(store.get_ref(), auth_config.get_ref(), req.headers()).await?;

    Ok(HttpResponse::Ok().json(RefreshResponse { token }))
}

/// POST /api/revoke
///
/// # Errors
/// - 400: Missing or malformed authorization header
/// - 401: Unknown, expired, or already revoked refresh token
pub async fn revoke(
    req: HttpRequest,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    session::revoke(store.get_ref(), req.headers()).await?;

    Ok(HttpResponse::NoContent().finish())
}
