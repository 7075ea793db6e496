/// Payment partner webhook
///
/// `Authorization: ApiKey <key>`; only `user.upgraded` does anything.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{authorize_api_key, session};
use crate::configuration::WebhookSettings;
use crate::error::{AppError, ValidationError};
use crate::store::Store;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: Option<WebhookData>,
}

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: Uuid,
}

/// POST /api/polka/webhooks
///
/// The key is checked before the body is parsed, so a bad key is always 401.
///
/// # Errors
/// - 400: Malformed body, or `user.upgraded` without `data.user_id`
/// - 401: Missing or wrong API key
/// - 404: Unknown user
pub async fn polka_webhook(
    req: HttpRequest,
    body: web::Bytes,
    store: web::Data<dyn Store>,
    webhook_config: web::Data<WebhookSettings>,
) -> Result<HttpResponse, AppError> {
    authorize_api_key(req.headers(), webhook_config.get_ref())?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

    if event.event != USER_UPGRADED {
        tracing::debug!(event = %event.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let data = event
        .data
        .ok_or_else(|| ValidationError::EmptyField("data.user_id".to_string()))?;
    session::upgrade_membership(store.get_ref(), data.user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
