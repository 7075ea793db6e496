use actix_web::{web, HttpResponse};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::store::Store;
use crate::validators::is_valid_chirp_body;

#[derive(Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Deserialize)]
pub struct ListChirpsQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub sort: SortOrder,
}

/// `?author_id=` with no value means no filter
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => Uuid::parse_str(raw.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// POST /api/chirps (access token)
pub async fn create_chirp(
    identity: web::ReqData<AuthenticatedUser>,
    form: web::Json<CreateChirpRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let body = is_valid_chirp_body(&form.body)?;
    let chirp = store.create_chirp(identity.user_id, &body).await?;

    tracing::info!(chirp_id = %chirp.id, user_id = %identity.user_id, "Chirp created");
    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps?author_id=<uuid>&sort=asc|desc
pub async fn list_chirps(
    query: web::Query<ListChirpsQuery>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let mut chirps = store.list_chirps(query.author_id).await?;
    if query.sort == SortOrder::Desc {
        chirps.reverse();
    }

    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<Uuid>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let chirp = store
        .get_chirp(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("chirp".to_string()))?;

    Ok(HttpResponse::Ok().json(chirp))
}

/// DELETE /api/chirps/{chirp_id} (access token, author only)
///
/// # Errors
/// - 403: Caller is not the author
/// - 404: No such chirp
pub async fn delete_chirp(
    identity: web::ReqData<AuthenticatedUser>,
    path: web::Path<Uuid>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = path.into_inner();

    let chirp = store
        .get_chirp(chirp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("chirp".to_string()))?;

    if chirp.user_id != identity.user_id {
        return Err(AppError::Forbidden("not the author of this chirp".to_string()));
    }

    if !store.delete_chirp(chirp_id).await? {
        return Err(AppError::NotFound("chirp".to_string()));
    }

    tracing::info!(chirp_id = %chirp_id, user_id = %identity.user_id, "Chirp deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> Result<ListChirpsQuery, actix_web::error::QueryPayloadError> {
        web::Query::<ListChirpsQuery>::from_query(query).map(web::Query::into_inner)
    }

    #[test]
    fn test_empty_author_id_means_no_filter() {
        let query = parse("author_id=").unwrap();
        assert!(query.author_id.is_none());
        assert!(query.sort == SortOrder::Asc);
    }

    #[test]
    fn test_author_id_and_sort_parse() {
        let author_id = Uuid::new_v4();
        let query = parse(&format!("author_id={}&sort=desc", author_id)).unwrap();

        assert_eq!(query.author_id, Some(author_id));
        assert!(query.sort == SortOrder::Desc);
    }

    #[test]
    fn test_missing_author_id() {
        assert!(parse("").unwrap().author_id.is_none());
    }

    #[test]
    fn test_malformed_author_id_rejected() {
        assert!(parse("author_id=not-a-uuid").is_err());
    }
}
