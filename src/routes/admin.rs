use actix_web::{http::header::ContentType, web, HttpResponse};

use crate::metrics::HitCounter;

/// GET /admin/metrics
pub async fn metrics(hits: web::Data<HitCounter>) -> HttpResponse {
    let page = format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>"#,
        hits.load()
    );

    HttpResponse::Ok().content_type(ContentType::html()).body(page)
}

/// POST /admin/reset
pub async fn reset(hits: web::Data<HitCounter>) -> HttpResponse {
    hits.reset();
    tracing::info!("File server hit counter reset");

    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("Hits reset to 0")
}
