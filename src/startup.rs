use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{guard, middleware::Logger, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;

use crate::configuration::{AuthSettings, WebhookSettings};
use crate::error::{AppError, ValidationError};
use crate::logger::LoggerMiddleware;
use crate::metrics::HitCounter;
use crate::middleware::{JwtMiddleware, MetricsMiddleware};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, health_check, list_chirps, login, metrics,
    polka_webhook, refresh, reset, revoke, update_user,
};
use crate::store::Store;

fn malformed(message: String) -> actix_web::Error {
    AppError::from(ValidationError::MalformedBody(message)).into()
}

pub fn run(
    listener: TcpListener,
    store: Arc<dyn Store>,
    auth_config: AuthSettings,
    webhook_config: WebhookSettings,
    static_dir: String,
) -> Result<Server, std::io::Error> {
    let store: web::Data<dyn Store> = web::Data::from(store);
    let auth_config_data = web::Data::new(auth_config.clone());
    let webhook_config_data = web::Data::new(webhook_config);
    let hits = web::Data::new(HitCounter::new());

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(LoggerMiddleware)

            // Shared state
            .app_data(store.clone())
            .app_data(auth_config_data.clone())
            .app_data(webhook_config_data.clone())
            .app_data(hits.clone())

            // Extractor failures become 400 with the usual error body
            .app_data(web::JsonConfig::default().error_handler(|err, _req| malformed(err.to_string())))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| malformed(err.to_string())))
            .app_data(web::PathConfig::default().error_handler(|err, _req| malformed(err.to_string())))

            // Public routes
            .service(web::resource("/api/healthz").route(web::get().to(health_check)))
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))
            .route("/api/polka/webhooks", web::post().to(polka_webhook))
            .route("/admin/metrics", web::get().to(metrics))
            .route("/admin/reset", web::post().to(reset))

            // Protected methods on shared paths; the guarded resource is tried first
            .service(
                web::resource("/api/users")
                    .guard(guard::Put())
                    .wrap(JwtMiddleware::new(auth_config.clone()))
                    .route(web::put().to(update_user)),
            )
            .service(web::resource("/api/users").route(web::post().to(create_user)))
            .service(
                web::resource("/api/chirps")
                    .guard(guard::Post())
                    .wrap(JwtMiddleware::new(auth_config.clone()))
                    .route(web::post().to(create_chirp)),
            )
            .service(web::resource("/api/chirps").route(web::get().to(list_chirps)))
            .service(
                web::resource("/api/chirps/{chirp_id}")
                    .guard(guard::Delete())
                    .wrap(JwtMiddleware::new(auth_config.clone()))
                    .route(web::delete().to(delete_chirp)),
            )
            .service(web::resource("/api/chirps/{chirp_id}").route(web::get().to(get_chirp)))

            // Static file serving, counted for /admin/metrics
            .service(
                web::scope("/app")
                    .wrap(MetricsMiddleware::new(hits.clone()))
                    .service(fs::Files::new("/", &static_dir).index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
