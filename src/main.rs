use chirpy::configuration::{get_configuration, DatabaseSettings, StorageBackend};
use chirpy::startup::run;
use chirpy::store::{InMemoryStore, PostgresStore, Store};
use chirpy::telemetry::init_telemetry;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;

async fn connect_postgres(settings: &DatabaseSettings) -> std::io::Result<PostgresStore> {
    tracing::info!(host = %settings.host, database = %settings.database_name, "Attempting to connect to database");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.connection_string())
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Database connection error",
            )
        })?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, "Migration error")
        })?;

    tracing::info!("Database connection pool created and migrated");
    Ok(PostgresStore::new(pool))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry("info,sqlx=warn");

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let store: Arc<dyn Store> = match configuration.storage {
        StorageBackend::Postgres => Arc::new(connect_postgres(&configuration.database).await?),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(
        listener,
        store,
        configuration.auth,
        configuration.webhook,
        configuration.application.static_dir,
    )?;
    tracing::info!("Server started successfully");

    server.await
}
