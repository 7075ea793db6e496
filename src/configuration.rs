use config::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
    pub webhook: WebhookSettings,
    #[serde(default)]
    pub storage: StorageBackend,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Directory served under `/app`
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Where users, chirps and refresh tokens live
#[derive(serde::Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

/// Token signing and lifetime settings
///
/// Holds the signing secret, so it deliberately has no `Debug` impl.
#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Access token lifetime in seconds when the caller asks for nothing else
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    /// Caller-requested lifetimes must be strictly below this, in seconds
    #[serde(default = "default_access_token_expiry")]
    pub max_access_token_expiry: i64,
    #[serde(default = "default_refresh_token_expiry_days")]
    pub refresh_token_expiry_days: i64,
}

impl AuthSettings {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: default_issuer(),
            access_token_expiry: default_access_token_expiry(),
            max_access_token_expiry: default_access_token_expiry(),
            refresh_token_expiry_days: default_refresh_token_expiry_days(),
        }
    }

    /// Lifetime to stamp on a new access token.
    ///
    /// A requested override is honoured only when `0 < requested < max_access_token_expiry`.
    pub fn access_token_ttl(&self, requested: Option<i64>) -> i64 {
        match requested {
            Some(seconds) if seconds > 0 && seconds < self.max_access_token_expiry => seconds,
            _ => self.access_token_expiry,
        }
    }
}

/// Shared secret for the payment partner webhook
#[derive(serde::Deserialize, Clone)]
pub struct WebhookSettings {
    pub polka_key: String,
}

fn default_issuer() -> String {
    "chirpy".to_string()
}

fn default_access_token_expiry() -> i64 {
    3600
}

fn default_refresh_token_expiry_days() -> i64 {
    60
}

fn default_static_dir() -> String {
    "./public".to_string()
}

/// Load settings from `configuration.{yaml,toml,json}` with `APP_` environment overrides,
/// e.g. `APP_AUTH__SECRET` or `APP_STORAGE=memory`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}
