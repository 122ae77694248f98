//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Email (SMTP) configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Base URLs for link building and redirects.
    #[serde(default)]
    pub urls: UrlConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Whether the deployment supports multi-record atomic writes.
    ///
    /// Single-node deployments without that capability set this to false,
    /// which makes the transfer engine use its sequential fallback path.
    #[serde(default = "default_atomic_writes")]
    pub atomic_writes: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_atomic_writes() -> bool {
    true
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Activation token expiration in seconds.
    #[serde(default = "default_activation_token_expiry")]
    pub activation_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    7200 // 2 hours
}

fn default_activation_token_expiry() -> u64 {
    1800 // 30 minutes
}

/// Email (SMTP) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP relay port.
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_username: String,
    /// SMTP password.
    pub smtp_password: String,
    /// Sender display name.
    pub from_name: String,
    /// Sender address.
    pub from_email: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_name: "Centime".to_string(),
            from_email: "no-reply@centime.local".to_string(),
        }
    }
}

/// Base URLs used when building activation links and redirects.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlConfig {
    /// Frontend base URL (activation redirect target).
    pub frontend: String,
    /// Backend base URL (activation link host).
    pub backend: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            frontend: "http://localhost:5173".to_string(),
            backend: "http://localhost:8080".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CENTIME").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
