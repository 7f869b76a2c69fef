//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod ledger;
pub mod logging;
pub mod otp;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::ledger::LedgerConfig;
pub use self::logging::LoggingConfig;
pub use self::otp::OtpConfig;

use crate::error::AppError;

/// Environment variable prefix for overrides, e.g. `TABAUDIT__DATABASE__URL`.
pub const ENV_PREFIX: &str = "TABAUDIT";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Consumable ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// One-time code settings.
    #[serde(default)]
    pub otp: OtpConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml`, the overlay `config/{env}.toml` and
    /// environment variables prefixed with `TABAUDIT__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration starting from an explicit base file path
    /// (without extension). The environment overlay is looked up next to it.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let dir = std::path::Path::new(base)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let overlay = if dir.is_empty() {
            env.to_string()
        } else {
            format!("{dir}/{env}")
        };

        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&overlay).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Build a configuration with defaults for every section, pointing at
    /// the given database.
    pub fn with_database_url(url: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::new(url),
            auth: AuthConfig::default(),
            ledger: LedgerConfig::default(),
            otp: OtpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
