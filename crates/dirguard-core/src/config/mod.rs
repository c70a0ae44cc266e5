//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::logging::LoggingConfig;
pub use self::session::{OverflowStrategy, SessionConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Session lifecycle settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Role lookup cache settings.
    #[serde(default)]
    pub role_cache: RoleCacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

/// Role lookup cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCacheConfig {
    /// Maximum number of cached roles.
    #[serde(default = "default_role_cache_capacity")]
    pub max_capacity: u64,
    /// Seconds a cached role stays valid.
    #[serde(default = "default_role_cache_ttl")]
    pub time_to_live_seconds: u64,
}

impl Default for RoleCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_role_cache_capacity(),
            time_to_live_seconds: default_role_cache_ttl(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the given base file with an optional `config/{env}` overlay
    /// (where `env` comes from `DIRGUARD_ENV`) and environment variables
    /// prefixed with `DIRGUARD__`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let env = std::env::var("DIRGUARD_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DIRGUARD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.session.validate()?;
        Ok(config)
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_role_cache_capacity() -> u64 {
    1024
}

fn default_role_cache_ttl() -> u64 {
    60
}
