//! Database configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `QUITANDA_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to the generic `DATABASE_URL`)
//!
//! ## Optional
//! - `QUITANDA_DB_MAX_CONNECTIONS` - Pool size cap (default: 10)

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Database connection configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL (contains password)
    pub url: SecretString,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or a variable
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let url = get_database_url("QUITANDA_DATABASE_URL")?;
        let max_connections = get_env_or_default("QUITANDA_DB_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("QUITANDA_DB_MAX_CONNECTIONS".to_string(), e.to_string())
            })?;

        Ok(Self {
            url,
            max_connections,
        })
    }
}

/// Get the database URL with fallback to the generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
