//! # Configuration
//!
//! Environment-backed configuration: database coordinates, pool bound, and
//! the HTTP listen settings. Loading goes through an injectable variable
//! lookup so tests never touch the process environment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_server::HttpServerConfig;

/// Configuration failures at startup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Required variable absent from the environment
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// Variable present but unparseable
    #[error("environment variable {name} is not a valid {expected}: \"{value}\"")]
    InvalidVar {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Database coordinates and pool bound
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,

    /// Maximum pooled connections (default: 10)
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_pool_size() -> u32 {
    10
}

/// Full gateway configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub http: HttpServerConfig,
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// Required: `DB_HOST`, `DB_USER`, `DB_PASS`, `DB_NAME`.
    /// Optional: `DB_POOL_SIZE` (default 10, must be positive), `PORT`
    /// (default 3000).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an injected variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseConfig {
            host: require(&lookup, "DB_HOST")?,
            user: require(&lookup, "DB_USER")?,
            password: require(&lookup, "DB_PASS")?,
            database: require(&lookup, "DB_NAME")?,
            pool_size: parse_or(&lookup, "DB_POOL_SIZE", default_pool_size())?,
        };

        // An empty pool can never lend a connection
        if database.pool_size == 0 {
            return Err(ConfigError::InvalidVar {
                name: "DB_POOL_SIZE",
                expected: "positive number",
                value: "0".to_string(),
            });
        }

        let mut http = HttpServerConfig::default();
        http.port = parse_or(&lookup, "PORT", http.port)?;

        Ok(Self { database, http })
    }
}

fn require<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).ok_or(ConfigError::MissingVar(name))
}

fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
            name,
            expected: "number",
            value: raw,
        }),
    }
}
