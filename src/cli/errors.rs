//! CLI-specific error types
//!
//! Wraps the failures a command can hit: bad configuration, an
//! unreachable database, or a server that failed to start.

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::DbError;
use crate::http_server::HttpServerError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection or ping failed
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// HTTP server failed to start
    #[error("server error: {0}")]
    Server(#[from] HttpServerError),

    /// Tokio runtime could not be created
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
