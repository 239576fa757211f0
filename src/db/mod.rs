//! # Database Collaborator
//!
//! The seam through which built statements reach a database. Production
//! uses [`MySqlExecutor`] over a bounded pool; tests use [`MemoryExecutor`].

pub mod memory;
pub mod mysql;
pub mod pool;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::gateway::statement::Statement;

pub use memory::MemoryExecutor;
pub use mysql::MySqlExecutor;

/// Outcome of a row-mutating statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Identifier assigned by the last INSERT on this connection
    pub last_insert_id: u64,
    pub rows_affected: u64,
}

/// Failures surfaced by the database collaborator
#[derive(Debug, Error)]
pub enum DbError {
    /// Startup retry budget exhausted
    #[error("database unreachable after {attempts} attempts: {source}")]
    Unreachable {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    /// Statement execution failed
    #[error("statement failed: {0}")]
    Execute(#[from] sqlx::Error),

    /// A returned column could not be decoded
    #[error("could not decode column \"{column}\": {source}")]
    Decode {
        column: String,
        #[source]
        source: sqlx::Error,
    },

    /// Executor-internal failure
    #[error("internal executor error: {0}")]
    Internal(String),
}

impl DbError {
    /// A closed-pool failure, used to simulate an outage in tests.
    pub fn closed_pool() -> Self {
        DbError::Execute(sqlx::Error::PoolClosed)
    }
}

/// Executes built statements against a database
#[async_trait]
pub trait StatementExecutor: Send + Sync {
    /// Run a row-returning statement, yielding records in driver order
    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Map<String, Value>>, DbError>;

    /// Run a row-mutating statement
    async fn execute(&self, statement: &Statement) -> Result<ExecOutcome, DbError>;
}
