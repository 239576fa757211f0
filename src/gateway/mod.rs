//! # Gateway
//!
//! The request-to-statement core shared by both resources: validate the
//! body against the resource schema, apply the write policy, build the
//! statement, execute it, and shape the outcome.
//!
//! Control flow per request:
//! route handler → schema validation → default-field policy → statement
//! builder → statement executor → response payload.

pub mod errors;
pub mod policy;
pub mod resource;
pub mod statement;

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::debug;

use crate::db::StatementExecutor;

pub use errors::{ErrorResponse, GatewayError, GatewayResult, MalformedInput};
pub use policy::WritePolicy;
pub use resource::{Resource, WriteOp, WriteSet, CUSTOMERS, PRODUCTS};
pub use statement::{SqlValue, Statement};

/// Shared CRUD core, parameterized by a resource declaration
#[derive(Clone)]
pub struct Gateway {
    executor: Arc<dyn StatementExecutor>,
}

impl Gateway {
    pub fn new(executor: Arc<dyn StatementExecutor>) -> Self {
        Self { executor }
    }

    /// All records of the resource's table, in driver order.
    pub async fn list(&self, resource: &Resource) -> GatewayResult<Vec<Map<String, Value>>> {
        let stmt = statement::list(resource);
        Ok(self.executor.fetch_all(&stmt).await?)
    }

    /// Create a record. The response record is the post-policy write set
    /// plus the database-assigned `id`.
    pub async fn create(
        &self,
        resource: &Resource,
        body: &Value,
    ) -> GatewayResult<Map<String, Value>> {
        let mut write_set = resource.validate_write(body, WriteOp::Create)?;
        resource
            .write_policy
            .apply_create(&mut write_set, Utc::now().naive_utc());

        let stmt = statement::insert(resource, &write_set)?;
        let outcome = self.executor.execute(&stmt).await?;
        debug!(
            table = resource.table,
            id = outcome.last_insert_id,
            "record created"
        );

        let mut record = Map::new();
        record.insert("id".to_string(), Value::from(outcome.last_insert_id));
        record.extend(write_set.to_json_map());
        Ok(record)
    }

    /// Update the record at `id`. The fixed confirmation message comes back
    /// whether or not a row matched; the affected-row count is only logged.
    pub async fn update(
        &self,
        resource: &Resource,
        id: &str,
        body: &Value,
    ) -> GatewayResult<&'static str> {
        let mut write_set = resource.validate_write(body, WriteOp::Update)?;
        resource
            .write_policy
            .apply_update(&mut write_set, Utc::now().naive_utc());

        let stmt = statement::update(resource, id, &write_set)?;
        let outcome = self.executor.execute(&stmt).await?;
        debug!(
            table = resource.table,
            id,
            rows = outcome.rows_affected,
            "update executed"
        );
        Ok(resource.updated_message)
    }

    /// Delete the record at `id`. Same message whether or not a row matched.
    pub async fn delete(&self, resource: &Resource, id: &str) -> GatewayResult<&'static str> {
        let stmt = statement::delete(resource, id)?;
        let outcome = self.executor.execute(&stmt).await?;
        debug!(
            table = resource.table,
            id,
            rows = outcome.rows_affected,
            "delete executed"
        );
        Ok(resource.removed_message)
    }
}
