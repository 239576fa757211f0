//! # MySQL Executor
//!
//! Executes built statements over a `sqlx` MySQL pool and decodes the
//! returned rows into JSON records, column by column.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use sqlx::mysql::{MySqlArguments, MySqlPool, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row, TypeInfo};

use crate::gateway::policy::TIMESTAMP_FORMAT;
use crate::gateway::statement::{SqlValue, Statement};

use super::{DbError, ExecOutcome, StatementExecutor};

/// Statement executor backed by MySQL
pub struct MySqlExecutor {
    pool: MySqlPool,
}

impl MySqlExecutor {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Round-trip a trivial statement to confirm the database answers.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl StatementExecutor for MySqlExecutor {
    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Map<String, Value>>, DbError> {
        let rows = bind_params(sqlx::query(&statement.sql), &statement.params)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_record).collect()
    }

    async fn execute(&self, statement: &Statement) -> Result<ExecOutcome, DbError> {
        let result = bind_params(sqlx::query(&statement.sql), &statement.params)
            .execute(&self.pool)
            .await?;
        Ok(ExecOutcome {
            last_insert_id: result.last_insert_id(),
            rows_affected: result.rows_affected(),
        })
    }
}

/// Attach the statement's parameters in placeholder order.
fn bind_params<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [SqlValue],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::UInt(u) => query.bind(*u),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.as_str()),
        };
    }
    query
}

/// Decode one row into a JSON record, keyed by column name.
fn row_to_record(row: &MySqlRow) -> Result<Map<String, Value>, DbError> {
    let mut record = Map::new();
    for column in row.columns() {
        let name = column.name();
        let value = decode_column(row, column.ordinal(), column.type_info().name()).map_err(
            |source| DbError::Decode {
                column: name.to_string(),
                source,
            },
        )?;
        record.insert(name.to_string(), value);
    }
    Ok(record)
}

/// Decode a single column by its MySQL type name.
///
/// Integers become JSON numbers, DECIMAL keeps its exact text form,
/// date-times are rendered in the same fixed format the write path uses,
/// binary columns become base64 strings, and SQL NULL becomes JSON null.
/// Types outside the table fall back to their text form.
fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let value = match type_name {
        "BOOLEAN" => row.try_get::<Option<bool>, _>(index)?.map(Value::from),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<Option<i64>, _>(index)?.map(Value::from)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row.try_get::<Option<u64>, _>(index)?.map(Value::from),
        "FLOAT" => row
            .try_get::<Option<f32>, _>(index)?
            .map(|f| Value::from(f as f64)),
        "DOUBLE" => row.try_get::<Option<f64>, _>(index)?.map(Value::from),
        "DECIMAL" => row
            .try_get::<Option<Decimal>, _>(index)?
            .map(|d| Value::String(d.to_string())),
        "DATETIME" => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(|t| Value::String(t.format(TIMESTAMP_FORMAT).to_string())),
        "TIMESTAMP" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)?
            .map(|t| Value::String(t.naive_utc().format(TIMESTAMP_FORMAT).to_string())),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)?
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(index)?
            .map(|t| Value::String(t.format("%H:%M:%S").to_string())),
        "JSON" => row.try_get::<Option<Value>, _>(index)?,
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)?
            .map(|bytes| Value::String(BASE64.encode(bytes))),
        _ => row.try_get::<Option<String>, _>(index)?.map(Value::String),
    };
    Ok(value.unwrap_or(Value::Null))
}
