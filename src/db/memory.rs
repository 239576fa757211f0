//! # In-Memory Executor
//!
//! A `StatementExecutor` over in-memory tables, for testing. It interprets
//! exactly the four statement shapes the builder produces. Identifier
//! assignment mimics an auto-increment column: ids start at 1 and deleted
//! ids are never reused.
//!
//! In production the MySQL executor takes its place.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::gateway::statement::{SqlValue, Statement};

use super::{DbError, ExecOutcome, StatementExecutor};

#[derive(Debug, Default)]
struct MemoryTable {
    last_id: u64,
    rows: Vec<Map<String, Value>>,
}

/// In-memory statement executor for testing
#[derive(Debug, Default)]
pub struct MemoryExecutor {
    tables: RwLock<HashMap<String, MemoryTable>>,
    fail: bool,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// An executor whose every call fails, simulating an outage.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of a table's rows, oldest first.
    pub fn rows(&self, table: &str) -> Result<Vec<Map<String, Value>>, DbError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| DbError::Internal("lock poisoned".to_string()))?;
        Ok(tables
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl StatementExecutor for MemoryExecutor {
    async fn fetch_all(&self, statement: &Statement) -> Result<Vec<Map<String, Value>>, DbError> {
        if self.fail {
            return Err(DbError::closed_pool());
        }

        let table = parse_select(&statement.sql)
            .ok_or_else(|| unsupported(&statement.sql))?;
        self.rows(table)
    }

    async fn execute(&self, statement: &Statement) -> Result<ExecOutcome, DbError> {
        if self.fail {
            return Err(DbError::closed_pool());
        }

        let mut tables = self
            .tables
            .write()
            .map_err(|_| DbError::Internal("lock poisoned".to_string()))?;

        if let Some((table, columns)) = parse_insert(&statement.sql) {
            let table = tables.entry(table.to_string()).or_default();
            table.last_id += 1;

            let mut row = Map::new();
            row.insert("id".to_string(), Value::from(table.last_id));
            for (column, value) in columns.iter().zip(&statement.params) {
                row.insert(column.to_string(), Value::from(value));
            }
            table.rows.push(row);

            return Ok(ExecOutcome {
                last_insert_id: table.last_id,
                rows_affected: 1,
            });
        }

        if let Some((table, columns)) = parse_update(&statement.sql) {
            let id = trailing_id(&statement.params, &statement.sql)?;
            let table = tables.entry(table.to_string()).or_default();

            let mut rows_affected = 0;
            for row in table.rows.iter_mut().filter(|row| id_matches(row, id)) {
                for (column, value) in columns.iter().zip(&statement.params) {
                    row.insert(column.to_string(), Value::from(value));
                }
                rows_affected += 1;
            }

            return Ok(ExecOutcome {
                last_insert_id: 0,
                rows_affected,
            });
        }

        if let Some(table) = parse_delete(&statement.sql) {
            let id = trailing_id(&statement.params, &statement.sql)?;
            let table = tables.entry(table.to_string()).or_default();

            let before = table.rows.len();
            table.rows.retain(|row| !id_matches(row, id));

            return Ok(ExecOutcome {
                last_insert_id: 0,
                rows_affected: (before - table.rows.len()) as u64,
            });
        }

        Err(unsupported(&statement.sql))
    }
}

fn unsupported(sql: &str) -> DbError {
    DbError::Internal(format!("unsupported statement shape: {}", sql))
}

fn parse_select(sql: &str) -> Option<&str> {
    sql.strip_prefix("SELECT * FROM ")
}

/// `INSERT INTO <table> (<col>, ...) VALUES (?, ...)`
fn parse_insert(sql: &str) -> Option<(&str, Vec<&str>)> {
    let rest = sql.strip_prefix("INSERT INTO ")?;
    let (table, rest) = rest.split_once(" (")?;
    let (columns, _) = rest.split_once(')')?;
    Some((table, columns.split(", ").collect()))
}

/// `UPDATE <table> SET <col> = ?, ... WHERE id = ?`
fn parse_update(sql: &str) -> Option<(&str, Vec<&str>)> {
    let rest = sql.strip_prefix("UPDATE ")?;
    let (table, rest) = rest.split_once(" SET ")?;
    let assignments = rest.strip_suffix(" WHERE id = ?")?;
    let columns = assignments
        .split(", ")
        .map(|assignment| assignment.strip_suffix(" = ?"))
        .collect::<Option<Vec<&str>>>()?;
    Some((table, columns))
}

/// `DELETE FROM <table> WHERE id = ?`
fn parse_delete(sql: &str) -> Option<&str> {
    sql.strip_prefix("DELETE FROM ")?
        .strip_suffix(" WHERE id = ?")
}

fn trailing_id(params: &[SqlValue], sql: &str) -> Result<i64, DbError> {
    match params.last() {
        Some(SqlValue::Int(id)) => Ok(*id),
        _ => Err(DbError::Internal(format!(
            "statement is missing its id parameter: {}",
            sql
        ))),
    }
}

fn id_matches(row: &Map<String, Value>, id: i64) -> bool {
    row.get("id").and_then(Value::as_i64) == Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::resource::{WriteOp, CUSTOMERS};
    use crate::gateway::statement;
    use serde_json::json;

    async fn insert_customer(executor: &MemoryExecutor, nome: &str, email: &str) -> ExecOutcome {
        let body = json!({"nome": nome, "email": email});
        let ws = CUSTOMERS.validate_write(&body, WriteOp::Create).unwrap();
        let stmt = statement::insert(&CUSTOMERS, &ws).unwrap();
        executor.execute(&stmt).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let executor = MemoryExecutor::new();
        let first = insert_customer(&executor, "Ana", "ana@x.com").await;
        let second = insert_customer(&executor, "Bia", "bia@x.com").await;

        assert_eq!(first.last_insert_id, 1);
        assert_eq!(first.rows_affected, 1);
        assert_eq!(second.last_insert_id, 2);

        let rows = executor.rows("clientes").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("id"), Some(&json!(1)));
        assert_eq!(rows[0].get("nome"), Some(&json!("Ana")));
    }

    #[tokio::test]
    async fn test_select_on_missing_table_is_empty() {
        let executor = MemoryExecutor::new();
        let stmt = statement::list(&CUSTOMERS);
        let rows = executor.fetch_all(&stmt).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_update_touches_only_the_matching_row() {
        let executor = MemoryExecutor::new();
        insert_customer(&executor, "Ana", "ana@x.com").await;
        insert_customer(&executor, "Bia", "bia@x.com").await;

        let body = json!({"nome": "Ana Silva"});
        let ws = CUSTOMERS.validate_write(&body, WriteOp::Update).unwrap();
        let stmt = statement::update(&CUSTOMERS, "1", &ws).unwrap();
        let outcome = executor.execute(&stmt).await.unwrap();
        assert_eq!(outcome.rows_affected, 1);

        let rows = executor.rows("clientes").unwrap();
        assert_eq!(rows[0].get("nome"), Some(&json!("Ana Silva")));
        assert_eq!(rows[0].get("email"), Some(&json!("ana@x.com")));
        assert_eq!(rows[1].get("nome"), Some(&json!("Bia")));
    }

    #[tokio::test]
    async fn test_update_of_missing_row_affects_nothing() {
        let executor = MemoryExecutor::new();
        let body = json!({"nome": "Ana"});
        let ws = CUSTOMERS.validate_write(&body, WriteOp::Update).unwrap();
        let stmt = statement::update(&CUSTOMERS, "99", &ws).unwrap();
        let outcome = executor.execute(&stmt).await.unwrap();
        assert_eq!(outcome.rows_affected, 0);
    }

    #[tokio::test]
    async fn test_delete_never_reuses_ids() {
        let executor = MemoryExecutor::new();
        insert_customer(&executor, "Ana", "ana@x.com").await;

        let stmt = statement::delete(&CUSTOMERS, "1").unwrap();
        assert_eq!(executor.execute(&stmt).await.unwrap().rows_affected, 1);
        assert_eq!(executor.execute(&stmt).await.unwrap().rows_affected, 0);

        let outcome = insert_customer(&executor, "Cid", "cid@x.com").await;
        assert_eq!(outcome.last_insert_id, 2);
    }

    #[tokio::test]
    async fn test_failing_executor_fails_every_call() {
        let executor = MemoryExecutor::failing();
        let stmt = statement::list(&CUSTOMERS);
        assert!(executor.fetch_all(&stmt).await.is_err());

        let body = json!({"nome": "Ana", "email": "ana@x.com"});
        let ws = CUSTOMERS.validate_write(&body, WriteOp::Create).unwrap();
        let stmt = statement::insert(&CUSTOMERS, &ws).unwrap();
        assert!(executor.execute(&stmt).await.is_err());
    }

    #[tokio::test]
    async fn test_unsupported_shape_is_an_internal_error() {
        let executor = MemoryExecutor::new();
        let stmt = Statement {
            sql: "TRUNCATE TABLE clientes".to_string(),
            params: Vec::new(),
        };
        let err = executor.execute(&stmt).await.unwrap_err();
        assert!(matches!(err, DbError::Internal(_)));
    }

    #[test]
    fn test_statement_parsers() {
        assert_eq!(parse_select("SELECT * FROM produtos"), Some("produtos"));
        assert_eq!(
            parse_insert("INSERT INTO clientes (nome, email) VALUES (?, ?)"),
            Some(("clientes", vec!["nome", "email"]))
        );
        assert_eq!(
            parse_update("UPDATE produtos SET nome = ?, preco = ? WHERE id = ?"),
            Some(("produtos", vec!["nome", "preco"]))
        );
        assert_eq!(
            parse_delete("DELETE FROM clientes WHERE id = ?"),
            Some("clientes")
        );
        assert_eq!(parse_update("UPDATE x SET nome = ?"), None);
    }
}
