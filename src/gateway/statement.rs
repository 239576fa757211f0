//! # Statement Builder
//!
//! Pure translation from an operation + validated data to a parameterized
//! SQL statement. No I/O happens here; execution belongs to the
//! `StatementExecutor` seam.
//!
//! Table names come from the fixed resource declarations and column names
//! from their allow-lists, so no caller-supplied identifier ever reaches
//! the SQL text. Values travel exclusively as bound parameters.

use serde_json::Value;

use super::errors::MalformedInput;
use super::resource::{Resource, WriteSet};

/// A scalar bound into a statement parameter slot
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl From<&SqlValue> for Value {
    fn from(value: &SqlValue) -> Self {
        match value {
            SqlValue::Null => Value::Null,
            SqlValue::Int(i) => Value::from(*i),
            SqlValue::UInt(u) => Value::from(*u),
            SqlValue::Float(f) => {
                serde_json::Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null)
            }
            SqlValue::Text(s) => Value::String(s.clone()),
        }
    }
}

/// A parameterized SQL statement plus its bound values, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Select all columns and rows of the resource's table.
///
/// No filter and no ordering clause: row order is whatever the database
/// returns natively, and callers must not assume one.
pub fn list(resource: &Resource) -> Statement {
    Statement {
        sql: format!("SELECT * FROM {}", resource.table),
        params: Vec::new(),
    }
}

/// Insert exactly the write set's fields as named columns.
pub fn insert(resource: &Resource, write_set: &WriteSet) -> Result<Statement, MalformedInput> {
    if write_set.is_empty() {
        return Err(MalformedInput::EmptyWriteSet);
    }

    let columns: Vec<&str> = write_set.columns().collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    Ok(Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            resource.table,
            columns.join(", "),
            placeholders
        ),
        params: write_set.values().cloned().collect(),
    })
}

/// Set exactly the write set's fields on the row matching the path id.
///
/// The identifier is the final bound parameter.
pub fn update(
    resource: &Resource,
    id: &str,
    write_set: &WriteSet,
) -> Result<Statement, MalformedInput> {
    if write_set.is_empty() {
        return Err(MalformedInput::EmptyWriteSet);
    }
    let id = parse_id(id)?;

    let assignments: Vec<String> = write_set
        .columns()
        .map(|column| format!("{} = ?", column))
        .collect();
    let mut params: Vec<SqlValue> = write_set.values().cloned().collect();
    params.push(SqlValue::Int(id));

    Ok(Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE id = ?",
            resource.table,
            assignments.join(", ")
        ),
        params,
    })
}

/// Delete the row matching the path id.
pub fn delete(resource: &Resource, id: &str) -> Result<Statement, MalformedInput> {
    let id = parse_id(id)?;
    Ok(Statement {
        sql: format!("DELETE FROM {} WHERE id = ?", resource.table),
        params: vec![SqlValue::Int(id)],
    })
}

/// Coerce a path segment to the integer key type.
fn parse_id(raw: &str) -> Result<i64, MalformedInput> {
    raw.parse::<i64>()
        .map_err(|_| MalformedInput::InvalidId(raw.to_string()))
}
