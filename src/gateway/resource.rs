//! # Resource Declarations
//!
//! Static schemas for the two exposed resources. Each declaration carries
//! the table name, the allow-list of writable columns, the write policy,
//! and the fixed confirmation messages.
//!
//! Validation turns a decoded JSON body into an ordered [`WriteSet`] of
//! typed values. Unknown keys (including `id`) are rejected here, before
//! any statement is built, so caller-supplied names never become SQL
//! identifiers.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use super::errors::MalformedInput;
use super::policy::{WritePolicy, TIMESTAMP_FORMAT};
use super::statement::SqlValue;

/// Expected scalar kind of a writable column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    DateTime,
}

/// One entry in a resource's writable-column allow-list
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Must be present in a create body; updates may omit any column
    pub required_on_create: bool,
}

/// Which write operation a body is being validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Create,
    Update,
}

/// Static description of one exposed resource
#[derive(Debug)]
pub struct Resource {
    /// Table name; never taken from request input
    pub table: &'static str,
    pub columns: &'static [ColumnSpec],
    pub write_policy: WritePolicy,
    pub updated_message: &'static str,
    pub removed_message: &'static str,
}

/// The customers resource (`/clientes`)
pub static CUSTOMERS: Resource = Resource {
    table: "clientes",
    columns: &[
        ColumnSpec {
            name: "nome",
            kind: ColumnKind::Text,
            required_on_create: true,
        },
        ColumnSpec {
            name: "email",
            kind: ColumnKind::Text,
            required_on_create: true,
        },
    ],
    write_policy: WritePolicy::PassThrough,
    updated_message: "Cliente atualizado!",
    removed_message: "Cliente removido!",
};

/// The products resource (`/produtos`)
pub static PRODUCTS: Resource = Resource {
    table: "produtos",
    columns: &[
        ColumnSpec {
            name: "nome",
            kind: ColumnKind::Text,
            required_on_create: true,
        },
        ColumnSpec {
            name: "descricao",
            kind: ColumnKind::Text,
            required_on_create: false,
        },
        ColumnSpec {
            name: "preco",
            kind: ColumnKind::Number,
            required_on_create: false,
        },
        ColumnSpec {
            name: "data_atualizado",
            kind: ColumnKind::DateTime,
            required_on_create: false,
        },
    ],
    write_policy: WritePolicy::StampColumn("data_atualizado"),
    updated_message: "Produto atualizado!",
    removed_message: "Produto removido!",
};

impl Resource {
    /// Validate a decoded request body against the allow-list.
    ///
    /// The returned write set follows the schema's declaration order, which
    /// fixes the column order of the generated statement.
    pub fn validate_write(&self, body: &Value, op: WriteOp) -> Result<WriteSet, MalformedInput> {
        let object = body.as_object().ok_or(MalformedInput::BodyNotObject)?;

        for key in object.keys() {
            if !self.columns.iter().any(|spec| spec.name == key) {
                return Err(MalformedInput::UnknownField {
                    field: key.clone(),
                    table: self.table,
                });
            }
        }

        let mut write_set = WriteSet::new();
        for spec in self.columns {
            match object.get(spec.name) {
                Some(value) => write_set.set(spec.name, coerce(spec, value)?),
                None if op == WriteOp::Create && spec.required_on_create => {
                    return Err(MalformedInput::MissingField { column: spec.name });
                }
                None => {}
            }
        }
        Ok(write_set)
    }
}

/// Check a JSON value against the declared column kind.
fn coerce(spec: &ColumnSpec, value: &Value) -> Result<SqlValue, MalformedInput> {
    if value.is_null() {
        // Required columns cannot be nulled.
        if spec.required_on_create {
            return Err(mismatch(spec));
        }
        return Ok(SqlValue::Null);
    }

    match spec.kind {
        ColumnKind::Text => value
            .as_str()
            .map(|s| SqlValue::Text(s.to_string()))
            .ok_or_else(|| mismatch(spec)),
        ColumnKind::Number => {
            if let Some(i) = value.as_i64() {
                Ok(SqlValue::Int(i))
            } else if let Some(u) = value.as_u64() {
                Ok(SqlValue::UInt(u))
            } else if let Some(f) = value.as_f64() {
                Ok(SqlValue::Float(f))
            } else {
                Err(mismatch(spec))
            }
        }
        ColumnKind::DateTime => {
            let literal = value
                .as_str()
                .ok_or(MalformedInput::InvalidTimestamp { column: spec.name })?;
            NaiveDateTime::parse_from_str(literal, TIMESTAMP_FORMAT)
                .map_err(|_| MalformedInput::InvalidTimestamp { column: spec.name })?;
            Ok(SqlValue::Text(literal.to_string()))
        }
    }
}

fn mismatch(spec: &ColumnSpec) -> MalformedInput {
    let expected = match spec.kind {
        ColumnKind::Text => "string",
        ColumnKind::Number => "number",
        ColumnKind::DateTime => "timestamp string",
    };
    MalformedInput::TypeMismatch {
        column: spec.name,
        expected,
    }
}

/// One validated (column, value) pair
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub column: &'static str,
    pub value: SqlValue,
}

/// Ordered set of validated fields for one INSERT/UPDATE
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteSet {
    fields: Vec<Field>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|field| field.column == column)
    }

    pub fn value(&self, column: &str) -> Option<&SqlValue> {
        self.fields
            .iter()
            .find(|field| field.column == column)
            .map(|field| &field.value)
    }

    /// Overwrite the column's value, or append it if absent.
    pub fn set(&mut self, column: &'static str, value: SqlValue) {
        match self.fields.iter_mut().find(|field| field.column == column) {
            Some(field) => field.value = value,
            None => self.fields.push(Field { column, value }),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.column)
    }

    pub fn values(&self) -> impl Iterator<Item = &SqlValue> + '_ {
        self.fields.iter().map(|field| &field.value)
    }

    /// Render the set as a JSON object, for the create-response echo.
    pub fn to_json_map(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|field| (field.column.to_string(), Value::from(&field.value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_customer_body() {
        let body = json!({"nome": "Ana", "email": "ana@x.com"});
        let ws = CUSTOMERS.validate_write(&body, WriteOp::Create).unwrap();
        assert_eq!(ws.len(), 2);
        assert_eq!(
            ws.value("nome"),
            Some(&SqlValue::Text("Ana".to_string()))
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let body = json!({"nome": "Ana", "email": "a@x.com", "senha": "123"});
        assert_eq!(
            CUSTOMERS.validate_write(&body, WriteOp::Create).unwrap_err(),
            MalformedInput::UnknownField {
                field: "senha".to_string(),
                table: "clientes",
            }
        );
    }

    #[test]
    fn test_id_is_not_writable() {
        let body = json!({"id": 9, "nome": "Ana", "email": "a@x.com"});
        assert_eq!(
            CUSTOMERS.validate_write(&body, WriteOp::Update).unwrap_err(),
            MalformedInput::UnknownField {
                field: "id".to_string(),
                table: "clientes",
            }
        );
    }

    #[test]
    fn test_required_fields_enforced_on_create_only() {
        let body = json!({"nome": "Ana"});
        assert_eq!(
            CUSTOMERS.validate_write(&body, WriteOp::Create).unwrap_err(),
            MalformedInput::MissingField { column: "email" }
        );

        // Updates are partial: any declared subset is fine.
        let ws = CUSTOMERS.validate_write(&body, WriteOp::Update).unwrap();
        assert_eq!(ws.len(), 1);
    }

    #[test]
    fn test_body_must_be_an_object() {
        assert_eq!(
            CUSTOMERS
                .validate_write(&json!(["nome"]), WriteOp::Create)
                .unwrap_err(),
            MalformedInput::BodyNotObject
        );
        assert_eq!(
            CUSTOMERS
                .validate_write(&json!("nome"), WriteOp::Update)
                .unwrap_err(),
            MalformedInput::BodyNotObject
        );
    }

    #[test]
    fn test_kind_checks() {
        let body = json!({"nome": 42, "email": "a@x.com"});
        assert_eq!(
            CUSTOMERS.validate_write(&body, WriteOp::Create).unwrap_err(),
            MalformedInput::TypeMismatch {
                column: "nome",
                expected: "string",
            }
        );

        let body = json!({"nome": "Café", "preco": "caro"});
        assert_eq!(
            PRODUCTS.validate_write(&body, WriteOp::Create).unwrap_err(),
            MalformedInput::TypeMismatch {
                column: "preco",
                expected: "number",
            }
        );

        let body = json!({"nome": "Café", "preco": true});
        assert!(PRODUCTS.validate_write(&body, WriteOp::Create).is_err());
    }

    #[test]
    fn test_null_for_optional_column_passes_through() {
        let body = json!({"nome": "Café", "descricao": null});
        let ws = PRODUCTS.validate_write(&body, WriteOp::Create).unwrap();
        assert_eq!(ws.value("descricao"), Some(&SqlValue::Null));
    }

    #[test]
    fn test_null_for_required_column_rejected() {
        let body = json!({"nome": null, "email": "a@x.com"});
        assert_eq!(
            CUSTOMERS.validate_write(&body, WriteOp::Create).unwrap_err(),
            MalformedInput::TypeMismatch {
                column: "nome",
                expected: "string",
            }
        );
    }

    #[test]
    fn test_timestamp_literal_validation() {
        let body = json!({"nome": "Café", "data_atualizado": "2024-05-17 10:30:00"});
        let ws = PRODUCTS.validate_write(&body, WriteOp::Create).unwrap();
        assert_eq!(
            ws.value("data_atualizado"),
            Some(&SqlValue::Text("2024-05-17 10:30:00".to_string()))
        );

        let body = json!({"nome": "Café", "data_atualizado": "17/05/2024"});
        assert_eq!(
            PRODUCTS.validate_write(&body, WriteOp::Create).unwrap_err(),
            MalformedInput::InvalidTimestamp {
                column: "data_atualizado",
            }
        );

        let body = json!({"nome": "Café", "data_atualizado": 20240517});
        assert_eq!(
            PRODUCTS.validate_write(&body, WriteOp::Create).unwrap_err(),
            MalformedInput::InvalidTimestamp {
                column: "data_atualizado",
            }
        );
    }

    #[test]
    fn test_write_set_follows_declaration_order() {
        // Body order is irrelevant; the schema fixes the column order.
        let body = json!({"preco": 12.5, "nome": "Café"});
        let ws = PRODUCTS.validate_write(&body, WriteOp::Create).unwrap();
        let columns: Vec<&str> = ws.columns().collect();
        assert_eq!(columns, vec!["nome", "preco"]);
    }

    #[test]
    fn test_write_set_set_overwrites_in_place() {
        let mut ws = WriteSet::new();
        ws.set("nome", SqlValue::Text("a".to_string()));
        ws.set("preco", SqlValue::Int(1));
        ws.set("nome", SqlValue::Text("b".to_string()));
        assert_eq!(ws.len(), 2);
        assert_eq!(ws.value("nome"), Some(&SqlValue::Text("b".to_string())));
        let columns: Vec<&str> = ws.columns().collect();
        assert_eq!(columns, vec!["nome", "preco"]);
    }

    #[test]
    fn test_to_json_map_echo() {
        let body = json!({"nome": "Café", "preco": 12, "descricao": null});
        let ws = PRODUCTS.validate_write(&body, WriteOp::Create).unwrap();
        let map = ws.to_json_map();
        assert_eq!(map.get("nome"), Some(&json!("Café")));
        assert_eq!(map.get("preco"), Some(&json!(12)));
        assert_eq!(map.get("descricao"), Some(&Value::Null));
    }
}
