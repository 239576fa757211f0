//! # Default-Field Policy
//!
//! Resource-specific field injection applied to a validated write set
//! before the statement is built. Customers use the identity policy;
//! products get their `data_atualizado` column stamped.

use chrono::NaiveDateTime;

use super::resource::WriteSet;
use super::statement::SqlValue;

/// Fixed second-precision timestamp format, UTC
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Per-resource write policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// No fields injected
    PassThrough,
    /// Keep the named column stamped with the write time: filled on create
    /// when absent, unconditionally overwritten on update
    StampColumn(&'static str),
}

impl WritePolicy {
    /// Apply the policy for a create. A caller-supplied stamp survives.
    pub fn apply_create(&self, write_set: &mut WriteSet, now: NaiveDateTime) {
        if let WritePolicy::StampColumn(column) = self {
            if !write_set.contains(column) {
                write_set.set(column, SqlValue::Text(format_timestamp(now)));
            }
        }
    }

    /// Apply the policy for an update. The stamp always wins over whatever
    /// the caller supplied.
    pub fn apply_update(&self, write_set: &mut WriteSet, now: NaiveDateTime) {
        if let WritePolicy::StampColumn(column) = self {
            write_set.set(column, SqlValue::Text(format_timestamp(now)));
        }
    }
}

/// Render a timestamp in the fixed `YYYY-MM-DD HH:MM:SS` form.
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
