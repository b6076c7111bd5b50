//! Row and value conversion helpers.
//!
//! Tracked records travel as `FieldValue` snapshots; libSQL speaks
//! `libsql::Value`. Booleans are stored as 0/1 integers and timestamps as
//! RFC 3339 text, so decoding needs the field's declared kind.

use chrono::{DateTime, Utc};
use wb_core::schema::{FieldKind, FieldSpec, FieldValue, RecordSchema, Snapshot};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Read a nullable TEXT column.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    Ok(row.get::<Option<String>>(idx)?)
}

/// Convert a snapshot value into a bindable SQL value.
#[must_use]
pub fn to_sql_value(value: &FieldValue) -> libsql::Value {
    match value {
        FieldValue::Null => libsql::Value::Null,
        FieldValue::Integer(v) => libsql::Value::Integer(*v),
        FieldValue::Real(v) => libsql::Value::Real(*v),
        FieldValue::Text(v) => libsql::Value::Text(v.clone()),
        FieldValue::Bool(v) => libsql::Value::Integer(i64::from(*v)),
        FieldValue::Timestamp(v) => libsql::Value::Text(v.to_rfc3339()),
    }
}

/// Decode a stored column into the snapshot value kind its field declares.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the stored value cannot be read as the
/// declared kind.
#[allow(clippy::cast_precision_loss)]
pub fn decode_value(field: &FieldSpec, value: libsql::Value) -> Result<FieldValue, DatabaseError> {
    use libsql::Value;

    match (field.kind, value) {
        (_, Value::Null) => Ok(FieldValue::Null),
        (FieldKind::Integer, Value::Integer(v)) => Ok(FieldValue::Integer(v)),
        (FieldKind::Real, Value::Real(v)) => Ok(FieldValue::Real(v)),
        (FieldKind::Real, Value::Integer(v)) => Ok(FieldValue::Real(v as f64)),
        (FieldKind::Text, Value::Text(v)) => Ok(FieldValue::Text(v)),
        (FieldKind::Bool, Value::Integer(v)) => Ok(FieldValue::Bool(v != 0)),
        (FieldKind::Timestamp, Value::Text(v)) => Ok(FieldValue::Timestamp(parse_datetime(&v)?)),
        (kind, other) => Err(DatabaseError::Query(format!(
            "column '{}': cannot decode {other:?} as {kind:?}",
            field.storage_name()
        ))),
    }
}

/// Decode columns `offset..offset + fields.len()` of `row` into a snapshot.
///
/// # Errors
///
/// Returns `DatabaseError` if a column is missing or has the wrong kind.
pub fn row_to_snapshot(
    row: &libsql::Row,
    schema: &RecordSchema,
    offset: i32,
) -> Result<Snapshot, DatabaseError> {
    let mut values = Vec::with_capacity(schema.fields.len());
    for (index, field) in (offset..).zip(schema.fields) {
        values.push(decode_value(field, row.get_value(index)?)?);
    }
    Ok(Snapshot::new(values))
}

/// Quote a schema-declared identifier for use in SQL.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Comma-separated, quoted storage column list for `schema`'s fields.
#[must_use]
pub fn column_list(schema: &RecordSchema) -> String {
    schema
        .fields
        .iter()
        .map(|field| quote_ident(field.storage_name()))
        .collect::<Vec<_>>()
        .join(", ")
}
