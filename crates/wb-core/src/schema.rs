//! Static field tables for tracked records.
//!
//! Every record type that the store persists declares a `static RecordSchema`
//! at definition time: its display name, optional storage alias, identifier
//! column, and an ordered list of `FieldSpec`s. Each `FieldSpec` carries the
//! audit-eligibility marker and an optional column alias, so the audit engine
//! never has to inspect types at runtime.
//!
//! ```
//! use wb_core::schema::{FieldKind, FieldSpec, RecordSchema};
//!
//! static PARCEL: RecordSchema = RecordSchema {
//!     name: "Parcel",
//!     table: Some("parcel"),
//!     id_column: "id",
//!     fields: &[
//!         FieldSpec::new("label", FieldKind::Text),
//!         FieldSpec::new("weight", FieldKind::Real).audited().column("weight_kg"),
//!     ],
//! };
//!
//! assert_eq!(PARCEL.storage_name(), "parcel");
//! assert_eq!(PARCEL.fields[1].storage_name(), "weight_kg");
//! ```

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::CoreError;

/// Storage kind of a tracked field.
///
/// Rows read back from storage are decoded by kind so that a stored old state
/// compares by value against the in-memory new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Integer,
    Real,
    Text,
    Bool,
    Timestamp,
}

/// One field of a tracked record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Canonical field name.
    pub name: &'static str,
    pub kind: FieldKind,
    /// Opt-in audit marker. Unmarked fields are never audited.
    pub audited: bool,
    /// Storage column alias; also the field's display name in the audit log.
    pub column: Option<&'static str>,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            audited: false,
            column: None,
        }
    }

    /// Mark the field audit-eligible.
    #[must_use]
    pub const fn audited(mut self) -> Self {
        self.audited = true;
        self
    }

    #[must_use]
    pub const fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    /// Column alias if declared, otherwise the canonical name.
    #[must_use]
    pub const fn storage_name(&self) -> &'static str {
        match self.column {
            Some(column) => column,
            None => self.name,
        }
    }
}

/// Field table for one tracked record type.
#[derive(Debug, PartialEq, Eq)]
pub struct RecordSchema {
    /// Canonical type name.
    pub name: &'static str,
    /// Storage table alias; also the entity's display name in the audit log.
    pub table: Option<&'static str>,
    pub id_column: &'static str,
    /// Ordered, stable field list. Excludes the identifier.
    pub fields: &'static [FieldSpec],
}

impl RecordSchema {
    /// Table alias if declared, otherwise the canonical type name.
    #[must_use]
    pub const fn storage_name(&self) -> &'static str {
        match self.table {
            Some(table) => table,
            None => self.name,
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }
}

/// A single field value in a record snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Short name of the value's kind, for error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Timestamp(_) => "timestamp",
        }
    }

    /// Stringified form recorded as an audit `state`. `Null` has none.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Integer(value) => Some(value.to_string()),
            Self::Real(value) => Some(format!("{value:?}")),
            Self::Text(value) => Some(value.clone()),
            Self::Bool(value) => Some(value.to_string()),
            Self::Timestamp(value) => Some(value.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Some(rendered) => f.write_str(&rendered),
            None => f.write_str("null"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Field values of one record, in its schema's field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot(Vec<FieldValue>);

impl Snapshot {
    #[must_use]
    pub const fn new(values: Vec<FieldValue>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.0.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldValue> {
        self.0.iter()
    }

    /// Value of the named field.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the schema has no such field or the
    /// snapshot is shorter than the schema.
    pub fn value(&self, schema: &RecordSchema, name: &str) -> Result<&FieldValue, CoreError> {
        let index = schema.position(name).ok_or_else(|| {
            CoreError::Validation(format!("{} has no field '{name}'", schema.name))
        })?;
        self.get(index).ok_or_else(|| {
            CoreError::Validation(format!(
                "{} snapshot has {} values, field '{name}' is at {index}",
                schema.name,
                self.len()
            ))
        })
    }
}

impl From<Vec<FieldValue>> for Snapshot {
    fn from(values: Vec<FieldValue>) -> Self {
        Self(values)
    }
}

impl FromIterator<FieldValue> for Snapshot {
    fn from_iter<I: IntoIterator<Item = FieldValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a FieldValue;
    type IntoIter = std::slice::Iter<'a, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A record type persisted through the transactional store.
///
/// Implementors expose their static field table and convert to and from
/// snapshots; they never write audit code themselves.
pub trait Tracked: Sized {
    fn schema() -> &'static RecordSchema;

    /// Instance identifier, `None` before the first insert.
    fn identifier(&self) -> Option<FieldValue>;

    /// Record the identifier assigned by storage on insert.
    fn assign_id(&mut self, id: i64);

    /// Current field values in schema order.
    fn snapshot(&self) -> Snapshot;

    /// Rebuild an instance from stored values.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if a stored value has the wrong kind.
    fn from_snapshot(id: i64, snapshot: &Snapshot) -> Result<Self, CoreError>;
}
