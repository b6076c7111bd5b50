//! Audit engine error types.
//!
//! Every variant is a configuration error: it aborts the triggering write.
//! Ineligible or unchanged fields are not errors and never reach here.

use thiserror::Error;
use wb_core::enums::LifecycleEvent;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuditError {
    /// The record type declares no fields at all.
    #[error("Entity {entity} has no fields")]
    NoFields { entity: &'static str },

    /// The instance has no identifier.
    #[error("Audited entity {entity} has empty id")]
    MissingIdentifier { entity: &'static str },

    /// The identifier is not an integer.
    #[error("Audited entity {entity} should have a numeric id, got {found}")]
    NonNumericIdentifier {
        entity: &'static str,
        found: &'static str,
    },

    /// The identifier is an integer below zero.
    #[error("Audited entity {entity} has negative id {id}")]
    NegativeIdentifier { entity: &'static str, id: i64 },

    /// A snapshot does not line up with the schema's field table.
    #[error("Entity {entity} {event} snapshot has {actual} values, schema declares {expected}")]
    SnapshotMismatch {
        entity: &'static str,
        event: LifecycleEvent,
        expected: usize,
        actual: usize,
    },
}
