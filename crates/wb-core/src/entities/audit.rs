use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An append-only, field-level audit log row.
///
/// Records one field's new value for one lifecycle event of one tracked
/// record instance. `state` is `None` when the event was a deletion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditRecord {
    pub id: i64,
    pub entity_name: String,
    pub field_name: String,
    pub entity_id: i64,
    pub state: Option<String>,
    pub event_time: DateTime<Utc>,
}

/// An audit row that has not been appended yet.
///
/// The event time is fixed at construction; storage assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditRecord {
    pub entity_name: String,
    pub field_name: String,
    pub entity_id: i64,
    pub state: Option<String>,
    pub event_time: DateTime<Utc>,
}

impl NewAuditRecord {
    #[must_use]
    pub fn new(
        entity_name: impl Into<String>,
        field_name: impl Into<String>,
        entity_id: i64,
        state: Option<String>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            field_name: field_name.into(),
            entity_id,
            state,
            event_time: Utc::now(),
        }
    }

    /// Attach the storage-assigned id.
    #[must_use]
    pub fn into_record(self, id: i64) -> AuditRecord {
        AuditRecord {
            id,
            entity_name: self.entity_name,
            field_name: self.field_name,
            entity_id: self.entity_id,
            state: self.state,
            event_time: self.event_time,
        }
    }
}
