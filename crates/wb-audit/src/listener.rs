//! Lifecycle interface between the transactional store and its listeners.
//!
//! The store builds an [`EntityChange`] for each write and calls every
//! registered listener synchronously, inside the write's transaction. The
//! records a listener returns are appended on that same transaction, so they
//! commit or roll back together with the write.

use wb_core::entities::NewAuditRecord;
use wb_core::enums::LifecycleEvent;
use wb_core::schema::{FieldValue, RecordSchema, Snapshot};

use crate::error::AuditError;

/// The data a lifecycle event carries.
#[derive(Debug, Clone, Copy)]
pub struct EntityChange<'a> {
    pub schema: &'static RecordSchema,
    pub id: Option<&'a FieldValue>,
    /// Absent on create.
    pub old_state: Option<&'a Snapshot>,
    /// Absent on delete.
    pub new_state: Option<&'a Snapshot>,
}

impl<'a> EntityChange<'a> {
    #[must_use]
    pub const fn created(
        schema: &'static RecordSchema,
        id: Option<&'a FieldValue>,
        new_state: &'a Snapshot,
    ) -> Self {
        Self {
            schema,
            id,
            old_state: None,
            new_state: Some(new_state),
        }
    }

    #[must_use]
    pub const fn updating(
        schema: &'static RecordSchema,
        id: Option<&'a FieldValue>,
        old_state: &'a Snapshot,
        new_state: &'a Snapshot,
    ) -> Self {
        Self {
            schema,
            id,
            old_state: Some(old_state),
            new_state: Some(new_state),
        }
    }

    #[must_use]
    pub const fn deleting(
        schema: &'static RecordSchema,
        id: Option<&'a FieldValue>,
        old_state: &'a Snapshot,
    ) -> Self {
        Self {
            schema,
            id,
            old_state: Some(old_state),
            new_state: None,
        }
    }
}

/// Receives the store's lifecycle events.
///
/// Each hook returns the audit rows to append for the event. The defaults
/// return none, so a listener only implements the events it cares about.
pub trait ChangeListener: Send + Sync {
    /// After insert; the identifier is assigned.
    fn on_post_insert(&self, change: &EntityChange<'_>) -> Result<Vec<NewAuditRecord>, AuditError> {
        let _ = change;
        Ok(Vec::new())
    }

    /// Before update.
    fn on_pre_update(&self, change: &EntityChange<'_>) -> Result<Vec<NewAuditRecord>, AuditError> {
        let _ = change;
        Ok(Vec::new())
    }

    /// Before delete.
    fn on_pre_delete(&self, change: &EntityChange<'_>) -> Result<Vec<NewAuditRecord>, AuditError> {
        let _ = change;
        Ok(Vec::new())
    }

    /// Route `event` to the matching hook.
    fn on_event(
        &self,
        event: LifecycleEvent,
        change: &EntityChange<'_>,
    ) -> Result<Vec<NewAuditRecord>, AuditError> {
        match event {
            LifecycleEvent::Created => self.on_post_insert(change),
            LifecycleEvent::Updating => self.on_pre_update(change),
            LifecycleEvent::Deleting => self.on_pre_delete(change),
        }
    }
}
