//! The audit listener.
//!
//! For every lifecycle event, walks the record type's fields in schema order
//! and emits one [`NewAuditRecord`] per audit-eligible field whose value
//! changed. On delete every eligible field is recorded with a `None` state,
//! whatever its last value was.

use wb_core::entities::NewAuditRecord;
use wb_core::enums::LifecycleEvent;
use wb_core::schema::{FieldValue, RecordSchema, Snapshot};

use crate::error::AuditError;
use crate::listener::{ChangeListener, EntityChange};
use crate::policy::FieldPolicyResolver;

static ABSENT: FieldValue = FieldValue::Null;

/// Read the instance identifier of an audited record as a non-negative integer.
///
/// # Errors
///
/// Returns `MissingIdentifier` for `None` or a null value,
/// `NonNumericIdentifier` for any non-integer kind, and `NegativeIdentifier`
/// for integers below zero.
pub fn resolve_entity_id(
    schema: &RecordSchema,
    id: Option<&FieldValue>,
) -> Result<i64, AuditError> {
    match id {
        None | Some(FieldValue::Null) => Err(AuditError::MissingIdentifier {
            entity: schema.name,
        }),
        Some(FieldValue::Integer(value)) if *value < 0 => Err(AuditError::NegativeIdentifier {
            entity: schema.name,
            id: *value,
        }),
        Some(FieldValue::Integer(value)) => Ok(*value),
        Some(other) => Err(AuditError::NonNumericIdentifier {
            entity: schema.name,
            found: other.kind_name(),
        }),
    }
}

/// Builds field-level audit records from lifecycle events.
#[derive(Debug, Default)]
pub struct ChangeInterceptor {
    resolver: FieldPolicyResolver,
}

impl ChangeInterceptor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare the change's snapshots and collect the qualifying audit records.
    ///
    /// Values compare by equality; an absent snapshot reads as all-null.
    ///
    /// # Errors
    ///
    /// Returns `AuditError` if the type has no fields, a snapshot does not
    /// match the field table, or the record carries audited changes but its
    /// identifier is missing or not a non-negative integer.
    pub fn audit_changes(
        &self,
        event: LifecycleEvent,
        change: &EntityChange<'_>,
    ) -> Result<Vec<NewAuditRecord>, AuditError> {
        let schema = change.schema;
        if schema.fields.is_empty() {
            return Err(AuditError::NoFields {
                entity: schema.name,
            });
        }
        check_snapshot(schema, event, change.old_state)?;
        check_snapshot(schema, event, change.new_state)?;

        let policy = self.resolver.policy(schema);
        if !policy.has_eligible_fields() {
            return Ok(Vec::new());
        }
        let entity_id = resolve_entity_id(schema, change.id)?;

        let mut records = Vec::new();
        for (index, field) in policy.fields().iter().enumerate() {
            if !field.eligible {
                continue;
            }

            let old_value = value_at(change.old_state, index);
            let new_value = value_at(change.new_state, index);
            let changed = match event {
                LifecycleEvent::Deleting => true,
                LifecycleEvent::Created | LifecycleEvent::Updating => old_value != new_value,
            };
            if !changed {
                continue;
            }

            records.push(NewAuditRecord::new(
                policy.entity_name(),
                field.display_name,
                entity_id,
                new_value.render(),
            ));
        }

        if !records.is_empty() {
            tracing::trace!(
                entity = policy.entity_name(),
                entity_id,
                %event,
                fields = records.len(),
                "collected field changes"
            );
        }
        Ok(records)
    }
}

impl ChangeListener for ChangeInterceptor {
    fn on_post_insert(&self, change: &EntityChange<'_>) -> Result<Vec<NewAuditRecord>, AuditError> {
        self.audit_changes(LifecycleEvent::Created, change)
    }

    fn on_pre_update(&self, change: &EntityChange<'_>) -> Result<Vec<NewAuditRecord>, AuditError> {
        self.audit_changes(LifecycleEvent::Updating, change)
    }

    fn on_pre_delete(&self, change: &EntityChange<'_>) -> Result<Vec<NewAuditRecord>, AuditError> {
        self.audit_changes(LifecycleEvent::Deleting, change)
    }
}

fn value_at(snapshot: Option<&Snapshot>, index: usize) -> &FieldValue {
    snapshot.and_then(|s| s.get(index)).unwrap_or(&ABSENT)
}

fn check_snapshot(
    schema: &'static RecordSchema,
    event: LifecycleEvent,
    snapshot: Option<&Snapshot>,
) -> Result<(), AuditError> {
    match snapshot {
        Some(values) if values.len() != schema.fields.len() => Err(AuditError::SnapshotMismatch {
            entity: schema.name,
            event,
            expected: schema.fields.len(),
            actual: values.len(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use wb_core::schema::{FieldKind, FieldSpec};

    static ORDER: RecordSchema = RecordSchema {
        name: "DeliveryOrder",
        table: Some("delivery_order"),
        id_column: "id",
        fields: &[
            FieldSpec::new("order_link", FieldKind::Text),
            FieldSpec::new("state", FieldKind::Text)
                .audited()
                .column("delivery_order_state"),
        ],
    };

    static PARCEL: RecordSchema = RecordSchema {
        name: "Parcel",
        table: None,
        id_column: "id",
        fields: &[
            FieldSpec::new("weight", FieldKind::Real).audited(),
            FieldSpec::new("fragile", FieldKind::Bool).audited(),
            FieldSpec::new("label", FieldKind::Text),
            FieldSpec::new("shipped_at", FieldKind::Timestamp).audited(),
        ],
    };

    static EMPTY: RecordSchema = RecordSchema {
        name: "Empty",
        table: None,
        id_column: "id",
        fields: &[],
    };

    static UNAUDITED: RecordSchema = RecordSchema {
        name: "Unaudited",
        table: None,
        id_column: "id",
        fields: &[FieldSpec::new("label", FieldKind::Text)],
    };

    fn order(link: &str, state: &str) -> Snapshot {
        Snapshot::new(vec![FieldValue::from(link), FieldValue::from(state)])
    }

    fn states(records: &[NewAuditRecord]) -> Vec<Option<&str>> {
        records.iter().map(|r| r.state.as_deref()).collect()
    }

    #[test]
    fn create_records_each_eligible_value() {
        let interceptor = ChangeInterceptor::new();
        let id = FieldValue::Integer(1);
        let new = order("http://localhost/orders/1", "QUEUED");

        let records = interceptor
            .on_post_insert(&EntityChange::created(&ORDER, Some(&id), &new))
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entity_name, "delivery_order");
        assert_eq!(records[0].field_name, "delivery_order_state");
        assert_eq!(records[0].entity_id, 1);
        assert_eq!(records[0].state.as_deref(), Some("QUEUED"));
    }

    #[test]
    fn update_records_changed_eligible_field() {
        let interceptor = ChangeInterceptor::new();
        let id = FieldValue::Integer(5);
        let old = order("http://localhost/orders/1", "QUEUED");
        let new = order("http://localhost/orders/1", "IN_PROGRESS");

        let records = interceptor
            .on_pre_update(&EntityChange::updating(&ORDER, Some(&id), &old, &new))
            .unwrap();

        assert_eq!(states(&records), vec![Some("IN_PROGRESS")]);
    }

    #[test]
    fn update_of_ineligible_field_records_nothing() {
        let interceptor = ChangeInterceptor::new();
        let id = FieldValue::Integer(5);
        let old = order("http://localhost/orders/1", "QUEUED");
        let new = order("http://localhost/orders/2", "QUEUED");

        let records = interceptor
            .on_pre_update(&EntityChange::updating(&ORDER, Some(&id), &old, &new))
            .unwrap();

        assert!(records.is_empty());
    }

    #[rstest]
    #[case(FieldValue::from("QUEUED"))]
    #[case(FieldValue::Integer(3))]
    #[case(FieldValue::Real(1.25))]
    #[case(FieldValue::Bool(false))]
    #[case(FieldValue::Null)]
    fn unchanged_value_records_nothing(#[case] value: FieldValue) {
        let interceptor = ChangeInterceptor::new();
        let id = FieldValue::Integer(1);
        let old = Snapshot::new(vec![FieldValue::from("link"), value.clone()]);
        let new = Snapshot::new(vec![FieldValue::from("link"), value]);

        let records = interceptor
            .on_pre_update(&EntityChange::updating(&ORDER, Some(&id), &old, &new))
            .unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn equal_values_compare_by_value_not_identity() {
        let interceptor = ChangeInterceptor::new();
        let id = FieldValue::Integer(1);
        let old = order("link", &String::from("QUEUED"));
        let new = order("link", "QUEUED");

        let records = interceptor
            .on_pre_update(&EntityChange::updating(&ORDER, Some(&id), &old, &new))
            .unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn delete_records_every_eligible_field_as_cleared() {
        let interceptor = ChangeInterceptor::new();
        let id = FieldValue::Integer(9);
        let old = Snapshot::new(vec![
            FieldValue::Real(2.0),
            FieldValue::Null,
            FieldValue::from("box"),
            FieldValue::Null,
        ]);

        let records = interceptor
            .on_pre_delete(&EntityChange::deleting(&PARCEL, Some(&id), &old))
            .unwrap();

        let fields: Vec<_> = records.iter().map(|r| r.field_name.as_str()).collect();
        assert_eq!(fields, vec!["weight", "fragile", "shipped_at"]);
        assert_eq!(states(&records), vec![None, None, None]);
    }

    #[test]
    fn create_skips_null_values() {
        let interceptor = ChangeInterceptor::new();
        let id = FieldValue::Integer(2);
        let new = Snapshot::new(vec![
            FieldValue::Real(0.5),
            FieldValue::Null,
            FieldValue::from("box"),
            FieldValue::Null,
        ]);

        let records = interceptor
            .on_post_insert(&EntityChange::created(&PARCEL, Some(&id), &new))
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field_name, "weight");
        assert_eq!(records[0].entity_name, "Parcel");
        assert_eq!(records[0].state.as_deref(), Some("0.5"));
    }

    #[test]
    fn update_to_null_records_cleared_state() {
        let interceptor = ChangeInterceptor::new();
        let id = FieldValue::Integer(2);
        let shipped = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap();
        let old = Snapshot::new(vec![
            FieldValue::Real(0.5),
            FieldValue::Bool(true),
            FieldValue::from("box"),
            FieldValue::Null,
        ]);
        let new = Snapshot::new(vec![
            FieldValue::Real(0.5),
            FieldValue::Null,
            FieldValue::from("crate"),
            FieldValue::Timestamp(shipped),
        ]);

        let records = interceptor
            .on_pre_update(&EntityChange::updating(&PARCEL, Some(&id), &old, &new))
            .unwrap();

        let fields: Vec<_> = records.iter().map(|r| r.field_name.as_str()).collect();
        assert_eq!(fields, vec!["fragile", "shipped_at"]);
        assert_eq!(states(&records), vec![None, Some("2026-05-04T08:00:00Z")]);
    }

    #[test]
    fn type_without_fields_is_fatal() {
        let interceptor = ChangeInterceptor::new();
        let id = FieldValue::Integer(1);
        let new = Snapshot::default();

        let err = interceptor
            .on_post_insert(&EntityChange::created(&EMPTY, Some(&id), &new))
            .unwrap_err();

        assert_eq!(err, AuditError::NoFields { entity: "Empty" });
    }

    #[test]
    fn missing_identifier_is_fatal() {
        let interceptor = ChangeInterceptor::new();
        let new = order("link", "QUEUED");

        let err = interceptor
            .on_post_insert(&EntityChange::created(&ORDER, None, &new))
            .unwrap_err();

        assert_eq!(
            err,
            AuditError::MissingIdentifier {
                entity: "DeliveryOrder"
            }
        );
    }

    #[rstest]
    #[case(FieldValue::from("ord-1"), "text")]
    #[case(FieldValue::Real(1.0), "real")]
    #[case(FieldValue::Bool(true), "bool")]
    fn non_numeric_identifier_is_fatal(#[case] id: FieldValue, #[case] kind: &'static str) {
        let interceptor = ChangeInterceptor::new();
        let old = order("link", "QUEUED");
        let new = order("link", "QUEUED");

        let err = interceptor
            .on_pre_update(&EntityChange::updating(&ORDER, Some(&id), &old, &new))
            .unwrap_err();

        assert_eq!(
            err,
            AuditError::NonNumericIdentifier {
                entity: "DeliveryOrder",
                found: kind
            }
        );
    }

    #[test]
    fn negative_identifier_is_fatal() {
        assert_eq!(
            resolve_entity_id(&ORDER, Some(&FieldValue::Integer(-1))),
            Err(AuditError::NegativeIdentifier {
                entity: "DeliveryOrder",
                id: -1
            })
        );
        assert_eq!(resolve_entity_id(&ORDER, Some(&FieldValue::Integer(0))), Ok(0));
    }

    #[test]
    fn type_without_eligible_fields_needs_no_identifier() {
        let interceptor = ChangeInterceptor::new();
        let new = Snapshot::new(vec![FieldValue::from("x")]);

        let records = interceptor
            .on_post_insert(&EntityChange::created(&UNAUDITED, None, &new))
            .unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn short_snapshot_is_fatal() {
        let interceptor = ChangeInterceptor::new();
        let id = FieldValue::Integer(1);
        let new = Snapshot::new(vec![FieldValue::from("link")]);

        let err = interceptor
            .on_post_insert(&EntityChange::created(&ORDER, Some(&id), &new))
            .unwrap_err();

        assert_eq!(
            err,
            AuditError::SnapshotMismatch {
                entity: "DeliveryOrder",
                event: LifecycleEvent::Created,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn event_sequence_reconstructs_history() {
        let interceptor = ChangeInterceptor::new();
        let id = FieldValue::Integer(11);
        let states_in_order = ["QUEUED", "IN_PROGRESS", "IN_PROGRESS", "DELIVERED"];

        let mut log = Vec::new();
        let mut current = order("link", states_in_order[0]);
        log.extend(
            interceptor
                .on_post_insert(&EntityChange::created(&ORDER, Some(&id), &current))
                .unwrap(),
        );
        for state in &states_in_order[1..] {
            let next = order("link", state);
            log.extend(
                interceptor
                    .on_pre_update(&EntityChange::updating(&ORDER, Some(&id), &current, &next))
                    .unwrap(),
            );
            current = next;
        }
        log.extend(
            interceptor
                .on_pre_delete(&EntityChange::deleting(&ORDER, Some(&id), &current))
                .unwrap(),
        );

        assert_eq!(
            states(&log),
            vec![Some("QUEUED"), Some("IN_PROGRESS"), Some("DELIVERED"), None]
        );
        assert!(log.windows(2).all(|pair| pair[0].event_time <= pair[1].event_time));
    }
}
