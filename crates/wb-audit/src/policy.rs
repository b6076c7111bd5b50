//! Field policy resolution.
//!
//! Turns a record type's static field table into the names and eligibility
//! flags the interceptor works with. Resolution is pure, so each type's
//! policy is built once and cached for the lifetime of the resolver.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use wb_core::schema::RecordSchema;

/// Resolved audit settings for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPolicy {
    /// Canonical field name.
    pub name: &'static str,
    /// Name recorded in the audit log: column alias or canonical name.
    pub display_name: &'static str,
    pub eligible: bool,
}

/// Resolved audit settings for one record type, in schema field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditPolicy {
    entity_name: &'static str,
    fields: Vec<FieldPolicy>,
}

impl AuditPolicy {
    #[must_use]
    pub fn for_schema(schema: &RecordSchema) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|field| FieldPolicy {
                name: field.name,
                display_name: field.storage_name(),
                eligible: field.audited,
            })
            .collect();

        Self {
            entity_name: schema.storage_name(),
            fields,
        }
    }

    /// Name recorded in the audit log: table alias or canonical type name.
    #[must_use]
    pub const fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldPolicy] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldPolicy> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn has_eligible_fields(&self) -> bool {
        self.fields.iter().any(|field| field.eligible)
    }
}

/// Caches one [`AuditPolicy`] per record type.
///
/// Keyed by the schema's canonical type name, which must be unique across the
/// types registered with one store.
#[derive(Debug, Default)]
pub struct FieldPolicyResolver {
    cache: RwLock<HashMap<&'static str, Arc<AuditPolicy>>>,
}

impl FieldPolicyResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy for `schema`, built on first use.
    pub fn policy(&self, schema: &'static RecordSchema) -> Arc<AuditPolicy> {
        if let Some(policy) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(schema.name)
        {
            return Arc::clone(policy);
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            cache
                .entry(schema.name)
                .or_insert_with(|| Arc::new(AuditPolicy::for_schema(schema))),
        )
    }

    /// Whether `field_name` carries the audit marker. Unknown fields are not eligible.
    pub fn is_audit_eligible(&self, schema: &'static RecordSchema, field_name: &str) -> bool {
        self.policy(schema)
            .field(field_name)
            .is_some_and(|field| field.eligible)
    }

    pub fn resolve_entity_name(&self, schema: &'static RecordSchema) -> &'static str {
        self.policy(schema).entity_name()
    }

    /// Column alias for `field_name`, or `field_name` itself when none is declared.
    pub fn resolve_field_name<'a>(
        &self,
        schema: &'static RecordSchema,
        field_name: &'a str,
    ) -> &'a str {
        self.policy(schema)
            .field(field_name)
            .map_or(field_name, |field| field.display_name)
    }

    /// Number of cached types.
    pub fn cached_types(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wb_core::schema::{FieldKind, FieldSpec};

    static ALIASED: RecordSchema = RecordSchema {
        name: "Shipment",
        table: Some("shipment"),
        id_column: "id",
        fields: &[
            FieldSpec::new("carrier", FieldKind::Text)
                .audited()
                .column("carrier_code"),
            FieldSpec::new("weight", FieldKind::Real).audited(),
            FieldSpec::new("notes", FieldKind::Text),
        ],
    };

    static PLAIN: RecordSchema = RecordSchema {
        name: "Label",
        table: None,
        id_column: "id",
        fields: &[FieldSpec::new("text", FieldKind::Text)],
    };

    #[test]
    fn eligibility_is_opt_in() {
        let resolver = FieldPolicyResolver::new();
        assert!(resolver.is_audit_eligible(&ALIASED, "carrier"));
        assert!(resolver.is_audit_eligible(&ALIASED, "weight"));
        assert!(!resolver.is_audit_eligible(&ALIASED, "notes"));
        assert!(!resolver.is_audit_eligible(&ALIASED, "no_such_field"));
    }

    #[test]
    fn entity_name_prefers_table_alias() {
        let resolver = FieldPolicyResolver::new();
        assert_eq!(resolver.resolve_entity_name(&ALIASED), "shipment");
        assert_eq!(resolver.resolve_entity_name(&PLAIN), "Label");
    }

    #[test]
    fn field_name_prefers_column_alias() {
        let resolver = FieldPolicyResolver::new();
        assert_eq!(resolver.resolve_field_name(&ALIASED, "carrier"), "carrier_code");
        assert_eq!(resolver.resolve_field_name(&ALIASED, "weight"), "weight");
        assert_eq!(resolver.resolve_field_name(&ALIASED, "unknown"), "unknown");
    }

    #[test]
    fn policy_is_built_once_per_type() {
        let resolver = FieldPolicyResolver::new();
        let first = resolver.policy(&ALIASED);
        let second = resolver.policy(&ALIASED);
        assert!(Arc::ptr_eq(&first, &second));

        resolver.policy(&PLAIN);
        assert_eq!(resolver.cached_types(), 2);
    }

    #[test]
    fn policy_keeps_schema_order() {
        let policy = AuditPolicy::for_schema(&ALIASED);
        let names: Vec<_> = policy.fields().iter().map(|f| f.display_name).collect();
        assert_eq!(names, vec!["carrier_code", "weight", "notes"]);
        assert!(policy.has_eligible_fields());
        assert!(!AuditPolicy::for_schema(&PLAIN).has_eligible_fields());
    }
}
