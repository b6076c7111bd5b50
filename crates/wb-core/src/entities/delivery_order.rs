use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DeliveryOrderState;
use crate::errors::CoreError;
use crate::schema::{FieldKind, FieldSpec, FieldValue, RecordSchema, Snapshot, Tracked};

/// Field table for `DeliveryOrder`. Only the state is audited.
pub static DELIVERY_ORDER_SCHEMA: RecordSchema = RecordSchema {
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

/// A delivery for one customer order, referenced by link.
///
/// `order_link` is required by storage; `None` is accepted here so that a
/// write violating the constraint reaches the store and is rejected there.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeliveryOrder {
    pub id: Option<i64>,
    pub order_link: Option<String>,
    pub state: DeliveryOrderState,
}

impl DeliveryOrder {
    #[must_use]
    pub fn new(order_link: impl Into<String>, state: DeliveryOrderState) -> Self {
        Self {
            id: None,
            order_link: Some(order_link.into()),
            state,
        }
    }
}

impl Tracked for DeliveryOrder {
    fn schema() -> &'static RecordSchema {
        &DELIVERY_ORDER_SCHEMA
    }

    fn identifier(&self) -> Option<FieldValue> {
        self.id.map(FieldValue::Integer)
    }

    fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(vec![
            FieldValue::from(self.order_link.clone()),
            FieldValue::from(self.state.as_str()),
        ])
    }

    fn from_snapshot(id: i64, snapshot: &Snapshot) -> Result<Self, CoreError> {
        let schema = Self::schema();

        let order_link = match snapshot.value(schema, "order_link")? {
            FieldValue::Null => None,
            FieldValue::Text(link) => Some(link.clone()),
            other => {
                return Err(CoreError::Validation(format!(
                    "order_link: expected text, got {}",
                    other.kind_name()
                )));
            }
        };

        let state = match snapshot.value(schema, "state")? {
            FieldValue::Text(raw) => raw.parse()?,
            other => {
                return Err(CoreError::Validation(format!(
                    "state: expected text, got {}",
                    other.kind_name()
                )));
            }
        };

        Ok(Self {
            id: Some(id),
            order_link,
            state,
        })
    }
}
