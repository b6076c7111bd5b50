//! Entity structs for waybill domain objects.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! output and schema validation.

mod audit;
mod delivery_order;

pub use audit::{AuditRecord, NewAuditRecord};
pub use delivery_order::{DELIVERY_ORDER_SCHEMA, DeliveryOrder};
