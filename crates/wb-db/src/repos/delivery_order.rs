//! Delivery order repository.
//!
//! Thin conveniences over the generic store; every write goes through it and
//! so produces its field-level audit rows.

use wb_core::entities::{AuditRecord, DELIVERY_ORDER_SCHEMA, DeliveryOrder};
use wb_core::enums::DeliveryOrderState;
use wb_core::errors::CoreError;

use crate::error::DatabaseError;
use crate::service::WbService;
use crate::updates::DeliveryOrderUpdate;

impl WbService {
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT or its audit append fails.
    pub async fn create_order(
        &self,
        order_link: &str,
        state: DeliveryOrderState,
    ) -> Result<DeliveryOrder, DatabaseError> {
        self.insert(DeliveryOrder::new(order_link, state)).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::Core(NotFound)` if no order has this id.
    pub async fn get_order(&self, id: i64) -> Result<DeliveryOrder, DatabaseError> {
        self.find::<DeliveryOrder>(id).await?.ok_or_else(|| {
            CoreError::NotFound {
                entity_type: DELIVERY_ORDER_SCHEMA.name.to_string(),
                id: id.to_string(),
            }
            .into()
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_orders(&self, limit: u32) -> Result<Vec<DeliveryOrder>, DatabaseError> {
        self.list::<DeliveryOrder>(limit).await
    }

    /// Apply `update` to the stored order and return the result.
    ///
    /// An empty update returns the stored order without writing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the order does not exist or the UPDATE is
    /// rejected; the stored order and its audit log are then unchanged.
    pub async fn update_order(
        &self,
        id: i64,
        update: &DeliveryOrderUpdate,
    ) -> Result<DeliveryOrder, DatabaseError> {
        let mut order = self.get_order(id).await?;
        if update.is_empty() {
            return Ok(order);
        }
        update.apply_to(&mut order);
        self.update(&order).await?;
        Ok(order)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the order does not exist or the DELETE fails.
    pub async fn delete_order(&self, id: i64) -> Result<(), DatabaseError> {
        self.delete::<DeliveryOrder>(id).await
    }

    /// Audit history of one order, oldest first.
    ///
    /// Kept after the order is deleted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn order_history(&self, id: i64) -> Result<Vec<AuditRecord>, DatabaseError> {
        self.audit_history(DELIVERY_ORDER_SCHEMA.storage_name(), id)
            .await
    }
}
