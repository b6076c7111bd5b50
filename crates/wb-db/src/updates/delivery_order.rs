//! Delivery order update builder.

use serde::Serialize;
use wb_core::entities::DeliveryOrder;
use wb_core::enums::DeliveryOrderState;

/// Fields to change on a delivery order. `None` leaves a field untouched.
///
/// `order_link: Some(None)` clears the link, which storage rejects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliveryOrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_link: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<DeliveryOrderState>,
}

impl DeliveryOrderUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.order_link.is_none() && self.state.is_none()
    }

    /// Apply the set fields to `order`.
    pub fn apply_to(&self, order: &mut DeliveryOrder) {
        if let Some(ref link) = self.order_link {
            order.order_link.clone_from(link);
        }
        if let Some(state) = self.state {
            order.state = state;
        }
    }
}

pub struct DeliveryOrderUpdateBuilder(DeliveryOrderUpdate);

impl DeliveryOrderUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(DeliveryOrderUpdate::default())
    }

    #[must_use]
    pub fn order_link(mut self, order_link: Option<String>) -> Self {
        self.0.order_link = Some(order_link);
        self
    }

    #[must_use]
    pub const fn state(mut self, state: DeliveryOrderState) -> Self {
        self.0.state = Some(state);
        self
    }

    #[must_use]
    pub fn build(self) -> DeliveryOrderUpdate {
        self.0
    }
}

impl Default for DeliveryOrderUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
