//! Partial update types for tracked records.

pub mod delivery_order;

pub use delivery_order::{DeliveryOrderUpdate, DeliveryOrderUpdateBuilder};
