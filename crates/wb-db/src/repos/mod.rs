//! Repository methods, implemented as `impl WbService` blocks.

pub mod audit;
pub mod delivery_order;
