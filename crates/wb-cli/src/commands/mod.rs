pub mod admin;
pub mod audit;
pub mod dispatch;
pub mod order;
pub mod shared;
