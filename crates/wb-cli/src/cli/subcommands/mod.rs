pub mod admin;
pub mod order;

pub use admin::AdminCommands;
pub use order::OrderCommands;
