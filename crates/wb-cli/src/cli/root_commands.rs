use clap::{Args, Subcommand};

use crate::cli::subcommands::{AdminCommands, OrderCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Delivery orders.
    Order {
        #[command(subcommand)]
        action: OrderCommands,
    },
    /// Query the audit log.
    Audit(AuditArgs),
    /// Administrative operations.
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
}

/// Filters for `wb audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Recorded entity name (e.g. `delivery_order`).
    #[arg(long)]
    pub entity: Option<String>,
    /// Record identifier.
    #[arg(long)]
    pub id: Option<i64>,
    /// Recorded field name.
    #[arg(long)]
    pub field: Option<String>,
    /// Only records after this audit id.
    #[arg(long)]
    pub after: Option<i64>,
}
