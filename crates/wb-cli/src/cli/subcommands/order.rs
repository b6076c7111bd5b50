use clap::Subcommand;

/// Delivery order commands.
#[derive(Clone, Debug, Subcommand)]
pub enum OrderCommands {
    /// Create an order.
    Create {
        #[arg(long)]
        link: String,
        /// queued, in-progress, delivered, cancelled
        #[arg(long, default_value = "queued")]
        state: String,
    },
    /// Get an order by ID.
    Get { id: i64 },
    /// List orders (up to `--limit`).
    List,
    /// Update an order.
    Update {
        id: i64,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        state: Option<String>,
    },
    /// Delete an order.
    Delete { id: i64 },
    /// Audit history of an order, oldest first.
    History { id: i64 },
}
