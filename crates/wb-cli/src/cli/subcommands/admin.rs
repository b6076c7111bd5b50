use clap::Subcommand;

/// Administrative commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AdminCommands {
    /// Delete all orders and all audit records.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
}
