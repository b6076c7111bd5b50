use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AdminCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ResetResponse {
    orders_removed: u64,
    audit_records_removed: u64,
}

/// Handle `wb admin`.
pub async fn handle(
    action: &AdminCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AdminCommands::Reset { yes } => {
            if !yes {
                anyhow::bail!("reset deletes all orders and their audit history; pass --yes to confirm");
            }
            let (orders_removed, audit_records_removed) = ctx.service.reset_all().await?;
            output(
                &ResetResponse {
                    orders_removed,
                    audit_records_removed,
                },
                flags.format,
            )
        }
    }
}
