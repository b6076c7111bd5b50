use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// History stays queryable after the order is deleted.
pub async fn run(id: i64, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let history = ctx.service.order_history(id).await?;
    output(&history, flags.format)
}
