use wb_core::enums::DeliveryOrderState;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_value;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(link: &str, state: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = parse_value::<DeliveryOrderState>(state, "state")?;
    let order = ctx.service.create_order(link, state).await?;
    output(&order, flags.format)
}
