use wb_core::enums::DeliveryOrderState;
use wb_db::updates::DeliveryOrderUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_value;
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub id: i64,
    pub link: Option<String>,
    pub state: Option<String>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    validate_update_params(&params)?;

    let mut builder = DeliveryOrderUpdateBuilder::new();
    if let Some(link) = params.link {
        builder = builder.order_link(Some(link));
    }
    if let Some(state) = params.state.as_deref() {
        builder = builder.state(parse_value::<DeliveryOrderState>(state, "state")?);
    }

    let order = ctx.service.update_order(params.id, &builder.build()).await?;
    output(&order, flags.format)
}

fn validate_update_params(params: &Params) -> anyhow::Result<()> {
    if params.link.is_none() && params.state.is_none() {
        anyhow::bail!("At least one of --link or --state must be provided");
    }
    Ok(())
}
