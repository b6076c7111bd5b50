#[path = "order/create.rs"]
mod create;
#[path = "order/delete.rs"]
mod delete;
#[path = "order/get.rs"]
mod get;
#[path = "order/history.rs"]
mod history;
#[path = "order/list.rs"]
mod list;
#[path = "order/update.rs"]
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::OrderCommands;
use crate::context::AppContext;

/// Handle `wb order`.
pub async fn handle(
    action: &OrderCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        OrderCommands::Create { link, state } => create::run(link, state, ctx, flags).await,
        OrderCommands::Get { id } => get::run(*id, ctx, flags).await,
        OrderCommands::List => list::run(ctx, flags).await,
        OrderCommands::Update { id, link, state } => {
            let params = update::Params {
                id: *id,
                link: link.clone(),
                state: state.clone(),
            };
            update::run(params, ctx, flags).await
        }
        OrderCommands::Delete { id } => delete::run(*id, ctx, flags).await,
        OrderCommands::History { id } => history::run(*id, ctx, flags).await,
    }
}
