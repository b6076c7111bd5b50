use wb_core::entities::AuditRecord;
use wb_db::repos::audit::AuditFilter;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `wb audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let records = fetch(args, ctx, flags).await?;
    output(&records, flags.format)
}

pub async fn fetch(
    args: &AuditArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<Vec<AuditRecord>> {
    let filter = AuditFilter {
        entity_name: args.entity.clone(),
        entity_id: args.id,
        field_name: args.field.clone(),
        after_id: args.after,
        limit: Some(effective_limit(
            flags.limit,
            ctx.config.general.default_limit,
        )),
    };

    ctx.service.query_audit(&filter).await.map_err(Into::into)
}
