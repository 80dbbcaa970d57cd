use crm_schema::get_legacy_fields;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::LegacyArgs;
use crate::commands::shared::metadata::read_metadata;
use crate::context::AppContext;
use crate::output::output;

/// Handle `crm legacy`.
pub fn handle(args: &LegacyArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let metadata = read_metadata(&args.metadata)?;
    let legacy = get_legacy_fields(Some(&metadata), &ctx.schema());
    tracing::debug!(
        total = metadata.len(),
        legacy = legacy.len(),
        "resolved legacy fields"
    );
    output(&legacy, flags.format)
}
