use crm_schema::validate_schema;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;

/// Handle `crm check`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = validate_schema(&ctx.schema());

    for violation in &report.violations {
        tracing::debug!(field = %violation.field_key, "{violation}");
    }

    if flags.format == OutputFormat::Table {
        output(&report.violations, flags.format)?;
    } else {
        output(&report, flags.format)?;
    }

    if !report.is_clean() {
        anyhow::bail!(
            "{} violation(s) across {} field(s)",
            report.violations.len(),
            report.fields_checked
        );
    }
    Ok(())
}
