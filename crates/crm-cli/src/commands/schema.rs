use crm_schema::SchemaRegistry;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Handle `crm schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    let Some(name) = args.type_name.as_deref() else {
        return output(&registry.list(), flags.format);
    };

    let name = name.replace('-', "_");
    let schema = registry.get(&name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown schema type '{name}' (available: {})",
            registry.list().join(", ")
        )
    })?;
    output(schema, flags.format)
}
