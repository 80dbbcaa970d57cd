use crm_core::roles::ContactRole;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RolesArgs;
use crate::commands::shared::parse::parse_enum;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RoleRow {
    role: ContactRole,
    label: &'static str,
    fields: usize,
}

/// Handle `crm roles`.
pub fn handle(args: &RolesArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    match &args.role {
        Some(raw) => {
            let role: ContactRole = parse_enum(raw, "role")?;
            output(&role.fields(), flags.format)
        }
        None => {
            let rows = ContactRole::ALL
                .into_iter()
                .map(|role| RoleRow {
                    role,
                    label: role.label(),
                    fields: role.fields().len(),
                })
                .collect::<Vec<_>>();
            output(&rows, flags.format)
        }
    }
}
