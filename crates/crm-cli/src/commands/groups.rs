use crm_schema::{FieldDefinition, ParsedSchema, group_fields};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::GroupsArgs;
use crate::commands::shared::parse::ensure_section;
use crate::context::AppContext;
use crate::output::output;

/// One base field and its variants, or one orphan variant.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct GroupRow<'a> {
    pub section: &'a str,
    pub base: &'a str,
    pub variants: Vec<&'a str>,
    /// The base named by `base` is not in this section.
    pub orphan: bool,
}

/// Handle `crm groups`.
pub fn handle(args: &GroupsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(section) = &args.section {
        ensure_section(&ctx.schema(), section)?;
    }
    output(&group_rows(&ctx.schema(), args.section.as_deref()), flags.format)
}

pub fn group_rows<'a>(schema: &'a ParsedSchema, section: Option<&str>) -> Vec<GroupRow<'a>> {
    let mut rows = Vec::new();

    for (section_key, fields) in schema.fields_by_section() {
        if section.is_some_and(|wanted| wanted != section_key) {
            continue;
        }

        let working_set: Vec<&FieldDefinition> = fields.iter().collect();
        let groups = group_fields(&working_set);

        for &base in &groups.base_fields {
            rows.push(GroupRow {
                section: section_key,
                base: &base.key,
                variants: groups
                    .variants_of(&base.key)
                    .iter()
                    .map(|&v| v.key.as_str())
                    .collect(),
                orphan: false,
            });
        }

        for &orphan in &groups.orphan_variants {
            rows.push(GroupRow {
                section: section_key,
                base: orphan.base_key.as_deref().unwrap_or_default(),
                variants: vec![orphan.key.as_str()],
                orphan: true,
            });
        }
    }

    rows
}
