use crm_core::enums::FieldType;
use crm_schema::{FieldDefinition, ParsedSchema, widget_for};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::FieldsArgs;
use crate::commands::shared::parse::ensure_section;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct FieldRow<'a> {
    pub key: &'a str,
    pub label: &'a str,
    pub section: &'a str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub widget: &'static str,
    pub required: bool,
    pub base_key: Option<&'a str>,
}

impl<'a> From<&'a FieldDefinition> for FieldRow<'a> {
    fn from(field: &'a FieldDefinition) -> Self {
        Self {
            key: &field.key,
            label: &field.label,
            section: &field.section,
            field_type: field.field_type,
            widget: widget_for(field).as_str(),
            required: field.is_required(),
            base_key: field.base_key.as_deref(),
        }
    }
}

/// Handle `crm fields`.
pub fn handle(args: &FieldsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if let Some(section) = &args.section {
        ensure_section(&ctx.schema(), section)?;
    }
    output(&field_rows(&ctx.schema(), args.section.as_deref()), flags.format)
}

pub fn field_rows<'a>(schema: &'a ParsedSchema, section: Option<&str>) -> Vec<FieldRow<'a>> {
    let fields = match section {
        Some(key) => schema.fields_in_section(key),
        None => schema.fields(),
    };
    fields.iter().map(FieldRow::from).collect()
}
