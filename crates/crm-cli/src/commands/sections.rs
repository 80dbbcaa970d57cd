use crm_schema::{ParsedSchema, UNCATEGORIZED, fallback_section_title};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct SectionRow<'a> {
    pub key: &'a str,
    pub title: String,
    pub order: Option<f64>,
    pub fields: usize,
}

/// Handle `crm sections`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&section_rows(&ctx.schema()), flags.format)
}

/// Declared sections in display order, then the uncategorized bucket when used.
pub fn section_rows(schema: &ParsedSchema) -> Vec<SectionRow<'_>> {
    let mut rows = schema
        .sections()
        .iter()
        .map(|section| SectionRow {
            key: &section.key,
            title: section.title.clone(),
            order: Some(section.order),
            fields: schema.fields_in_section(&section.key).len(),
        })
        .collect::<Vec<_>>();

    let stray = schema.fields_in_section(UNCATEGORIZED).len();
    if stray > 0 {
        rows.push(SectionRow {
            key: UNCATEGORIZED,
            title: fallback_section_title(UNCATEGORIZED),
            order: None,
            fields: stray,
        });
    }
    rows
}
