use std::str::FromStr;

use crm_core::errors::CoreError;
use crm_schema::{ParsedSchema, UNCATEGORIZED};

/// Parse a snake_case enum value, accepting any case and `-` for `_`.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = CoreError>,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    normalized
        .parse()
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Split a `KEY=VALUE` argument. The value may be empty or contain `=`.
pub fn parse_assignment(raw: &str) -> anyhow::Result<(&str, &str)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("empty key in '{raw}'");
    }
    Ok((key, value))
}

/// Reject a `--section` filter that names no section of the schema.
pub fn ensure_section(schema: &ParsedSchema, key: &str) -> anyhow::Result<()> {
    if schema.section(key).is_some() || key == UNCATEGORIZED {
        return Ok(());
    }
    let known = schema
        .sections()
        .iter()
        .map(|s| s.key.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    anyhow::bail!("unknown section '{key}' (known: {known})")
}
