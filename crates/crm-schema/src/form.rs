//! In-memory plan form: widget selection, edits, and the rendered view.
//!
//! A `PlanForm` pairs the parsed schema with one plan's metadata. Edits apply
//! to the in-memory metadata immediately; persisting it is the caller's job.
//! Dates are always exchanged as `YYYY-MM-DD` with no time component.

use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use crm_core::enums::{FieldType, RenderMode};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::SchemaError;
use crate::grouping::group_fields;
use crate::metadata::{LegacyFields, PlanMetadata, get_legacy_fields};
use crate::parser::{FieldDefinition, ParsedSchema, UNCATEGORIZED};

/// Substrings of a key or label that make a string field multi-line.
pub const LONG_TEXT_KEYWORDS: &[&str] = &["notes", "summary", "description", "comments", "details"];

/// Title of the legacy field group.
pub const LEGACY_GROUP_TITLE: &str = "Legacy fields";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Input control used for a field.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    /// Single choice among a closed set.
    Select { options: Vec<String> },
    TextArea,
    Text,
    Numeric {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        integer: bool,
    },
    DatePicker,
}

impl Widget {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select",
            Self::TextArea => "text_area",
            Self::Text => "text",
            Self::Numeric { .. } => "numeric",
            Self::DatePicker => "date_picker",
        }
    }
}

/// Pick the input control for a field.
#[must_use]
pub fn widget_for(field: &FieldDefinition) -> Widget {
    match field.field_type {
        FieldType::Date => Widget::DatePicker,
        FieldType::Number | FieldType::Integer => Widget::Numeric {
            min: field.minimum(),
            max: field.maximum(),
            integer: field.field_type == FieldType::Integer,
        },
        FieldType::String => {
            if let Some(options) = field.options() {
                Widget::Select {
                    options: options.to_vec(),
                }
            } else if is_long_text(field) {
                Widget::TextArea
            } else {
                Widget::Text
            }
        }
    }
}

fn is_long_text(field: &FieldDefinition) -> bool {
    let key = field.key.to_lowercase();
    let label = field.label.to_lowercase();
    LONG_TEXT_KEYWORDS
        .iter()
        .any(|word| key.contains(word) || label.contains(word))
}

/// Normalize date input to `YYYY-MM-DD`.
///
/// Accepts plain dates and date-times (RFC 3339 or naive); the time part is
/// dropped without shifting the calendar date. Years outside `0000..=9999`
/// are rejected since they have no four-digit rendering.
#[must_use]
pub fn normalize_date(text: &str) -> Option<String> {
    let text = text.trim();
    let date = NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })?;
    if !(0..=9999).contains(&date.year()) {
        return None;
    }
    Some(date.format(DATE_FORMAT).to_string())
}

/// Plain-text rendering of any stored value.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn field_value_text(field: &FieldDefinition, value: Option<&Value>) -> String {
    match (field.field_type, value) {
        (_, None) => String::new(),
        (FieldType::Date, Some(Value::String(s))) => normalize_date(s).unwrap_or_default(),
        (FieldType::Date, Some(_)) => String::new(),
        (_, Some(value)) => value_text(value),
    }
}

/// One declared field as presented.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RenderedField {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub widget: Widget,
    pub value: String,
    pub read_only: bool,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<String>,
}

/// A base field followed by its variants.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RenderedGroup {
    pub base: RenderedField,
    pub variants: Vec<RenderedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RenderedSection {
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub groups: Vec<RenderedGroup>,
    /// Variants whose base field is not part of this section.
    pub orphan_variants: Vec<RenderedField>,
}

/// A legacy entry, always edited as plain text under its literal key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct RenderedLegacyField {
    pub key: String,
    pub label: String,
    pub value: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct LegacyGroup {
    pub title: String,
    pub fields: Vec<RenderedLegacyField>,
}

/// The whole form as handed to a view.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct RenderedForm {
    pub mode: RenderMode,
    pub sections: Vec<RenderedSection>,
    pub legacy: LegacyGroup,
    /// Required declared fields that currently have no value.
    pub missing_required: Vec<String>,
}

/// Editable form state for one plan.
#[derive(Debug, Clone)]
pub struct PlanForm {
    schema: Arc<ParsedSchema>,
    metadata: PlanMetadata,
    mode: RenderMode,
}

impl PlanForm {
    #[must_use]
    pub const fn new(schema: Arc<ParsedSchema>, metadata: PlanMetadata, mode: RenderMode) -> Self {
        Self {
            schema,
            metadata,
            mode,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> RenderMode {
        self.mode
    }

    #[must_use]
    pub fn schema(&self) -> &ParsedSchema {
        &self.schema
    }

    #[must_use]
    pub const fn metadata(&self) -> &PlanMetadata {
        &self.metadata
    }

    /// Hand the edited metadata to the persistence layer.
    #[must_use]
    pub fn into_metadata(self) -> PlanMetadata {
        self.metadata
    }

    #[must_use]
    pub fn legacy_fields(&self) -> LegacyFields {
        get_legacy_fields(Some(&self.metadata), &self.schema)
    }

    /// Display text of a declared field; `None` for unknown keys.
    ///
    /// Date fields read back as `YYYY-MM-DD` or the empty string.
    #[must_use]
    pub fn field_text(&self, key: &str) -> Option<String> {
        let field = self.schema.field(key)?;
        Some(field_value_text(field, self.metadata.value(field)))
    }

    /// Apply user input to a declared field. Empty input clears the value.
    ///
    /// # Errors
    ///
    /// `ReadOnly` in compare mode, `UnknownField` for undeclared keys, and
    /// `InvalidValue` when the input does not fit the field's type, options
    /// or range.
    pub fn set_field(&mut self, key: &str, input: &str) -> Result<(), SchemaError> {
        self.ensure_editable()?;
        let schema = Arc::clone(&self.schema);
        let field = schema
            .field(key)
            .ok_or_else(|| SchemaError::UnknownField(key.to_string()))?;

        if input.trim().is_empty() {
            self.metadata.clear(field);
            return Ok(());
        }

        let value = coerce_input(field, input)?;
        self.metadata.set_value(field, value);
        Ok(())
    }

    /// Replace a legacy entry with plain text.
    ///
    /// # Errors
    ///
    /// `ReadOnly` in compare mode, `DeclaredField` when `key` is declared.
    pub fn set_legacy(&mut self, key: &str, text: &str) -> Result<(), SchemaError> {
        self.ensure_editable()?;
        self.metadata.set_legacy_text(&self.schema, key, text)
    }

    /// Required declared fields without a value, in display order.
    #[must_use]
    pub fn missing_required(&self) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .filter(|f| f.is_required())
            .filter(|f| field_value_text(f, self.metadata.value(f)).is_empty())
            .map(|f| f.key.clone())
            .collect()
    }

    /// Build the view, optionally limited to one section.
    ///
    /// Grouping happens per rendered section, so a variant whose base lives
    /// in another section is listed as an orphan there.
    #[must_use]
    pub fn render(&self, section_filter: Option<&str>) -> RenderedForm {
        let read_only = self.mode.is_read_only();
        let mut sections = Vec::new();

        for (section_key, fields) in self.schema.fields_by_section() {
            if section_filter.is_some_and(|wanted| wanted != section_key) || fields.is_empty() {
                continue;
            }

            let working_set: Vec<&FieldDefinition> = fields.iter().collect();
            let groups = group_fields(&working_set);

            let rendered_groups = groups
                .base_fields
                .iter()
                .map(|base| RenderedGroup {
                    base: self.render_field(base, read_only),
                    variants: groups
                        .variants_of(&base.key)
                        .iter()
                        .map(|v| self.render_field(v, read_only))
                        .collect(),
                })
                .collect();

            let (title, description) = self.schema.section(section_key).map_or_else(
                || (fallback_section_title(section_key), None),
                |s| (s.title.clone(), s.description.clone()),
            );

            sections.push(RenderedSection {
                key: section_key.to_string(),
                title,
                description,
                groups: rendered_groups,
                orphan_variants: groups
                    .orphan_variants
                    .iter()
                    .map(|v| self.render_field(v, read_only))
                    .collect(),
            });
        }

        let legacy_fields = self
            .legacy_fields()
            .iter()
            .map(|(key, value)| RenderedLegacyField {
                key: key.to_string(),
                label: key.to_string(),
                value: value_text(value),
                read_only,
            })
            .collect();

        RenderedForm {
            mode: self.mode,
            sections,
            legacy: LegacyGroup {
                title: LEGACY_GROUP_TITLE.to_string(),
                fields: legacy_fields,
            },
            missing_required: self.missing_required(),
        }
    }

    fn render_field(&self, field: &FieldDefinition, read_only: bool) -> RenderedField {
        RenderedField {
            key: field.key.clone(),
            label: field.label.clone(),
            description: field.description.clone(),
            widget: widget_for(field),
            value: field_value_text(field, self.metadata.value(field)),
            read_only,
            required: field.is_required(),
            eligibility: field.eligibility().map(str::to_string),
        }
    }

    const fn ensure_editable(&self) -> Result<(), SchemaError> {
        if self.mode.is_read_only() {
            return Err(SchemaError::ReadOnly(self.mode));
        }
        Ok(())
    }
}

/// Title shown for a section key with no declared title.
#[must_use]
pub fn fallback_section_title(key: &str) -> String {
    if key == UNCATEGORIZED {
        "Uncategorized".to_string()
    } else {
        key.to_string()
    }
}

fn invalid(field: &FieldDefinition, reason: impl Into<String>) -> SchemaError {
    SchemaError::InvalidValue {
        key: field.key.clone(),
        reason: reason.into(),
    }
}

fn coerce_input(field: &FieldDefinition, input: &str) -> Result<Value, SchemaError> {
    match field.field_type {
        FieldType::String => {
            if let Some(options) = field.options() {
                if !options.iter().any(|o| o == input) {
                    return Err(invalid(
                        field,
                        format!("'{input}' is not one of: {}", options.join(", ")),
                    ));
                }
            }
            Ok(Value::String(input.to_string()))
        }
        FieldType::Date => normalize_date(input)
            .map(Value::String)
            .ok_or_else(|| invalid(field, format!("'{input}' is not a YYYY-MM-DD date"))),
        FieldType::Number | FieldType::Integer => coerce_number(field, input.trim()),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn coerce_number(field: &FieldDefinition, input: &str) -> Result<Value, SchemaError> {
    let number: f64 = input
        .parse()
        .ok()
        .filter(|n: &f64| n.is_finite())
        .ok_or_else(|| invalid(field, format!("'{input}' is not a number")))?;

    let is_whole = number.fract() == 0.0;
    if field.field_type == FieldType::Integer && !is_whole {
        return Err(invalid(field, format!("'{input}' is not a whole number")));
    }
    if let Some(min) = field.minimum() {
        if number < min {
            return Err(invalid(field, format!("{number} is below the minimum of {min}")));
        }
    }
    if let Some(max) = field.maximum() {
        if number > max {
            return Err(invalid(field, format!("{number} is above the maximum of {max}")));
        }
    }

    // Whole numbers are stored as integers so they read back without ".0".
    if is_whole && number.abs() < 9_007_199_254_740_992.0 {
        return Ok(Value::from(number as i64));
    }
    Number::from_f64(number)
        .map(Value::Number)
        .ok_or_else(|| invalid(field, format!("'{input}' is not a number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn schema() -> Arc<ParsedSchema> {
        let doc = serde_json::from_value(json!({
            "sections": {
                "overview": { "title": "Overview", "order": 1 },
                "costs": { "title": "Costs", "order": 2 }
            },
            "properties": {
                "plan_type": {
                    "type": "string", "label": "Plan type", "section": "overview",
                    "validation": { "enum": ["HMO", "PPO"], "required": true }
                },
                "plan_summary": { "type": "string", "label": "Summary", "section": "overview" },
                "carrier": { "type": "string", "label": "Carrier", "section": "overview" },
                "remarks": { "type": "string", "label": "Agent notes", "section": "overview" },
                "effective_date": {
                    "type": "string", "format": "date", "label": "Effective", "section": "overview"
                },
                "premium_monthly": {
                    "type": "number", "label": "Premium", "section": "costs",
                    "validation": { "minimum": 0, "maximum": 500 }
                },
                "premium_monthly_lis": {
                    "type": "number", "label": "Premium (LIS)", "section": "costs",
                    "baseKey": "premium_monthly",
                    "characteristics": { "concept": "premium", "eligibility": "lis-full" }
                },
                "coinsurance_percent": {
                    "type": "integer", "label": "Coinsurance", "section": "costs",
                    "validation": { "minimum": 0, "maximum": 100 }
                },
                "carrier_dual": {
                    "type": "string", "label": "Carrier (dual)", "section": "costs",
                    "baseKey": "carrier"
                }
            }
        }))
        .unwrap();
        Arc::new(parse(&doc))
    }

    fn form(mode: RenderMode, metadata: Value) -> PlanForm {
        PlanForm::new(schema(), PlanMetadata::from_value(metadata).unwrap(), mode)
    }

    #[test]
    fn widget_selection() {
        let schema = schema();
        let widget = |k: &str| widget_for(schema.field(k).unwrap());
        assert_eq!(
            widget("plan_type"),
            Widget::Select {
                options: vec!["HMO".into(), "PPO".into()]
            }
        );
        assert_eq!(widget("plan_summary"), Widget::TextArea);
        assert_eq!(widget("remarks"), Widget::TextArea);
        assert_eq!(widget("carrier"), Widget::Text);
        assert_eq!(widget("effective_date"), Widget::DatePicker);
        assert_eq!(widget("effective_date").as_str(), "date_picker");
        assert_eq!(widget("plan_type").as_str(), "select");
        assert_eq!(
            widget("premium_monthly"),
            Widget::Numeric {
                min: Some(0.0),
                max: Some(500.0),
                integer: false
            }
        );
        assert!(matches!(
            widget("coinsurance_percent"),
            Widget::Numeric { integer: true, .. }
        ));
    }

    #[rstest]
    #[case("2025-01-01", Some("2025-01-01"))]
    #[case(" 2025-03-09 ", Some("2025-03-09"))]
    #[case("2025-03-09T23:30:00-05:00", Some("2025-03-09"))]
    #[case("2025-03-09T00:00:00Z", Some("2025-03-09"))]
    #[case("2025-03-09T08:15:00", Some("2025-03-09"))]
    #[case("2025-03-09 08:15:00", Some("2025-03-09"))]
    #[case("03/09/2025", None)]
    #[case("2025-02-30", None)]
    #[case("", None)]
    #[case("-0001-01-01", None)]
    #[case("-0001-01-01T00:00:00", None)]
    #[case("+12025-01-01", None)]
    #[case("0000-01-01", Some("0000-01-01"))]
    fn date_normalization(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_date(input).as_deref(), expected);
    }

    #[test]
    fn date_edits_read_back_without_time() {
        let mut form = form(RenderMode::Edit, json!({}));
        form.set_field("effective_date", "2026-01-01T10:00:00Z").unwrap();
        assert_eq!(form.field_text("effective_date").unwrap(), "2026-01-01");
        form.set_field("effective_date", "").unwrap();
        assert_eq!(form.field_text("effective_date").unwrap(), "");
    }

    #[test]
    fn stored_datetime_reads_back_as_date() {
        let form = form(
            RenderMode::Edit,
            json!({ "effective_date": "2024-10-15T00:00:00.000Z" }),
        );
        assert_eq!(form.field_text("effective_date").unwrap(), "2024-10-15");
    }

    #[test]
    fn negative_year_is_rejected_and_reads_back_empty() {
        let mut form = form(RenderMode::Edit, json!({ "effective_date": "-0001-01-01" }));
        assert_eq!(form.field_text("effective_date").unwrap(), "");
        assert!(matches!(
            form.set_field("effective_date", "-0001-01-01"),
            Err(SchemaError::InvalidValue { .. })
        ));
    }

    #[test]
    fn unparseable_stored_date_reads_back_empty() {
        let form = form(RenderMode::Edit, json!({ "effective_date": 20240101 }));
        assert_eq!(form.field_text("effective_date").unwrap(), "");
    }

    #[test]
    fn invalid_date_input_is_rejected() {
        let mut form = form(RenderMode::Edit, json!({}));
        assert!(matches!(
            form.set_field("effective_date", "next tuesday"),
            Err(SchemaError::InvalidValue { .. })
        ));
    }

    #[test]
    fn numeric_edits_respect_range_and_integer() {
        let mut form = form(RenderMode::Create, json!({}));
        form.set_field("premium_monthly", "42").unwrap();
        assert_eq!(form.metadata().clone().into_value(), json!({ "premium_monthly": 42 }));
        form.set_field("premium_monthly", "19.5").unwrap();
        assert_eq!(form.field_text("premium_monthly").unwrap(), "19.5");

        assert!(form.set_field("premium_monthly", "-1").is_err());
        assert!(form.set_field("premium_monthly", "501").is_err());
        assert!(form.set_field("premium_monthly", "abc").is_err());
        assert!(form.set_field("premium_monthly", "NaN").is_err());
        assert!(form.set_field("coinsurance_percent", "20.5").is_err());
        form.set_field("coinsurance_percent", "20").unwrap();
        assert_eq!(form.field_text("coinsurance_percent").unwrap(), "20");
    }

    #[test]
    fn select_rejects_values_outside_options() {
        let mut form = form(RenderMode::Edit, json!({}));
        assert!(form.set_field("plan_type", "PFFS").is_err());
        form.set_field("plan_type", "PPO").unwrap();
        assert_eq!(form.field_text("plan_type").unwrap(), "PPO");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut form = form(RenderMode::Edit, json!({}));
        assert!(matches!(
            form.set_field("custom_note", "x"),
            Err(SchemaError::UnknownField(_))
        ));
        assert!(form.field_text("custom_note").is_none());
    }

    #[test]
    fn compare_mode_is_read_only() {
        let mut form = form(RenderMode::Compare, json!({ "carrier": "Acme", "old": 1 }));
        assert!(matches!(
            form.set_field("carrier", "Other"),
            Err(SchemaError::ReadOnly(RenderMode::Compare))
        ));
        assert!(form.set_legacy("old", "2").is_err());

        let rendered = form.render(None);
        assert!(rendered.sections.iter().all(|s| s
            .groups
            .iter()
            .all(|g| g.base.read_only && g.variants.iter().all(|v| v.read_only))));
        assert!(rendered.legacy.fields.iter().all(|f| f.read_only));
    }

    #[test]
    fn render_groups_variants_and_orphans() {
        let form = form(RenderMode::Edit, json!({ "premium_monthly": 30 }));
        let rendered = form.render(None);

        let titles: Vec<&str> = rendered.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Overview", "Costs"]);

        let costs = &rendered.sections[1];
        let bases: Vec<&str> = costs.groups.iter().map(|g| g.base.key.as_str()).collect();
        assert_eq!(bases, vec!["coinsurance_percent", "premium_monthly"]);
        let premium = &costs.groups[1];
        assert_eq!(premium.base.value, "30");
        assert_eq!(premium.variants[0].key, "premium_monthly_lis");
        assert_eq!(premium.variants[0].eligibility.as_deref(), Some("lis-full"));

        let orphans: Vec<&str> = costs.orphan_variants.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(orphans, vec!["carrier_dual"]);
    }

    #[test]
    fn section_filter_limits_output() {
        let form = form(RenderMode::Edit, json!({}));
        let rendered = form.render(Some("costs"));
        assert_eq!(rendered.sections.len(), 1);
        assert_eq!(rendered.sections[0].key, "costs");
        assert!(form.render(Some("nope")).sections.is_empty());
    }

    #[test]
    fn legacy_fields_render_as_text_with_literal_key() {
        let mut form = form(
            RenderMode::Edit,
            json!({ "carrier": "Acme", "old_rider": { "amount": 5 }, "custom_note": "x" }),
        );
        let rendered = form.render(None);
        assert_eq!(rendered.legacy.title, LEGACY_GROUP_TITLE);
        assert_eq!(
            rendered.legacy.fields,
            vec![
                RenderedLegacyField {
                    key: "old_rider".into(),
                    label: "old_rider".into(),
                    value: r#"{"amount":5}"#.into(),
                    read_only: false,
                },
                RenderedLegacyField {
                    key: "custom_note".into(),
                    label: "custom_note".into(),
                    value: "x".into(),
                    read_only: false,
                },
            ]
        );

        form.set_legacy("old_rider", "amount: 5").unwrap();
        assert_eq!(
            form.legacy_fields().get("old_rider"),
            Some(&json!("amount: 5"))
        );
    }

    #[test]
    fn missing_required_tracks_edits() {
        let mut form = form(RenderMode::Create, json!({}));
        assert_eq!(form.missing_required(), vec!["plan_type".to_string()]);
        form.set_field("plan_type", "HMO").unwrap();
        assert!(form.render(None).missing_required.is_empty());
    }
}
