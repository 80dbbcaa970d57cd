//! Schema parser: turns an authored `SchemaDocument` into an indexed
//! `ParsedSchema`.
//!
//! Parsing is total. Missing types fall back to `string`, missing labels to
//! the field key, and fields pointing at an undeclared section are collected
//! in the [`UNCATEGORIZED`] bucket.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crm_core::document::{Characteristics, PropertySpec, SchemaDocument, ValidationSpec};
use crm_core::enums::FieldType;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::Serialize;

/// Section key for fields whose section is absent or undeclared.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A declared section, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SectionDefinition {
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: f64,
}

/// A declared field with its type and section resolved.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct FieldDefinition {
    pub key: String,
    pub label: String,
    /// Resolved section key; [`UNCATEGORIZED`] when the declared one is unknown.
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<Characteristics>,
    #[serde(rename = "baseKey", skip_serializing_if = "Option::is_none")]
    pub base_key: Option<String>,
}

impl FieldDefinition {
    /// Whether this field is a variant of another field.
    #[must_use]
    pub const fn is_variant(&self) -> bool {
        self.base_key.is_some()
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.validation
            .as_ref()
            .and_then(|v| v.required)
            .unwrap_or(false)
    }

    /// Closed set of allowed values, if the field declares a non-empty `enum`.
    #[must_use]
    pub fn options(&self) -> Option<&[String]> {
        self.validation
            .as_ref()
            .and_then(|v| v.options.as_deref())
            .filter(|options| !options.is_empty())
    }

    #[must_use]
    pub fn minimum(&self) -> Option<f64> {
        self.validation.as_ref().and_then(|v| v.minimum)
    }

    #[must_use]
    pub fn maximum(&self) -> Option<f64> {
        self.validation.as_ref().and_then(|v| v.maximum)
    }

    #[must_use]
    pub fn eligibility(&self) -> Option<&str> {
        self.characteristics
            .as_ref()
            .and_then(|c| c.eligibility.as_deref())
            .filter(|e| !e.trim().is_empty())
    }
}

/// Indexed, ordered view over a schema document.
///
/// Fields are stored once, flattened in display order: declared sections by
/// ascending `order`, then the uncategorized bucket, each sorted by label.
/// Every section therefore owns a contiguous slice of `fields`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSchema {
    sections: Vec<SectionDefinition>,
    fields: Vec<FieldDefinition>,
    #[serde(skip)]
    section_ranges: IndexMap<String, Range<usize>>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ParsedSchema {
    /// Sections sorted ascending by `order`.
    #[must_use]
    pub fn sections(&self) -> &[SectionDefinition] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, key: &str) -> Option<&SectionDefinition> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// All fields in display order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.index.get(key).map(|&i| &self.fields[i])
    }

    #[must_use]
    pub fn contains_field(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Label-sorted fields of one section; empty for unknown keys.
    #[must_use]
    pub fn fields_in_section(&self, key: &str) -> &[FieldDefinition] {
        self.section_ranges
            .get(key)
            .map_or(&[][..], |range| &self.fields[range.clone()])
    }

    /// Section key to fields, in section display order.
    ///
    /// Declared sections are always present (possibly empty); the
    /// uncategorized bucket appears only when it holds fields.
    pub fn fields_by_section(&self) -> impl Iterator<Item = (&str, &[FieldDefinition])> {
        self.section_ranges
            .iter()
            .map(|(key, range)| (key.as_str(), &self.fields[range.clone()]))
    }

    /// Variants declaring `base_key` as their base, in display order.
    pub fn variants_of<'a>(
        &'a self,
        base_key: &'a str,
    ) -> impl Iterator<Item = &'a FieldDefinition> {
        self.fields
            .iter()
            .filter(move |f| f.base_key.as_deref() == Some(base_key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse an authored document. Pure and total.
#[must_use]
pub fn parse(schema: &SchemaDocument) -> ParsedSchema {
    let mut sections: Vec<SectionDefinition> = schema
        .sections
        .iter()
        .map(|(key, spec)| SectionDefinition {
            key: key.clone(),
            title: if spec.title.is_empty() {
                key.clone()
            } else {
                spec.title.clone()
            },
            description: spec.description.clone(),
            order: spec.order,
        })
        .collect();
    // `sort_by` is stable: equal orders keep declaration order.
    sections.sort_by(|a, b| a.order.total_cmp(&b.order));

    let mut grouped: IndexMap<String, Vec<FieldDefinition>> = sections
        .iter()
        .map(|s| (s.key.clone(), Vec::new()))
        .collect();

    for (key, spec) in &schema.properties {
        let field = build_field(key, spec, schema);
        grouped.entry(field.section.clone()).or_default().push(field);
    }

    let mut fields = Vec::with_capacity(schema.properties.len());
    let mut section_ranges = IndexMap::with_capacity(grouped.len());
    for (section, mut group) in grouped {
        group.sort_by(compare_labels);
        let start = fields.len();
        fields.extend(group);
        section_ranges.insert(section, start..fields.len());
    }

    let index = fields
        .iter()
        .enumerate()
        .map(|(i, f)| (f.key.clone(), i))
        .collect();

    ParsedSchema {
        sections,
        fields,
        section_ranges,
        index,
    }
}

fn build_field(key: &str, spec: &PropertySpec, schema: &SchemaDocument) -> FieldDefinition {
    let section = spec
        .section
        .as_deref()
        .filter(|s| schema.sections.contains_key(*s))
        .unwrap_or(UNCATEGORIZED)
        .to_string();

    FieldDefinition {
        key: key.to_string(),
        label: spec
            .label
            .clone()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| key.to_string()),
        section,
        description: spec.description.clone(),
        field_type: resolve_type(spec),
        validation: spec.validation.clone().filter(|v| !v.is_empty()),
        characteristics: spec.characteristics.clone(),
        base_key: spec.base_key.clone().filter(|b| !b.is_empty()),
    }
}

fn resolve_type(spec: &PropertySpec) -> FieldType {
    if spec.format.as_deref() == Some("date") {
        return FieldType::Date;
    }
    spec.field_type
        .as_deref()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(FieldType::String)
}

/// Case-insensitive first, then case-sensitive, then key for a total order.
fn compare_labels(a: &FieldDefinition, b: &FieldDefinition) -> Ordering {
    a.label
        .to_lowercase()
        .cmp(&b.label.to_lowercase())
        .then_with(|| a.label.cmp(&b.label))
        .then_with(|| a.key.cmp(&b.key))
}

/// Single-slot memo of the last parsed document, keyed on `Arc` identity.
///
/// Handing in the same `Arc` returns the same `Arc<ParsedSchema>`; a
/// different document (even an equal one) is parsed and replaces the slot.
#[derive(Debug, Default)]
pub struct ParsedSchemaCache {
    slot: Mutex<Option<(Weak<SchemaDocument>, Arc<ParsedSchema>)>>,
}

impl ParsedSchemaCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_parse(&self, document: &Arc<SchemaDocument>) -> Arc<ParsedSchema> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((cached_doc, parsed)) = slot.as_ref() {
            let same = cached_doc
                .upgrade()
                .is_some_and(|alive| Arc::ptr_eq(&alive, document));
            if same {
                tracing::debug!("parsed schema cache hit");
                return Arc::clone(parsed);
            }
        }

        let parsed = Arc::new(parse(document));
        tracing::debug!(
            sections = parsed.sections().len(),
            fields = parsed.len(),
            "parsed schema document"
        );
        *slot = Some((Arc::downgrade(document), Arc::clone(&parsed)));
        parsed
    }
}
