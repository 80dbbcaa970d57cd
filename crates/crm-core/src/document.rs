//! The authored plan metadata schema document.
//!
//! A `SchemaDocument` is deployed alongside the application and never edited
//! at runtime. Every field here is permissive: absent or unrecognized values
//! deserialize to defaults, and the parser in `crm-schema` resolves them.
//! Map order is preserved so "declaration order" is well defined.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Facet;

/// Root of an authored schema: sections plus field descriptors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaDocument {
    #[serde(default)]
    pub sections: IndexMap<String, SectionSpec>,
    #[serde(default)]
    pub properties: IndexMap<String, PropertySpec>,
}

/// A titled group of fields. Sections sort ascending by `order`, which may
/// be fractional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionSpec {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub order: f64,
}

/// A single field descriptor as authored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PropertySpec {
    /// Declared type name (`string`, `number`, `integer`, `date`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationSpec>,
    /// Format hint; `date` forces the date type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<Characteristics>,
    /// Key of the base field when this descriptor is a variant.
    #[serde(rename = "baseKey", default, skip_serializing_if = "Option::is_none")]
    pub base_key: Option<String>,
}

/// Value constraints. Keys other than these four are ignored on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Allowed values. Numeric and boolean entries are kept as their text.
    #[serde(
        rename = "enum",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "options_as_text"
    )]
    #[schemars(with = "Option<Vec<RawOption>>")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// One authored `enum` entry before it is reduced to text.
#[derive(Deserialize, JsonSchema)]
#[serde(untagged)]
enum RawOption {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl RawOption {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Flag(b) => b.to_string(),
        }
    }
}

fn options_as_text<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<Vec<RawOption>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|options| options.into_iter().map(RawOption::into_text).collect()))
}

impl ValidationSpec {
    /// True when none of the recognized constraints is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.minimum.is_none()
            && self.maximum.is_none()
            && self.options.is_none()
            && self.required.is_none()
    }
}

/// Semantic facets describing what a field means, independent of its key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Characteristics {
    /// Short semantic label, e.g. `deductible`.
    #[serde(default)]
    pub concept: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Who or what a variant applies to, e.g. `dual-eligible`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Characteristics {
    /// Declared value of a facet. Empty strings count as undeclared.
    #[must_use]
    pub fn facet(&self, facet: Facet) -> Option<&str> {
        let value = match facet {
            Facet::Concept => Some(self.concept.as_str()),
            Facet::Direction => self.direction.as_deref(),
            Facet::Frequency => self.frequency.as_deref(),
            Facet::Type => self.kind.as_deref(),
            Facet::Eligibility => self.eligibility.as_deref(),
            Facet::Modifier => self.modifier.as_deref(),
            Facet::Unit => self.unit.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}
