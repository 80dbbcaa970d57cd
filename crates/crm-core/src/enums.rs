//! Field types, render modes, characteristic facets and notification levels.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and parse back from the same strings through `FromStr`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// Resolved storage/input type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Date,
}

impl FieldType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "integer" => Ok(Self::Integer),
            "date" => Ok(Self::Date),
            other => Err(CoreError::UnknownVariant {
                kind: "field type",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// RenderMode
// ---------------------------------------------------------------------------

/// How a plan form is presented.
///
/// `create` and `edit` are editable; `compare` is a read-only side-by-side view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    Create,
    #[default]
    Edit,
    Compare,
}

impl RenderMode {
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Compare)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Compare => "compare",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "edit" => Ok(Self::Edit),
            "compare" => Ok(Self::Compare),
            other => Err(CoreError::UnknownVariant {
                kind: "render mode",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Facet
// ---------------------------------------------------------------------------

/// One semantic facet of a field's characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Concept,
    Direction,
    Frequency,
    Type,
    Eligibility,
    Modifier,
    Unit,
}

impl Facet {
    /// Facets compared between a variant and its base field.
    pub const CHECKED: [Self; 4] = [Self::Concept, Self::Direction, Self::Frequency, Self::Type];

    /// Facets a variant may set to a different value than its base.
    ///
    /// `Frequency` appears in both lists, so the comparison for it never fires.
    pub const ALLOWED_TO_DIFFER: [Self; 4] =
        [Self::Eligibility, Self::Modifier, Self::Unit, Self::Frequency];

    #[must_use]
    pub fn is_allowed_to_differ(self) -> bool {
        Self::ALLOWED_TO_DIFFER.contains(&self)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Direction => "direction",
            Self::Frequency => "frequency",
            Self::Type => "type",
            Self::Eligibility => "eligibility",
            Self::Modifier => "modifier",
            Self::Unit => "unit",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NotificationLevel
// ---------------------------------------------------------------------------

/// Severity of a transient UI notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
