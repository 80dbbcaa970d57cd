//! Plan metadata and legacy field detection.
//!
//! `PlanMetadata` owns the raw key/value map stored on a plan record. The map
//! is private to this module: declared fields are read and written through
//! `FieldDefinition`-keyed accessors, and the only place that walks raw keys
//! is [`get_legacy_fields`]. Anything else that wants a value by string key
//! has to resolve it through the parsed schema first.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::parser::{FieldDefinition, ParsedSchema};

/// Metadata stored on a plan record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PlanMetadata {
    entries: Map<String, Value>,
}

impl PlanMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value. `null` yields empty metadata; anything other
    /// than an object is rejected.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MetadataShape` for arrays and scalars.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(entries) => Ok(Self { entries }),
            Value::Array(_) => Err(SchemaError::MetadataShape("an array")),
            Value::String(_) => Err(SchemaError::MetadataShape("a string")),
            Value::Number(_) => Err(SchemaError::MetadataShape("a number")),
            Value::Bool(_) => Err(SchemaError::MetadataShape("a boolean")),
        }
    }

    /// Parse metadata from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Json` for malformed text, or
    /// `SchemaError::MetadataShape` when the top level is not an object.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Stored value of a declared field.
    #[must_use]
    pub fn value(&self, field: &FieldDefinition) -> Option<&Value> {
        self.entries.get(&field.key)
    }

    /// Store a value for a declared field. `Value::Null` clears it.
    pub fn set_value(&mut self, field: &FieldDefinition, value: Value) {
        if value.is_null() {
            self.entries.shift_remove(&field.key);
        } else {
            self.entries.insert(field.key.clone(), value);
        }
    }

    /// Remove a declared field's value, returning it.
    pub fn clear(&mut self, field: &FieldDefinition) -> Option<Value> {
        self.entries.shift_remove(&field.key)
    }

    /// Replace a legacy entry with plain text. Empty text removes the entry.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DeclaredField` when `key` is declared by
    /// `schema`; declared fields go through [`Self::set_value`].
    pub fn set_legacy_text(
        &mut self,
        schema: &ParsedSchema,
        key: &str,
        text: &str,
    ) -> Result<(), SchemaError> {
        if schema.contains_field(key) {
            return Err(SchemaError::DeclaredField(key.to_string()));
        }
        if text.is_empty() {
            self.entries.shift_remove(key);
        } else {
            self.entries
                .insert(key.to_string(), Value::String(text.to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume into the raw JSON object for the persistence layer.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }
}

/// Metadata entries not declared by the current schema, in stored order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct LegacyFields {
    entries: IndexMap<String, Value>,
}

impl LegacyFields {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split off the metadata keys the schema does not declare.
///
/// Missing metadata is treated as empty. Never fails; an empty result means
/// the plan matches the current schema.
#[must_use]
pub fn get_legacy_fields(metadata: Option<&PlanMetadata>, schema: &ParsedSchema) -> LegacyFields {
    let entries = metadata
        .map(|m| {
            m.entries
                .iter()
                .filter(|(key, _)| !schema.contains_field(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default();
    LegacyFields { entries }
}
