//! Registry of JSON Schemas for the engine's exchanged types.
//!
//! The `SchemaRegistry` builds JSON Schemas at construction time using
//! [`schemars::schema_for!`] and validates arbitrary JSON via `jsonschema`.
//! Authored schema documents are checked against `schema_document` on load;
//! the other entries serve editor tooling and `crm schema`.

use std::collections::HashMap;

use crm_core::document::{Characteristics, PropertySpec, SchemaDocument, SectionSpec};
use crm_core::notifications::Notification;
use schemars::schema_for;

use crate::characteristics::ValidationReport;
use crate::error::SchemaError;
use crate::form::RenderedForm;
use crate::metadata::PlanMetadata;

/// Name of the schema authored documents are validated against.
pub const SCHEMA_DOCUMENT: &str = "schema_document";

/// Central store of JSON Schemas keyed by snake_case name.
pub struct SchemaRegistry {
    schemas: HashMap<&'static str, serde_json::Value>,
}

/// Insert a schema into the map, converting the `schemars` output to a
/// `serde_json::Value`. Panics if `serde_json::to_value` fails (should be
/// infallible for valid `schemars` output).
macro_rules! register {
    ($map:expr, $name:expr, $ty:ty) => {
        $map.insert($name, serde_json::to_value(schema_for!($ty)).unwrap());
    };
}

impl SchemaRegistry {
    /// Build a registry containing every exchanged type.
    ///
    /// # Panics
    ///
    /// Panics if `serde_json::to_value` fails on any `schemars`-generated
    /// schema. This is not expected in practice because `schemars` always
    /// produces valid JSON-serialisable output.
    #[must_use]
    pub fn new() -> Self {
        let mut schemas = HashMap::new();

        // --- Authored document (4) ---
        register!(schemas, SCHEMA_DOCUMENT, SchemaDocument);
        register!(schemas, "section_spec", SectionSpec);
        register!(schemas, "property_spec", PropertySpec);
        register!(schemas, "characteristics", Characteristics);

        // --- Runtime values (4) ---
        register!(schemas, "plan_metadata", PlanMetadata);
        register!(schemas, "validation_report", ValidationReport);
        register!(schemas, "rendered_form", RenderedForm);
        register!(schemas, "notification", Notification);

        Self { schemas }
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or
    /// `SchemaError::ValidationFailed` carrying every error message.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator = jsonschema::validator_for(schema)
            .map_err(|e| SchemaError::Generation(format!("{e}")))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{e}"))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// List all registered schema names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
    }

    #[test]
    fn registry_has_expected_count() {
        assert_eq!(registry().schema_count(), 8);
    }

    #[test]
    fn registry_list_is_sorted() {
        let names = registry().list();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn get_nonexistent_schema() {
        assert!(registry().get("nonexistent").is_none());
    }

    #[test]
    fn validate_accepts_minimal_document() {
        let doc = json!({
            "sections": { "costs": { "title": "Costs", "order": 1 } },
            "properties": { "premium_monthly": { "type": "number", "section": "costs" } }
        });
        assert!(registry().validate(SCHEMA_DOCUMENT, &doc).is_ok());
    }

    #[test]
    fn validate_accepts_property_without_type() {
        let doc = json!({ "properties": { "legacy_code": { "label": "Code" } } });
        assert!(registry().validate(SCHEMA_DOCUMENT, &doc).is_ok());
    }

    #[test]
    fn validate_rejects_wrong_shapes() {
        let doc = json!({
            "sections": { "costs": { "order": "first" } },
            "properties": { "x": { "validation": { "enum": "HMO" } } }
        });
        let result = registry().validate(SCHEMA_DOCUMENT, &doc);
        if let Err(SchemaError::ValidationFailed { errors }) = result {
            assert!(errors.len() >= 2, "{errors:?}");
        } else {
            panic!("Expected ValidationFailed");
        }
    }

    #[test]
    fn validate_plan_metadata_requires_object() {
        let reg = registry();
        assert!(reg.validate("plan_metadata", &json!({ "a": 1 })).is_ok());
        assert!(reg.validate("plan_metadata", &json!([1])).is_err());
    }

    #[test]
    fn validate_nonexistent_schema_returns_not_found() {
        let result = registry().validate("bogus", &json!({}));
        assert!(matches!(result, Err(SchemaError::NotFound(_))));
    }

    #[test]
    fn all_expected_schemas_present() {
        let reg = registry();
        let expected = [
            "schema_document",
            "section_spec",
            "property_spec",
            "characteristics",
            "plan_metadata",
            "validation_report",
            "rendered_form",
            "notification",
        ];
        for name in &expected {
            assert!(reg.get(name).is_some(), "Missing expected schema: {name}");
        }
    }
}
