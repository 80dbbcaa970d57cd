//! Loading authored schema documents, and the built-in plan schema.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use crm_core::document::SchemaDocument;

use crate::error::SchemaError;
use crate::parser::{ParsedSchema, parse};
use crate::registry::{SCHEMA_DOCUMENT, SchemaRegistry};

const BUILTIN_SCHEMA_JSON: &str = include_str!("../data/plan_metadata_schema.json");

static BUILTIN_DOCUMENT: OnceLock<Arc<SchemaDocument>> = OnceLock::new();
static BUILTIN_PARSED: OnceLock<Arc<ParsedSchema>> = OnceLock::new();

/// Parse a schema document from JSON text.
///
/// With `validate` set, the text is first checked against the registry's
/// `schema_document` JSON Schema so shape errors are reported all at once.
///
/// # Errors
///
/// `SchemaError::Json` for malformed text or shapes serde cannot accept,
/// `SchemaError::ValidationFailed` when validation is requested and fails.
pub fn document_from_str(text: &str, validate: bool) -> Result<SchemaDocument, SchemaError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if validate {
        SchemaRegistry::new().validate(SCHEMA_DOCUMENT, &value)?;
    }
    Ok(serde_json::from_value(value)?)
}

/// Read and parse a schema document from disk.
///
/// # Errors
///
/// `SchemaError::Io` when the file cannot be read, otherwise as
/// [`document_from_str`].
pub fn load_document(path: &Path, validate: bool) -> Result<SchemaDocument, SchemaError> {
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = document_from_str(&text, validate)?;
    tracing::debug!(
        path = %path.display(),
        sections = document.sections.len(),
        properties = document.properties.len(),
        "loaded schema document"
    );
    Ok(document)
}

/// The plan metadata schema compiled into the binary.
///
/// # Panics
///
/// Panics if the embedded JSON does not deserialize. The file ships with the
/// crate and is exercised by its tests, so this cannot happen in a release.
#[must_use]
pub fn builtin_document() -> Arc<SchemaDocument> {
    Arc::clone(BUILTIN_DOCUMENT.get_or_init(|| {
        Arc::new(
            serde_json::from_str(BUILTIN_SCHEMA_JSON)
                .expect("embedded plan metadata schema is valid JSON"),
        )
    }))
}

/// Process-wide parsed form of [`builtin_document`].
///
/// # Panics
///
/// See [`builtin_document`].
#[must_use]
pub fn builtin_parsed() -> Arc<ParsedSchema> {
    Arc::clone(BUILTIN_PARSED.get_or_init(|| Arc::new(parse(&builtin_document()))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_passes_registry_validation() {
        let value: serde_json::Value = serde_json::from_str(BUILTIN_SCHEMA_JSON).unwrap();
        SchemaRegistry::new()
            .validate(SCHEMA_DOCUMENT, &value)
            .unwrap();
    }

    #[test]
    fn builtin_parsed_is_shared() {
        assert!(Arc::ptr_eq(&builtin_parsed(), &builtin_parsed()));
        assert!(Arc::ptr_eq(&builtin_document(), &builtin_document()));
    }

    #[test]
    fn loads_document_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sections":{{"a":{{"title":"A","order":1}}}},"properties":{{"x":{{"section":"a"}}}}}}"#
        )
        .unwrap();
        let doc = load_document(file.path(), true).unwrap();
        assert_eq!(doc.sections.len(), 1);
        assert!(doc.properties.contains_key("x"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_document(&dir.path().join("absent.json"), false);
        assert!(matches!(result, Err(SchemaError::Io { .. })));
    }

    #[rstest::rstest]
    #[case(true)]
    #[case(false)]
    fn fractional_order_and_numeric_enum_load(#[case] validate: bool) {
        let text = r#"{
            "sections": {"a": {"title": "A", "order": 1.5}},
            "properties": {"tier": {"section": "a", "validation": {"enum": [1, 2]}}}
        }"#;
        let doc = document_from_str(text, validate).unwrap();
        assert!((doc.sections["a"].order - 1.5).abs() < f64::EPSILON);
        let options = doc.properties["tier"].validation.as_ref().unwrap().options.clone();
        assert_eq!(options, Some(vec!["1".to_string(), "2".to_string()]));
    }

    #[test]
    fn validation_errors_surface_before_deserialization() {
        let text = r#"{"sections":{"a":{"order":"one"}}}"#;
        assert!(matches!(
            document_from_str(text, true),
            Err(SchemaError::ValidationFailed { .. })
        ));
        assert!(matches!(
            document_from_str(text, false),
            Err(SchemaError::Json(_))
        ));
    }
}
