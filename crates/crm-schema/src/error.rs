//! Schema engine error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading schema documents, registry lookups and form edits.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Requested schema name was not found in the registry.
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// JSON value did not pass schema validation.
    #[error("Validation failed: {errors:?}")]
    ValidationFailed {
        /// Individual error messages from the validator.
        errors: Vec<String>,
    },

    /// Schema generation or compilation error.
    #[error("Schema generation error: {0}")]
    Generation(String),

    /// A schema document or metadata file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input text was not valid JSON for the expected shape.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Plan metadata must be a JSON object (or null).
    #[error("Plan metadata must be a JSON object, got {0}")]
    MetadataShape(&'static str),

    /// The key is not declared by the current schema.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// The key is declared by the schema and cannot be edited as a legacy field.
    #[error("Field '{0}' is declared by the schema; edit it through the field accessor")]
    DeclaredField(String),

    /// Edits are not accepted in the current render mode.
    #[error("Form is read-only in {0} mode")]
    ReadOnly(crm_core::enums::RenderMode),

    /// An edited value did not satisfy the field's type or validation.
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}
