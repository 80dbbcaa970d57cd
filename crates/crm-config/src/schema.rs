//! Schema document source configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const fn default_validate_on_load() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchemaConfig {
    /// Path to an authored schema document. Empty selects the built-in schema.
    #[serde(default)]
    pub path: String,

    /// Check loaded documents against the `schema_document` JSON Schema.
    #[serde(default = "default_validate_on_load")]
    pub validate_on_load: bool,
}

impl SchemaConfig {
    /// Returns `true` when a custom document path is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.path.trim().is_empty()
    }

    /// The configured document path, if any.
    #[must_use]
    pub fn document_path(&self) -> Option<PathBuf> {
        self.is_configured().then(|| PathBuf::from(self.path.trim()))
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            validate_on_load: default_validate_on_load(),
        }
    }
}
