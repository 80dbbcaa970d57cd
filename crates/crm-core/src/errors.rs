//! Cross-cutting error types for the CRM crates.
//!
//! Domain-specific errors (e.g., `SchemaError`, `ConfigError`) are defined in
//! their respective crates. The CLI converges everything into `anyhow`.

use thiserror::Error;

/// Errors raised by core type conversions.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A string did not name a known variant of a closed set.
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}
