//! # crm-schema
//!
//! The plan metadata schema engine.
//!
//! This crate provides:
//! - `parse`: authored `SchemaDocument` to an indexed `ParsedSchema`, with a
//!   memo cache keyed on document identity
//! - Characteristic checks for schema authors (`validate_schema`)
//! - `PlanMetadata`, the sole owner of raw plan metadata, and legacy field
//!   detection (`get_legacy_fields`)
//! - Field grouping (`group_fields`) and the editable `PlanForm`
//! - `SchemaRegistry` JSON Schemas and document loading, including the
//!   built-in Medicare plan schema
//!
//! ## Architecture
//!
//! Raw document types live in `crm-core`. Everything here is synchronous and
//! pure apart from the parse cache; a parsed schema is shared behind an `Arc`.

pub mod characteristics;
pub mod error;
pub mod form;
pub mod grouping;
pub mod loader;
pub mod metadata;
pub mod parser;
pub mod registry;

pub use characteristics::{
    ValidationReport, Violation, ViolationKind, validate_concept_naming, validate_schema,
    validate_variant_consistency,
};
pub use error::SchemaError;
pub use form::{PlanForm, RenderedForm, Widget, fallback_section_title, widget_for};
pub use grouping::{FieldGroups, group_fields};
pub use loader::{builtin_document, builtin_parsed, document_from_str, load_document};
pub use metadata::{LegacyFields, PlanMetadata, get_legacy_fields};
pub use parser::{
    FieldDefinition, ParsedSchema, ParsedSchemaCache, SectionDefinition, UNCATEGORIZED, parse,
};
pub use registry::SchemaRegistry;
