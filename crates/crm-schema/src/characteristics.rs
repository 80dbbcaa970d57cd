//! Authoring checks over field characteristics.
//!
//! These rules catch inconsistent schema declarations before they ship. They
//! run from tests and the `crm check` command, never per request, and they
//! report every violation instead of stopping at the first one.

use std::collections::HashMap;
use std::fmt;

use crm_core::enums::Facet;
use schemars::JsonSchema;
use serde::Serialize;

use crate::parser::{FieldDefinition, ParsedSchema};

/// Concepts (or keys) exempt from the "concept appears in key" rule.
pub const CONCEPT_NAMING_EXCEPTIONS: &[&str] = &["coverage_limit"];

/// What is wrong with a field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// A base field declares characteristics without a concept.
    MissingConcept,
    /// The field key does not contain its concept.
    ConceptNotInKey { concept: String },
    /// A variant points at a key the schema does not declare.
    MissingBaseField { base_key: String },
    /// A variant's base is itself a variant; grouping only nests one level.
    NestedVariant { base_key: String },
    /// A variant does not say who it applies to.
    MissingEligibility,
    /// A variant diverges from its base on a facet that must match.
    FacetMismatch {
        facet: Facet,
        base: String,
        variant: String,
    },
}

/// One authoring problem, tied to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Violation {
    pub field_key: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    fn new(field_key: &str, kind: ViolationKind) -> Self {
        Self {
            field_key: field_key.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = &self.field_key;
        match &self.kind {
            ViolationKind::MissingConcept => {
                write!(f, "{key}: characteristics declare no concept")
            }
            ViolationKind::ConceptNotInKey { concept } => {
                write!(f, "{key}: concept '{concept}' does not appear in the key")
            }
            ViolationKind::MissingBaseField { base_key } => {
                write!(f, "{key}: missing base field '{base_key}'")
            }
            ViolationKind::NestedVariant { base_key } => {
                write!(f, "{key}: base field '{base_key}' is itself a variant")
            }
            ViolationKind::MissingEligibility => {
                write!(f, "{key}: variant does not declare eligibility")
            }
            ViolationKind::FacetMismatch {
                facet,
                base,
                variant,
            } => write!(
                f,
                "{key}: {facet} '{variant}' differs from base value '{base}'"
            ),
        }
    }
}

/// All violations found in one schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ValidationReport {
    pub fields_checked: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

fn is_exempt(key: &str, concept: &str) -> bool {
    CONCEPT_NAMING_EXCEPTIONS
        .iter()
        .any(|exempt| exempt.eq_ignore_ascii_case(concept) || exempt.eq_ignore_ascii_case(key))
}

/// Base fields with characteristics must name a concept contained in their key.
#[must_use]
pub fn validate_concept_naming(fields: &[FieldDefinition]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for field in fields.iter().filter(|f| !f.is_variant()) {
        let Some(chars) = field.characteristics.as_ref() else {
            continue;
        };
        let Some(concept) = chars.facet(Facet::Concept) else {
            violations.push(Violation::new(&field.key, ViolationKind::MissingConcept));
            continue;
        };
        if is_exempt(&field.key, concept) {
            continue;
        }
        if !field
            .key
            .to_lowercase()
            .contains(&concept.to_lowercase())
        {
            violations.push(Violation::new(
                &field.key,
                ViolationKind::ConceptNotInKey {
                    concept: concept.to_string(),
                },
            ));
        }
    }

    violations
}

/// Variants must reference an existing base field that is not itself a
/// variant, declare eligibility, and agree with the base on every checked
/// facet that is not allowed to differ.
#[must_use]
pub fn validate_variant_consistency(fields: &[FieldDefinition]) -> Vec<Violation> {
    let by_key: HashMap<&str, &FieldDefinition> =
        fields.iter().map(|f| (f.key.as_str(), f)).collect();
    let mut violations = Vec::new();

    for variant in fields {
        let Some(base_key) = variant.base_key.as_deref() else {
            continue;
        };

        let base = by_key.get(base_key).copied();
        match base {
            None => violations.push(Violation::new(
                &variant.key,
                ViolationKind::MissingBaseField {
                    base_key: base_key.to_string(),
                },
            )),
            Some(base) if base.is_variant() => violations.push(Violation::new(
                &variant.key,
                ViolationKind::NestedVariant {
                    base_key: base_key.to_string(),
                },
            )),
            Some(_) => {}
        }

        if variant.eligibility().is_none() {
            violations.push(Violation::new(
                &variant.key,
                ViolationKind::MissingEligibility,
            ));
        }

        let (Some(base_chars), Some(variant_chars)) = (
            base.and_then(|b| b.characteristics.as_ref()),
            variant.characteristics.as_ref(),
        ) else {
            continue;
        };

        for facet in Facet::CHECKED {
            if facet.is_allowed_to_differ() {
                continue;
            }
            let (Some(expected), Some(actual)) =
                (base_chars.facet(facet), variant_chars.facet(facet))
            else {
                continue;
            };
            if expected != actual {
                violations.push(Violation::new(
                    &variant.key,
                    ViolationKind::FacetMismatch {
                        facet,
                        base: expected.to_string(),
                        variant: actual.to_string(),
                    },
                ));
            }
        }
    }

    violations
}

/// Run every authoring check over a parsed schema.
#[must_use]
pub fn validate_schema(schema: &ParsedSchema) -> ValidationReport {
    let fields = schema.fields();
    let mut violations = validate_concept_naming(fields);
    violations.extend(validate_variant_consistency(fields));

    if !violations.is_empty() {
        tracing::debug!(count = violations.len(), "schema authoring violations found");
    }

    ValidationReport {
        fields_checked: fields.len(),
        violations,
    }
}
