//! Groups a working set of fields into base fields, their variants, and
//! orphaned variants whose base is not in the set.

use indexmap::IndexMap;
use serde::Serialize;

use crate::parser::FieldDefinition;

/// Result of [`group_fields`]. Borrows from the working set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldGroups<'a> {
    /// Fields without a `baseKey`, in working-set order.
    pub base_fields: Vec<&'a FieldDefinition>,
    /// Base key to its variants present in the working set.
    pub variants_by_base: IndexMap<&'a str, Vec<&'a FieldDefinition>>,
    /// Variants whose base is absent from the working set.
    pub orphan_variants: Vec<&'a FieldDefinition>,
}

impl<'a> FieldGroups<'a> {
    /// Variants grouped under `base_key`; empty when it has none.
    #[must_use]
    pub fn variants_of(&self, base_key: &str) -> &[&'a FieldDefinition] {
        self.variants_by_base
            .get(base_key)
            .map_or(&[][..], Vec::as_slice)
    }
}

/// Split a working set of fields. Stateless and idempotent.
#[must_use]
pub fn group_fields<'a>(fields: &[&'a FieldDefinition]) -> FieldGroups<'a> {
    let mut groups = FieldGroups::default();

    for &field in fields {
        if !field.is_variant() {
            groups.base_fields.push(field);
            groups.variants_by_base.entry(field.key.as_str()).or_default();
        }
    }

    for &field in fields {
        let Some(base_key) = field.base_key.as_deref() else {
            continue;
        };
        match groups.variants_by_base.get_mut(base_key) {
            Some(variants) => variants.push(field),
            None => groups.orphan_variants.push(field),
        }
    }

    groups
}
