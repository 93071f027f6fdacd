//! Attribute/field conflict resolution
//!
//! Filters a class's manually declared attributes so every generated field
//! name is unique. Reserved system names are dropped, relationship-derived
//! fields win over manual attributes, and repeated attributes keep their
//! first declaration. Every drop is recorded as a diagnostic.

use std::collections::HashSet;

use crate::core::{field_name, normalize, DiagnosticCode, Diagnostics};
use crate::model::{Attribute, Node};

use super::relationships::RESERVED_FIELD_NAMES;

/// Drops attributes that would collide with synthesized fields
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver;

/// Collision key of a name: the field name it is emitted as, normalized
///
/// `created at`, `created_at` and `CreatedAt` all share the key `createdat`.
pub fn collision_key(name: &str) -> String {
    normalize(&field_name(name))
}

impl ConflictResolver {
    pub fn new() -> Self {
        Self
    }

    /// Returns true for `id`, `createdAt` and `updatedAt` in any spelling
    pub fn is_reserved(name: &str) -> bool {
        let name = collision_key(name);
        RESERVED_FIELD_NAMES.iter().any(|r| normalize(r) == name)
    }

    /// Surviving attributes of `node`, in declaration order
    ///
    /// `synthesized` holds the relationship field names of this class (with
    /// foreign key variants), `inherited` the field names its superclasses
    /// already declare.
    pub fn resolve(
        &self,
        node: &Node,
        synthesized: &[String],
        inherited: &[String],
        diagnostics: &mut Diagnostics,
    ) -> Vec<Attribute> {
        let relation_names: HashSet<String> = synthesized.iter().map(|n| collision_key(n)).collect();
        let inherited_names: HashSet<String> = inherited.iter().map(|n| collision_key(n)).collect();
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for attribute in &node.attributes {
            let key = collision_key(&attribute.name);
            let subject = format!("{}.{}", node.label, attribute.name);

            if Self::is_reserved(&attribute.name) {
                diagnostics.push(
                    DiagnosticCode::ReservedAttributeDropped,
                    subject,
                    "reserved system field; generated automatically",
                );
            } else if relation_names.contains(&key) {
                diagnostics.push(
                    DiagnosticCode::AttributeShadowedByRelation,
                    subject,
                    "collides with a relationship field; relationship wins",
                );
            } else if inherited_names.contains(&key) {
                diagnostics.push(
                    DiagnosticCode::DuplicateAttributeDropped,
                    subject,
                    "already declared by a superclass",
                );
            } else if !seen.insert(key) {
                diagnostics.push(
                    DiagnosticCode::DuplicateAttributeDropped,
                    subject,
                    "declared more than once; first declaration kept",
                );
            } else {
                kept.push(attribute.clone());
            }
        }

        kept
    }
}
