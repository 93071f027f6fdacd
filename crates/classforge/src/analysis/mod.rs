//! Diagram analysis passes
//!
//! Multiplicity interpretation, relationship classification, hierarchy
//! resolution and attribute conflict resolution. [`DiagramAnalysis`] runs all
//! of them once over a diagram snapshot; every descriptor builder reads from
//! the same analysis.

pub mod conflicts;
pub mod inheritance;
pub mod multiplicity;
pub mod relationships;

pub use conflicts::ConflictResolver;
pub use inheritance::InheritanceResolver;
pub use multiplicity::{is_many, is_required};
pub use relationships::{
    EndKind, RelationEnd, RelationIndex, RelationshipClassifier, RESERVED_FIELD_NAMES,
};

use std::collections::HashMap;

use tracing::{debug, span, Level};

use crate::core::{class_name, field_name, Diagnostics};
use crate::model::{Attribute, DiagramDatabase, Node, NodeId};

/// Results of every analysis pass over one diagram
#[derive(Debug, Clone)]
pub struct DiagramAnalysis<'a> {
    database: &'a DiagramDatabase,
    relations: RelationIndex,
    hierarchy: InheritanceResolver,
    attributes: HashMap<NodeId, Vec<Attribute>>,
    diagnostics: Diagnostics,
}

impl<'a> DiagramAnalysis<'a> {
    /// Run classification, hierarchy and conflict resolution
    pub fn analyze(database: &'a DiagramDatabase) -> Self {
        let analyze_span = span!(Level::INFO, "analyze");
        let _enter = analyze_span.enter();

        let mut relations = RelationshipClassifier::new().classify(database);
        let mut hierarchy = InheritanceResolver::resolve(database);

        let mut diagnostics = Diagnostics::new();
        diagnostics.extend(std::mem::take(&mut relations.diagnostics));
        diagnostics.extend(std::mem::take(&mut hierarchy.diagnostics));

        let resolver = ConflictResolver::new();
        let mut attributes: HashMap<NodeId, Vec<Attribute>> = HashMap::new();
        for class in database.classes() {
            // Superclasses first, so their final relation names and surviving
            // attributes are known
            for id in hierarchy.lineage(&class.id) {
                if attributes.contains_key(&id) {
                    continue;
                }
                let Some(member) = database.get(&id) else {
                    continue;
                };
                let mut inherited = Vec::new();
                for ancestor in hierarchy.ancestors(&id) {
                    if let Some(kept) = attributes.get(&ancestor) {
                        inherited.extend(kept.iter().map(|a| field_name(&a.name)));
                    }
                    inherited.extend(relations.synthesized_names(&ancestor));
                }
                relations.rename_inherited(&id, &inherited, &mut diagnostics);
                let kept = resolver.resolve(
                    member,
                    &relations.synthesized_names(&id),
                    &inherited,
                    &mut diagnostics,
                );
                attributes.insert(id, kept);
            }
        }

        debug!(
            classes = attributes.len(),
            relation_ends = relations.ends().len(),
            diagnostics = diagnostics.len(),
            "Analysis completed"
        );

        Self {
            database,
            relations,
            hierarchy,
            attributes,
            diagnostics,
        }
    }

    pub fn database(&self) -> &'a DiagramDatabase {
        self.database
    }

    pub fn relations(&self) -> &RelationIndex {
        &self.relations
    }

    pub fn hierarchy(&self) -> &InheritanceResolver {
        &self.hierarchy
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Surviving attributes declared on `node` itself
    pub fn attributes(&self, node: &NodeId) -> &[Attribute] {
        self.attributes.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `node` and its superclasses as nodes, topmost first
    pub fn lineage_nodes(&self, node: &NodeId) -> Vec<&'a Node> {
        self.hierarchy
            .lineage(node)
            .iter()
            .filter_map(|id| self.database.get(id))
            .collect()
    }

    /// Surviving attributes of the whole chain, topmost class first
    pub fn chain_attributes(&self, node: &NodeId) -> Vec<&Attribute> {
        self.hierarchy
            .lineage(node)
            .iter()
            .flat_map(|id| self.attributes(id).iter())
            .collect()
    }

    /// Relationship ends of the whole chain, topmost class first
    pub fn chain_ends(&self, node: &NodeId) -> Vec<&RelationEnd> {
        self.hierarchy
            .lineage(node)
            .iter()
            .flat_map(|id| self.relations.ends_for(id))
            .collect()
    }

    /// Generated class name of a node; unknown ids fall back to the id
    pub fn class_name(&self, node: &NodeId) -> String {
        match self.database.get(node) {
            Some(n) => class_name(&n.label),
            None => class_name(node.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DiagnosticCode, RelationshipType};
    use crate::model::Edge;

    #[test]
    fn test_subclass_drops_inherited_attribute() {
        let database = DiagramDatabase::from_parts(
            vec![
                Node::class("a", "Animal").with_attribute(Attribute::new("name", "String")),
                Node::class("d", "Dog")
                    .with_attribute(Attribute::new("name", "String"))
                    .with_attribute(Attribute::new("breed", "String")),
            ],
            vec![Edge::new("e1", "d", "a", RelationshipType::Inheritance)],
        )
        .unwrap();

        let analysis = DiagramAnalysis::analyze(&database);
        let dog = NodeId::from("d");
        let own: Vec<_> = analysis.attributes(&dog).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(own, vec!["breed"]);
        let chain: Vec<_> = analysis.chain_attributes(&dog).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(chain, vec!["name", "breed"]);
        assert!(analysis
            .diagnostics()
            .has_code(DiagnosticCode::DuplicateAttributeDropped));
    }

    #[test]
    fn test_subclass_relation_renamed_past_inherited_names() {
        let database = DiagramDatabase::from_parts(
            vec![
                Node::class("o", "Owner"),
                Node::class("v", "Vet"),
                Node::class("a", "Animal").with_attribute(Attribute::new("vet", "String")),
                Node::class("d", "Dog"),
            ],
            vec![
                Edge::new("e1", "d", "a", RelationshipType::Inheritance),
                // Declared before the superclass edge it clashes with
                Edge::new("e2", "d", "o", RelationshipType::Association).with_multiplicities("*", "1"),
                Edge::new("e3", "a", "o", RelationshipType::Association).with_multiplicities("*", "1"),
                Edge::new("e4", "d", "v", RelationshipType::Association).with_multiplicities("*", "1"),
            ],
        )
        .unwrap();

        let analysis = DiagramAnalysis::analyze(&database);
        let fields = |id: &str| -> Vec<String> {
            analysis
                .relations()
                .ends_for(&NodeId::from(id))
                .map(|e| e.field_name.clone())
                .collect()
        };
        assert_eq!(fields("a"), vec!["owner"]);
        assert_eq!(fields("d"), vec!["owner2", "vet2"]);
        let chain: Vec<_> = analysis
            .chain_ends(&NodeId::from("d"))
            .iter()
            .map(|e| e.foreign_key_field())
            .collect();
        assert_eq!(chain, vec!["ownerId", "owner2Id", "vet2Id"]);
        assert_eq!(
            analysis
                .diagnostics()
                .with_code(DiagnosticCode::RelationFieldRenamed)
                .count(),
            2
        );
    }

    #[test]
    fn test_diagnostics_are_merged_in_pass_order() {
        let database = DiagramDatabase::from_parts(
            vec![Node::class("a", "A").with_attribute(Attribute::new("id", "Long"))],
            vec![
                Edge::new("e1", "a", "ghost", RelationshipType::Association),
                Edge::new("e2", "a", "ghost", RelationshipType::Inheritance),
            ],
        )
        .unwrap();

        let analysis = DiagramAnalysis::analyze(&database);
        let codes: Vec<_> = analysis.diagnostics().iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![
                DiagnosticCode::MissingNode,
                DiagnosticCode::MissingNode,
                DiagnosticCode::ReservedAttributeDropped,
            ]
        );
    }
}
