//! Property tests over random diagrams
//!
//! Random edge sets between a fixed set of classes must always produce
//! consistent relationship mappings, whatever order the edges arrive in.
//! Hierarchies and loosely spelled attribute names must never yield a
//! descriptor that declares the same field twice.

use classforge::analysis::{is_many, is_required, DiagramAnalysis};
use classforge::core::{ProjectConfig, RelationshipType};
use classforge::model::{Attribute, DiagramDatabase, Edge, Node};
use classforge::plugins::Orchestrator;
use proptest::prelude::*;
use std::collections::HashSet;

const CLASSES: [&str; 4] = ["Customer", "Order", "Product", "Invoice"];

fn nodes() -> Vec<Node> {
    CLASSES
        .iter()
        .enumerate()
        .map(|(i, label)| Node::class(format!("n{}", i), *label))
        .collect()
}

/// Names that collide once emitted as fields, with each other, with the
/// reserved names or with relation fields
const ATTRIBUTES: [&str; 8] = [
    "created at",
    "customer id",
    "first name",
    "firstName",
    "order-id",
    "name",
    "Name",
    "invoice",
];

fn relationship() -> impl Strategy<Value = RelationshipType> {
    prop::sample::select(vec![
        RelationshipType::Association,
        RelationshipType::Aggregation,
        RelationshipType::Composition,
    ])
}

fn multiplicity() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["1", "0..1", "*", "1..*", "0..*"])
}

/// Up to six edges between distinct classes
fn edges() -> impl Strategy<Value = Vec<Edge>> {
    prop::collection::vec(
        (0..CLASSES.len(), 1..CLASSES.len(), relationship(), multiplicity(), multiplicity()),
        0..6,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (source, offset, rel, s, t))| {
                let target = (source + offset) % CLASSES.len();
                Edge::new(format!("e{}", i), format!("n{}", source), format!("n{}", target), rel)
                    .with_multiplicities(s, t)
            })
            .collect()
    })
}

fn database(edges: Vec<Edge>) -> DiagramDatabase {
    DiagramDatabase::from_parts(nodes(), edges).expect("node ids are unique")
}

/// Per-class attribute subsets
fn attributes() -> impl Strategy<Value = Vec<Vec<&'static str>>> {
    prop::collection::vec(
        prop::sample::subsequence(ATTRIBUTES.to_vec(), 0..=4),
        CLASSES.len(),
    )
}

/// Inheritance edges where class `i` may only extend a class before it,
/// so hierarchies are always acyclic
fn hierarchy() -> impl Strategy<Value = Vec<Edge>> {
    prop::collection::vec(prop::option::of(0..CLASSES.len()), CLASSES.len()).prop_map(|parents| {
        parents
            .into_iter()
            .enumerate()
            .skip(1)
            .filter_map(|(child, parent)| {
                let parent = parent? % child;
                Some(Edge::new(
                    format!("h{}", child),
                    format!("n{}", child),
                    format!("n{}", parent),
                    RelationshipType::Inheritance,
                ))
            })
            .collect()
    })
}

/// Attributes, hierarchy and relationship edges combined
fn diagram() -> impl Strategy<Value = DiagramDatabase> {
    (attributes(), hierarchy(), edges()).prop_map(|(attributes, mut hierarchy, edges)| {
        let nodes = nodes()
            .into_iter()
            .zip(attributes)
            .map(|(node, names)| {
                names
                    .into_iter()
                    .fold(node, |node, name| node.with_attribute(Attribute::new(name, "String")))
            })
            .collect();
        hierarchy.extend(edges);
        DiagramDatabase::from_parts(nodes, hierarchy).expect("node ids are unique")
    })
}

proptest! {
    #[test]
    fn prop_range_multiplicity(lower in 0u64..4, upper in 0u64..6) {
        let token = format!("{}..{}", lower, upper);
        prop_assert_eq!(is_many(&token), upper > 1);
        prop_assert_eq!(is_required(&token), lower >= 1);
    }

    #[test]
    fn prop_exactly_one_owner_per_pair(edges in edges()) {
        let database = database(edges);
        let analysis = DiagramAnalysis::analyze(&database);
        let relations = analysis.relations();
        for end in relations.ends() {
            let Some(partner) = relations.partner(end) else {
                continue;
            };
            prop_assert_ne!(end.owning, partner.owning);
            if !end.owning {
                prop_assert_eq!(end.mapped_by.as_deref(), Some(partner.field_name.as_str()));
            }
        }
    }

    #[test]
    fn prop_field_names_unique(database in diagram()) {
        let output = Orchestrator::new().build_database(ProjectConfig::default(), &database);
        for name in CLASSES {
            prop_assert!(output.descriptor(name).is_some());
            let dto_name = format!("{}DTO", name);
            prop_assert!(output.descriptor(&dto_name).is_some());
        }
        for descriptor in &output.descriptors {
            let mut seen = HashSet::new();
            for field in &descriptor.fields {
                prop_assert!(
                    seen.insert(field.name.to_lowercase()),
                    "{} declares `{}` twice",
                    descriptor.name,
                    field.name
                );
            }
        }
    }

    #[test]
    fn prop_mappings_survive_hierarchies(database in diagram()) {
        let analysis = DiagramAnalysis::analyze(&database);
        let relations = analysis.relations();
        for end in relations.ends() {
            let Some(partner) = relations.partner(end) else {
                continue;
            };
            if !end.owning {
                prop_assert_eq!(end.mapped_by.as_deref(), Some(partner.field_name.as_str()));
            }
        }
    }

    #[test]
    fn prop_dtos_hold_no_collections(edges in edges()) {
        let database = database(edges);
        let output = Orchestrator::new().build_database(ProjectConfig::default(), &database);
        for name in CLASSES {
            let dto = output.descriptor(&format!("{}DTO", name)).unwrap();
            prop_assert!(dto
                .fields
                .iter()
                .all(|f| !f.type_name.starts_with("List<") && !f.type_name.starts_with("Set<")));
        }
    }

    #[test]
    fn prop_generation_is_deterministic(database in diagram()) {
        let orchestrator = Orchestrator::new();
        let first = orchestrator.build_database(ProjectConfig::default(), &database);
        let second = orchestrator.build_database(ProjectConfig::default(), &database);
        prop_assert_eq!(first.descriptors, second.descriptors);
        prop_assert_eq!(first.client_models, second.client_models);
    }
}
