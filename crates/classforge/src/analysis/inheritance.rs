//! Inheritance and realization resolution
//!
//! Reads INHERITANCE and REALIZATION edges once and answers hierarchy
//! queries: superclass, realized interfaces, inheritance roots and the
//! ancestor chain. The superclass relation is kept acyclic; an edge that
//! would close a cycle is rejected when it is read.

use std::collections::{HashMap, HashSet};

use tracing::{debug, span, Level};

use crate::core::{DiagnosticCode, Diagnostics, NodeKind, RelationshipType};
use crate::model::{DiagramDatabase, NodeId};

/// Resolved class and interface hierarchy of one diagram
#[derive(Debug, Clone, Default)]
pub struct InheritanceResolver {
    superclass: HashMap<NodeId, NodeId>,
    extended: HashSet<NodeId>,
    interfaces: HashMap<NodeId, Vec<NodeId>>,
    super_interfaces: HashMap<NodeId, Vec<NodeId>>,
    node_count: usize,
    pub diagnostics: Diagnostics,
}

impl InheritanceResolver {
    /// Resolve every inheritance and realization edge, in edge order
    pub fn resolve(database: &DiagramDatabase) -> Self {
        let resolve_span = span!(Level::INFO, "resolve_inheritance");
        let _enter = resolve_span.enter();

        let mut resolver = Self {
            node_count: database.node_ids().count(),
            ..Self::default()
        };

        for edge in database.edge_slice() {
            let rel = edge.relationship_type;
            if rel != RelationshipType::Inheritance && rel != RelationshipType::Realization {
                continue;
            }

            let (Some(source), Some(target)) = (database.get(&edge.source), database.get(&edge.target)) else {
                let missing = if database.get(&edge.source).is_none() {
                    &edge.source
                } else {
                    &edge.target
                };
                resolver.diagnostics.push(
                    DiagnosticCode::MissingNode,
                    edge.id.as_str(),
                    format!("{} edge references unknown node `{}`; skipped", rel, missing),
                );
                continue;
            };

            match (rel, source.kind, target.kind) {
                (RelationshipType::Inheritance, NodeKind::Class, NodeKind::Class) => {
                    if let Some(existing) = resolver.superclass.get(&source.id) {
                        let existing = existing.clone();
                        resolver.diagnostics.push(
                            DiagnosticCode::MultipleSuperclasses,
                            edge.id.as_str(),
                            format!(
                                "`{}` already extends `{}`; ignoring `{}`",
                                source.label, existing, target.id
                            ),
                        );
                    } else if source.id == target.id || resolver.reaches(&target.id, &source.id) {
                        resolver.diagnostics.push(
                            DiagnosticCode::InheritanceCycle,
                            edge.id.as_str(),
                            format!(
                                "`{}` extending `{}` would create a cycle; ignored",
                                source.label, target.label
                            ),
                        );
                    } else {
                        resolver.superclass.insert(source.id.clone(), target.id.clone());
                        resolver.extended.insert(target.id.clone());
                    }
                }
                (_, NodeKind::Interface, NodeKind::Interface) => {
                    push_unique(&mut resolver.super_interfaces, &source.id, &target.id);
                }
                (RelationshipType::Realization, _, NodeKind::Interface) => {
                    push_unique(&mut resolver.interfaces, &source.id, &target.id);
                }
                (RelationshipType::Realization, _, kind) => {
                    resolver.diagnostics.push(
                        DiagnosticCode::InvalidRealization,
                        edge.id.as_str(),
                        format!("`{}` realizes {} `{}`, not an interface; skipped", source.label, kind, target.label),
                    );
                }
                (_, source_kind, target_kind) => {
                    resolver.diagnostics.push(
                        DiagnosticCode::UnsupportedRelationEnd,
                        edge.id.as_str(),
                        format!(
                            "{} `{}` cannot extend {} `{}`; skipped",
                            source_kind, source.label, target_kind, target.label
                        ),
                    );
                }
            }
        }

        debug!(
            subclasses = resolver.superclass.len(),
            roots = resolver.extended.len(),
            "Hierarchy resolved"
        );
        resolver
    }

    /// The class `node` extends, if any
    pub fn find_superclass(&self, node: &NodeId) -> Option<&NodeId> {
        self.superclass.get(node)
    }

    /// Returns true when at least one class extends `node`
    ///
    /// A class can be both a root and a subclass in a multi-level hierarchy.
    pub fn is_inheritance_root(&self, node: &NodeId) -> bool {
        self.extended.contains(node)
    }

    /// Returns true for the topmost class of a hierarchy: extended, but
    /// extending nothing itself. It carries the single-table strategy.
    pub fn is_hierarchy_top(&self, node: &NodeId) -> bool {
        self.is_inheritance_root(node) && !self.superclass.contains_key(node)
    }

    /// Interfaces `node` realizes, in edge order
    pub fn find_interfaces(&self, node: &NodeId) -> &[NodeId] {
        self.interfaces.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Interfaces an interface node extends, in edge order
    pub fn super_interfaces(&self, node: &NodeId) -> &[NodeId] {
        self.super_interfaces.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `interface` followed by everything it transitively extends, each once
    pub fn interface_closure(&self, interface: &NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut closure = Vec::new();
        let mut pending = vec![interface.clone()];
        while let Some(current) = pending.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            pending.extend(self.super_interfaces(&current).iter().rev().cloned());
            closure.push(current);
        }
        closure
    }

    /// Superclasses of `node`, nearest first
    ///
    /// The walk takes at most one step per node in the diagram.
    pub fn ancestors(&self, node: &NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = node;
        while let Some(parent) = self.superclass.get(current) {
            if chain.len() >= self.node_count || parent == node || chain.contains(parent) {
                break;
            }
            chain.push(parent.clone());
            current = parent;
        }
        chain
    }

    /// `node` and its ancestors, topmost class first
    pub fn lineage(&self, node: &NodeId) -> Vec<NodeId> {
        let mut lineage = self.ancestors(node);
        lineage.reverse();
        lineage.push(node.clone());
        lineage
    }

    fn reaches(&self, from: &NodeId, to: &NodeId) -> bool {
        from == to || self.ancestors(from).iter().any(|a| a == to)
    }
}

fn push_unique(map: &mut HashMap<NodeId, Vec<NodeId>>, key: &NodeId, value: &NodeId) {
    let entry = map.entry(key.clone()).or_default();
    if !entry.contains(value) {
        entry.push(value.clone());
    }
}
