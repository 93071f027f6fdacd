//! Class diagram graph model
//!
//! Typed nodes and edges as produced by the extractor, stored flat in a
//! [`DiagramDatabase`].

use anyhow::{bail, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{GraphStore, NodeKind, RelationshipType, Visibility};

/// Stable node identifier, unique within a diagram
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Stable edge identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A class attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: String,
    pub name: String,
    /// Semantic type token, e.g. `String`, `Integer`, `Date`
    pub type_name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub default_value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            type_name: type_name.into(),
            visibility: Visibility::Private,
            is_static: false,
            is_final: false,
            default_value: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn as_final(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A class or interface method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub id: String,
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
}

impl Method {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            return_type: return_type.into(),
            parameters: Vec::new(),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
        }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Name plus parameter types, used to match interface methods
    pub fn signature_key(&self) -> String {
        let params: Vec<&str> = self
            .parameters
            .iter()
            .map(|p| p.type_name.as_str())
            .collect();
        format!("{}({})", self.name, params.join(","))
    }
}

/// A diagram node: class, interface or enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Raw display name, not yet a valid identifier
    pub label: String,
    pub attributes: Vec<Attribute>,
    pub methods: Vec<Method>,
    /// Literal values, only meaningful for enums
    pub enum_values: Vec<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(id),
            kind,
            label: label.into(),
            attributes: Vec::new(),
            methods: Vec::new(),
            enum_values: Vec::new(),
        }
    }

    pub fn class(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Class, label)
    }

    pub fn interface(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Interface, label)
    }

    pub fn enumeration(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Enum, label)
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_enum_value(mut self, value: impl Into<String>) -> Self {
        self.enum_values.push(value.into());
        self
    }

    pub fn is_class(&self) -> bool {
        self.kind == NodeKind::Class
    }
}

/// A typed relationship between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub relationship_type: RelationshipType,
    pub source_multiplicity: String,
    pub target_multiplicity: String,
    /// Optional role name; names the source-side field and disambiguates
    /// parallel relationships between the same pair of nodes
    pub label: Option<String>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        relationship_type: RelationshipType,
    ) -> Self {
        Self {
            id: EdgeId::new(id),
            source: NodeId::new(source),
            target: NodeId::new(target),
            relationship_type,
            source_multiplicity: "1".to_string(),
            target_multiplicity: "1".to_string(),
            label: None,
        }
    }

    pub fn with_multiplicities(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.source_multiplicity = source.into();
        self.target_multiplicity = target.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns true if this edge connects `a` and `b` in either direction
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }
}

/// Flat, id-indexed storage for one diagram snapshot
///
/// Nodes keep their insertion order so generated output is deterministic.
/// Edges keep their position, which is load-bearing for ownership tie-breaks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiagramDatabase {
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl DiagramDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from nodes and edges, in the given order
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        let mut database = Self::new();
        for node in nodes {
            database.insert_node(node)?;
        }
        for edge in edges {
            database.push_edge(edge);
        }
        Ok(database)
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Edges paired with their position
    pub fn indexed_edges(&self) -> impl Iterator<Item = (usize, &Edge)> {
        self.edges.iter().enumerate()
    }

    pub fn edge_slice(&self) -> &[Edge] {
        &self.edges
    }

    /// Class nodes in insertion order
    pub fn classes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.kind == NodeKind::Class)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Find a node by its label, ignoring case
    pub fn find_by_label(&self, label: &str) -> Option<&Node> {
        self.nodes
            .values()
            .find(|n| n.label.eq_ignore_ascii_case(label))
    }
}

impl GraphStore for DiagramDatabase {
    type Node = Node;
    type Edge = Edge;

    fn insert_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            bail!("duplicate node id `{}`", node.id);
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    fn push_edge(&mut self, edge: Edge) -> usize {
        self.edges.push(edge);
        self.edges.len() - 1
    }

    fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(&NodeId::from(id))
    }

    fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
