//! Core type definitions for class generation
//!
//! This module contains the closed variants used throughout Classforge:
//! node kinds, relationship types, member visibility, ORM cardinality,
//! containment policy and descriptor kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a diagram node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// A concrete class, generated as a persisted entity
    #[default]
    Class,
    /// An interface, generated as signatures only
    Interface,
    /// An enumeration of literal values
    Enum,
}

impl NodeKind {
    pub const ALL: [NodeKind; 3] = [NodeKind::Class, NodeKind::Interface, NodeKind::Enum];

    /// Resolve a loosely-typed kind token coming from the editor
    ///
    /// Matching ignores case and surrounding whitespace. Unknown tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "class" | "abstract" | "abstract_class" | "entity" => Some(NodeKind::Class),
            "interface" => Some(NodeKind::Interface),
            "enum" | "enumeration" => Some(NodeKind::Enum),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Class => write!(f, "class"),
            NodeKind::Interface => write!(f, "interface"),
            NodeKind::Enum => write!(f, "enum"),
        }
    }
}

/// Relationship types between diagram nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// Plain reference: foreign key or join table, no cascade
    #[default]
    Association,
    /// Weak containment: children survive their parent
    Aggregation,
    /// Strong containment: children are owned by their parent
    Composition,
    /// Source is the subclass, target the superclass
    Inheritance,
    /// Source implements the target interface
    Realization,
    /// Non-persisted usage of the target
    Dependency,
}

impl RelationshipType {
    /// All relationship types, in declaration order
    pub const ALL: [RelationshipType; 6] = [
        RelationshipType::Association,
        RelationshipType::Aggregation,
        RelationshipType::Composition,
        RelationshipType::Inheritance,
        RelationshipType::Realization,
        RelationshipType::Dependency,
    ];

    /// Resolve a loosely-typed relationship token coming from the editor
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "association" | "assoc" => Some(RelationshipType::Association),
            "aggregation" => Some(RelationshipType::Aggregation),
            "composition" => Some(RelationshipType::Composition),
            "inheritance" | "generalization" | "extends" => Some(RelationshipType::Inheritance),
            "realization" | "implementation" | "implements" => {
                Some(RelationshipType::Realization)
            }
            "dependency" | "usage" => Some(RelationshipType::Dependency),
            _ => None,
        }
    }

    /// Returns true for the types the relationship classifier maps to fields
    /// (association, aggregation, composition)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            RelationshipType::Association
                | RelationshipType::Aggregation
                | RelationshipType::Composition
        )
    }

    /// Containment policy implied by this relationship type
    pub fn containment(&self) -> Containment {
        match self {
            RelationshipType::Aggregation => Containment::Aggregate,
            RelationshipType::Composition => Containment::Compose,
            _ => Containment::None,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipType::Association => write!(f, "association"),
            RelationshipType::Aggregation => write!(f, "aggregation"),
            RelationshipType::Composition => write!(f, "composition"),
            RelationshipType::Inheritance => write!(f, "inheritance"),
            RelationshipType::Realization => write!(f, "realization"),
            RelationshipType::Dependency => write!(f, "dependency"),
        }
    }
}

/// Visibility modifier for attributes and methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    #[default]
    Private,
}

impl Visibility {
    /// Resolve a visibility keyword or UML marker (`+`, `#`, `-`)
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "public" | "+" => Some(Visibility::Public),
            "protected" | "#" => Some(Visibility::Protected),
            "private" | "-" => Some(Visibility::Private),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// ORM cardinality of a relationship, seen from one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    /// Cardinality from the multiplicity of both edge ends
    ///
    /// `source_many` / `target_many` are the `is_many` results of the
    /// source and target multiplicity tokens.
    pub fn from_ends(source_many: bool, target_many: bool) -> Self {
        match (source_many, target_many) {
            (false, false) => Cardinality::OneToOne,
            (true, false) => Cardinality::ManyToOne,
            (false, true) => Cardinality::OneToMany,
            (true, true) => Cardinality::ManyToMany,
        }
    }

    /// The same relationship seen from the other side
    pub fn inverse(self) -> Self {
        match self {
            Cardinality::OneToMany => Cardinality::ManyToOne,
            Cardinality::ManyToOne => Cardinality::OneToMany,
            other => other,
        }
    }

    /// Returns true when the side holding this cardinality sees a collection
    pub fn is_to_many(self) -> bool {
        matches!(self, Cardinality::OneToMany | Cardinality::ManyToMany)
    }

    /// JPA annotation name for this cardinality
    pub fn annotation(self) -> &'static str {
        match self {
            Cardinality::OneToOne => "OneToOne",
            Cardinality::OneToMany => "OneToMany",
            Cardinality::ManyToOne => "ManyToOne",
            Cardinality::ManyToMany => "ManyToMany",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::OneToOne => write!(f, "one-to-one"),
            Cardinality::OneToMany => write!(f, "one-to-many"),
            Cardinality::ManyToOne => write!(f, "many-to-one"),
            Cardinality::ManyToMany => write!(f, "many-to-many"),
        }
    }
}

/// Containment policy attached to a relationship field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Containment {
    #[default]
    None,
    Aggregate,
    Compose,
}

impl fmt::Display for Containment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Containment::None => write!(f, "none"),
            Containment::Aggregate => write!(f, "aggregate"),
            Containment::Compose => write!(f, "compose"),
        }
    }
}

/// Kind of a generated class descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DescriptorKind {
    Entity,
    Dto,
    Repository,
    Service,
    Controller,
    Interface,
    Enum,
}

impl DescriptorKind {
    /// Sub-package the descriptor lives in, relative to the base package
    pub fn package_segment(self) -> &'static str {
        match self {
            DescriptorKind::Entity | DescriptorKind::Interface | DescriptorKind::Enum => "entity",
            DescriptorKind::Dto => "dto",
            DescriptorKind::Repository => "repository",
            DescriptorKind::Service => "service",
            DescriptorKind::Controller => "controller",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorKind::Entity => write!(f, "entity"),
            DescriptorKind::Dto => write!(f, "dto"),
            DescriptorKind::Repository => write!(f, "repository"),
            DescriptorKind::Service => write!(f, "service"),
            DescriptorKind::Controller => write!(f, "controller"),
            DescriptorKind::Interface => write!(f, "interface"),
            DescriptorKind::Enum => write!(f, "enum"),
        }
    }
}
