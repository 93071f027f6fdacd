//! Relationship classification
//!
//! Turns association, aggregation, composition and dependency edges into
//! per-class relationship ends: the field each side holds, its ORM
//! cardinality, which side owns the foreign key or join table, and the
//! containment policy.
//!
//! Classification is a pure function of the diagram snapshot. Calling
//! [`RelationshipClassifier::classify`] twice on the same database yields the
//! same index, field names included.
//!
//! # Ownership
//!
//! - one-to-many / many-to-one: the "many" side owns the join column.
//! - one-to-one: the source of the earliest edge owns the join column. A
//!   reverse edge declared later is merged into the earlier one, so edge
//!   order decides ownership.
//! - many-to-many: the source of the earliest edge owns the join table.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, span, trace, Level};

use super::multiplicity::{is_many, is_required};
use crate::core::{
    class_name, collection_field_name, field_name, normalize, table_name, to_snake_case,
    Cardinality, Containment, DiagnosticCode, Diagnostics, NodeKind, RelationshipType,
};
use crate::model::{DiagramDatabase, Edge, EdgeId, NodeId};

/// Field names no relationship may take; they belong to the identity and
/// timestamp columns
pub const RESERVED_FIELD_NAMES: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// What kind of field a relationship end produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndKind {
    /// Persisted reference or collection to another entity
    Entity,
    /// Enumerated value (or set of values) of an enum node
    EnumValue,
    /// Non-persisted reference produced by a dependency edge
    Transient,
}

/// One side of a classified relationship, as seen by the class holding the field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationEnd {
    /// Position of the edge that produced this end
    pub edge_index: usize,
    pub edge_id: EdgeId,
    pub relationship_type: RelationshipType,
    pub kind: EndKind,
    /// Class holding the field
    pub node: NodeId,
    pub related: NodeId,
    pub related_class: String,
    /// Final field name, unique among this class's relationship fields
    pub field_name: String,
    /// Cardinality from this side's perspective
    pub cardinality: Cardinality,
    /// Holds the join column or join table
    pub owning: bool,
    pub containment: Containment,
    pub cascade_all: bool,
    pub orphan_removal: bool,
    /// Owning reference must not be null
    pub required: bool,
    /// Owner's field name, set on the inverse side
    pub mapped_by: Option<String>,
    pub join_column: Option<String>,
    pub join_table: Option<String>,
    /// Position of the other side in [`RelationIndex::ends`]
    pub partner: Option<usize>,
}

impl RelationEnd {
    /// Returns true when this side holds a single reference
    pub fn is_to_one(&self) -> bool {
        !self.cardinality.is_to_many()
    }

    /// Returns true when this side is a persisted entity relationship holding
    /// a foreign key column (exposed as `<field>Id` on DTOs)
    pub fn holds_foreign_key(&self) -> bool {
        self.kind == EndKind::Entity && self.owning && self.is_to_one()
    }

    /// Declared field type, e.g. `Customer`, `List<Order>`, `Set<Tag>`
    pub fn type_name(&self) -> String {
        match self.cardinality {
            Cardinality::OneToOne | Cardinality::ManyToOne => self.related_class.clone(),
            Cardinality::OneToMany => format!("List<{}>", self.related_class),
            Cardinality::ManyToMany => format!("Set<{}>", self.related_class),
        }
    }

    /// Name of the foreign key id field exposed on DTOs
    pub fn foreign_key_field(&self) -> String {
        format!("{}Id", self.field_name)
    }
}

/// All relationship ends of a diagram, grouped per class
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelationIndex {
    ends: Vec<RelationEnd>,
    #[serde(skip)]
    by_node: HashMap<NodeId, Vec<usize>>,
    #[serde(skip)]
    pub diagnostics: Diagnostics,
}

impl RelationIndex {
    /// All ends in creation order (edge order, source side first)
    pub fn ends(&self) -> &[RelationEnd] {
        &self.ends
    }

    /// Ends whose field lives on `node`, in edge order
    pub fn ends_for<'a>(&'a self, node: &NodeId) -> impl Iterator<Item = &'a RelationEnd> + 'a {
        self.by_node
            .get(node)
            .into_iter()
            .flat_map(move |indices| indices.iter().map(move |&i| &self.ends[i]))
    }

    pub fn partner(&self, end: &RelationEnd) -> Option<&RelationEnd> {
        end.partner.map(|i| &self.ends[i])
    }

    /// Field names the relationships synthesize on `node`
    ///
    /// Foreign key holders also contribute their `<field>id` / `<field>Id`
    /// variants, so a manual `customerId` attribute collides with `customer`.
    pub fn synthesized_names(&self, node: &NodeId) -> Vec<String> {
        let mut names = Vec::new();
        for end in self.ends_for(node) {
            names.push(end.field_name.clone());
            if end.holds_foreign_key() {
                names.push(format!("{}id", end.field_name));
                names.push(end.foreign_key_field());
            }
        }
        names
    }

    /// Rename `node`'s relationship fields that clash with `inherited`
    ///
    /// `inherited` holds every field name the superclasses of `node` already
    /// declare. Must run after the superclasses themselves were renamed. A
    /// renamed owner keeps its partner's `mappedBy` and its join column in
    /// step with the new name.
    pub fn rename_inherited(
        &mut self,
        node: &NodeId,
        inherited: &[String],
        diagnostics: &mut Diagnostics,
    ) {
        let Some(indices) = self.by_node.get(node).cloned() else {
            return;
        };
        let inherited: HashSet<String> = inherited.iter().map(|n| normalize(n)).collect();
        let mut taken: HashSet<String> = indices
            .iter()
            .map(|&i| normalize(&self.ends[i].field_name))
            .chain(inherited.iter().cloned())
            .collect();

        for index in indices {
            let holds_key = self.ends[index].holds_foreign_key();
            let clashes = |name: &str| {
                inherited.contains(&normalize(name))
                    || (holds_key && inherited.contains(&normalize(&format!("{}Id", name))))
            };
            let old = self.ends[index].field_name.clone();
            if !clashes(&old) {
                continue;
            }

            let mut counter = 2;
            let mut candidate = format!("{}{}", old, counter);
            while clashes(&candidate) || taken.contains(&normalize(&candidate)) {
                counter += 1;
                candidate = format!("{}{}", old, counter);
            }
            taken.insert(normalize(&candidate));

            let end = &mut self.ends[index];
            end.field_name = candidate.clone();
            if end.join_column.is_some() {
                end.join_column = Some(format!("{}_id", to_snake_case(&candidate)));
            }
            let edge_id = end.edge_id.clone();
            if let Some(partner) = end.partner {
                let partner = &mut self.ends[partner];
                if partner.mapped_by.as_deref() == Some(old.as_str()) {
                    partner.mapped_by = Some(candidate.clone());
                }
            }
            diagnostics.push(
                DiagnosticCode::RelationFieldRenamed,
                edge_id.as_str(),
                format!(
                    "field `{}` already declared by a superclass; renamed to `{}`",
                    old, candidate
                ),
            );
        }
    }

    fn push(&mut self, end: RelationEnd) -> usize {
        let index = self.ends.len();
        self.by_node.entry(end.node.clone()).or_default().push(index);
        self.ends.push(end);
        index
    }
}

/// Per-class registry of taken relationship field names
#[derive(Default)]
struct FieldNames {
    taken: HashMap<NodeId, HashSet<String>>,
}

impl FieldNames {
    /// Reserve `wanted` on `node`, appending a counter when it is taken
    fn claim(&mut self, node: &NodeId, wanted: &str) -> String {
        let taken = self.taken.entry(node.clone()).or_insert_with(|| {
            RESERVED_FIELD_NAMES.iter().map(|n| normalize(n)).collect()
        });
        let mut candidate = wanted.to_string();
        let mut counter = 2;
        while taken.contains(&normalize(&candidate)) {
            candidate = format!("{}{}", wanted, counter);
            counter += 1;
        }
        taken.insert(normalize(&candidate));
        candidate
    }
}

/// Classifies structural and dependency edges into relationship ends
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationshipClassifier;

impl RelationshipClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify every relevant edge of the diagram
    pub fn classify(&self, database: &DiagramDatabase) -> RelationIndex {
        let classify_span = span!(Level::INFO, "classify", edges = database.edge_slice().len());
        let _enter = classify_span.enter();

        let mut index = RelationIndex::default();
        let mut names = FieldNames::default();
        let mut canonical: Vec<usize> = Vec::new();

        for (position, edge) in database.indexed_edges() {
            let rel = edge.relationship_type;
            if !rel.is_structural() && rel != RelationshipType::Dependency {
                continue;
            }

            let (Some(source), Some(target)) = (database.get(&edge.source), database.get(&edge.target)) else {
                let missing = if database.get(&edge.source).is_none() {
                    &edge.source
                } else {
                    &edge.target
                };
                index.diagnostics.push(
                    DiagnosticCode::MissingNode,
                    edge.id.as_str(),
                    format!("edge references unknown node `{}`; skipped", missing),
                );
                continue;
            };

            if source.kind != NodeKind::Class || target.kind == NodeKind::Interface {
                index.diagnostics.push(
                    DiagnosticCode::UnsupportedRelationEnd,
                    edge.id.as_str(),
                    format!(
                        "{} from {} `{}` to {} `{}` produces no field; skipped",
                        rel, source.kind, source.label, target.kind, target.label
                    ),
                );
                continue;
            }

            let target_class = class_name(&target.label);

            if rel == RelationshipType::Dependency {
                let wanted = edge
                    .label
                    .as_deref()
                    .map(field_name)
                    .unwrap_or_else(|| field_name(&target_class));
                let field = names.claim(&source.id, &wanted);
                note_rename(&mut index.diagnostics, edge, &wanted, &field);
                index.push(RelationEnd {
                    kind: EndKind::Transient,
                    cardinality: Cardinality::ManyToOne,
                    owning: false,
                    ..base_end(position, edge, &source.id, &target.id, target_class, field)
                });
                continue;
            }

            if target.kind == NodeKind::Enum {
                self.classify_enum_value(position, edge, &source.id, target_class, &mut names, &mut index);
                continue;
            }

            let edges = database.edge_slice();
            if let Some(&earlier) = canonical.iter().find(|&&i| is_mirror(&edges[i], edge)) {
                let earlier_id = edges[earlier].id.to_string();
                index.diagnostics.push(
                    DiagnosticCode::MirrorEdgeMerged,
                    edge.id.as_str(),
                    format!("reverse declaration of `{}`; merged into it", earlier_id),
                );
                canonical.retain(|&i| i != earlier);
                continue;
            }
            if let Some(&earlier) = canonical.iter().find(|&&i| is_reverse(&edges[i], edge)) {
                index.diagnostics.push(
                    DiagnosticCode::ReverseEdgeNotMerged,
                    edge.id.as_str(),
                    format!(
                        "reverses `{}` but labels or multiplicities differ; kept as a separate relationship",
                        edges[earlier].id
                    ),
                );
            }
            canonical.push(position);

            let source_class = class_name(&source.label);
            self.classify_entity_pair(position, edge, source_class, target_class, &mut names, &mut index);
        }

        debug!(
            ends = index.ends.len(),
            diagnostics = index.diagnostics.len(),
            "Classification completed"
        );
        index
    }

    fn classify_enum_value(
        &self,
        position: usize,
        edge: &Edge,
        source: &NodeId,
        enum_class: String,
        names: &mut FieldNames,
        index: &mut RelationIndex,
    ) {
        let many = is_many(&edge.target_multiplicity);
        let wanted = match edge.label.as_deref() {
            Some(label) => field_name(label),
            None if many => collection_field_name(&enum_class),
            None => field_name(&enum_class),
        };
        let field = names.claim(source, &wanted);
        note_rename(&mut index.diagnostics, edge, &wanted, &field);
        index.push(RelationEnd {
            kind: EndKind::EnumValue,
            cardinality: if many { Cardinality::ManyToMany } else { Cardinality::ManyToOne },
            owning: true,
            required: !many && is_required(&edge.target_multiplicity),
            ..base_end(position, edge, source, &edge.target, enum_class, field)
        });
    }

    fn classify_entity_pair(
        &self,
        position: usize,
        edge: &Edge,
        source_class: String,
        target_class: String,
        names: &mut FieldNames,
        index: &mut RelationIndex,
    ) {
        let cardinality = Cardinality::from_ends(
            is_many(&edge.source_multiplicity),
            is_many(&edge.target_multiplicity),
        );

        let mut containment = edge.relationship_type.containment();
        if containment == Containment::Compose && cardinality == Cardinality::ManyToMany {
            index.diagnostics.push(
                DiagnosticCode::CompositionDowngraded,
                edge.id.as_str(),
                "many-to-many composition has no single owner; treated as aggregation",
            );
            containment = Containment::Aggregate;
        }

        // Source side
        let source_owns = cardinality != Cardinality::OneToMany;
        let wanted_source = match edge.label.as_deref() {
            Some(label) => field_name(label),
            None if cardinality.is_to_many() => collection_field_name(&target_class),
            None => field_name(&target_class),
        };
        let source_field = names.claim(&edge.source, &wanted_source);
        note_rename(&mut index.diagnostics, edge, &wanted_source, &source_field);

        // Target side
        let target_cardinality = cardinality.inverse();
        let wanted_target = if target_cardinality.is_to_many() {
            collection_field_name(&source_class)
        } else {
            field_name(&source_class)
        };
        let target_field = names.claim(&edge.target, &wanted_target);
        note_rename(&mut index.diagnostics, edge, &wanted_target, &target_field);

        let compose = containment == Containment::Compose;
        // The whole of a composition is the "one" side; for one-to-one it is the source.
        let source_is_whole = compose && cardinality != Cardinality::ManyToOne;
        let target_is_whole = compose && cardinality == Cardinality::ManyToOne;

        let mut source_end = RelationEnd {
            cardinality,
            owning: source_owns,
            containment,
            cascade_all: source_is_whole,
            orphan_removal: source_is_whole,
            required: source_owns
                && !cardinality.is_to_many()
                && (is_required(&edge.target_multiplicity) || target_is_whole),
            ..base_end(position, edge, &edge.source, &edge.target, target_class.clone(), source_field.clone())
        };
        let mut target_end = RelationEnd {
            cardinality: target_cardinality,
            owning: !source_owns,
            containment,
            cascade_all: target_is_whole,
            orphan_removal: target_is_whole,
            required: !source_owns && (is_required(&edge.source_multiplicity) || source_is_whole),
            ..base_end(position, edge, &edge.target, &edge.source, source_class.clone(), target_field.clone())
        };

        let (owner, owner_class, other_class) = if source_owns {
            (&mut source_end, &source_class, &target_class)
        } else {
            (&mut target_end, &target_class, &source_class)
        };
        if owner.cardinality == Cardinality::ManyToMany {
            owner.join_table = Some(format!("{}_{}", table_name(owner_class), table_name(other_class)));
        } else {
            owner.join_column = Some(format!("{}_id", to_snake_case(&owner.field_name)));
        }

        if source_owns {
            target_end.mapped_by = Some(source_field);
        } else {
            source_end.mapped_by = Some(target_field);
        }

        trace!(
            edge = %edge.id,
            cardinality = %cardinality,
            owner = if source_owns { "source" } else { "target" },
            containment = %containment,
            "Classified relationship"
        );

        let source_index = index.push(source_end);
        let target_index = index.push(target_end);
        index.ends[source_index].partner = Some(target_index);
        index.ends[target_index].partner = Some(source_index);
    }
}

/// An end with every flag cleared, to be refined by the caller
fn base_end(
    position: usize,
    edge: &Edge,
    node: &NodeId,
    related: &NodeId,
    related_class: String,
    field_name: String,
) -> RelationEnd {
    RelationEnd {
        edge_index: position,
        edge_id: edge.id.clone(),
        relationship_type: edge.relationship_type,
        kind: EndKind::Entity,
        node: node.clone(),
        related: related.clone(),
        related_class,
        field_name,
        cardinality: Cardinality::ManyToOne,
        owning: false,
        containment: Containment::None,
        cascade_all: false,
        orphan_removal: false,
        required: false,
        mapped_by: None,
        join_column: None,
        join_table: None,
        partner: None,
    }
}

fn note_rename(diagnostics: &mut Diagnostics, edge: &Edge, wanted: &str, actual: &str) {
    if wanted != actual {
        diagnostics.push(
            DiagnosticCode::RelationFieldRenamed,
            edge.id.as_str(),
            format!("field `{}` already taken; renamed to `{}`", wanted, actual),
        );
    }
}

/// Returns true if `later` runs opposite to `earlier` with the same type
fn is_reverse(earlier: &Edge, later: &Edge) -> bool {
    earlier.source == later.target
        && earlier.target == later.source
        && earlier.relationship_type == later.relationship_type
}

/// Returns true if `later` re-declares `earlier` from the other side
fn is_mirror(earlier: &Edge, later: &Edge) -> bool {
    is_reverse(earlier, later)
        && earlier.label.as_deref().map(normalize) == later.label.as_deref().map(normalize)
        && is_many(&earlier.source_multiplicity) == is_many(&later.target_multiplicity)
        && is_many(&earlier.target_multiplicity) == is_many(&later.source_multiplicity)
}
