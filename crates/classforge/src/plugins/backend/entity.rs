//! Entity descriptors
//!
//! Persisted classes: identity and timestamps on hierarchy roots, surviving
//! attributes, relationship fields and single-table inheritance metadata.

use std::collections::HashSet;

use crate::analysis::{EndKind, RelationEnd};
use crate::core::{
    class_name, field_name, table_name, to_snake_case, Cardinality, DescriptorKind,
};
use crate::descriptor::{Annotation, ClassDescriptor, FieldDescriptor, RelationMeta};
use crate::model::{Attribute, Node};
use crate::plugins::BuildContext;

use super::types::{java_type, literal};
use super::{declared_method, DescriptorBuilder};

/// Builds `@Entity` descriptors for CLASS nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityBuilder;

impl EntityBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorBuilder for EntityBuilder {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Entity
    }

    fn build(&self, context: &BuildContext<'_, '_>, node: &Node) -> ClassDescriptor {
        let analysis = context.analysis;
        let hierarchy = analysis.hierarchy();
        let name = class_name(&node.label);
        let superclass = hierarchy.find_superclass(&node.id);

        let mut descriptor = ClassDescriptor::new(
            &name,
            context.package(DescriptorKind::Entity),
            DescriptorKind::Entity,
        )
        .with_annotation(Annotation::new("Entity"));

        match superclass {
            None => descriptor
                .annotations
                .push(Annotation::new("Table").with_str("name", &table_name(&name))),
            Some(parent) => {
                descriptor.superclass = Some(analysis.class_name(parent));
                descriptor.annotations.push(
                    Annotation::new("DiscriminatorValue").with_value(format!("\"{}\"", name)),
                );
            }
        }
        if hierarchy.is_hierarchy_top(&node.id) {
            descriptor.annotations.push(
                Annotation::new("Inheritance").with_arg("strategy", "InheritanceType.SINGLE_TABLE"),
            );
            descriptor
                .annotations
                .push(Annotation::new("DiscriminatorColumn").with_str("name", "dtype"));
        }
        descriptor.is_abstract = hierarchy.is_inheritance_root(&node.id);
        descriptor.interfaces = hierarchy
            .find_interfaces(&node.id)
            .iter()
            .map(|id| analysis.class_name(id))
            .collect();

        if superclass.is_none() {
            descriptor.fields.push(id_field());
        }
        for attribute in analysis.attributes(&node.id) {
            descriptor.fields.push(attribute_field(context, attribute));
        }
        for end in analysis.relations().ends_for(&node.id) {
            descriptor.fields.push(relation_field(context, end));
        }
        if superclass.is_none() {
            descriptor.fields.extend(timestamp_fields());
        }

        for method in &node.methods {
            let method = declared_method(method);
            descriptor.is_abstract |= method.is_abstract;
            descriptor.methods.push(method);
        }
        descriptor.methods.extend(interface_stubs(context, node));

        descriptor
    }
}

fn id_field() -> FieldDescriptor {
    FieldDescriptor::new("id", "Long")
        .with_annotation(Annotation::new("Id"))
        .with_annotation(
            Annotation::new("GeneratedValue").with_arg("strategy", "GenerationType.IDENTITY"),
        )
}

fn timestamp_fields() -> [FieldDescriptor; 2] {
    [
        FieldDescriptor::new("createdAt", "LocalDateTime")
            .with_annotation(Annotation::new("CreationTimestamp"))
            .with_annotation(
                Annotation::new("Column")
                    .with_str("name", "created_at")
                    .with_arg("updatable", "false"),
            ),
        FieldDescriptor::new("updatedAt", "LocalDateTime")
            .with_annotation(Annotation::new("UpdateTimestamp"))
            .with_annotation(Annotation::new("Column").with_str("name", "updated_at")),
    ]
}

fn attribute_field(context: &BuildContext<'_, '_>, attribute: &Attribute) -> FieldDescriptor {
    let type_name = java_type(&attribute.type_name);
    let name = field_name(&attribute.name);
    let mut field = FieldDescriptor::new(&name, &type_name);
    field.is_static = attribute.is_static;
    field.is_final = attribute.is_final;
    field.initializer = attribute
        .default_value
        .as_deref()
        .map(|value| literal(&type_name, value));

    if !attribute.is_static {
        if context.enum_named(&attribute.type_name).is_some() {
            field
                .annotations
                .push(Annotation::new("Enumerated").with_value("EnumType.STRING"));
        }
        field
            .annotations
            .push(Annotation::new("Column").with_str("name", &to_snake_case(&name)));
    }
    field
}

fn relation_meta(end: &RelationEnd) -> RelationMeta {
    RelationMeta {
        related_class: end.related_class.clone(),
        cardinality: end.cardinality,
        owning_side: end.owning,
        containment: end.containment,
        mapped_by: end.mapped_by.clone(),
        required: end.required,
        persisted: end.kind != EndKind::Transient,
    }
}

fn relation_field(context: &BuildContext<'_, '_>, end: &RelationEnd) -> FieldDescriptor {
    let field = FieldDescriptor::new(&end.field_name, end.type_name()).with_relation(relation_meta(end));

    match end.kind {
        EndKind::Transient => field.with_annotation(Annotation::new("Transient")),
        EndKind::EnumValue if end.cardinality.is_to_many() => field
            .with_annotation(Annotation::new("ElementCollection"))
            .with_annotation(Annotation::new("Enumerated").with_value("EnumType.STRING"))
            .with_initializer("new HashSet<>()"),
        EndKind::EnumValue => {
            let mut column = Annotation::new("Column").with_str("name", &to_snake_case(&end.field_name));
            if end.required {
                column = column.with_arg("nullable", "false");
            }
            field
                .with_annotation(Annotation::new("Enumerated").with_value("EnumType.STRING"))
                .with_annotation(column)
        }
        EndKind::Entity => entity_relation_field(context, end, field),
    }
}

fn entity_relation_field(
    context: &BuildContext<'_, '_>,
    end: &RelationEnd,
    mut field: FieldDescriptor,
) -> FieldDescriptor {
    let mut mapping = Annotation::new(end.cardinality.annotation());
    if let Some(mapped_by) = &end.mapped_by {
        mapping = mapping.with_str("mappedBy", mapped_by);
    }
    if end.cascade_all {
        mapping = mapping.with_arg("cascade", "CascadeType.ALL");
    }
    if end.orphan_removal {
        mapping = mapping.with_arg("orphanRemoval", "true");
    }
    if end.owning && end.is_to_one() {
        mapping = mapping.with_arg("fetch", "FetchType.LAZY");
        if end.required {
            mapping = mapping.with_arg("optional", "false");
        }
    }
    field.annotations.push(mapping);

    if let Some(column) = &end.join_column {
        let mut join = Annotation::new("JoinColumn").with_str("name", column);
        if end.required {
            join = join.with_arg("nullable", "false");
        }
        field.annotations.push(join);
    }

    if let Some(table) = &end.join_table {
        let owner_column = format!("{}_id", to_snake_case(&context.analysis.class_name(&end.node)));
        let mut related_column = format!("{}_id", to_snake_case(&end.related_class));
        if related_column == owner_column {
            related_column = format!("related_{}", related_column);
        }
        field.annotations.push(
            Annotation::new("JoinTable")
                .with_str("name", table)
                .with_arg("joinColumns", format!("@JoinColumn(name = \"{}\")", owner_column))
                .with_arg(
                    "inverseJoinColumns",
                    format!("@JoinColumn(name = \"{}\")", related_column),
                ),
        );
    }

    match end.cardinality {
        Cardinality::OneToMany => field.initializer = Some("new ArrayList<>()".to_string()),
        Cardinality::ManyToMany => field.initializer = Some("new HashSet<>()".to_string()),
        Cardinality::OneToOne | Cardinality::ManyToOne => {}
    }
    field
}

/// Concrete stubs for interface methods the class chain does not declare
fn interface_stubs(context: &BuildContext<'_, '_>, node: &Node) -> Vec<crate::descriptor::MethodDescriptor> {
    let analysis = context.analysis;
    let hierarchy = analysis.hierarchy();
    let mut declared: HashSet<String> = analysis
        .lineage_nodes(&node.id)
        .iter()
        .flat_map(|n| n.methods.iter().map(|m| m.signature_key()))
        .collect();

    let mut stubs = Vec::new();
    for interface in hierarchy.find_interfaces(&node.id) {
        for id in hierarchy.interface_closure(interface) {
            let Some(interface_node) = analysis.database().get(&id) else {
                continue;
            };
            for method in interface_node.methods.iter().filter(|m| !m.is_static) {
                if !declared.insert(method.signature_key()) {
                    continue;
                }
                let mut stub = declared_method(method);
                stub.is_abstract = false;
                stubs.push(stub.with_annotation(Annotation::new("Override")));
            }
        }
    }
    stubs
}
