//! DTO descriptors
//!
//! Flat transfer objects: `id`, every surviving attribute of the class chain,
//! one `<field>Id` per owning to-one reference and single enum values. No
//! collections of related entities are ever exposed.

use crate::analysis::{DiagramAnalysis, EndKind, RelationEnd};
use crate::core::{class_name, field_name, Cardinality, DescriptorKind};
use crate::descriptor::{Annotation, ClassDescriptor, FieldDescriptor, RelationMeta};
use crate::model::{Node, NodeId};
use crate::plugins::BuildContext;

use super::types::java_type;
use super::DescriptorBuilder;

/// DTO class name for an entity class name
pub fn dto_name(entity: &str) -> String {
    format!("{}DTO", entity)
}

/// Chain ends exposed on the DTO as a scalar id
pub(crate) fn foreign_key_ends<'s>(
    analysis: &'s DiagramAnalysis<'_>,
    node: &NodeId,
) -> Vec<&'s RelationEnd> {
    analysis
        .chain_ends(node)
        .into_iter()
        .filter(|end| end.holds_foreign_key())
        .collect()
}

/// Builds `<Name>DTO` descriptors for CLASS nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct DtoBuilder;

impl DtoBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorBuilder for DtoBuilder {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Dto
    }

    fn build(&self, context: &BuildContext<'_, '_>, node: &Node) -> ClassDescriptor {
        let analysis = context.analysis;
        let mut descriptor = ClassDescriptor::new(
            dto_name(&class_name(&node.label)),
            context.package(DescriptorKind::Dto),
            DescriptorKind::Dto,
        );

        descriptor.fields.push(FieldDescriptor::new("id", "Long"));

        for attribute in analysis.chain_attributes(&node.id) {
            if attribute.is_static {
                continue;
            }
            descriptor.fields.push(FieldDescriptor::new(
                field_name(&attribute.name),
                java_type(&attribute.type_name),
            ));
        }

        for end in foreign_key_ends(analysis, &node.id) {
            let mut field = FieldDescriptor::new(end.foreign_key_field(), "Long").with_relation(RelationMeta {
                related_class: end.related_class.clone(),
                cardinality: end.cardinality,
                owning_side: true,
                containment: end.containment,
                mapped_by: None,
                required: end.required,
                persisted: true,
            });
            if end.required {
                field.annotations.push(Annotation::new("NotNull"));
            }
            descriptor.fields.push(field);
        }

        for end in analysis
            .chain_ends(&node.id)
            .into_iter()
            .filter(|end| end.kind == EndKind::EnumValue && end.cardinality == Cardinality::ManyToOne)
        {
            let mut field = FieldDescriptor::new(&end.field_name, &end.related_class).with_relation(RelationMeta {
                related_class: end.related_class.clone(),
                cardinality: end.cardinality,
                owning_side: true,
                containment: end.containment,
                mapped_by: None,
                required: end.required,
                persisted: true,
            });
            if end.required {
                field.annotations.push(Annotation::new("NotNull"));
            }
            descriptor.fields.push(field);
        }

        descriptor
    }
}
