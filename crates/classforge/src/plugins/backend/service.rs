//! Service descriptors
//!
//! CRUD over the entity repository plus one injected lookup per related
//! class a DTO foreign key points at. `save` and `update` carry the
//! resolutions turning each foreign key id back into an entity reference.

use crate::core::{class_name, field_name, DescriptorKind};
use crate::descriptor::{
    Annotation, ClassDescriptor, CrudOperation, FieldDescriptor, ForeignKeyResolution,
    MethodDescriptor, ParameterDescriptor,
};
use crate::model::Node;
use crate::plugins::BuildContext;

use super::dto::{dto_name, foreign_key_ends};
use super::DescriptorBuilder;

/// Repository field name for a class, e.g. `Customer` → `customerRepository`
pub fn repository_field(class: &str) -> String {
    format!("{}Repository", field_name(class))
}

/// Message prefix of the not-found condition; the unresolved id follows it
pub fn not_found_message(class: &str) -> String {
    format!("{} not found with id: ", class)
}

/// Builds `<Name>Service` descriptors for CLASS nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceBuilder;

impl ServiceBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Foreign key resolutions of a class, in DTO field order
    pub fn resolutions(context: &BuildContext<'_, '_>, node: &Node) -> Vec<ForeignKeyResolution> {
        foreign_key_ends(context.analysis, &node.id)
            .into_iter()
            .map(|end| ForeignKeyResolution {
                dto_field: end.foreign_key_field(),
                entity_field: end.field_name.clone(),
                related_class: end.related_class.clone(),
                lookup: repository_field(&end.related_class),
                not_found: not_found_message(&end.related_class),
                required: end.required,
            })
            .collect()
    }
}

impl DescriptorBuilder for ServiceBuilder {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Service
    }

    fn build(&self, context: &BuildContext<'_, '_>, node: &Node) -> ClassDescriptor {
        let entity = class_name(&node.label);
        let dto = dto_name(&entity);
        let mut descriptor = ClassDescriptor::new(
            format!("{}Service", entity),
            context.package(DescriptorKind::Service),
            DescriptorKind::Service,
        )
        .with_annotation(Annotation::new("Service"))
        .with_annotation(Annotation::new("Transactional"));

        let own_repository = repository_field(&entity);
        let mut repository = FieldDescriptor::new(&own_repository, format!("{}Repository", entity));
        repository.is_final = true;
        descriptor.fields.push(repository);

        let resolutions = Self::resolutions(context, node);
        for resolution in &resolutions {
            if descriptor.has_field(&resolution.lookup) {
                continue;
            }
            let mut lookup = FieldDescriptor::new(
                &resolution.lookup,
                format!("{}Repository", resolution.related_class),
            );
            lookup.is_final = true;
            descriptor.fields.push(lookup);
        }

        let list_type = format!("List<{}>", dto);
        for operation in CrudOperation::ALL {
            let return_type = match operation {
                CrudOperation::FindAll => list_type.clone(),
                CrudOperation::DeleteById => "void".to_string(),
                _ => dto.clone(),
            };
            let mut method =
                MethodDescriptor::new(operation.method_name(), return_type).with_operation(operation);
            if operation.takes_id() {
                method = method.with_parameter(ParameterDescriptor::new("id", "Long"));
                method.not_found = Some(not_found_message(&entity));
            }
            if operation.takes_body() {
                method = method.with_parameter(ParameterDescriptor::new("dto", &dto));
                method.resolutions = resolutions.clone();
            }
            descriptor.methods.push(method);
        }

        descriptor
    }
}
