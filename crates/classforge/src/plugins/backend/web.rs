//! Repository and controller descriptors
//!
//! Thin wrappers: the repository is an interface over the entity, the
//! controller maps HTTP verbs onto the service operations.

use crate::core::{class_name, field_name, resource_path, DescriptorKind};
use crate::descriptor::{
    Annotation, ClassDescriptor, CrudOperation, FieldDescriptor, MethodDescriptor,
    ParameterDescriptor,
};
use crate::model::Node;
use crate::plugins::BuildContext;

use super::dto::dto_name;
use super::DescriptorBuilder;

/// Builds `<Name>Repository` descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryBuilder;

impl RepositoryBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorBuilder for RepositoryBuilder {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Repository
    }

    fn build(&self, context: &BuildContext<'_, '_>, node: &Node) -> ClassDescriptor {
        let entity = class_name(&node.label);
        let mut descriptor = ClassDescriptor::new(
            format!("{}Repository", entity),
            context.package(DescriptorKind::Repository),
            DescriptorKind::Repository,
        )
        .with_annotation(Annotation::new("Repository"));
        descriptor
            .interfaces
            .push(format!("JpaRepository<{}, Long>", entity));
        descriptor
    }
}

/// Builds `<Name>Controller` descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerBuilder;

impl ControllerBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Handler method name and HTTP mapping annotation for an operation
    pub fn route(operation: CrudOperation) -> (&'static str, Annotation) {
        match operation {
            CrudOperation::FindAll => ("getAll", Annotation::new("GetMapping")),
            CrudOperation::FindById => ("getById", Annotation::new("GetMapping").with_value("\"/{id}\"")),
            CrudOperation::Save => ("create", Annotation::new("PostMapping")),
            CrudOperation::Update => ("update", Annotation::new("PutMapping").with_value("\"/{id}\"")),
            CrudOperation::DeleteById => {
                ("delete", Annotation::new("DeleteMapping").with_value("\"/{id}\""))
            }
        }
    }
}

impl DescriptorBuilder for ControllerBuilder {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Controller
    }

    fn build(&self, context: &BuildContext<'_, '_>, node: &Node) -> ClassDescriptor {
        let entity = class_name(&node.label);
        let dto = dto_name(&entity);
        let mut descriptor = ClassDescriptor::new(
            format!("{}Controller", entity),
            context.package(DescriptorKind::Controller),
            DescriptorKind::Controller,
        )
        .with_annotation(Annotation::new("RestController"))
        .with_annotation(
            Annotation::new("RequestMapping").with_value(format!("\"{}\"", resource_path(&entity))),
        );

        let mut service = FieldDescriptor::new(
            format!("{}Service", field_name(&entity)),
            format!("{}Service", entity),
        );
        service.is_final = true;
        descriptor.fields.push(service);

        for operation in CrudOperation::ALL {
            let (name, mapping) = Self::route(operation);
            let return_type = match operation {
                CrudOperation::FindAll => format!("ResponseEntity<List<{}>>", dto),
                CrudOperation::DeleteById => "ResponseEntity<Void>".to_string(),
                _ => format!("ResponseEntity<{}>", dto),
            };
            let mut method = MethodDescriptor::new(name, return_type)
                .with_annotation(mapping)
                .with_operation(operation);
            if operation.takes_id() {
                method = method.with_parameter(
                    ParameterDescriptor::new("id", "Long").with_annotation(Annotation::new("PathVariable")),
                );
            }
            if operation.takes_body() {
                method = method.with_parameter(
                    ParameterDescriptor::new("dto", &dto)
                        .with_annotation(Annotation::new("Valid"))
                        .with_annotation(Annotation::new("RequestBody")),
                );
            }
            descriptor.methods.push(method);
        }

        descriptor
    }
}
