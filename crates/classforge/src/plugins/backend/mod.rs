//! Backend descriptor builders
//!
//! One builder per descriptor kind. For each CLASS node the generator runs
//! the entity, DTO, repository, service and controller builders; INTERFACE
//! and ENUM nodes get a single descriptor each.

mod dto;
mod entity;
mod service;
mod structure;
pub mod types;
mod web;

pub(crate) use dto::foreign_key_ends;
pub use dto::{dto_name, DtoBuilder};
pub use entity::EntityBuilder;
pub use service::{not_found_message, repository_field, ServiceBuilder};
pub use structure::{EnumBuilder, InterfaceBuilder};
pub use web::{ControllerBuilder, RepositoryBuilder};

use tracing::{debug, span, trace, Level};

use crate::core::{field_name, DescriptorKind, GraphStore, NodeKind};
use crate::descriptor::{ClassDescriptor, MethodDescriptor, ParameterDescriptor};
use crate::model::{Method, Node};

use super::BuildContext;
use types::java_type;

/// Builds one kind of descriptor from a diagram node
pub trait DescriptorBuilder: Send + Sync {
    /// Kind of descriptor this builder produces
    fn kind(&self) -> DescriptorKind;

    /// Node kind this builder applies to
    fn node_kind(&self) -> NodeKind {
        NodeKind::Class
    }

    fn build(&self, context: &BuildContext<'_, '_>, node: &Node) -> ClassDescriptor;
}

/// Runs every backend builder over the diagram
pub struct BackendGenerator {
    builders: Vec<Box<dyn DescriptorBuilder>>,
}

impl BackendGenerator {
    /// Generator with the full builder set, in output order
    pub fn new() -> Self {
        Self {
            builders: vec![
                Box::new(EntityBuilder::new()),
                Box::new(DtoBuilder::new()),
                Box::new(RepositoryBuilder::new()),
                Box::new(ServiceBuilder::new()),
                Box::new(ControllerBuilder::new()),
                Box::new(InterfaceBuilder::new()),
                Box::new(EnumBuilder::new()),
            ],
        }
    }

    /// Generator with a custom builder set
    pub fn with_builders(builders: Vec<Box<dyn DescriptorBuilder>>) -> Self {
        Self { builders }
    }

    pub fn kinds(&self) -> Vec<DescriptorKind> {
        self.builders.iter().map(|b| b.kind()).collect()
    }

    /// Descriptors for every node, in node order then builder order
    pub fn generate(&self, context: &BuildContext<'_, '_>) -> Vec<ClassDescriptor> {
        let build_span = span!(Level::INFO, "build_backend");
        let _enter = build_span.enter();

        let mut descriptors = Vec::new();
        for node in context.analysis.database().nodes() {
            for builder in self.builders.iter().filter(|b| b.node_kind() == node.kind) {
                let descriptor = builder.build(context, node);
                trace!(
                    node = %node.id,
                    kind = %descriptor.kind,
                    name = %descriptor.name,
                    fields = descriptor.fields.len(),
                    "Built descriptor"
                );
                descriptors.push(descriptor);
            }
        }

        debug!(descriptors = descriptors.len(), "Backend descriptors built");
        descriptors
    }
}

impl Default for BackendGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Descriptor for a method declared on a diagram node
pub(crate) fn declared_method(method: &Method) -> MethodDescriptor {
    let return_type = if method.return_type.trim().is_empty() {
        "void".to_string()
    } else {
        java_type(&method.return_type)
    };
    let mut descriptor = MethodDescriptor::new(field_name(&method.name), return_type);
    descriptor.parameters = method
        .parameters
        .iter()
        .map(|p| ParameterDescriptor::new(field_name(&p.name), java_type(&p.type_name)))
        .collect();
    descriptor.is_abstract = method.is_abstract;
    descriptor.is_static = method.is_static;
    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DiagramAnalysis;
    use crate::core::{ProjectConfig, RelationshipType};
    use crate::model::{DiagramDatabase, Edge, Parameter};

    #[test]
    fn test_generator_output_order() {
        let database = DiagramDatabase::from_parts(
            vec![
                Node::class("c", "Customer"),
                Node::interface("i", "Auditable"),
                Node::enumeration("s", "Status").with_enum_value("ACTIVE"),
            ],
            vec![Edge::new("e1", "c", "i", RelationshipType::Realization)],
        )
        .unwrap();
        let analysis = DiagramAnalysis::analyze(&database);
        let config = ProjectConfig::new("com.example", "shop");
        let context = BuildContext::new(&analysis, &config);

        let descriptors = BackendGenerator::new().generate(&context);
        let summary: Vec<_> = descriptors
            .iter()
            .map(|d| (d.kind, d.name.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (DescriptorKind::Entity, "Customer"),
                (DescriptorKind::Dto, "CustomerDTO"),
                (DescriptorKind::Repository, "CustomerRepository"),
                (DescriptorKind::Service, "CustomerService"),
                (DescriptorKind::Controller, "CustomerController"),
                (DescriptorKind::Interface, "Auditable"),
                (DescriptorKind::Enum, "Status"),
            ]
        );
    }

    #[test]
    fn test_declared_method_types() {
        let method = Method::new("place order", "")
            .with_parameter(Parameter::new("Quantity", "int"));
        let descriptor = declared_method(&method);
        assert_eq!(descriptor.name, "placeOrder");
        assert_eq!(descriptor.return_type, "void");
        assert_eq!(descriptor.signature(), "placeOrder(Integer quantity)");
    }
}
