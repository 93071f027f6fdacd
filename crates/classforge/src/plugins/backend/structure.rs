//! Interface and enum descriptors

use std::collections::HashSet;

use crate::core::{class_name, constant_name, field_name, DescriptorKind, NodeKind};
use crate::descriptor::{ClassDescriptor, FieldDescriptor};
use crate::model::Node;
use crate::plugins::BuildContext;

use super::types::{java_type, literal};
use super::{declared_method, DescriptorBuilder};

/// Builds signature-only interface descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceBuilder;

impl InterfaceBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorBuilder for InterfaceBuilder {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Interface
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Interface
    }

    fn build(&self, context: &BuildContext<'_, '_>, node: &Node) -> ClassDescriptor {
        let analysis = context.analysis;
        let mut descriptor = ClassDescriptor::new(
            class_name(&node.label),
            context.package(DescriptorKind::Interface),
            DescriptorKind::Interface,
        );
        descriptor.interfaces = analysis
            .hierarchy()
            .super_interfaces(&node.id)
            .iter()
            .map(|id| analysis.class_name(id))
            .collect();

        // Interfaces hold constants only
        for attribute in &node.attributes {
            let Some(value) = attribute.default_value.as_deref() else {
                continue;
            };
            let type_name = java_type(&attribute.type_name);
            let name = if attribute.is_final || attribute.is_static {
                constant_name(&attribute.name)
            } else {
                field_name(&attribute.name)
            };
            if descriptor.has_field(&name) {
                continue;
            }
            descriptor.fields.push(
                FieldDescriptor::new(name, &type_name)
                    .with_initializer(literal(&type_name, value))
                    .constant(),
            );
        }

        for method in &node.methods {
            let mut method = declared_method(method);
            method.is_abstract = !method.is_static;
            descriptor.methods.push(method);
        }

        descriptor
    }
}

/// Builds enum descriptors whose fields are the literal values
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumBuilder;

impl EnumBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorBuilder for EnumBuilder {
    fn kind(&self) -> DescriptorKind {
        DescriptorKind::Enum
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Enum
    }

    fn build(&self, context: &BuildContext<'_, '_>, node: &Node) -> ClassDescriptor {
        let name = class_name(&node.label);
        let mut descriptor = ClassDescriptor::new(
            &name,
            context.package(DescriptorKind::Enum),
            DescriptorKind::Enum,
        );

        let mut seen = HashSet::new();
        for value in &node.enum_values {
            let constant = constant_name(value);
            if seen.insert(constant.clone()) {
                descriptor.fields.push(FieldDescriptor::new(constant, &name).constant());
            }
        }
        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DiagramAnalysis;
    use crate::core::{ProjectConfig, RelationshipType};
    use crate::model::{Attribute, DiagramDatabase, Edge, Method, NodeId, Parameter};

    fn build(builder: &dyn DescriptorBuilder, database: &DiagramDatabase, node: &str) -> ClassDescriptor {
        let analysis = DiagramAnalysis::analyze(database);
        let config = ProjectConfig::default();
        let context = BuildContext::new(&analysis, &config);
        builder.build(&context, database.get(&NodeId::from(node)).unwrap())
    }

    #[test]
    fn test_interface_signatures_and_constants() {
        let database = DiagramDatabase::from_parts(
            vec![
                Node::interface("p", "Payable")
                    .with_attribute(Attribute::new("max retries", "Integer").as_final().with_default("3"))
                    .with_attribute(Attribute::new("state", "String"))
                    .with_method(Method::new("pay", "Boolean").with_parameter(Parameter::new("amount", "Double"))),
                Node::interface("b", "Billable"),
            ],
            vec![Edge::new("e1", "p", "b", RelationshipType::Inheritance)],
        )
        .unwrap();

        let payable = build(&InterfaceBuilder::new(), &database, "p");
        assert_eq!(payable.kind, DescriptorKind::Interface);
        assert_eq!(payable.interfaces, vec!["Billable"]);
        assert_eq!(payable.field_names(), vec!["MAX_RETRIES"]);
        let constant = payable.field("MAX_RETRIES").unwrap();
        assert!(constant.is_static && constant.is_final);
        assert_eq!(constant.initializer.as_deref(), Some("3"));
        let pay = payable.method("pay").unwrap();
        assert!(pay.is_abstract);
        assert_eq!(pay.signature(), "pay(Double amount)");
    }

    #[test]
    fn test_enum_literals_deduplicated() {
        let database = DiagramDatabase::from_parts(
            vec![Node::enumeration("s", "order status")
                .with_enum_value("PENDING")
                .with_enum_value("in progress")
                .with_enum_value("pending")],
            vec![],
        )
        .unwrap();
        let status = build(&EnumBuilder::new(), &database, "s");
        assert_eq!(status.name, "OrderStatus");
        assert_eq!(status.field_names(), vec!["PENDING", "IN_PROGRESS"]);
        assert_eq!(status.field("PENDING").unwrap().type_name, "OrderStatus");
    }
}
