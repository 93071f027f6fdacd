//! Shared state for descriptor builders

use crate::analysis::DiagramAnalysis;
use crate::core::{class_name, DescriptorKind, GraphStore, NodeKind, ProjectConfig};
use crate::model::Node;

/// Read-only inputs of one build pass: the analysed diagram and the
/// project configuration
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'s, 'a> {
    pub analysis: &'s DiagramAnalysis<'a>,
    pub config: &'s ProjectConfig,
}

impl<'s, 'a> BuildContext<'s, 'a> {
    pub fn new(analysis: &'s DiagramAnalysis<'a>, config: &'s ProjectConfig) -> Self {
        Self { analysis, config }
    }

    /// Package of a descriptor kind, e.g. `com.example.shop.dto`
    pub fn package(&self, kind: DescriptorKind) -> String {
        format!("{}.{}", self.config.base_package(), kind.package_segment())
    }

    /// Package of the mobile-client models
    pub fn client_package(&self) -> String {
        format!("{}.model", self.config.base_package())
    }

    /// The enum node an attribute type token names, if any
    pub fn enum_named(&self, type_token: &str) -> Option<&'a Node> {
        let wanted = class_name(type_token);
        self.analysis
            .database()
            .nodes()
            .find(|node| node.kind == NodeKind::Enum && class_name(&node.label) == wanted)
    }
}
