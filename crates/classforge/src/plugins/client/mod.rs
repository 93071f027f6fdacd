//! Mobile-client target
//!
//! Builds one [`ClientModelDescriptor`] per CLASS node from the same DTO
//! fields and foreign keys the backend exposes.

use tracing::{debug, span, Level};

use crate::core::{class_name, resource_path};
use crate::descriptor::{display_field, provider_name, ClientModelDescriptor, ForeignKeySelector};
use crate::plugins::backend::types::java_type;
use crate::plugins::backend::{foreign_key_ends, DescriptorBuilder, DtoBuilder};
use crate::plugins::BuildContext;

/// Builds client models, providers and foreign key selectors
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientGenerator {
    dto: DtoBuilder,
}

impl ClientGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self, context: &BuildContext<'_, '_>) -> Vec<ClientModelDescriptor> {
        let build_span = span!(Level::INFO, "build_client");
        let _enter = build_span.enter();

        let analysis = context.analysis;
        let mut models = Vec::new();
        for node in analysis.database().classes() {
            let name = class_name(&node.label);
            let dto = self.dto.build(context, node);
            let mut model = ClientModelDescriptor::from_dto(
                &name,
                context.client_package(),
                resource_path(&name),
                &dto,
            );

            for end in foreign_key_ends(analysis, &node.id) {
                let related: Vec<(String, String)> = analysis
                    .chain_attributes(&end.related)
                    .iter()
                    .map(|a| (a.name.clone(), java_type(&a.type_name)))
                    .collect();
                model.selectors.push(ForeignKeySelector {
                    field: end.foreign_key_field(),
                    related_class: end.related_class.clone(),
                    provider: provider_name(&end.related_class),
                    display_field: display_field(
                        related.iter().map(|(n, t)| (n.as_str(), t.as_str())),
                    ),
                    required: end.required,
                });
            }
            models.push(model);
        }

        debug!(models = models.len(), "Client models built");
        models
    }
}
