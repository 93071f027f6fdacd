//! JSON emitter

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::Emitter;
use crate::descriptor::{ClassDescriptor, ClientModelDescriptor, ForeignKeySelector, ProviderCall};

/// Provider file contents
#[derive(Serialize)]
struct ProviderView<'a> {
    name: &'a str,
    model: &'a str,
    resource: &'a str,
    calls: &'a [ProviderCall],
    selectors: &'a [ForeignKeySelector],
}

/// Serializes descriptors as pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter {
    compact: bool,
}

impl JsonEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line output
    pub fn compact() -> Self {
        Self { compact: true }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        if self.compact {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        }
    }
}

impl Emitter for JsonEmitter {
    fn emit_class(&self, descriptor: &ClassDescriptor) -> Result<String> {
        self.to_json(descriptor)
            .with_context(|| format!("Failed to serialize {}", descriptor.qualified_name()))
    }

    fn emit_client_model(&self, model: &ClientModelDescriptor) -> Result<String> {
        self.to_json(model)
            .with_context(|| format!("Failed to serialize client model {}", model.name))
    }

    fn emit_provider(&self, model: &ClientModelDescriptor) -> Result<String> {
        let provider = ProviderView {
            name: &model.provider,
            model: &model.name,
            resource: &model.resource,
            calls: &model.calls,
            selectors: &model.selectors,
        };
        self.to_json(&provider)
            .with_context(|| format!("Failed to serialize provider {}", model.provider))
    }

    fn name(&self) -> &'static str {
        "json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
