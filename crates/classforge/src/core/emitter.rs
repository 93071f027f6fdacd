//! Core emitter trait for descriptor output
//!
//! Emitters turn finished descriptors into file contents. They are purely
//! mechanical: no emitter inspects the diagram or changes a descriptor.

use anyhow::Result;

use crate::descriptor::{ClassDescriptor, ClientModelDescriptor};

/// Core trait for descriptor emitters
///
/// # Example
/// ```
/// use classforge::core::{DescriptorKind, Emitter};
/// use classforge::descriptor::ClassDescriptor;
/// use classforge::emit::JsonEmitter;
///
/// let descriptor = ClassDescriptor::new("Order", "com.example.demo.entity", DescriptorKind::Entity);
/// let output = JsonEmitter::new().emit_class(&descriptor).unwrap();
/// assert!(output.contains("\"Order\""));
/// ```
pub trait Emitter: Send + Sync {
    /// Render one backend class descriptor
    fn emit_class(&self, descriptor: &ClassDescriptor) -> Result<String>;

    /// Render the data model half of a client model descriptor
    fn emit_client_model(&self, model: &ClientModelDescriptor) -> Result<String>;

    /// Render the provider half (CRUD calls and foreign key selectors)
    fn emit_provider(&self, model: &ClientModelDescriptor) -> Result<String>;

    /// Get the name of this emitter
    fn name(&self) -> &'static str;

    /// File extension of emitted backend files
    fn extension(&self) -> &'static str;

    /// File extension of emitted client files
    fn client_extension(&self) -> &'static str {
        self.extension()
    }
}
