//! Classforge - Turn UML class diagrams into code generation descriptors
//!
//! Reads the JSON document of a class diagram editor, works out what every
//! relationship means for persistence (owning side, join column, cascade,
//! inverse side) and builds relationally consistent descriptors for a JPA
//! style backend (entity, DTO, repository, service, controller) and a
//! mobile client (model, provider, foreign key selectors).
//!
//! # Quick Start
//!
//! ```rust
//! use classforge::generate;
//!
//! let input = r#"{
//!     "nodes": [
//!         { "id": "c", "kind": "CLASS", "label": "Customer" },
//!         { "id": "o", "kind": "CLASS", "label": "Order" }
//!     ],
//!     "edges": [
//!         { "id": "e1", "sourceNodeId": "c", "targetNodeId": "o",
//!           "relationshipType": "ASSOCIATION",
//!           "sourceMultiplicity": "1", "targetMultiplicity": "*" }
//!     ]
//! }"#;
//!
//! let report = generate(input);
//! assert!(report.success);
//! assert!(report.file("src/main/java/com/example/demo/dto/OrderDTO.json").is_some());
//! ```
//!
//! # Advanced Usage
//!
//! For more control, run the stages yourself:
//!
//! ```rust
//! use classforge::prelude::*;
//!
//! let database = DiagramDatabase::from_parts(
//!     vec![Node::class("c", "Customer"), Node::class("o", "Order")],
//!     vec![Edge::new("e1", "c", "o", RelationshipType::Association).with_multiplicities("1", "*")],
//! )
//! .unwrap();
//!
//! // Classify relationships, resolve inheritance and attribute conflicts
//! let analysis = DiagramAnalysis::analyze(&database);
//! let order_end = analysis.relations().ends_for(&NodeId::from("o")).next().unwrap();
//! assert!(order_end.owning);
//!
//! // Build descriptors
//! let config = ProjectConfig::new("com.acme", "shop");
//! let context = BuildContext::new(&analysis, &config);
//! let descriptors = BackendGenerator::new().generate(&context);
//! let dto = descriptors.iter().find(|d| d.name == "OrderDTO").unwrap();
//! assert_eq!(dto.field_names(), vec!["id", "customerId"]);
//! ```

pub mod analysis;
pub mod core;
pub mod descriptor;
pub mod emit;
pub mod model;
pub mod plugins;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::analysis::{DiagramAnalysis, RelationEnd, RelationIndex};
    pub use crate::core::{
        Cardinality, Containment, DescriptorKind, Diagnostic, DiagnosticCode, Emitter,
        GraphStore, NodeKind, ProjectConfig, RelationshipType,
    };
    pub use crate::descriptor::{ClassDescriptor, ClientModelDescriptor, FieldDescriptor};
    pub use crate::emit::{JsonEmitter, OutlineEmitter};
    pub use crate::model::{Attribute, DiagramDatabase, Edge, GraphExtractor, Method, Node, NodeId};
    pub use crate::plugins::{
        BackendGenerator, BuildContext, ClientGenerator, GenerationReport, Orchestrator,
    };
}

/// Generate JSON descriptors for a diagram document
///
/// The simplest entry point: parses `input`, runs the whole pipeline with the
/// JSON emitter and returns the report. Never panics on bad input; a failed
/// run comes back with `success == false` and a single error message.
///
/// # Example
/// ```rust
/// let report = classforge::generate("not json");
/// assert!(!report.success);
/// assert!(report.files.is_empty());
/// ```
pub fn generate(input: &str) -> plugins::GenerationReport {
    plugins::Orchestrator::new().generate_str(input)
}

/// Build descriptors for a diagram document without emitting them
///
/// # Example
/// ```rust
/// let output = classforge::build(r#"{ "nodes": [{ "id": "a", "label": "Account" }] }"#).unwrap();
/// assert!(output.descriptor("AccountService").is_some());
/// ```
pub fn build(input: &str) -> anyhow::Result<plugins::GenerationOutput> {
    let document: serde_json::Value = serde_json::from_str(input)
        .map_err(|e| core::GenerationError::malformed_payload(e.to_string()))?;
    plugins::Orchestrator::new().build(&document)
}
