//! Diagram graph model and extraction
//!
//! [`GraphExtractor`] reads the editor's JSON document into a
//! [`DiagramDatabase`]; everything downstream works on the typed graph.

mod diagram;
mod extractor;

pub use diagram::*;
pub use extractor::*;
