//! Generation targets
//!
//! Each target turns the analysed diagram into its own descriptor set: the
//! backend target builds class descriptors, the client target builds the
//! mobile-client mapping. The orchestrator runs the whole pipeline.

pub mod backend;
pub mod client;
mod context;
pub mod orchestrator;

pub use backend::*;
pub use client::*;
pub use context::BuildContext;
pub use orchestrator::*;
