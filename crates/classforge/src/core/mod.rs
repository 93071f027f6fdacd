//! Core abstractions shared by every stage
//!
//! Storage and emitter traits, closed type variants, configuration, naming
//! helpers, diagnostics and errors.

mod config;
mod database;
mod diagnostics;
mod emitter;
mod error;
pub mod logging;
mod naming;
mod types;

pub use config::*;
pub use database::*;
pub use diagnostics::*;
pub use emitter::*;
pub use error::*;
pub use logging::*;
pub use naming::*;
pub use types::*;
