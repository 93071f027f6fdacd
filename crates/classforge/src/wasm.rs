//! WebAssembly bindings for Classforge
//!
//! The diagram editor calls into the engine through these functions. Every
//! call returns the JSON-serialized [`GenerationReport`]; failures are carried
//! in the report, never thrown.

use wasm_bindgen::prelude::*;

use crate::emit::emitter_for;
use crate::plugins::{GenerationReport, Orchestrator};

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

/// Generate JSON descriptors for a diagram document
///
/// # Returns
/// * JSON string with fields: success, files, error, diagnostics
#[wasm_bindgen]
pub fn generate_json(input: &str) -> String {
    Orchestrator::new().generate_str(input).to_json()
}

/// Generate with a named emitter (`json` or `outline`)
#[wasm_bindgen]
pub fn generate_with_emitter(input: &str, emitter: &str) -> String {
    match emitter_for(emitter) {
        Some(emitter) => Orchestrator::with_emitter(emitter).generate_str(input).to_json(),
        None => GenerationReport::failed(format!(
            "Unknown emitter: {}. Use 'json' or 'outline'",
            emitter
        ))
        .to_json(),
    }
}
