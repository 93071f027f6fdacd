//! Descriptor emitters
//!
//! Two emitters ship with the library: [`JsonEmitter`] serializes descriptors
//! for downstream template engines, [`OutlineEmitter`] prints an aligned
//! source-like skeleton for review.

mod json;
mod outline;

pub use json::JsonEmitter;
pub use outline::OutlineEmitter;

use crate::core::Emitter;

/// Look up an emitter by name (`json` or `outline`)
pub fn emitter_for(name: &str) -> Option<Box<dyn Emitter>> {
    match name.trim().to_lowercase().as_str() {
        "json" => Some(Box::new(JsonEmitter::new())),
        "outline" => Some(Box::new(OutlineEmitter::new())),
        _ => None,
    }
}

/// Names accepted by [`emitter_for`]
pub fn emitter_names() -> &'static [&'static str] {
    &["json", "outline"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitter_lookup() {
        for name in emitter_names() {
            let emitter = emitter_for(name).unwrap();
            assert_eq!(emitter.name(), *name);
        }
        assert_eq!(emitter_for(" JSON ").unwrap().extension(), "json");
        assert!(emitter_for("yaml").is_none());
    }
}
