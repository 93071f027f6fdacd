//! Core error types for class generation
//!
//! Only configuration-level and payload-level problems are errors. Per-node and
//! per-edge problems are recovered locally and reported as diagnostics instead.

use thiserror::Error;

/// Errors that abort a whole generation run
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Malformed diagram payload: {message}")]
    MalformedPayload { message: String },

    #[error("Emit error in {file}: {message}")]
    Emit { file: String, message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl GenerationError {
    /// Create a new configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new payload error
    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Create a new emit error for a given output file
    pub fn emit(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Emit {
            file: file.into(),
            message: message.into(),
        }
    }
}
