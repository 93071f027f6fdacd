//! Generation orchestrator
//!
//! Runs one generation pass end to end:
//! extract config → extract graph → analyse → build descriptors → emit.
//!
//! A run is atomic: [`Orchestrator::generate`] reports either the complete
//! file list or a single error message, never a partial result. Per-node and
//! per-edge problems do not fail the run; they travel as diagnostics.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, span, warn, Level};

use crate::analysis::DiagramAnalysis;
use crate::core::{Diagnostic, Diagnostics, Emitter, GraphStore, ProjectConfig};
use crate::descriptor::{ClassDescriptor, ClientModelDescriptor};
use crate::emit::JsonEmitter;
use crate::model::{DiagramDatabase, GraphExtractor};
use crate::plugins::{BackendGenerator, BuildContext, ClientGenerator};

/// One emitted file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// Project-relative path, e.g. `src/main/java/com/example/demo/entity/Order.json`
    pub path: String,
    pub contents: String,
}

/// Descriptors of one run, before emission
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub config: ProjectConfig,
    pub descriptors: Vec<ClassDescriptor>,
    pub client_models: Vec<ClientModelDescriptor>,
    pub diagnostics: Diagnostics,
}

impl GenerationOutput {
    /// Descriptor by simple class name, e.g. `OrderService`
    pub fn descriptor(&self, name: &str) -> Option<&ClassDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn client_model(&self, name: &str) -> Option<&ClientModelDescriptor> {
        self.client_models.iter().find(|m| m.name == name)
    }
}

/// Caller-facing outcome of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub success: bool,
    pub files: Vec<GeneratedFile>,
    pub error: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    pub fn succeeded(files: Vec<GeneratedFile>, diagnostics: Diagnostics) -> Self {
        Self {
            success: true,
            files,
            error: None,
            diagnostics: diagnostics.into_vec(),
        }
    }

    /// A failed run: no files and exactly one message
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            files: Vec::new(),
            error: Some(error.into()),
            diagnostics: Vec::new(),
        }
    }

    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Serialize the report for the editor
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({
                "success": false,
                "files": [],
                "error": format!("Failed to serialize report: {}", e),
                "diagnostics": [],
            })
            .to_string()
        })
    }
}

/// Coordinates extraction, analysis, descriptor building and emission
pub struct Orchestrator {
    extractor: GraphExtractor,
    backend: BackendGenerator,
    client: ClientGenerator,
    emitter: Box<dyn Emitter>,
}

impl Orchestrator {
    /// Orchestrator emitting JSON descriptors
    pub fn new() -> Self {
        Self::with_emitter(Box::new(JsonEmitter::new()))
    }

    pub fn with_emitter(emitter: Box<dyn Emitter>) -> Self {
        Self {
            extractor: GraphExtractor::new(),
            backend: BackendGenerator::new(),
            client: ClientGenerator::new(),
            emitter,
        }
    }

    /// Replace the backend builder set
    pub fn with_backend(mut self, backend: BackendGenerator) -> Self {
        self.backend = backend;
        self
    }

    pub fn emitter(&self) -> &dyn Emitter {
        self.emitter.as_ref()
    }

    /// Build every descriptor of a diagram document
    ///
    /// Fails only when the document is not a diagram or the configuration is
    /// invalid.
    pub fn build(&self, document: &Value) -> Result<GenerationOutput> {
        let config = self
            .extractor
            .extract_config(document)
            .context("Invalid project configuration")?;
        let extraction = self
            .extractor
            .extract(document)
            .context("Failed to read diagram")?;

        let mut output = self.build_database(config, &extraction.database);
        let mut diagnostics = extraction.diagnostics;
        diagnostics.extend(std::mem::take(&mut output.diagnostics));
        output.diagnostics = diagnostics;
        Ok(output)
    }

    /// Build every descriptor of an already extracted diagram
    pub fn build_database(
        &self,
        config: ProjectConfig,
        database: &DiagramDatabase,
    ) -> GenerationOutput {
        let build_span = span!(
            Level::INFO,
            "build_descriptors",
            nodes = database.node_count(),
            edges = database.edge_count()
        );
        let _enter = build_span.enter();

        let analysis = DiagramAnalysis::analyze(database);
        let context = BuildContext::new(&analysis, &config);
        let descriptors = self.backend.generate(&context);
        let client_models = if config.emit_client {
            self.client.generate(&context)
        } else {
            Vec::new()
        };
        let diagnostics = analysis.diagnostics().clone();

        info!(
            descriptors = descriptors.len(),
            client_models = client_models.len(),
            warnings = diagnostics.warning_count(),
            "Descriptors built"
        );
        GenerationOutput {
            config,
            descriptors,
            client_models,
            diagnostics,
        }
    }

    /// Render built descriptors to files
    pub fn emit(&self, output: &GenerationOutput) -> Result<Vec<GeneratedFile>> {
        let emit_span = span!(Level::INFO, "emit", emitter = self.emitter.name());
        let _enter = emit_span.enter();

        let mut files =
            Vec::with_capacity(output.descriptors.len() + output.client_models.len() * 2);
        for descriptor in &output.descriptors {
            let path = descriptor.file_path(self.emitter.extension());
            let contents = self
                .emitter
                .emit_class(descriptor)
                .with_context(|| format!("Failed to emit {}", path))?;
            debug!(path = %path, bytes = contents.len(), "Emitted class");
            files.push(GeneratedFile { path, contents });
        }

        let extension = self.emitter.client_extension();
        for model in &output.client_models {
            let contents = self
                .emitter
                .emit_client_model(model)
                .with_context(|| format!("Failed to emit client model {}", model.name))?;
            files.push(GeneratedFile {
                path: model.model_path(extension),
                contents,
            });
            let contents = self
                .emitter
                .emit_provider(model)
                .with_context(|| format!("Failed to emit provider {}", model.provider))?;
            files.push(GeneratedFile {
                path: model.provider_path(extension),
                contents,
            });
            debug!(model = %model.name, "Emitted client model and provider");
        }

        Ok(files)
    }

    /// Run a complete generation pass over a diagram document
    pub fn generate(&self, document: &Value) -> GenerationReport {
        let generate_span = span!(Level::INFO, "generate");
        let _enter = generate_span.enter();

        let result = self
            .build(document)
            .and_then(|output| Ok((self.emit(&output)?, output.diagnostics)));
        match result {
            Ok((files, diagnostics)) => {
                info!(files = files.len(), "Generation succeeded");
                GenerationReport::succeeded(files, diagnostics)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                warn!(error = %message, "Generation failed");
                GenerationReport::failed(message)
            }
        }
    }

    /// [`Orchestrator::generate`] over JSON text
    pub fn generate_str(&self, input: &str) -> GenerationReport {
        match serde_json::from_str::<Value>(input) {
            Ok(document) => self.generate(&document),
            Err(e) => {
                warn!(error = %e, "Input is not valid JSON");
                GenerationReport::failed(format!("Malformed diagram payload: {}", e))
            }
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}
