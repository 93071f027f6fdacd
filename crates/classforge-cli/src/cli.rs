//! Command-line interface for the classforge utility
//!
//! Generates descriptor files from a class diagram document and inspects how
//! the engine reads a diagram's relationships.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::colorizer::{format_diagnostic, format_status};
use classforge::analysis::DiagramAnalysis;
use classforge::core::logging::init_logging;
use classforge::core::{Diagnostic, GraphStore, NodeKind, RelationshipType};
use classforge::emit::emitter_for;
use classforge::model::GraphExtractor;
use classforge::plugins::{GenerationReport, Orchestrator};

/// Classforge - Turn UML class diagrams into code generation descriptors
#[derive(Parser)]
#[command(name = "classforge")]
#[command(about = "Build backend and mobile-client class descriptors from a class diagram")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off); defaults to the environment, then info
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// When to use colors in diagnostics
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate descriptor files for a diagram
    Generate {
        /// Input diagram document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory; files are printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emitter used for file contents
        #[arg(short, long, value_enum, default_value_t = EmitterChoice::Json)]
        format: EmitterChoice,
    },

    /// Show how relationships were classified
    Inspect {
        /// Input diagram document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check that a diagram generates, and list its diagnostics
    Validate {
        /// Input diagram document (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show supported node kinds and relationship types
    Kinds {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Available emitters
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum EmitterChoice {
    /// Pretty-printed JSON descriptors
    #[default]
    Json,
    /// Aligned source-like outlines
    Outline,
}

impl EmitterChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmitterChoice::Json => "json",
            EmitterChoice::Outline => "outline",
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if stderr is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
pub struct ClassforgeApp {
    colorize: bool,
}

impl ClassforgeApp {
    /// Create a new application instance with plain output
    pub fn new() -> Self {
        Self { colorize: false }
    }

    fn should_colorize(color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                crossterm::tty::IsTty::is_tty(&std::io::stderr())
            }
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        let log_level = cli.log_level.map(|l| l.as_str());
        let log_format = cli.log_format.map(|f| f.as_str());
        if let Err(e) = init_logging(log_level, log_format) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        self.colorize = Self::should_colorize(cli.color);

        if cli.verbose {
            eprintln!("Classforge v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Generate {
                input,
                output,
                format,
            } => self.generate_command(input, output, format, cli.verbose),
            Commands::Inspect { input, json } => self.inspect_command(input, json, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
            Commands::Kinds { json } => self.kinds_command(json, cli.verbose),
        }
    }

    /// Handle the generate command
    fn generate_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        format: EmitterChoice,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let emitter = emitter_for(format.as_str())
            .ok_or_else(|| anyhow!("Unknown emitter: {}", format.as_str()))?;
        let report = Orchestrator::with_emitter(emitter).generate_str(&content);
        self.print_diagnostics(&report.diagnostics);

        if !report.success {
            let message = report.error.unwrap_or_else(|| "generation failed".to_string());
            eprintln!("{}", format_status(false, &message, self.colorize));
            return Err(anyhow!(message));
        }

        match output {
            Some(dir) => {
                self.write_files(&dir, &report)?;
                if verbose {
                    eprintln!("Wrote {} files to {}", report.files.len(), dir.display());
                }
            }
            None => {
                let mut stdout = io::stdout().lock();
                for file in &report.files {
                    writeln!(stdout, "==> {} <==", file.path)?;
                    write!(stdout, "{}", file.contents)?;
                    if !file.contents.ends_with('\n') {
                        writeln!(stdout)?;
                    }
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }

    /// Write every generated file below `dir`
    pub fn write_files(&self, dir: &Path, report: &GenerationReport) -> Result<()> {
        for file in &report.files {
            let path = dir.join(&file.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
            }
            fs::write(&path, &file.contents)
                .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
        }
        Ok(())
    }

    /// Handle the inspect command
    fn inspect_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let document: serde_json::Value =
            serde_json::from_str(&content).context("Malformed diagram payload")?;
        let extraction = GraphExtractor::new().extract(&document)?;
        let analysis = DiagramAnalysis::analyze(&extraction.database);
        let mut diagnostics = extraction.diagnostics.clone();
        diagnostics.extend(analysis.diagnostics().clone());

        if json {
            let value = serde_json::json!({
                "nodes": extraction.database.node_count(),
                "edges": extraction.database.edge_count(),
                "relations": analysis.relations().ends(),
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        let rows: Vec<[String; 7]> = analysis
            .relations()
            .ends()
            .iter()
            .map(|end| {
                [
                    end.edge_id.to_string(),
                    analysis.class_name(&end.node),
                    end.field_name.clone(),
                    end.type_name(),
                    end.cardinality.to_string(),
                    if end.owning { "owner" } else { "inverse" }.to_string(),
                    end.join_column
                        .clone()
                        .or_else(|| end.join_table.clone())
                        .or_else(|| end.mapped_by.as_ref().map(|m| format!("mappedBy={}", m)))
                        .unwrap_or_default(),
                ]
            })
            .collect();
        let header = ["EDGE", "CLASS", "FIELD", "TYPE", "CARDINALITY", "SIDE", "MAPPING"];
        let mut widths = header.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let render = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };
        println!("{}", render(&header.map(String::from)));
        for row in &rows {
            println!("{}", render(row));
        }
        println!();
        println!(
            "{} relationship fields, {} diagnostics",
            rows.len(),
            diagnostics.len()
        );
        self.print_diagnostics(&diagnostics.into_vec());
        Ok(())
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let report = Orchestrator::new().generate_str(&content);
        self.print_diagnostics(&report.diagnostics);
        if report.success {
            let warnings = report
                .diagnostics
                .iter()
                .filter(|d| d.severity == classforge::core::Severity::Warning)
                .count();
            println!(
                "{}",
                format_status(
                    true,
                    &format!(
                        "Valid diagram: {} files, {} warnings",
                        report.files.len(),
                        warnings
                    ),
                    self.colorize
                )
            );
            Ok(())
        } else {
            let message = report.error.unwrap_or_default();
            println!(
                "{}",
                format_status(false, &format!("Invalid diagram: {}", message), self.colorize)
            );
            Err(anyhow!(message))
        }
    }

    /// Handle the kinds command
    fn kinds_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing supported node kinds and relationship types");
        }

        if json {
            let kinds = serde_json::json!({
                "node_kinds": NodeKind::ALL.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
                "relationship_types": RelationshipType::ALL
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&kinds)?);
        } else {
            println!("Node kinds:");
            for kind in NodeKind::ALL {
                println!("  {}", kind);
            }
            println!();
            println!("Relationship types:");
            for relationship in RelationshipType::ALL {
                println!("  {}", relationship);
            }
        }

        Ok(())
    }

    fn print_diagnostics(&self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            eprintln!("{}", format_diagnostic(diagnostic, self.colorize));
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }
}

impl Default for ClassforgeApp {
    fn default() -> Self {
        Self::new()
    }
}
