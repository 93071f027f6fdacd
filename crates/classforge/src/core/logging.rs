//! Logging for generation runs
//!
//! Structured logging through `tracing`. Every pipeline stage opens a span
//! (`extract`, `classify`, `resolve_inheritance`, `analyze`, `build_backend`,
//! `build_client`, `emit`) and every diagnostic is also logged as an event,
//! so a run can be followed at `debug` level without reading the report.
//!
//! # Usage
//!
//! ```rust,no_run
//! use classforge::core::logging::init_logging;
//!
//! // Level and format from the environment, else `info` / `compact`
//! init_logging(None, None).unwrap();
//! ```
//!
//! # Environment Variables
//!
//! - `CLASSFORGE_LOG_LEVEL`: log level or filter directive (trace|debug|info|warn|error|off)
//! - `RUST_LOG`: standard `tracing-subscriber` filter, used when the above is unset
//! - `CLASSFORGE_LOG_FORMAT`: compact|pretty|json
//!
//! Filters accept per-module directives:
//!
//! ```bash
//! # Relationship classification in detail, everything else at info
//! RUST_LOG="info,classforge::analysis::relationships=trace" classforge inspect -i diagram.json
//! ```
//!
//! # WASM
//!
//! On `wasm32` the browser console is the only sink; `tracing-wasm` is
//! installed and the format is ignored.

use std::fmt as std_fmt;
use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

#[cfg(target_arch = "wasm32")]
use tracing_wasm::WASMLayerConfig;

/// Environment variable holding the log level
pub const LEVEL_ENV: &str = "CLASSFORGE_LOG_LEVEL";

/// Environment variable holding the log format
pub const FORMAT_ENV: &str = "CLASSFORGE_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single line per event
    #[default]
    Compact,
    /// Multi-line with source locations and span events
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl std_fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Effective level directive: argument, then `CLASSFORGE_LOG_LEVEL`, then
/// `RUST_LOG`, then `info`
pub fn resolve_level(level: Option<&str>) -> String {
    level
        .map(|s| s.to_string())
        .or_else(|| std::env::var(LEVEL_ENV).ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "info".to_string())
}

/// Effective format: argument, then `CLASSFORGE_LOG_FORMAT`, then compact
pub fn resolve_format(format: Option<&str>) -> Result<LogFormat, String> {
    match format
        .map(|s| s.to_string())
        .or_else(|| std::env::var(FORMAT_ENV).ok())
    {
        Some(name) => LogFormat::from_str(&name).map_err(|e| format!("Invalid log format: {}", e)),
        None => Ok(LogFormat::default()),
    }
}

/// Install the global tracing subscriber
///
/// # Arguments
///
/// * `level` - level or filter directive; see [`resolve_level`]
/// * `format` - compact|pretty|json; see [`resolve_format`]
///
/// # Errors
///
/// Fails on an unknown format or when a global subscriber is already set.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = (level, format);
        tracing_wasm::set_as_global_default_with_config(WASMLayerConfig::default());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let log_level = resolve_level(level);
        let format = resolve_format(format)?;

        let filter = if log_level == "off" {
            EnvFilter::new("off")
        } else {
            EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"))
        };

        match format {
            LogFormat::Compact => {
                Registry::default()
                    .with(filter)
                    .with(
                        fmt::Layer::default()
                            .with_writer(std::io::stderr)
                            .with_target(false)
                            .with_level(true)
                            .with_file(false)
                            .with_line_number(false)
                            .with_span_events(FmtSpan::NONE),
                    )
                    .try_init()?;
            }
            LogFormat::Pretty => {
                Registry::default()
                    .with(filter)
                    .with(
                        fmt::Layer::default()
                            .with_writer(std::io::stderr)
                            .with_target(true)
                            .with_level(true)
                            .with_file(true)
                            .with_line_number(true)
                            .with_span_events(FmtSpan::ACTIVE)
                            .pretty(),
                    )
                    .try_init()?;
            }
            LogFormat::Json => {
                Registry::default()
                    .with(filter)
                    .with(
                        fmt::Layer::default()
                            .with_writer(std::io::stderr)
                            .with_target(true)
                            .with_level(true)
                            .with_file(true)
                            .with_line_number(true)
                            .with_span_events(FmtSpan::CLOSE)
                            .json(),
                    )
                    .try_init()?;
            }
        }

        Ok(())
    }
}

/// `init_logging(None, None)`
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
        assert_eq!(LogFormat::from_str("Pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str(" json ").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("xml").is_err());
    }

    #[test]
    fn test_log_format_round_trips_through_display() {
        for name in LogFormat::variants() {
            let format = LogFormat::from_str(name).unwrap();
            assert_eq!(&format.to_string(), name);
        }
    }

    #[test]
    fn test_explicit_arguments_win() {
        assert_eq!(resolve_level(Some("trace")), "trace");
        assert_eq!(resolve_format(Some("json")).unwrap(), LogFormat::Json);
        assert!(resolve_format(Some("yaml")).is_err());
    }
}
