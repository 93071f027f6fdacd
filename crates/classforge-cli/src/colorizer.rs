//! Terminal colorization for diagnostics and status lines
//!
//! Applies ANSI escape codes using crossterm.

use crossterm::style::{Color, Stylize};

use classforge::core::{Diagnostic, Severity};

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Cyan,
    }
}

/// Format one diagnostic line
///
/// - Severity: yellow for warnings, cyan for info
/// - Code: bold
/// - Subject and message: default terminal color
pub fn format_diagnostic(diagnostic: &Diagnostic, colorize: bool) -> String {
    if !colorize {
        return diagnostic.to_string();
    }
    format!(
        "{} [{}] {}: {}",
        diagnostic
            .severity
            .to_string()
            .with(severity_color(diagnostic.severity)),
        diagnostic.code.to_string().bold(),
        diagnostic.subject,
        diagnostic.message
    )
}

/// Format a `✓`/`✗` status line
pub fn format_status(ok: bool, message: &str, colorize: bool) -> String {
    let (mark, color) = if ok {
        ("✓", Color::Green)
    } else {
        ("✗", Color::Red)
    };
    if colorize {
        format!("{} {}", mark.with(color), message)
    } else {
        format!("{} {}", mark, message)
    }
}
