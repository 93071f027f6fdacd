//! Structured diagnostics collected during a generation run
//!
//! Recoverable problems (dropped attributes, skipped edges, renamed fields)
//! are recorded here and returned alongside the result so callers can audit
//! them. Every recorded entry is also emitted as a tracing event.

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Machine-readable diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    /// Attribute named `id`, `createdAt` or `updatedAt` was discarded
    ReservedAttributeDropped,
    /// Attribute collided with a relationship-derived field and was discarded
    AttributeShadowedByRelation,
    /// Attribute repeated an earlier attribute name and was discarded
    DuplicateAttributeDropped,
    /// Edge referenced a node id missing from the diagram
    MissingNode,
    /// Edge was the reverse declaration of an earlier edge
    MirrorEdgeMerged,
    /// Reverse edge of the same type between the same pair that did not
    /// merge, because labels or multiplicities differ
    ReverseEdgeNotMerged,
    /// Relationship field renamed to keep field names unique
    RelationFieldRenamed,
    /// Relationship end is not a class (or an enum target) and was skipped
    UnsupportedRelationEnd,
    /// Class declared more than one superclass
    MultipleSuperclasses,
    /// Superclass chain loops back on itself
    InheritanceCycle,
    /// Realization edge does not target an interface
    InvalidRealization,
    /// Node payload could not be read and was treated as an empty class
    MalformedNode,
    /// Edge payload could not be read and was skipped
    MalformedEdge,
    /// Many-to-many composition treated as aggregation
    CompositionDowngraded,
}

impl DiagnosticCode {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticCode::MirrorEdgeMerged | DiagnosticCode::ReservedAttributeDropped => {
                Severity::Info
            }
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticCode::ReservedAttributeDropped => "reserved-attribute-dropped",
            DiagnosticCode::AttributeShadowedByRelation => "attribute-shadowed-by-relation",
            DiagnosticCode::DuplicateAttributeDropped => "duplicate-attribute-dropped",
            DiagnosticCode::MissingNode => "missing-node",
            DiagnosticCode::MirrorEdgeMerged => "mirror-edge-merged",
            DiagnosticCode::ReverseEdgeNotMerged => "reverse-edge-not-merged",
            DiagnosticCode::RelationFieldRenamed => "relation-field-renamed",
            DiagnosticCode::UnsupportedRelationEnd => "unsupported-relation-end",
            DiagnosticCode::MultipleSuperclasses => "multiple-superclasses",
            DiagnosticCode::InheritanceCycle => "inheritance-cycle",
            DiagnosticCode::InvalidRealization => "invalid-realization",
            DiagnosticCode::MalformedNode => "malformed-node",
            DiagnosticCode::MalformedEdge => "malformed-edge",
            DiagnosticCode::CompositionDowngraded => "composition-downgraded",
        };
        f.write_str(name)
    }
}

/// A single recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    /// Id of the node or edge the diagnostic is about
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.code, self.subject, self.message
        )
    }
}

/// Ordered list of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and emit it as a tracing event
    pub fn push(
        &mut self,
        code: DiagnosticCode,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            severity: code.severity(),
            code,
            subject: subject.into(),
            message: message.into(),
        };
        match diagnostic.severity {
            Severity::Warning => warn!(
                code = %diagnostic.code,
                subject = %diagnostic.subject,
                "{}",
                diagnostic.message
            ),
            Severity::Info => debug!(
                code = %diagnostic.code,
                subject = %diagnostic.subject,
                "{}",
                diagnostic.message
            ),
        }
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Diagnostics carrying the given code
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.code == code)
    }

    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.with_code(code).next().is_some()
    }

    pub fn warning_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_query() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(DiagnosticCode::MissingNode, "e1", "target n9 not found");
        diagnostics.push(DiagnosticCode::MirrorEdgeMerged, "e2", "merged into e1");

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.has_code(DiagnosticCode::MissingNode));
        assert!(!diagnostics.has_code(DiagnosticCode::InheritanceCycle));
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn test_display() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(
            DiagnosticCode::AttributeShadowedByRelation,
            "order",
            "attribute `customerId` replaced by relationship field `customer`",
        );
        let line = diagnostics.iter().next().unwrap().to_string();
        assert!(line.starts_with("warning [attribute-shadowed-by-relation] order:"));
    }

    #[test]
    fn test_serializes_as_list() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(DiagnosticCode::MalformedEdge, "e3", "missing source");
        let json = serde_json::to_value(&diagnostics).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["code"], "MALFORMED_EDGE");
        assert_eq!(json[0]["severity"], "warning");
    }
}
