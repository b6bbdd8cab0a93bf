use serde::Serialize;
use std::fmt;

/// A recoverable anomaly met while building the type graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Identity of the affected type
    pub identity: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Not expanded because the maximum resolution depth was reached
    DepthExceeded { depth: usize },
    /// Matched an exclusion pattern
    Excluded,
    /// Declaration could not be found in its loaded package
    NotFound,
    /// The declaring package is not part of the loaded packages
    PackageNotLoaded { package: String },
    AnonymousRecord,
    /// Interface declaring methods
    UnsupportedInterface,
    /// Type expression the provider could not resolve
    InvalidType,
    /// Inlined field whose target has no registered node
    MissingInlineTarget { field: String },
    /// Inlining stopped before every inlined field was spliced
    UnresolvedInlines { remaining: usize },
}

impl Diagnostic {
    pub fn new(identity: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            identity: identity.into(),
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::DepthExceeded { depth } => {
                write!(f, "{}: maximum depth reached at {depth}", self.identity)
            }
            DiagnosticKind::Excluded => write!(f, "{}: excluded", self.identity),
            DiagnosticKind::NotFound => write!(f, "{}: declaration not found", self.identity),
            DiagnosticKind::PackageNotLoaded { package } => {
                write!(f, "{}: package {package} is not loaded", self.identity)
            }
            DiagnosticKind::AnonymousRecord => {
                write!(f, "{}: anonymous structs are not supported", self.identity)
            }
            DiagnosticKind::UnsupportedInterface => {
                write!(f, "{}: non-empty interfaces are not supported", self.identity)
            }
            DiagnosticKind::InvalidType => write!(f, "{}: invalid type", self.identity),
            DiagnosticKind::MissingInlineTarget { field } => {
                write!(f, "{}: inlined field {field} has no loaded type", self.identity)
            }
            DiagnosticKind::UnresolvedInlines { remaining } => {
                write!(f, "{}: {remaining} inlined fields left unresolved", self.identity)
            }
        }
    }
}
