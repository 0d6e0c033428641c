use std::fmt;

/// What went wrong. Every diagnostic is a warning: none of them stops a
/// generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A route marker with missing or ill-typed constructor arguments.
    MalformedRouteMarker,
    /// A verb string in a multi-verb marker that is not an HTTP method.
    UnknownVerb,
    /// An attribute deriving from the single-verb base that has no verb table entry.
    UnknownVerbMarker,
    /// A parameter or return type that failed to resolve.
    UnresolvedType,
    /// More than one request-context parameter on a handler.
    DuplicateContextParameter,
    /// An artifact could not be written to the output directory.
    PersistFailed,
}

impl DiagnosticKind {
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::MalformedRouteMarker => "RG001",
            DiagnosticKind::UnknownVerb => "RG002",
            DiagnosticKind::UnknownVerbMarker => "RG003",
            DiagnosticKind::UnresolvedType => "RG004",
            DiagnosticKind::DuplicateContextParameter => "RG005",
            DiagnosticKind::PersistFailed => "RG100",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// `Type::method` for declaration problems, a file path for persistence.
    pub location: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: location.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "warning[{}]: {} ({})",
            self.kind.code(),
            self.message,
            self.location
        )
    }
}
