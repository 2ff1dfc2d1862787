use std::fmt;

use serde::{Deserialize, Serialize};

use super::code::DiagnosticCode;
use super::severity::DiagnosticSeverity;
use super::source_location::SourceLocation;

/// A diagnostic message (error, warning or info)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub location: Option<SourceLocation>,
    /// Fully-qualified name of the declaration the diagnostic is about.
    pub declaration: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            message: message.into(),
            location: None,
            declaration: None,
        }
    }

    /// Create diagnostic with default message
    pub fn with_default_message(code: DiagnosticCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn for_declaration(mut self, fqn: impl Into<String>) -> Self {
        self.declaration = Some(fqn.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.code.as_str(), self.severity, self.message)?;
        if let Some(declaration) = &self.declaration {
            write!(f, " [{}]", declaration)?;
        }
        if let Some(location) = &self.location {
            write!(f, " at {}", location)?;
        }
        Ok(())
    }
}
