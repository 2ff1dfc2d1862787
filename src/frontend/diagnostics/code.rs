use serde::{Deserialize, Serialize};

use super::severity::DiagnosticSeverity;

/// Stable diagnostic codes reported through the host's channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    AnnotationOnUnsupportedKind,
    AnnotationOnFinalClassWithoutOverrides,
    DuplicateAnnotatedName,
    UnresolvableDefault,
    UniversalMemberSkipped,
    ExtractionFailed,
    InvalidConfiguration,
    EmissionFailed,
    UnknownOption,
    SyntaxError,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::AnnotationOnUnsupportedKind => "FAKT001",
            DiagnosticCode::AnnotationOnFinalClassWithoutOverrides => "FAKT002",
            DiagnosticCode::DuplicateAnnotatedName => "FAKT003",
            DiagnosticCode::UnresolvableDefault => "FAKT004",
            DiagnosticCode::UniversalMemberSkipped => "FAKT005",
            DiagnosticCode::ExtractionFailed => "FAKT006",
            DiagnosticCode::InvalidConfiguration => "FAKT007",
            DiagnosticCode::EmissionFailed => "FAKT008",
            DiagnosticCode::UnknownOption => "FAKT009",
            DiagnosticCode::SyntaxError => "FAKT010",
        }
    }

    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            DiagnosticCode::AnnotationOnUnsupportedKind
            | DiagnosticCode::AnnotationOnFinalClassWithoutOverrides
            | DiagnosticCode::ExtractionFailed
            | DiagnosticCode::InvalidConfiguration
            | DiagnosticCode::EmissionFailed
            | DiagnosticCode::SyntaxError => DiagnosticSeverity::Error,
            DiagnosticCode::DuplicateAnnotatedName
            | DiagnosticCode::UnresolvableDefault
            | DiagnosticCode::UnknownOption => DiagnosticSeverity::Warning,
            DiagnosticCode::UniversalMemberSkipped => DiagnosticSeverity::Info,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            DiagnosticCode::AnnotationOnUnsupportedKind => {
                "fake annotation is only supported on interfaces and open or abstract classes"
            }
            DiagnosticCode::AnnotationOnFinalClassWithoutOverrides => {
                "annotated class has no overridable members"
            }
            DiagnosticCode::DuplicateAnnotatedName => {
                "another annotated declaration with the same fully-qualified name exists"
            }
            DiagnosticCode::UnresolvableDefault => {
                "no default value could be derived for the member type; configuring it is mandatory"
            }
            DiagnosticCode::UniversalMemberSkipped => {
                "user-declared override of a universal member is excluded from the fake"
            }
            DiagnosticCode::ExtractionFailed => "metadata extraction failed for the declaration",
            DiagnosticCode::InvalidConfiguration => "invalid plugin configuration",
            DiagnosticCode::EmissionFailed => "failed to write the generated fake",
            DiagnosticCode::UnknownOption => "unknown plugin option",
            DiagnosticCode::SyntaxError => "could not parse the source file",
        }
    }
}
