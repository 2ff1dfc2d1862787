//! Per-compilation aggregates.

use serde::{Deserialize, Serialize};

use super::phase::PhaseMetrics;
use crate::metadata::TypeParameterInfo;

/// Shape of a subject's generic parameter list, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenericPattern {
    NonGeneric,
    Generic,
    BoundedGeneric,
}

impl GenericPattern {
    pub fn classify(type_parameters: &[TypeParameterInfo]) -> Self {
        if type_parameters.is_empty() {
            GenericPattern::NonGeneric
        } else if type_parameters.iter().any(|tp| !tp.bounds.is_empty()) {
            GenericPattern::BoundedGeneric
        } else {
            GenericPattern::Generic
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenericPattern::NonGeneric => "plain",
            GenericPattern::Generic => "generic",
            GenericPattern::BoundedGeneric => "bounded generic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FakeMetrics {
    pub name: String,
    pub pattern: GenericPattern,
    pub member_count: usize,
    pub line_count: usize,
    pub byte_count: usize,
    pub import_count: usize,
}

impl FakeMetrics {
    pub fn measure(
        name: &str,
        type_parameters: &[TypeParameterInfo],
        member_count: usize,
        content: &str,
        import_count: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            pattern: GenericPattern::classify(type_parameters),
            member_count,
            line_count: content.lines().count(),
            byte_count: content.len(),
            import_count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilationSummary {
    pub total_time_nanos: u64,
    pub interfaces_discovered: usize,
    pub interfaces_processed: usize,
    pub interfaces_cached: usize,
    pub classes_discovered: usize,
    pub classes_processed: usize,
    pub classes_cached: usize,
    pub phases: Vec<PhaseMetrics>,
    pub fakes: Vec<FakeMetrics>,
    pub total_lines: usize,
    pub total_files: usize,
    pub total_bytes: usize,
    /// Front-end time a consumed cache saved, from its stored records.
    pub saved_frontend_time_nanos: u64,
}

impl CompilationSummary {
    pub fn fake_count(&self) -> usize {
        self.fakes.len()
    }

    pub fn add_fake(&mut self, metrics: FakeMetrics) {
        self.total_lines += metrics.line_count;
        self.total_bytes += metrics.byte_count;
        self.total_files += 1;
        self.fakes.push(metrics);
    }
}
