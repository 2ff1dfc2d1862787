// Telemetry - phase timing, per-fake metrics and tiered reports

pub mod phase;
pub mod report;
pub mod summary;

pub use phase::{format_duration, PhaseId, PhaseMetrics, PhaseTracker};
pub use report::ReportFormatter;
pub use summary::{CompilationSummary, FakeMetrics, GenericPattern};
