//! Tiered report rendering.

use std::fmt::Write as _;

use super::phase::{format_duration, PhaseMetrics};
use super::summary::CompilationSummary;
use crate::options::LogLevel;

#[derive(Debug, Default)]
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Success line(s) for the given level. Empty at QUIET or when no
    /// fakes were produced.
    pub fn success_message(&self, summary: &CompilationSummary, level: LogLevel) -> String {
        if level == LogLevel::Quiet || summary.fake_count() == 0 {
            return String::new();
        }
        let headline = format!(
            "✅ {} fakes generated in {}",
            summary.fake_count(),
            format_duration(summary.total_time_nanos)
        );
        match level {
            LogLevel::Quiet => String::new(),
            LogLevel::Info => headline,
            LogLevel::Debug => {
                let mut out = headline;
                out.push('\n');
                let _ = write!(
                    out,
                    "   discovery: {} interfaces ({} cached), {} classes ({} cached)\n   generation: {} files, {} lines, {} bytes",
                    summary.interfaces_discovered,
                    summary.interfaces_cached,
                    summary.classes_discovered,
                    summary.classes_cached,
                    summary.total_files,
                    summary.total_lines,
                    summary.total_bytes,
                );
                if summary.saved_frontend_time_nanos > 0 {
                    let _ = write!(
                        out,
                        "\n   cache saved {}",
                        format_duration(summary.saved_frontend_time_nanos)
                    );
                }
                out
            }
            LogLevel::Trace => {
                let mut out = self.success_message(summary, LogLevel::Debug);
                for phase in &summary.phases {
                    push_phase(&mut out, phase, 1);
                }
                if !summary.fakes.is_empty() {
                    out.push_str("\n   fakes:");
                    for fake in &summary.fakes {
                        let _ = write!(
                            out,
                            "\n      {} [{}] {} members, {} lines, {} bytes, {} imports",
                            fake.name,
                            fake.pattern.label(),
                            fake.member_count,
                            fake.line_count,
                            fake.byte_count,
                            fake.import_count,
                        );
                    }
                }
                out
            }
        }
    }
}

fn push_phase(out: &mut String, phase: &PhaseMetrics, depth: usize) {
    let _ = write!(
        out,
        "\n{}{} {}",
        "   ".repeat(depth),
        phase.name,
        phase.formatted_duration()
    );
    for sub in &phase.sub_phases {
        push_phase(out, sub, depth + 1);
    }
}
