// Shared context - carried through every phase of one compilation

pub mod store;

pub use store::MetadataStore;

use indexmap::IndexSet;
use parking_lot::Mutex;

use crate::frontend::diagnostics::{Diagnostic, DiagnosticCollection};
use crate::options::{FaktOptions, LogLevel};

/// Process-local state for a single compilation. Never global: sibling
/// compilations of the same module run with independent contexts.
#[derive(Debug)]
pub struct CompilationContext {
    pub options: FaktOptions,
    fake_annotations: IndexSet<String>,
    pub store: MetadataStore,
    diagnostics: Mutex<DiagnosticCollection>,
}

impl CompilationContext {
    pub fn new(options: FaktOptions) -> Self {
        let fake_annotations: IndexSet<String> =
            options.fake_annotations.iter().cloned().collect();
        Self {
            options,
            fake_annotations,
            store: MetadataStore::new(),
            diagnostics: Mutex::new(DiagnosticCollection::new()),
        }
    }

    /// Membership test against the configured annotation set.
    pub fn is_configured_annotation(&self, fqn: &str) -> bool {
        self.fake_annotations.contains(fqn)
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().add(diagnostic);
    }

    pub fn diagnostics_snapshot(&self) -> DiagnosticCollection {
        self.diagnostics.lock().clone()
    }

    pub fn has_error_diagnostics(&self) -> bool {
        self.diagnostics.lock().has_errors()
    }

    pub fn log_level(&self) -> LogLevel {
        self.options.effective_log_level()
    }
}
