//! Compilation pipeline facade.
//!
//! Mirrors the host-compiler call sequence: consult the cache, parse and
//! validate declarations, write the producer cache, generate fakes,
//! assemble the summary. Per-declaration failures surface as
//! diagnostics; only a broken configuration disables the run.

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, warn};

use crate::cache::CacheManager;
use crate::context::CompilationContext;
use crate::frontend::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticCollection};
use crate::frontend::{FrontendChecker, ResolvedUnit, SourceText};
use crate::generator::FakeGenerator;
use crate::options::FaktOptions;
use crate::syntax::ast::SourceFile;
use crate::syntax::Parser;
use crate::telemetry::{CompilationSummary, PhaseTracker, ReportFormatter};

#[derive(Debug)]
pub struct CompilationResult {
    pub summary: CompilationSummary,
    pub diagnostics: DiagnosticCollection,
    pub success_message: String,
}

pub struct Compilation {
    ctx: CompilationContext,
    tracker: PhaseTracker,
    cache: CacheManager,
    disabled: bool,
}

impl Compilation {
    /// Configuration errors are reported once here and disable the
    /// plugin for the rest of the compilation.
    pub fn new(options: FaktOptions) -> Self {
        let cache = CacheManager::from_options(&options);
        let ctx = CompilationContext::new(options);
        let mut disabled = !ctx.options.enabled;
        if ctx.options.enabled && ctx.options.output_dir.is_none() {
            ctx.report(Diagnostic::new(
                DiagnosticCode::InvalidConfiguration,
                "outputDir is required when the plugin is enabled",
            ));
            disabled = true;
        }
        Self {
            ctx,
            tracker: PhaseTracker::new(),
            cache,
            disabled,
        }
    }

    /// Front-end-only construction: no output directory is needed when
    /// nothing will be emitted.
    pub fn for_frontend(options: FaktOptions) -> Self {
        let cache = CacheManager::from_options(&options);
        let ctx = CompilationContext::new(options);
        let disabled = !ctx.options.enabled;
        Self {
            ctx,
            tracker: PhaseTracker::new(),
            cache,
            disabled,
        }
    }

    pub fn context(&self) -> &CompilationContext {
        &self.ctx
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Run the front-end only: cache consult, parse, validate, populate
    /// the store. Returns whether a consumer cache satisfied the phase.
    pub fn run_frontend(&self, sources: &[(String, String)]) -> bool {
        let frontend = self.tracker.start_phase("frontend", None);
        let load = self.tracker.start_phase("cache-load", Some(frontend));
        let cache_hit = self.cache.try_load_cache(&self.ctx.store);
        self.tracker.end_phase(load);
        if !cache_hit {
            let parse_phase = self.tracker.start_phase("parse", Some(frontend));
            let (files, texts) = self.parse_sources(sources);
            self.tracker.end_phase(parse_phase);
            let validate_phase = self.tracker.start_phase("validate", Some(frontend));
            let unit = ResolvedUnit::new(&files);
            FrontendChecker::new(&self.ctx).run(&unit, &texts);
            self.tracker.end_phase(validate_phase);
        }
        self.tracker.end_phase(frontend);
        cache_hit
    }

    fn parse_sources(
        &self,
        sources: &[(String, String)],
    ) -> (Vec<SourceFile>, HashMap<String, SourceText>) {
        let parser = Parser::new();
        let mut files = Vec::new();
        let mut texts = HashMap::new();
        for (path, content) in sources {
            let text = SourceText::new(path.clone(), content);
            match parser.parse(path, content) {
                Ok(file) => {
                    files.push(file);
                }
                Err(err) => {
                    let location = text.location_from_span(err.offset, 1);
                    self.ctx.report(
                        Diagnostic::new(
                            DiagnosticCode::SyntaxError,
                            format!("{}: {}", path, err),
                        )
                        .with_location(location),
                    );
                }
            }
            texts.insert(path.clone(), text);
        }
        debug!("parsed {} of {} source files", files.len(), sources.len());
        (files, texts)
    }

    /// Full pipeline: front-end, producer cache write, generation,
    /// summary.
    pub fn run(&self, sources: &[(String, String)]) -> CompilationResult {
        let started = Instant::now();
        if self.disabled {
            return CompilationResult {
                summary: CompilationSummary::default(),
                diagnostics: self.ctx.diagnostics_snapshot(),
                success_message: String::new(),
            };
        }
        self.run_frontend(sources);
        // Producer mode writes once the front-end phase is complete
        if let Err(err) = self.cache.write_cache(&self.ctx.store) {
            warn!("metadata cache write failed: {}", err);
        }
        let generation = self.tracker.start_phase("generation", None);
        let generated = FakeGenerator::new(&self.ctx).generate_all();
        self.tracker.end_phase(generation);

        let interface_count = self.ctx.store.interface_count();
        let class_count = self.ctx.store.class_count();
        let interfaces_cached = self.ctx.store.interface_cache_hits() as usize;
        let classes_cached = self.ctx.store.class_cache_hits() as usize;
        let mut summary = CompilationSummary {
            total_time_nanos: started.elapsed().as_nanos() as u64,
            interfaces_discovered: interface_count,
            interfaces_processed: interface_count - interfaces_cached,
            interfaces_cached,
            classes_discovered: class_count,
            classes_processed: class_count - classes_cached,
            classes_cached,
            phases: self.tracker.all_completed().into_values().collect(),
            saved_frontend_time_nanos: self.cache.saved_frontend_time_nanos(),
            ..CompilationSummary::default()
        };
        for fake in &generated {
            summary.add_fake(fake.metrics.clone());
        }
        let success_message =
            ReportFormatter::new().success_message(&summary, self.ctx.log_level());
        CompilationResult {
            summary,
            diagnostics: self.ctx.diagnostics_snapshot(),
            success_message,
        }
    }
}
