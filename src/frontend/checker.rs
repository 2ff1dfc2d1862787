//! The front-end validator.
//!
//! Runs after parsing and resolution: finds declarations carrying a
//! recognized annotation, checks eligibility, extracts metadata and
//! populates the shared store. When a consumer-mode cache loads
//! successfully the caller skips this entirely.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use log::debug;

use crate::context::CompilationContext;
use crate::frontend::diagnostics::{Diagnostic, DiagnosticCode, SourceLocation};
use crate::frontend::extract::Extractor;
use crate::frontend::resolution::{name_candidates, DeclRef, ResolvedUnit};
use crate::frontend::source_text::SourceText;
use crate::metadata::{ClassMetadata, InterfaceMetadata, ValidatedDeclaration};
use crate::syntax::ast::{DeclKind, Modality};

pub struct FrontendChecker<'c> {
    ctx: &'c CompilationContext,
}

struct ValidationOutcome {
    declaration: Option<ValidatedDeclaration>,
    diagnostics: Vec<Diagnostic>,
}

impl<'c> FrontendChecker<'c> {
    pub fn new(ctx: &'c CompilationContext) -> Self {
        Self { ctx }
    }

    /// Validate every annotated declaration of the unit and populate the
    /// store in source order.
    pub fn run(&self, unit: &ResolvedUnit<'_>, texts: &HashMap<String, SourceText>) {
        let candidates = self.annotated_candidates(unit);
        debug!("front-end found {} annotated candidates", candidates.len());
        let outcomes = self.validate_all(unit, texts, &candidates);
        for outcome in outcomes {
            for diagnostic in outcome.diagnostics {
                self.ctx.report(diagnostic);
            }
            if let Some(declaration) = outcome.declaration {
                let fqn = declaration.fqn();
                if !self.ctx.store.insert(declaration) {
                    self.ctx.report(
                        Diagnostic::with_default_message(DiagnosticCode::DuplicateAnnotatedName)
                            .for_declaration(fqn),
                    );
                }
            }
        }
    }

    fn annotated_candidates<'a>(&self, unit: &ResolvedUnit<'a>) -> Vec<DeclRef<'a>> {
        let mut candidates = Vec::new();
        for file in unit.files {
            let mut declarations = Vec::new();
            for declaration in &file.declarations {
                declaration.iter_with_nested(&mut declarations);
            }
            for decl in declarations {
                let recognized = decl.annotations.iter().any(|annotation| {
                    name_candidates(file, annotation)
                        .iter()
                        .any(|fqn| self.ctx.is_configured_annotation(fqn))
                });
                if recognized {
                    candidates.push(DeclRef {
                        file,
                        decl,
                    });
                }
            }
        }
        candidates
    }

    #[cfg(not(feature = "parallel_validation"))]
    fn validate_all<'a>(
        &self,
        unit: &ResolvedUnit<'a>,
        texts: &HashMap<String, SourceText>,
        candidates: &[DeclRef<'a>],
    ) -> Vec<ValidationOutcome> {
        candidates
            .iter()
            .map(|candidate| self.validate_one(unit, texts, *candidate))
            .collect()
    }

    /// Extraction runs on the worker pool; results are re-assembled in
    /// source order so the store keeps deterministic iteration.
    #[cfg(feature = "parallel_validation")]
    fn validate_all<'a>(
        &self,
        unit: &ResolvedUnit<'a>,
        texts: &HashMap<String, SourceText>,
        candidates: &[DeclRef<'a>],
    ) -> Vec<ValidationOutcome> {
        use rayon::prelude::*;
        candidates
            .par_iter()
            .map(|candidate| self.validate_one(unit, texts, *candidate))
            .collect()
    }

    fn validate_one<'a>(
        &self,
        unit: &ResolvedUnit<'a>,
        texts: &HashMap<String, SourceText>,
        candidate: DeclRef<'a>,
    ) -> ValidationOutcome {
        let fqn = candidate.fqn();
        let location = self.location_of(texts, candidate);
        let mut diagnostics = Vec::new();
        let decl = candidate.decl;
        let supported = match decl.kind {
            DeclKind::Interface | DeclKind::Class => decl.modality != Modality::Sealed,
            _ => false,
        };
        if !supported {
            diagnostics.push(locate(
                Diagnostic::with_default_message(DiagnosticCode::AnnotationOnUnsupportedKind)
                    .for_declaration(&fqn),
                &location,
            ));
            return ValidationOutcome {
                declaration: None,
                diagnostics,
            };
        }
        let started = Instant::now();
        let extracted = catch_unwind(AssertUnwindSafe(|| {
            let extractor = Extractor::new(unit);
            let mut extraction_diagnostics = Vec::new();
            let declaration = match decl.kind {
                DeclKind::Interface => ValidatedDeclaration::Interface(
                    extractor.extract_interface(candidate, &mut extraction_diagnostics),
                ),
                _ => ValidatedDeclaration::Class(
                    extractor.extract_class(candidate, &mut extraction_diagnostics),
                ),
            };
            (declaration, extraction_diagnostics)
        }));
        let elapsed = started.elapsed().as_nanos() as u64;
        let (declaration, extraction_diagnostics) = match extracted {
            Ok(result) => result,
            Err(_) => {
                diagnostics.push(locate(
                    Diagnostic::with_default_message(DiagnosticCode::ExtractionFailed)
                        .for_declaration(&fqn),
                    &location,
                ));
                return ValidationOutcome {
                    declaration: None,
                    diagnostics,
                };
            }
        };
        diagnostics.extend(
            extraction_diagnostics
                .into_iter()
                .map(|d| locate(d, &location)),
        );
        let declaration = match declaration {
            ValidatedDeclaration::Interface(meta) => {
                ValidatedDeclaration::Interface(InterfaceMetadata {
                    validation_time_nanos: elapsed,
                    ..meta
                })
            }
            ValidatedDeclaration::Class(meta) => {
                // A final class cannot be subclassed, and a subclassable
                // class without overridable members has nothing to fake
                if decl.modality == Modality::Final || meta_is_empty(&meta) {
                    diagnostics.push(locate(
                        Diagnostic::with_default_message(
                            DiagnosticCode::AnnotationOnFinalClassWithoutOverrides,
                        )
                        .for_declaration(&fqn),
                        &location,
                    ));
                    return ValidationOutcome {
                        declaration: None,
                        diagnostics,
                    };
                }
                ValidatedDeclaration::Class(ClassMetadata {
                    validation_time_nanos: elapsed,
                    ..meta
                })
            }
        };
        ValidationOutcome {
            declaration: Some(declaration),
            diagnostics,
        }
    }

    fn location_of(
        &self,
        texts: &HashMap<String, SourceText>,
        candidate: DeclRef<'_>,
    ) -> Option<SourceLocation> {
        let (start, end) = candidate.decl.span;
        texts
            .get(&candidate.file.path)
            .map(|text| text.location_from_range(start, end))
    }
}

fn meta_is_empty(meta: &ClassMetadata) -> bool {
    meta.abstract_properties.is_empty()
        && meta.open_properties.is_empty()
        && meta.abstract_methods.is_empty()
        && meta.open_methods.is_empty()
}

fn locate(diagnostic: Diagnostic, location: &Option<SourceLocation>) -> Diagnostic {
    match location {
        Some(location) => diagnostic.with_location(location.clone()),
        None => diagnostic,
    }
}
