//! Shared helpers for integration tests.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use fakt::context::CompilationContext;
use fakt::frontend::{FrontendChecker, ResolvedUnit, SourceText};
use fakt::options::FaktOptions;
use fakt::syntax::Parser;

/// Parse and validate in-memory sources with default options, returning
/// the populated context.
pub fn validate_sources(sources: &[(&str, &str)]) -> CompilationContext {
    validate_with_options(sources, FaktOptions::default())
}

pub fn validate_with_options(
    sources: &[(&str, &str)],
    options: FaktOptions,
) -> CompilationContext {
    let parser = Parser::new();
    let mut files = Vec::new();
    let mut texts = HashMap::new();
    for (path, content) in sources {
        texts.insert(path.to_string(), SourceText::new(*path, content));
        files.push(
            parser
                .parse(path, content)
                .unwrap_or_else(|e| panic!("parse {} failed: {}", path, e)),
        );
    }
    let ctx = CompilationContext::new(options);
    let unit = ResolvedUnit::new(&files);
    FrontendChecker::new(&ctx).run(&unit, &texts);
    ctx
}

/// A unique scratch directory removed on drop.
pub struct ScratchDir {
    pub path: PathBuf,
}

impl ScratchDir {
    pub fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "fakt-test-{}-{}",
            label,
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(&path).expect("create scratch dir");
        Self { path }
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.file(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, content).expect("write scratch file");
        path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Standard preamble for annotated test sources.
pub const FAKE_IMPORT: &str = "import dev.fakt.annotations.Fake";

pub fn annotated(package: &str, body: &str) -> String {
    format!("package {}\n\n{}\n\n{}\n", package, FAKE_IMPORT, body)
}
