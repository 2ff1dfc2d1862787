use anyhow::{bail, Result};
use log::{error, info, warn};
use std::path::PathBuf;

use super::collect_kotlin_sources;
use crate::frontend::diagnostics::DiagnosticSeverity;
use crate::options::marshal_options;
use crate::pipeline::Compilation;

pub struct GenerateArgs {
    pub source: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub fake_annotations: Option<String>,
    pub metadata_cache_input: Option<PathBuf>,
    pub metadata_cache_output: Option<PathBuf>,
    pub log_level: Option<String>,
    pub debug: bool,
    pub plugin_option: Vec<String>,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    // Raw -P pairs first; explicit flags override them
    let mut pairs = args.plugin_option.clone();
    pairs.push("enabled=true".to_string());
    if let Some(output_dir) = &args.output_dir {
        pairs.push(format!("outputDir={}", output_dir.display()));
    }
    if let Some(annotations) = &args.fake_annotations {
        pairs.push(format!("fakeAnnotations={}", annotations));
    }
    if let Some(path) = &args.metadata_cache_input {
        pairs.push(format!("metadataCacheInput={}", path.display()));
    }
    if let Some(path) = &args.metadata_cache_output {
        pairs.push(format!("metadataCacheOutput={}", path.display()));
    }
    if let Some(level) = &args.log_level {
        pairs.push(format!("logLevel={}", level));
    }
    if args.debug {
        pairs.push("debug=true".to_string());
    }
    let (options, warnings) = marshal_options(&pairs);
    for warning in warnings {
        warn!("option {}: {}", warning.key, warning.reason);
    }

    let sources = collect_kotlin_sources(&args.source)?;
    info!("scanning {} Kotlin source file(s)", sources.len());

    let compilation = Compilation::new(options);
    let result = compilation.run(&sources);
    for diagnostic in result.diagnostics.iter() {
        match diagnostic.severity {
            DiagnosticSeverity::Error => error!("{}", diagnostic),
            DiagnosticSeverity::Warning => warn!("{}", diagnostic),
            DiagnosticSeverity::Info => info!("{}", diagnostic),
        }
    }
    if !result.success_message.is_empty() {
        println!("{}", result.success_message);
    }
    if result.diagnostics.has_errors() {
        bail!(
            "generation finished with {} error(s)",
            result.diagnostics.error_count()
        );
    }
    Ok(())
}
