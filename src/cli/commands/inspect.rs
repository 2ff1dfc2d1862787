use anyhow::{bail, Result};
use log::warn;
use std::path::PathBuf;

use super::collect_kotlin_sources;
use crate::cache::file_signature;
use crate::metadata::serial::{
    MetadataCacheFile, SerializableClassRecord, SerializableInterfaceRecord,
    METADATA_CACHE_VERSION,
};
use crate::metadata::ValidatedDeclaration;
use crate::options::{marshal_options, FaktOptions};
use crate::pipeline::Compilation;

/// Run the front-end (or consume a cache) and print the extracted
/// metadata as the cache JSON document.
pub fn run(
    source: Vec<PathBuf>,
    cache: Option<PathBuf>,
    fake_annotations: Option<String>,
) -> Result<()> {
    if source.is_empty() && cache.is_none() {
        bail!("inspect needs --source files or a --cache file");
    }
    let mut pairs = vec!["enabled=true".to_string()];
    if let Some(annotations) = &fake_annotations {
        pairs.push(format!("fakeAnnotations={}", annotations));
    }
    if let Some(cache) = &cache {
        pairs.push(format!("metadataCacheInput={}", cache.display()));
    }
    let (options, warnings) = marshal_options(&pairs);
    for warning in warnings {
        warn!("option {}: {}", warning.key, warning.reason);
    }
    let options = FaktOptions {
        enabled: true,
        ..options
    };

    let sources = collect_kotlin_sources(&source)?;
    // The front-end alone needs no output directory
    let compilation = Compilation::for_frontend(options);
    let cache_hit = compilation.run_frontend(&sources);
    if cache.is_some() && !cache_hit {
        bail!("metadata cache was rejected; run with RUST_LOG=debug for the reason");
    }

    let mut interfaces = Vec::new();
    let mut classes = Vec::new();
    let mut signatures: Vec<String> = Vec::new();
    for declaration in compilation.context().store.snapshot() {
        let signature = file_signature(declaration.source_file_path());
        if !signatures.contains(&signature) {
            signatures.push(signature.clone());
        }
        match declaration.as_ref() {
            ValidatedDeclaration::Interface(meta) => {
                interfaces.push(SerializableInterfaceRecord::from_metadata(meta, signature));
            }
            ValidatedDeclaration::Class(meta) => {
                classes.push(SerializableClassRecord::from_metadata(meta, signature));
            }
        }
    }
    let document = MetadataCacheFile {
        version: METADATA_CACHE_VERSION,
        cache_signature: crate::cache::cache_signature(&signatures),
        total_fir_time_nanos: compilation
            .context()
            .store
            .snapshot()
            .iter()
            .map(|d| d.validation_time_nanos())
            .sum(),
        interfaces,
        classes,
    };
    println!("{}", serde_json::to_string_pretty(&document)?);
    for diagnostic in compilation.context().diagnostics_snapshot().iter() {
        eprintln!("{}", diagnostic);
    }
    Ok(())
}
