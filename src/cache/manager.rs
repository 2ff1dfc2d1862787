//! Cross-compilation metadata cache.
//!
//! Producer mode serializes the whole store after the front-end phase;
//! consumer mode loads, validates and materializes a cache before any
//! declaration is analyzed. A cache that fails to parse, carries the
//! wrong schema version or references changed source files is discarded
//! silently; the front-end then runs in full.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use log::{debug, info, warn};
use thiserror::Error;

use super::signature::{cache_signature, file_signature};
use crate::context::MetadataStore;
use crate::metadata::serial::{
    MetadataCacheFile, SerializableClassRecord, SerializableInterfaceRecord,
    METADATA_CACHE_VERSION,
};
use crate::metadata::ValidatedDeclaration;
use crate::options::FaktOptions;

#[derive(Debug, Error)]
enum CacheRejection {
    #[error("cache file could not be read: {0}")]
    Unreadable(#[from] std::io::Error),
    #[error("cache file could not be parsed: {0}")]
    Unparseable(#[from] serde_json::Error),
    #[error("cache schema version {found} does not match {expected}")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("source file {path} changed (expected {expected}, found {found})")]
    StaleSource {
        path: String,
        expected: String,
        found: String,
    },
    #[error("cache record carries a malformed class id: {0}")]
    BadRecord(#[from] crate::metadata::class_id::ClassIdError),
}

pub struct CacheManager {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    cache_loaded: AtomicBool,
    saved_frontend_nanos: AtomicU64,
}

impl CacheManager {
    pub fn from_options(options: &FaktOptions) -> Self {
        Self {
            input: options.metadata_cache_input.clone(),
            output: options.metadata_cache_output.clone(),
            cache_loaded: AtomicBool::new(false),
            saved_frontend_nanos: AtomicU64::new(0),
        }
    }

    pub fn consumer_mode(&self) -> bool {
        self.input.is_some()
    }

    pub fn producer_mode(&self) -> bool {
        self.output.is_some()
    }

    /// Sum of validation times stored in the loaded cache, for telemetry
    /// only.
    pub fn saved_frontend_time_nanos(&self) -> u64 {
        self.saved_frontend_nanos.load(Ordering::Relaxed)
    }

    /// Attempt to load, validate and materialize the cache into the
    /// store. Returns `true` on a hit. Every failure mode leaves the
    /// store untouched and returns `false`; nothing is deleted and no
    /// error propagates.
    pub fn try_load_cache(&self, store: &MetadataStore) -> bool {
        let Some(path) = &self.input else {
            return false;
        };
        if self.cache_loaded.swap(true, Ordering::SeqCst) {
            debug!("metadata cache already consumed for this compilation");
            return false;
        }
        match self.load_validated(path) {
            Ok(cache) => {
                let interfaces = cache.interfaces.len();
                let classes = cache.classes.len();
                self.saved_frontend_nanos
                    .store(cache.stored_validation_nanos(), Ordering::Relaxed);
                for record in &cache.interfaces {
                    // Validated during load; the parse cannot fail here
                    if let Ok(meta) = record.into_metadata() {
                        store.insert(ValidatedDeclaration::Interface(meta));
                        store.record_interface_cache_hit();
                    }
                }
                for record in &cache.classes {
                    if let Ok(meta) = record.into_metadata() {
                        store.insert(ValidatedDeclaration::Class(meta));
                        store.record_class_cache_hit();
                    }
                }
                info!(
                    "metadata cache hit: {} interfaces, {} classes from {}",
                    interfaces,
                    classes,
                    path.display()
                );
                true
            }
            Err(rejection) => {
                debug!(
                    "metadata cache {} rejected: {}",
                    path.display(),
                    rejection
                );
                false
            }
        }
    }

    fn load_validated(&self, path: &Path) -> Result<MetadataCacheFile, CacheRejection> {
        let content = fs::read_to_string(path)?;
        let cache: MetadataCacheFile = serde_json::from_str(&content)?;
        if cache.version != METADATA_CACHE_VERSION {
            return Err(CacheRejection::VersionMismatch {
                found: cache.version,
                expected: METADATA_CACHE_VERSION,
            });
        }
        let mut current_signatures: std::collections::HashMap<&str, String> =
            std::collections::HashMap::new();
        let records = cache
            .interfaces
            .iter()
            .map(|r| (r.source_file_path.as_str(), r.source_file_signature.as_str()))
            .chain(
                cache
                    .classes
                    .iter()
                    .map(|r| (r.source_file_path.as_str(), r.source_file_signature.as_str())),
            );
        for (source_path, expected) in records {
            let current = current_signatures
                .entry(source_path)
                .or_insert_with(|| file_signature(source_path));
            if current.as_str() != expected {
                return Err(CacheRejection::StaleSource {
                    path: source_path.to_string(),
                    expected: expected.to_string(),
                    found: current.clone(),
                });
            }
        }
        // Class ids must parse before anything reaches the store
        for record in &cache.interfaces {
            record.into_metadata()?;
        }
        for record in &cache.classes {
            record.into_metadata()?;
        }
        Ok(cache)
    }

    /// Serialize the store to the output path, atomically. A compilation
    /// with an empty store writes nothing.
    pub fn write_cache(&self, store: &MetadataStore) -> anyhow::Result<()> {
        let Some(path) = &self.output else {
            return Ok(());
        };
        let snapshot = store.snapshot();
        if snapshot.is_empty() {
            debug!("store is empty; no metadata cache written");
            return Ok(());
        }
        let mut interfaces = Vec::new();
        let mut classes = Vec::new();
        let mut file_signatures: Vec<String> = Vec::new();
        let mut total_nanos = 0u64;
        for declaration in &snapshot {
            let signature = file_signature(declaration.source_file_path());
            total_nanos += declaration.validation_time_nanos();
            match declaration.as_ref() {
                ValidatedDeclaration::Interface(meta) => interfaces.push(
                    SerializableInterfaceRecord::from_metadata(meta, signature.clone()),
                ),
                ValidatedDeclaration::Class(meta) => classes.push(
                    SerializableClassRecord::from_metadata(meta, signature.clone()),
                ),
            }
            if !file_signatures.contains(&signature) {
                file_signatures.push(signature);
            }
        }
        let cache = MetadataCacheFile {
            version: METADATA_CACHE_VERSION,
            cache_signature: cache_signature(&file_signatures),
            total_fir_time_nanos: total_nanos,
            interfaces,
            classes,
        };
        let json = serde_json::to_string_pretty(&cache)?;
        write_atomically(path, &json)?;
        info!(
            "metadata cache written to {} ({} declarations)",
            path.display(),
            snapshot.len()
        );
        Ok(())
    }
}

/// Write via `<path>.tmp` in the same directory and rename over the
/// target so readers never observe a torn file. The suffix is appended,
/// not substituted: `cache.json` stages through `cache.json.tmp`.
fn write_atomically(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    fs::write(&tmp, content)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        warn!("atomic rename to {} failed: {}", path.display(), err);
        return Err(err.into());
    }
    Ok(())
}
