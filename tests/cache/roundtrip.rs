use std::fs;

use fakt::cache::CacheManager;
use fakt::context::MetadataStore;
use fakt::metadata::serial::{MetadataCacheFile, METADATA_CACHE_VERSION};
use fakt::options::FaktOptions;
use fakt::pipeline::Compilation;

use crate::common::{annotated, ScratchDir};

const SERVICE: &str = r#"
@Fake
interface Service {
    fun greet(name: String): String
}
"#;

const HANDLER: &str = r#"
@Fake
abstract class Handler {
    abstract fun handle(event: String): Boolean
}
"#;

fn read_sources(paths: &[std::path::PathBuf]) -> Vec<(String, String)> {
    paths
        .iter()
        .map(|p| {
            (
                p.to_string_lossy().into_owned(),
                fs::read_to_string(p).unwrap(),
            )
        })
        .collect()
}

fn producer_options(dir: &ScratchDir) -> FaktOptions {
    FaktOptions {
        enabled: true,
        output_dir: Some(dir.file("out-producer")),
        metadata_cache_output: Some(dir.file("metadata.json")),
        ..FaktOptions::default()
    }
}

fn consumer_options(dir: &ScratchDir) -> FaktOptions {
    FaktOptions {
        enabled: true,
        output_dir: Some(dir.file("out-consumer")),
        metadata_cache_input: Some(dir.file("metadata.json")),
        ..FaktOptions::default()
    }
}

#[test]
fn producer_then_consumer_round_trip() {
    let dir = ScratchDir::new("cache-roundtrip");
    let sources = vec![
        dir.write("src/Service.kt", &annotated("com.example", SERVICE)),
        dir.write("src/Handler.kt", &annotated("com.example", HANDLER)),
    ];
    let sources = read_sources(&sources);

    let producer = Compilation::new(producer_options(&dir));
    let produced = producer.run(&sources);
    assert!(!produced.diagnostics.has_errors());
    assert_eq!(produced.summary.interfaces_cached, 0);
    let cache_path = dir.file("metadata.json");
    assert!(cache_path.exists(), "producer should write the cache");
    let document: MetadataCacheFile =
        serde_json::from_str(&fs::read_to_string(&cache_path).unwrap()).unwrap();
    assert_eq!(document.version, METADATA_CACHE_VERSION);
    assert_eq!(document.interfaces.len(), 1);
    assert_eq!(document.classes.len(), 1);
    assert!(!document.cache_signature.is_empty());
    assert!(document.total_fir_time_nanos > 0);
    // Producer records real validation times
    assert!(document.interfaces[0].validation_time_nanos > 0);

    let consumer = Compilation::new(consumer_options(&dir));
    let consumed = consumer.run(&sources);
    assert!(!consumed.diagnostics.has_errors());
    assert_eq!(consumed.summary.interfaces_cached, 1);
    assert_eq!(consumed.summary.classes_cached, 1);
    assert_eq!(consumed.summary.interfaces_processed, 0);
    assert!(consumed.summary.saved_frontend_time_nanos > 0);
    // Cache hits never carry a validation time
    for declaration in consumer.context().store.snapshot() {
        assert_eq!(declaration.validation_time_nanos(), 0);
    }

    // Both compilations emit identical files
    let producer_file = dir
        .file("out-producer")
        .join("com/example/FakeServiceImpl.kt");
    let consumer_file = dir
        .file("out-consumer")
        .join("com/example/FakeServiceImpl.kt");
    assert_eq!(
        fs::read(&producer_file).unwrap(),
        fs::read(&consumer_file).unwrap()
    );
}

#[test]
fn single_byte_change_invalidates_the_cache() {
    let dir = ScratchDir::new("cache-invalidation");
    let service_path = dir.write("src/Service.kt", &annotated("com.example", SERVICE));
    let sources = read_sources(&[service_path.clone()]);

    let producer = Compilation::new(producer_options(&dir));
    producer.run(&sources);

    // Flip one byte in the source file
    let mut content = fs::read_to_string(&service_path).unwrap();
    content.push(' ');
    fs::write(&service_path, &content).unwrap();
    let sources = read_sources(&[service_path]);

    let consumer = Compilation::new(consumer_options(&dir));
    let result = consumer.run(&sources);
    // Cache rejected: the validator ran in full
    assert_eq!(result.summary.interfaces_cached, 0);
    assert_eq!(result.summary.interfaces_processed, 1);
    assert_eq!(consumer.context().store.interface_cache_hits(), 0);
    // The rejected cache file is not deleted
    assert!(dir.file("metadata.json").exists());
}

#[test]
fn version_mismatch_rejects_the_cache() {
    let dir = ScratchDir::new("cache-version");
    let service_path = dir.write("src/Service.kt", &annotated("com.example", SERVICE));
    let sources = read_sources(&[service_path]);

    let producer = Compilation::new(producer_options(&dir));
    producer.run(&sources);

    let cache_path = dir.file("metadata.json");
    let mut document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&cache_path).unwrap()).unwrap();
    document["version"] = serde_json::json!(METADATA_CACHE_VERSION + 1);
    fs::write(&cache_path, serde_json::to_string(&document).unwrap()).unwrap();

    let store = MetadataStore::new();
    let manager = CacheManager::from_options(&consumer_options(&dir));
    assert!(!manager.try_load_cache(&store));
    assert!(store.is_empty());
}

#[test]
fn corrupt_cache_is_ignored_without_error() {
    let dir = ScratchDir::new("cache-corrupt");
    dir.write("metadata.json", "{ not json ]");
    let store = MetadataStore::new();
    let manager = CacheManager::from_options(&consumer_options(&dir));
    assert!(!manager.try_load_cache(&store));
    assert!(store.is_empty());
}

#[test]
fn missing_source_file_rejects_the_cache() {
    let dir = ScratchDir::new("cache-missing-source");
    let service_path = dir.write("src/Service.kt", &annotated("com.example", SERVICE));
    let sources = read_sources(&[service_path.clone()]);

    let producer = Compilation::new(producer_options(&dir));
    producer.run(&sources);
    fs::remove_file(&service_path).unwrap();

    let store = MetadataStore::new();
    let manager = CacheManager::from_options(&consumer_options(&dir));
    assert!(!manager.try_load_cache(&store));
    assert!(store.is_empty());
}

#[test]
fn cache_loads_only_once_per_compilation() {
    let dir = ScratchDir::new("cache-once");
    let service_path = dir.write("src/Service.kt", &annotated("com.example", SERVICE));
    let sources = read_sources(&[service_path]);

    let producer = Compilation::new(producer_options(&dir));
    producer.run(&sources);

    let store = MetadataStore::new();
    let manager = CacheManager::from_options(&consumer_options(&dir));
    assert!(manager.try_load_cache(&store));
    assert_eq!(store.len(), 1);
    // A second attempt is a no-op
    assert!(!manager.try_load_cache(&store));
    assert_eq!(store.len(), 1);
}

#[test]
fn empty_store_writes_no_cache() {
    let dir = ScratchDir::new("cache-empty");
    let manager = CacheManager::from_options(&producer_options(&dir));
    let store = MetadataStore::new();
    manager.write_cache(&store).unwrap();
    assert!(!dir.file("metadata.json").exists());
}

#[test]
fn consumed_metadata_matches_produced_metadata() {
    let dir = ScratchDir::new("cache-equality");
    let sources = vec![
        dir.write("src/Service.kt", &annotated("com.example", SERVICE)),
        dir.write("src/Handler.kt", &annotated("com.example", HANDLER)),
    ];
    let sources = read_sources(&sources);

    let producer = Compilation::new(producer_options(&dir));
    producer.run(&sources);
    let consumer = Compilation::new(consumer_options(&dir));
    consumer.run(&sources);

    let produced = producer.context().store.snapshot();
    let consumed = consumer.context().store.snapshot();
    assert_eq!(produced.len(), consumed.len());
    for (a, b) in produced.iter().zip(consumed.iter()) {
        // Equal in all fields except the zeroed validation time
        let mut a = (**a).clone();
        match &mut a {
            fakt::metadata::ValidatedDeclaration::Interface(meta) => {
                meta.validation_time_nanos = 0
            }
            fakt::metadata::ValidatedDeclaration::Class(meta) => meta.validation_time_nanos = 0,
        }
        assert_eq!(&a, b.as_ref());
    }
}
