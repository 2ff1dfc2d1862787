//! Concurrent insertion-ordered store of validated declarations.
//!
//! Checkers insert from potentially many worker threads during the
//! front-end phase; generation takes a stable snapshot afterwards. Keys
//! are fully-qualified names and must stay unique.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::metadata::ValidatedDeclaration;

#[derive(Debug, Default)]
pub struct MetadataStore {
    entries: RwLock<IndexMap<String, Arc<ValidatedDeclaration>>>,
    interface_cache_hits: AtomicU32,
    class_cache_hits: AtomicU32,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration keyed by its fully-qualified name.
    ///
    /// First write wins; returns `false` when the name was already
    /// present (the caller reports the duplicate).
    pub fn insert(&self, declaration: ValidatedDeclaration) -> bool {
        let fqn = declaration.fqn();
        let mut entries = self.entries.write();
        if entries.contains_key(&fqn) {
            return false;
        }
        entries.insert(fqn, Arc::new(declaration));
        true
    }

    pub fn get(&self, fqn: &str) -> Option<Arc<ValidatedDeclaration>> {
        self.entries.read().get(fqn).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Stable insertion-ordered view taken at generation time.
    pub fn snapshot(&self) -> Vec<Arc<ValidatedDeclaration>> {
        self.entries.read().values().cloned().collect()
    }

    pub fn interface_count(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|d| d.is_interface())
            .count()
    }

    pub fn class_count(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|d| !d.is_interface())
            .count()
    }

    pub fn record_interface_cache_hit(&self) {
        self.interface_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_class_cache_hit(&self) {
        self.class_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn interface_cache_hits(&self) -> u32 {
        self.interface_cache_hits.load(Ordering::Relaxed)
    }

    pub fn class_cache_hits(&self) -> u32 {
        self.class_cache_hits.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ClassId, InterfaceMetadata};

    fn interface(fqn_package: &str, name: &str) -> ValidatedDeclaration {
        ValidatedDeclaration::Interface(InterfaceMetadata {
            class_id: ClassId::new(fqn_package, name),
            simple_name: name.to_string(),
            package_name: fqn_package.to_string(),
            type_parameters: vec![],
            properties: vec![],
            functions: vec![],
            inherited_properties: vec![],
            inherited_functions: vec![],
            source_file_path: "<unknown>".to_string(),
            validation_time_nanos: 0,
        })
    }

    #[test]
    fn keeps_insertion_order() {
        let store = MetadataStore::new();
        assert!(store.insert(interface("p", "B")));
        assert!(store.insert(interface("p", "A")));
        assert!(store.insert(interface("q", "C")));
        let names: Vec<String> = store.snapshot().iter().map(|d| d.fqn()).collect();
        assert_eq!(names, vec!["p.B", "p.A", "q.C"]);
    }

    #[test]
    fn first_write_wins_on_duplicate() {
        let store = MetadataStore::new();
        assert!(store.insert(interface("p", "A")));
        assert!(!store.insert(interface("p", "A")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_producers_do_not_lose_entries() {
        let store = Arc::new(MetadataStore::new());
        let mut handles = Vec::new();
        for worker in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for index in 0..50 {
                    store.insert(interface("p", &format!("T{}_{}", worker, index)));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 8 * 50);
    }
}
