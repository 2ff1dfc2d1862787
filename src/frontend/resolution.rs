//! In-unit name resolution.
//!
//! Declarations of the compilation are indexed by fully-qualified name so
//! the supertype walk can traverse transitively and type names can be
//! textualized as qualified forms. Names that resolve to nothing stay as
//! written: metadata is self-contained and never reaches outside the
//! unit.

use std::collections::HashMap;

use crate::syntax::ast::{Declaration, SourceFile};

#[derive(Debug, Clone, Copy)]
pub struct DeclRef<'a> {
    pub file: &'a SourceFile,
    pub decl: &'a Declaration,
}

impl<'a> DeclRef<'a> {
    pub fn fqn(&self) -> String {
        if self.file.package.is_empty() {
            self.decl.name.clone()
        } else {
            format!("{}.{}", self.file.package, self.decl.name)
        }
    }
}

#[derive(Debug)]
pub struct ResolvedUnit<'a> {
    pub files: &'a [SourceFile],
    by_fqn: HashMap<String, DeclRef<'a>>,
}

impl<'a> ResolvedUnit<'a> {
    pub fn new(files: &'a [SourceFile]) -> Self {
        let mut by_fqn = HashMap::new();
        for file in files {
            let mut stack = Vec::new();
            for declaration in &file.declarations {
                declaration.iter_with_nested(&mut stack);
            }
            for decl in stack {
                let reference = DeclRef {
                    file,
                    decl,
                };
                by_fqn.entry(reference.fqn()).or_insert(reference);
            }
        }
        Self {
            files,
            by_fqn,
        }
    }

    pub fn lookup(&self, fqn: &str) -> Option<DeclRef<'a>> {
        self.by_fqn.get(fqn).copied()
    }

    /// Resolve a type name as written in `file` to a declaration of this
    /// unit, trying explicit imports, the file's own package, and the
    /// root package in that order.
    pub fn resolve_in_file(&self, file: &SourceFile, name: &str) -> Option<DeclRef<'a>> {
        for candidate in name_candidates(file, name) {
            if let Some(reference) = self.lookup(&candidate) {
                return Some(reference);
            }
        }
        None
    }

    /// Qualified textual form of `name` as seen from `file`, or `None`
    /// when the name does not resolve inside the unit.
    pub fn qualify(&self, file: &SourceFile, name: &str) -> Option<String> {
        self.resolve_in_file(file, name).map(|r| r.fqn())
    }
}

/// Candidate fully-qualified names for a type or annotation name as
/// written in a file, in resolution order.
pub fn name_candidates(file: &SourceFile, name: &str) -> Vec<String> {
    let mut candidates = Vec::new();
    if name.contains('.') {
        candidates.push(name.to_string());
        return candidates;
    }
    for import in &file.imports {
        if import.imported_name() == Some(name) {
            candidates.push(import.path.clone());
        }
    }
    for import in &file.imports {
        if let Some(prefix) = import.path.strip_suffix(".*") {
            candidates.push(format!("{}.{}", prefix, name));
        }
    }
    if !file.package.is_empty() {
        candidates.push(format!("{}.{}", file.package, name));
    }
    candidates.push(name.to_string());
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Parser;

    #[test]
    fn resolves_across_files_and_packages() {
        let parser = Parser::new();
        let files = vec![
            parser
                .parse(
                    "a.kt",
                    "package p\n\nimport q.External\n\ninterface Local : External, Sibling",
                )
                .unwrap(),
            parser.parse("b.kt", "package p\n\ninterface Sibling").unwrap(),
            parser.parse("c.kt", "package q\n\ninterface External").unwrap(),
        ];
        let unit = ResolvedUnit::new(&files);
        assert!(unit.lookup("p.Local").is_some());
        let local_file = &files[0];
        assert_eq!(
            unit.qualify(local_file, "External").as_deref(),
            Some("q.External")
        );
        assert_eq!(
            unit.qualify(local_file, "Sibling").as_deref(),
            Some("p.Sibling")
        );
        assert_eq!(unit.qualify(local_file, "Unknown"), None);
    }

    #[test]
    fn nested_declarations_are_indexed_by_dotted_name() {
        let parser = Parser::new();
        let files = vec![parser
            .parse("a.kt", "package p\n\nclass Outer {\n    interface Inner\n}")
            .unwrap()];
        let unit = ResolvedUnit::new(&files);
        assert!(unit.lookup("p.Outer.Inner").is_some());
    }
}
