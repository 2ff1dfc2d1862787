//! Import inference for generated files.
//!
//! Metadata carries qualified type names; the generated file prefers
//! short names plus an import list. A dotted name is shortened when its
//! simple name is unambiguous within the file; same-package names and
//! default-import packages shorten without an import line. Conflicting
//! simple names keep their qualified spelling.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::codemodel::model::CodeType;

/// Packages the language imports implicitly.
const DEFAULT_IMPORT_PACKAGES: &[&str] = &[
    "kotlin",
    "kotlin.annotation",
    "kotlin.collections",
    "kotlin.comparisons",
    "kotlin.io",
    "kotlin.ranges",
    "kotlin.sequences",
    "kotlin.text",
    "kotlin.jvm",
    "java.lang",
];

#[derive(Debug)]
pub struct ImportResolver {
    package: String,
    claimed: HashMap<String, String>,
    imports: IndexSet<String>,
}

impl ImportResolver {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            claimed: HashMap::new(),
            imports: IndexSet::new(),
        }
    }

    /// Force an import that generated code references unconditionally.
    pub fn require(&mut self, fqn: &str) {
        if let Some((_, simple)) = fqn.rsplit_once('.') {
            self.claimed
                .entry(simple.to_string())
                .or_insert_with(|| fqn.to_string());
        }
        self.imports.insert(fqn.to_string());
    }

    /// Rewrite a type to its shortest unambiguous spelling, recording
    /// any import this requires.
    pub fn resolve(&mut self, ty: &CodeType) -> CodeType {
        match ty {
            CodeType::Simple(name) => CodeType::Simple(self.resolve_name(name)),
            CodeType::Nullable(inner) => self.resolve(inner).nullable(),
            CodeType::Generic { name, args } => CodeType::Generic {
                name: self.resolve_name(name),
                args: args.iter().map(|a| self.resolve(a)).collect(),
            },
            CodeType::Lambda {
                params,
                ret,
                is_suspend,
            } => CodeType::Lambda {
                params: params.iter().map(|p| self.resolve(p)).collect(),
                ret: Box::new(self.resolve(ret)),
                is_suspend: *is_suspend,
            },
        }
    }

    fn resolve_name(&mut self, name: &str) -> String {
        let (variance, bare) = match name.rsplit_once(' ') {
            Some((variance, bare)) => (Some(variance), bare),
            None => (None, name),
        };
        let shortened = self.shorten(bare);
        match variance {
            Some(variance) => format!("{} {}", variance, shortened),
            None => shortened,
        }
    }

    fn shorten(&mut self, name: &str) -> String {
        let Some((package, simple)) = name.rsplit_once('.') else {
            return name.to_string();
        };
        match self.claimed.get(simple) {
            // Another type already owns this simple name
            Some(owner) if owner != name => return name.to_string(),
            _ => {}
        }
        self.claimed.insert(simple.to_string(), name.to_string());
        if package != self.package && !DEFAULT_IMPORT_PACKAGES.contains(&package) {
            self.imports.insert(name.to_string());
        }
        simple.to_string()
    }

    pub fn into_imports(self) -> IndexSet<String> {
        self.imports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codemodel::type_parser::parse_type;

    fn resolve_text(resolver: &mut ImportResolver, text: &str) -> String {
        resolver.resolve(&parse_type(text).unwrap()).render()
    }

    #[test]
    fn shortens_and_imports_foreign_types() {
        let mut resolver = ImportResolver::new("com.example");
        assert_eq!(resolve_text(&mut resolver, "com.acme.User"), "User");
        assert_eq!(
            resolve_text(&mut resolver, "kotlin.collections.List<com.acme.User>"),
            "List<User>"
        );
        let imports = resolver.into_imports();
        assert!(imports.contains("com.acme.User"));
        assert!(!imports.iter().any(|i| i.starts_with("kotlin.")));
    }

    #[test]
    fn same_package_types_need_no_import() {
        let mut resolver = ImportResolver::new("com.example");
        assert_eq!(resolve_text(&mut resolver, "com.example.Service"), "Service");
        assert!(resolver.into_imports().is_empty());
    }

    #[test]
    fn conflicting_simple_names_stay_qualified() {
        let mut resolver = ImportResolver::new("p");
        assert_eq!(resolve_text(&mut resolver, "a.Thing"), "Thing");
        assert_eq!(resolve_text(&mut resolver, "b.Thing"), "b.Thing");
        let imports = resolver.into_imports();
        assert!(imports.contains("a.Thing"));
        assert!(!imports.contains("b.Thing"));
    }
}
