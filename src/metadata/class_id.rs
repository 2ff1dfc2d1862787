use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical identity of a declaration.
///
/// The on-disk form is `packageSegment/.../Relative.Name`: package
/// segments separated by `/`, with the final component being the dotted
/// relative class name (which encodes nesting, e.g. `Outer.Inner`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassId {
    package_segments: Vec<String>,
    relative_name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassIdError {
    #[error("class id string is empty")]
    Empty,
    #[error("class id {0:?} has an empty component")]
    EmptyComponent(String),
}

impl ClassId {
    /// Build from a dotted package name (possibly empty) and a dotted
    /// relative class name.
    pub fn new(package_name: &str, relative_name: &str) -> Self {
        let package_segments = if package_name.is_empty() {
            Vec::new()
        } else {
            package_name.split('.').map(str::to_string).collect()
        };
        Self {
            package_segments,
            relative_name: relative_name.to_string(),
        }
    }

    /// Parse the canonical `pkg/segments/Relative.Name` form back into a
    /// `ClassId`. The final `/`-separated component is the relative name.
    pub fn parse(canonical: &str) -> Result<Self, ClassIdError> {
        if canonical.is_empty() {
            return Err(ClassIdError::Empty);
        }
        let mut segments: Vec<String> = canonical.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ClassIdError::EmptyComponent(canonical.to_string()));
        }
        let relative_name = segments.pop().expect("non-empty split");
        Ok(Self {
            package_segments: segments,
            relative_name,
        })
    }

    pub fn as_canonical_string(&self) -> String {
        if self.package_segments.is_empty() {
            self.relative_name.clone()
        } else {
            format!("{}/{}", self.package_segments.join("/"), self.relative_name)
        }
    }

    /// Dotted package name; empty string for the root package.
    pub fn package_name(&self) -> String {
        self.package_segments.join(".")
    }

    pub fn package_segments(&self) -> &[String] {
        &self.package_segments
    }

    /// Dotted relative class name, e.g. `Outer.Inner`.
    pub fn relative_name(&self) -> &str {
        &self.relative_name
    }

    /// The innermost simple name.
    pub fn simple_name(&self) -> &str {
        self.relative_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.relative_name)
    }

    /// Fully-qualified dotted name.
    pub fn fqn(&self) -> String {
        if self.package_segments.is_empty() {
            self.relative_name.clone()
        } else {
            format!("{}.{}", self.package_segments.join("."), self.relative_name)
        }
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fqn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_round_trip() {
        let id = ClassId::new("com.example.app", "Outer.Inner");
        let canonical = id.as_canonical_string();
        assert_eq!(canonical, "com/example/app/Outer.Inner");
        let parsed = ClassId::parse(&canonical).unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.simple_name(), "Inner");
        assert_eq!(parsed.fqn(), "com.example.app.Outer.Inner");
    }

    #[test]
    fn root_package() {
        let id = ClassId::new("", "Thing");
        assert_eq!(id.as_canonical_string(), "Thing");
        let parsed = ClassId::parse("Thing").unwrap();
        assert_eq!(parsed.package_name(), "");
        assert_eq!(parsed.fqn(), "Thing");
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert_eq!(ClassId::parse(""), Err(ClassIdError::Empty));
        assert!(matches!(
            ClassId::parse("a//B"),
            Err(ClassIdError::EmptyComponent(_))
        ));
    }
}
