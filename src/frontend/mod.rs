// Front-end - validation, extraction and diagnostics

pub mod checker;
pub mod diagnostics;
pub mod extract;
pub mod resolution;
pub mod source_text;

pub use checker::FrontendChecker;
pub use extract::Extractor;
pub use resolution::{DeclRef, ResolvedUnit};
pub use source_text::SourceText;
