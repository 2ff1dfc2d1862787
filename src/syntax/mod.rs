// Syntax module - declaration-surface parser supplying the tree the
// front-end validates

pub mod ast;
pub mod helpers;
pub mod parser;

pub use ast::{
    DeclKind, Declaration, FunctionDecl, Import, Member, Modality, ParamDecl, PropertyDecl,
    SourceFile, SupertypeRef, TypeParamDecl,
};
pub use parser::SyntaxError;

use parser::DeclarationParser;

/// Facade over the declaration parser.
#[derive(Debug, Default)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, path: &str, source: &str) -> Result<SourceFile, SyntaxError> {
        DeclarationParser::new(path, source).parse()
    }
}
