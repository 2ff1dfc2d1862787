// Code model - immutable representation of the Kotlin source to emit

pub mod builders;
pub mod model;
pub mod render;
pub mod type_parser;

pub use builders::{ClassBuilder, FileBuilder, FunctionBuilder, PropertyBuilder};
pub use model::{
    ClassKind, CodeBlock, CodeClass, CodeDeclaration, CodeExpression, CodeFile, CodeFunction,
    CodeMember, CodeModifier, CodeParameter, CodeProperty, CodeSupertype, CodeType,
    CodeTypeParameter,
};
pub use render::render_file;
pub use type_parser::{parse_type, TypeParseError};
