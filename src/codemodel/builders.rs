//! By-value builders for the immutable code model.
//!
//! Builders accumulate state through fluent calls and materialize with
//! `build()`. They never share mutable state; composing a file is a
//! matter of returning values into the enclosing builder.

use indexmap::IndexSet;

use super::model::{
    ClassKind, CodeBlock, CodeClass, CodeDeclaration, CodeExpression, CodeFile, CodeFunction,
    CodeMember, CodeModifier, CodeParameter, CodeProperty, CodeSupertype, CodeType,
    CodeTypeParameter,
};

#[derive(Debug, Clone)]
pub struct FileBuilder {
    package: String,
    imports: IndexSet<String>,
    declarations: Vec<CodeDeclaration>,
}

impl FileBuilder {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            imports: IndexSet::new(),
            declarations: Vec::new(),
        }
    }

    pub fn add_import(mut self, fqn: impl Into<String>) -> Self {
        self.imports.insert(fqn.into());
        self
    }

    pub fn add_imports<I: IntoIterator<Item = String>>(mut self, fqns: I) -> Self {
        self.imports.extend(fqns);
        self
    }

    pub fn add_class(mut self, class: CodeClass) -> Self {
        self.declarations.push(CodeDeclaration::Class(class));
        self
    }

    pub fn add_function(mut self, function: CodeFunction) -> Self {
        self.declarations.push(CodeDeclaration::Function(function));
        self
    }

    pub fn add_property(mut self, property: CodeProperty) -> Self {
        self.declarations.push(CodeDeclaration::Property(property));
        self
    }

    pub fn build(self) -> CodeFile {
        CodeFile {
            package: self.package,
            imports: self.imports,
            declarations: self.declarations,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassBuilder {
    name: String,
    kind: ClassKind,
    modifiers: Vec<CodeModifier>,
    annotations: Vec<String>,
    type_parameters: Vec<CodeTypeParameter>,
    constructor_params: Vec<CodeParameter>,
    supertypes: Vec<CodeSupertype>,
    members: Vec<CodeMember>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            modifiers: Vec::new(),
            annotations: Vec::new(),
            type_parameters: Vec::new(),
            constructor_params: Vec::new(),
            supertypes: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn object(mut self) -> Self {
        self.kind = ClassKind::Object;
        self
    }

    pub fn modifier(mut self, modifier: CodeModifier) -> Self {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
        self
    }

    pub fn annotation(mut self, text: impl Into<String>) -> Self {
        self.annotations.push(text.into());
        self
    }

    pub fn type_parameter(mut self, tp: CodeTypeParameter) -> Self {
        self.type_parameters.push(tp);
        self
    }

    pub fn constructor_param(mut self, param: CodeParameter) -> Self {
        self.constructor_params.push(param);
        self
    }

    /// An interface reference in the supertype list.
    pub fn implements(mut self, ty: CodeType) -> Self {
        self.supertypes.push(CodeSupertype {
            ty,
            call_args: None,
        });
        self
    }

    /// A superclass constructor invocation in the supertype list.
    pub fn extends(mut self, ty: CodeType, call_args: Vec<String>) -> Self {
        self.supertypes.push(CodeSupertype {
            ty,
            call_args: Some(call_args),
        });
        self
    }

    pub fn property(mut self, property: CodeProperty) -> Self {
        self.members.push(CodeMember::Property(property));
        self
    }

    pub fn function(mut self, function: CodeFunction) -> Self {
        self.members.push(CodeMember::Function(function));
        self
    }

    pub fn nested_class(mut self, class: CodeClass) -> Self {
        self.members.push(CodeMember::Class(class));
        self
    }

    pub fn build(self) -> CodeClass {
        CodeClass {
            name: self.name,
            kind: self.kind,
            modifiers: self.modifiers,
            annotations: self.annotations,
            type_parameters: self.type_parameters,
            constructor_params: self.constructor_params,
            supertypes: self.supertypes,
            members: self.members,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionBuilder {
    name: String,
    modifiers: Vec<CodeModifier>,
    annotations: Vec<String>,
    type_parameters: Vec<CodeTypeParameter>,
    parameters: Vec<CodeParameter>,
    return_type: Option<CodeType>,
    body: Option<CodeBlock>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type: None,
            body: None,
        }
    }

    pub fn modifier(mut self, modifier: CodeModifier) -> Self {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
        self
    }

    pub fn annotation(mut self, text: impl Into<String>) -> Self {
        self.annotations.push(text.into());
        self
    }

    pub fn type_parameter(mut self, tp: CodeTypeParameter) -> Self {
        self.type_parameters.push(tp);
        self
    }

    pub fn parameter(mut self, param: CodeParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn returns(mut self, ty: CodeType) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn body_statements<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body = Some(CodeBlock::Statements(
            lines.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn body_expression(mut self, expr: CodeExpression) -> Self {
        self.body = Some(CodeBlock::Expression(expr));
        self
    }

    pub fn build(self) -> CodeFunction {
        CodeFunction {
            name: self.name,
            modifiers: self.modifiers,
            annotations: self.annotations,
            type_parameters: self.type_parameters,
            parameters: self.parameters,
            return_type: self.return_type,
            body: self.body,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    name: String,
    modifiers: Vec<CodeModifier>,
    annotations: Vec<String>,
    mutable: bool,
    ty: CodeType,
    initializer: Option<CodeExpression>,
    getter: Option<CodeBlock>,
    setter: Option<CodeBlock>,
}

impl PropertyBuilder {
    pub fn val(name: impl Into<String>, ty: CodeType) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
            mutable: false,
            ty,
            initializer: None,
            getter: None,
            setter: None,
        }
    }

    pub fn var(name: impl Into<String>, ty: CodeType) -> Self {
        Self {
            mutable: true,
            ..Self::val(name, ty)
        }
    }

    pub fn modifier(mut self, modifier: CodeModifier) -> Self {
        if !self.modifiers.contains(&modifier) {
            self.modifiers.push(modifier);
        }
        self
    }

    pub fn annotation(mut self, text: impl Into<String>) -> Self {
        self.annotations.push(text.into());
        self
    }

    pub fn initializer(mut self, expr: CodeExpression) -> Self {
        self.initializer = Some(expr);
        self
    }

    pub fn getter(mut self, block: CodeBlock) -> Self {
        self.getter = Some(block);
        self
    }

    pub fn setter(mut self, block: CodeBlock) -> Self {
        self.setter = Some(block);
        self
    }

    pub fn build(self) -> CodeProperty {
        CodeProperty {
            name: self.name,
            modifiers: self.modifiers,
            annotations: self.annotations,
            mutable: self.mutable,
            ty: self.ty,
            initializer: self.initializer,
            getter: self.getter,
            setter: self.setter,
        }
    }
}
