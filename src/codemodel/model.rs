use indexmap::IndexSet;

/// A type reference in emitted source.
///
/// This is a sum over the syntactic forms the generator needs: plain
/// (possibly qualified) names, nullable wrappers, generic applications,
/// and function types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodeType {
    Simple(String),
    Nullable(Box<CodeType>),
    Generic { name: String, args: Vec<CodeType> },
    Lambda {
        params: Vec<CodeType>,
        ret: Box<CodeType>,
        is_suspend: bool,
    },
}

impl CodeType {
    pub fn simple(name: impl Into<String>) -> Self {
        CodeType::Simple(name.into())
    }

    pub fn generic(name: impl Into<String>, args: Vec<CodeType>) -> Self {
        CodeType::Generic {
            name: name.into(),
            args,
        }
    }

    pub fn lambda(params: Vec<CodeType>, ret: CodeType, is_suspend: bool) -> Self {
        CodeType::Lambda {
            params,
            ret: Box::new(ret),
            is_suspend,
        }
    }

    /// Wrap in a nullable marker unless already nullable.
    pub fn nullable(self) -> Self {
        match self {
            CodeType::Nullable(_) => self,
            other => CodeType::Nullable(Box::new(other)),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, CodeType::Nullable(_))
    }

    /// The head name of the type, ignoring nullability. Function types
    /// have no head name.
    pub fn head_name(&self) -> Option<&str> {
        match self {
            CodeType::Simple(name) => Some(name),
            CodeType::Generic { name, .. } => Some(name),
            CodeType::Nullable(inner) => inner.head_name(),
            CodeType::Lambda { .. } => None,
        }
    }

    /// Rendered textual form, e.g. `Map<String, Int>?`.
    pub fn render(&self) -> String {
        match self {
            CodeType::Simple(name) => name.clone(),
            CodeType::Nullable(inner) => match inner.as_ref() {
                // Function types need parentheses before the `?`
                CodeType::Lambda { .. } => format!("({})?", inner.render()),
                other => format!("{}?", other.render()),
            },
            CodeType::Generic { name, args } => {
                let rendered: Vec<String> = args.iter().map(CodeType::render).collect();
                format!("{}<{}>", name, rendered.join(", "))
            }
            CodeType::Lambda {
                params,
                ret,
                is_suspend,
            } => {
                let rendered: Vec<String> = params.iter().map(CodeType::render).collect();
                let prefix = if *is_suspend { "suspend " } else { "" };
                format!("{}({}) -> {}", prefix, rendered.join(", "), ret.render())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeModifier {
    Public,
    Internal,
    Private,
    Protected,
    Abstract,
    Open,
    Override,
    Data,
    Suspend,
    Inline,
}

impl CodeModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeModifier::Public => "public",
            CodeModifier::Internal => "internal",
            CodeModifier::Private => "private",
            CodeModifier::Protected => "protected",
            CodeModifier::Abstract => "abstract",
            CodeModifier::Open => "open",
            CodeModifier::Override => "override",
            CodeModifier::Data => "data",
            CodeModifier::Suspend => "suspend",
            CodeModifier::Inline => "inline",
        }
    }
}

/// Type parameter on a class or function. `name` may carry a variance
/// marker as written (`out T`); bounds render inline for a single bound
/// and through a `where` clause when there is more than one.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTypeParameter {
    pub name: String,
    pub bounds: Vec<CodeType>,
}

impl CodeTypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bare_name(&self) -> &str {
        self.name.rsplit(' ').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeParameter {
    pub name: String,
    pub ty: CodeType,
    /// Verbatim default-value source text.
    pub default: Option<String>,
    pub vararg: bool,
    /// Leading keywords on constructor parameters, e.g. `private val`.
    pub markers: Vec<String>,
}

impl CodeParameter {
    pub fn new(name: impl Into<String>, ty: CodeType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            vararg: false,
            markers: Vec::new(),
        }
    }

    pub fn with_default(mut self, source: impl Into<String>) -> Self {
        self.default = Some(source.into());
        self
    }

    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markers = markers.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodeExpression {
    StringLit(String),
    NumberLit(String),
    BoolLit(bool),
    NullLit,
    Name(String),
    Call {
        target: Box<CodeExpression>,
        args: Vec<CodeExpression>,
    },
    Lambda {
        params: Vec<String>,
        body: Box<CodeExpression>,
    },
    PropertyAccess {
        receiver: Box<CodeExpression>,
        name: String,
    },
    When {
        subject: Option<Box<CodeExpression>>,
        branches: Vec<(String, CodeExpression)>,
    },
    /// Pre-rendered expression text, emitted verbatim. An empty raw
    /// expression renders to nothing (used for empty lambda bodies).
    Raw(String),
}

impl CodeExpression {
    pub fn call(target: impl Into<String>, args: Vec<CodeExpression>) -> Self {
        CodeExpression::Call {
            target: Box::new(CodeExpression::Name(target.into())),
            args,
        }
    }

    pub fn lambda(params: Vec<String>, body: CodeExpression) -> Self {
        CodeExpression::Lambda {
            params,
            body: Box::new(body),
        }
    }

    pub fn empty() -> Self {
        CodeExpression::Raw(String::new())
    }
}

/// A function or accessor body: either pre-rendered statement lines or a
/// single expression.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeBlock {
    Statements(Vec<String>),
    Expression(CodeExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeProperty {
    pub name: String,
    pub modifiers: Vec<CodeModifier>,
    pub annotations: Vec<String>,
    pub mutable: bool,
    pub ty: CodeType,
    pub initializer: Option<CodeExpression>,
    /// Custom accessor bodies; when present the property has no backing
    /// initializer line of its own.
    pub getter: Option<CodeBlock>,
    pub setter: Option<CodeBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeFunction {
    pub name: String,
    pub modifiers: Vec<CodeModifier>,
    pub annotations: Vec<String>,
    pub type_parameters: Vec<CodeTypeParameter>,
    pub parameters: Vec<CodeParameter>,
    pub return_type: Option<CodeType>,
    pub body: Option<CodeBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Object,
}

/// A supertype entry in a class header. `call_args` is `Some` when the
/// entry is a superclass constructor invocation (possibly with zero
/// arguments) rather than an interface reference.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeSupertype {
    pub ty: CodeType,
    pub call_args: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodeMember {
    Property(CodeProperty),
    Function(CodeFunction),
    Class(CodeClass),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeClass {
    pub name: String,
    pub kind: ClassKind,
    pub modifiers: Vec<CodeModifier>,
    pub annotations: Vec<String>,
    pub type_parameters: Vec<CodeTypeParameter>,
    pub constructor_params: Vec<CodeParameter>,
    pub supertypes: Vec<CodeSupertype>,
    pub members: Vec<CodeMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodeDeclaration {
    Class(CodeClass),
    Function(CodeFunction),
    Property(CodeProperty),
}

/// A complete source file. Imports are deduplicated and keep insertion
/// order in the model; the renderer sorts them lexicographically.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeFile {
    pub package: String,
    pub imports: IndexSet<String>,
    pub declarations: Vec<CodeDeclaration>,
}
