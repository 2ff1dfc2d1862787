// Metadata model - language-neutral descriptions of fakeable declarations

pub mod class_id;
pub mod serial;

pub use class_id::ClassId;

/// A declared type parameter with its upper bounds in normalized textual
/// form. Variance markers (`in`/`out`) are preserved as part of `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameterInfo {
    pub name: String,
    pub bounds: Vec<String>,
}

impl TypeParameterInfo {
    /// The parameter name with any variance marker stripped.
    pub fn bare_name(&self) -> &str {
        self.name
            .rsplit(' ')
            .next()
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    pub name: String,
    pub type_text: String,
    pub is_mutable: bool,
    pub is_nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    pub name: String,
    pub type_text: String,
    pub has_default: bool,
    pub default_source: Option<String>,
    pub is_vararg: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: String,
    pub parameters: Vec<ParameterInfo>,
    pub return_type: String,
    pub is_suspend: bool,
    pub is_inline: bool,
    pub type_parameters: Vec<TypeParameterInfo>,
}

impl FunctionInfo {
    /// Signature used for override deduplication: name plus the ordered
    /// parameter type list.
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.parameters.iter().map(|p| p.type_text.as_str()).collect();
        format!("{}({})", self.name, params.join(","))
    }
}

/// Extracted metadata for an annotated interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceMetadata {
    pub class_id: ClassId,
    pub simple_name: String,
    pub package_name: String,
    pub type_parameters: Vec<TypeParameterInfo>,
    pub properties: Vec<PropertyInfo>,
    pub functions: Vec<FunctionInfo>,
    pub inherited_properties: Vec<PropertyInfo>,
    pub inherited_functions: Vec<FunctionInfo>,
    pub source_file_path: String,
    pub validation_time_nanos: u64,
}

/// Extracted metadata for an annotated open/abstract class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMetadata {
    pub class_id: ClassId,
    pub simple_name: String,
    pub package_name: String,
    pub type_parameters: Vec<TypeParameterInfo>,
    pub constructor_params: Vec<ParameterInfo>,
    pub abstract_properties: Vec<PropertyInfo>,
    pub open_properties: Vec<PropertyInfo>,
    pub abstract_methods: Vec<FunctionInfo>,
    pub open_methods: Vec<FunctionInfo>,
    pub source_file_path: String,
    pub validation_time_nanos: u64,
}

/// The extracted, host-independent description of a fakeable declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedDeclaration {
    Interface(InterfaceMetadata),
    Class(ClassMetadata),
}

impl ValidatedDeclaration {
    pub fn class_id(&self) -> &ClassId {
        match self {
            ValidatedDeclaration::Interface(i) => &i.class_id,
            ValidatedDeclaration::Class(c) => &c.class_id,
        }
    }

    /// Fully-qualified dotted name, unique per store.
    pub fn fqn(&self) -> String {
        self.class_id().fqn()
    }

    pub fn simple_name(&self) -> &str {
        match self {
            ValidatedDeclaration::Interface(i) => &i.simple_name,
            ValidatedDeclaration::Class(c) => &c.simple_name,
        }
    }

    pub fn package_name(&self) -> &str {
        match self {
            ValidatedDeclaration::Interface(i) => &i.package_name,
            ValidatedDeclaration::Class(c) => &c.package_name,
        }
    }

    pub fn type_parameters(&self) -> &[TypeParameterInfo] {
        match self {
            ValidatedDeclaration::Interface(i) => &i.type_parameters,
            ValidatedDeclaration::Class(c) => &c.type_parameters,
        }
    }

    pub fn source_file_path(&self) -> &str {
        match self {
            ValidatedDeclaration::Interface(i) => &i.source_file_path,
            ValidatedDeclaration::Class(c) => &c.source_file_path,
        }
    }

    pub fn validation_time_nanos(&self) -> u64 {
        match self {
            ValidatedDeclaration::Interface(i) => i.validation_time_nanos,
            ValidatedDeclaration::Class(c) => c.validation_time_nanos,
        }
    }

    /// Total number of fakeable members carried by this declaration.
    pub fn member_count(&self) -> usize {
        match self {
            ValidatedDeclaration::Interface(i) => {
                i.properties.len()
                    + i.functions.len()
                    + i.inherited_properties.len()
                    + i.inherited_functions.len()
            }
            ValidatedDeclaration::Class(c) => {
                c.abstract_properties.len()
                    + c.open_properties.len()
                    + c.abstract_methods.len()
                    + c.open_methods.len()
            }
        }
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, ValidatedDeclaration::Interface(_))
    }
}
