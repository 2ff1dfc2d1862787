//! Serializable mirrors of the metadata records.
//!
//! These are the on-disk form shared across sibling compilations. All
//! type references are normalized strings so the document is
//! self-contained and independent of any compiler data structures.

use serde::{Deserialize, Serialize};

use super::{
    ClassId, ClassMetadata, FunctionInfo, InterfaceMetadata, ParameterInfo, PropertyInfo,
    TypeParameterInfo,
};
use crate::metadata::class_id::ClassIdError;

/// Schema version of the cache document. Bump on any shape change; a
/// mismatch rejects the cache wholesale.
pub const METADATA_CACHE_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableTypeParameter {
    pub name: String,
    pub bounds: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
    pub is_mutable: bool,
    pub is_nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
    pub has_default_value: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value_source: Option<String>,
    pub is_vararg: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableFunction {
    pub name: String,
    pub parameters: Vec<SerializableParameter>,
    pub return_type: String,
    pub is_suspend: bool,
    pub is_inline: bool,
    pub type_parameters: Vec<SerializableTypeParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableInterfaceRecord {
    pub class_id_string: String,
    pub simple_name: String,
    pub package_name: String,
    pub type_parameters: Vec<SerializableTypeParameter>,
    pub properties: Vec<SerializableProperty>,
    pub functions: Vec<SerializableFunction>,
    pub inherited_properties: Vec<SerializableProperty>,
    pub inherited_functions: Vec<SerializableFunction>,
    pub source_file_path: String,
    pub source_file_signature: String,
    pub validation_time_nanos: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableClassRecord {
    pub class_id_string: String,
    pub simple_name: String,
    pub package_name: String,
    pub type_parameters: Vec<SerializableTypeParameter>,
    pub constructor_parameters: Vec<SerializableParameter>,
    pub abstract_properties: Vec<SerializableProperty>,
    pub open_properties: Vec<SerializableProperty>,
    pub abstract_methods: Vec<SerializableFunction>,
    pub open_methods: Vec<SerializableFunction>,
    pub source_file_path: String,
    pub source_file_signature: String,
    pub validation_time_nanos: u64,
}

/// The cache document written by producer mode and read by consumer mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataCacheFile {
    pub version: u32,
    pub cache_signature: String,
    pub total_fir_time_nanos: u64,
    pub interfaces: Vec<SerializableInterfaceRecord>,
    pub classes: Vec<SerializableClassRecord>,
}

impl From<&TypeParameterInfo> for SerializableTypeParameter {
    fn from(tp: &TypeParameterInfo) -> Self {
        Self {
            name: tp.name.clone(),
            bounds: tp.bounds.clone(),
        }
    }
}

impl From<&SerializableTypeParameter> for TypeParameterInfo {
    fn from(tp: &SerializableTypeParameter) -> Self {
        Self {
            name: tp.name.clone(),
            bounds: tp.bounds.clone(),
        }
    }
}

impl From<&PropertyInfo> for SerializableProperty {
    fn from(p: &PropertyInfo) -> Self {
        Self {
            name: p.name.clone(),
            type_text: p.type_text.clone(),
            is_mutable: p.is_mutable,
            is_nullable: p.is_nullable,
        }
    }
}

impl From<&SerializableProperty> for PropertyInfo {
    fn from(p: &SerializableProperty) -> Self {
        Self {
            name: p.name.clone(),
            type_text: p.type_text.clone(),
            is_mutable: p.is_mutable,
            is_nullable: p.is_nullable,
        }
    }
}

impl From<&ParameterInfo> for SerializableParameter {
    fn from(p: &ParameterInfo) -> Self {
        Self {
            name: p.name.clone(),
            type_text: p.type_text.clone(),
            has_default_value: p.has_default,
            default_value_source: p.default_source.clone(),
            is_vararg: p.is_vararg,
        }
    }
}

impl From<&SerializableParameter> for ParameterInfo {
    fn from(p: &SerializableParameter) -> Self {
        Self {
            name: p.name.clone(),
            type_text: p.type_text.clone(),
            has_default: p.has_default_value,
            default_source: p.default_value_source.clone(),
            is_vararg: p.is_vararg,
        }
    }
}

impl From<&FunctionInfo> for SerializableFunction {
    fn from(f: &FunctionInfo) -> Self {
        Self {
            name: f.name.clone(),
            parameters: f.parameters.iter().map(Into::into).collect(),
            return_type: f.return_type.clone(),
            is_suspend: f.is_suspend,
            is_inline: f.is_inline,
            type_parameters: f.type_parameters.iter().map(Into::into).collect(),
        }
    }
}

impl From<&SerializableFunction> for FunctionInfo {
    fn from(f: &SerializableFunction) -> Self {
        Self {
            name: f.name.clone(),
            parameters: f.parameters.iter().map(Into::into).collect(),
            return_type: f.return_type.clone(),
            is_suspend: f.is_suspend,
            is_inline: f.is_inline,
            type_parameters: f.type_parameters.iter().map(Into::into).collect(),
        }
    }
}

impl SerializableInterfaceRecord {
    pub fn from_metadata(meta: &InterfaceMetadata, source_file_signature: String) -> Self {
        Self {
            class_id_string: meta.class_id.as_canonical_string(),
            simple_name: meta.simple_name.clone(),
            package_name: meta.package_name.clone(),
            type_parameters: meta.type_parameters.iter().map(Into::into).collect(),
            properties: meta.properties.iter().map(Into::into).collect(),
            functions: meta.functions.iter().map(Into::into).collect(),
            inherited_properties: meta.inherited_properties.iter().map(Into::into).collect(),
            inherited_functions: meta.inherited_functions.iter().map(Into::into).collect(),
            source_file_path: meta.source_file_path.clone(),
            source_file_signature,
            validation_time_nanos: meta.validation_time_nanos,
        }
    }

    /// Materialize into in-memory metadata. A cache hit never carries a
    /// validation time, so it is forced to zero here.
    pub fn into_metadata(&self) -> Result<InterfaceMetadata, ClassIdError> {
        let class_id = ClassId::parse(&self.class_id_string)?;
        Ok(InterfaceMetadata {
            class_id,
            simple_name: self.simple_name.clone(),
            package_name: self.package_name.clone(),
            type_parameters: self.type_parameters.iter().map(Into::into).collect(),
            properties: self.properties.iter().map(Into::into).collect(),
            functions: self.functions.iter().map(Into::into).collect(),
            inherited_properties: self.inherited_properties.iter().map(Into::into).collect(),
            inherited_functions: self.inherited_functions.iter().map(Into::into).collect(),
            source_file_path: self.source_file_path.clone(),
            validation_time_nanos: 0,
        })
    }
}

impl SerializableClassRecord {
    pub fn from_metadata(meta: &ClassMetadata, source_file_signature: String) -> Self {
        Self {
            class_id_string: meta.class_id.as_canonical_string(),
            simple_name: meta.simple_name.clone(),
            package_name: meta.package_name.clone(),
            type_parameters: meta.type_parameters.iter().map(Into::into).collect(),
            constructor_parameters: meta.constructor_params.iter().map(Into::into).collect(),
            abstract_properties: meta.abstract_properties.iter().map(Into::into).collect(),
            open_properties: meta.open_properties.iter().map(Into::into).collect(),
            abstract_methods: meta.abstract_methods.iter().map(Into::into).collect(),
            open_methods: meta.open_methods.iter().map(Into::into).collect(),
            source_file_path: meta.source_file_path.clone(),
            source_file_signature,
            validation_time_nanos: meta.validation_time_nanos,
        }
    }

    pub fn into_metadata(&self) -> Result<ClassMetadata, ClassIdError> {
        let class_id = ClassId::parse(&self.class_id_string)?;
        Ok(ClassMetadata {
            class_id,
            simple_name: self.simple_name.clone(),
            package_name: self.package_name.clone(),
            type_parameters: self.type_parameters.iter().map(Into::into).collect(),
            constructor_params: self.constructor_parameters.iter().map(Into::into).collect(),
            abstract_properties: self.abstract_properties.iter().map(Into::into).collect(),
            open_properties: self.open_properties.iter().map(Into::into).collect(),
            abstract_methods: self.abstract_methods.iter().map(Into::into).collect(),
            open_methods: self.open_methods.iter().map(Into::into).collect(),
            source_file_path: self.source_file_path.clone(),
            validation_time_nanos: 0,
        })
    }
}

impl MetadataCacheFile {
    /// Sum of the stored validation times, for telemetry bookkeeping.
    pub fn stored_validation_nanos(&self) -> u64 {
        self.interfaces
            .iter()
            .map(|r| r.validation_time_nanos)
            .chain(self.classes.iter().map(|r| r.validation_time_nanos))
            .sum()
    }
}
