//! Member extraction: declaration tree in, language-neutral metadata out.
//!
//! Types are textualized as qualified forms resolved against the unit;
//! the transitive supertype walk substitutes type arguments and
//! deduplicates by member signature with the most-derived override
//! winning. Members of the universal top type are never extracted.

use std::collections::{HashMap, HashSet};

use log::trace;

use crate::codemodel::model::CodeType;
use crate::codemodel::type_parser::parse_type;
use crate::frontend::diagnostics::{Diagnostic, DiagnosticCode};
use crate::frontend::resolution::{DeclRef, ResolvedUnit};
use crate::metadata::{
    ClassId, ClassMetadata, FunctionInfo, InterfaceMetadata, ParameterInfo, PropertyInfo,
    TypeParameterInfo,
};
use crate::syntax::ast::{DeclKind, FunctionDecl, Member, PropertyDecl, SourceFile};

/// An inherited member with its abstract/open classification.
struct InheritedFunction {
    info: FunctionInfo,
    is_abstract: bool,
}

struct InheritedProperty {
    info: PropertyInfo,
    is_abstract: bool,
}

pub struct Extractor<'u, 'a> {
    unit: &'u ResolvedUnit<'a>,
}

impl<'u, 'a> Extractor<'u, 'a> {
    pub fn new(unit: &'u ResolvedUnit<'a>) -> Self {
        Self { unit }
    }

    pub fn extract_interface(
        &self,
        reference: DeclRef<'a>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> InterfaceMetadata {
        let decl = reference.decl;
        let file = reference.file;
        let scope = scope_of(decl.type_parameters.iter().map(|p| p.bare_name.clone()));
        let mut properties = Vec::new();
        let mut functions = Vec::new();
        let mut seen_props = HashSet::new();
        let mut seen_funcs = HashSet::new();
        for member in &decl.members {
            match member {
                Member::Property(p) => {
                    if let Some(info) = self.property_info(p, file, &scope) {
                        seen_props.insert(info.name.clone());
                        properties.push(info);
                    }
                }
                Member::Function(f) => {
                    if is_universal(f) {
                        self.note_universal(reference, f, diagnostics);
                        let info = self.function_info(f, file, &scope);
                        seen_funcs.insert(info.signature());
                        continue;
                    }
                    let info = self.function_info(f, file, &scope);
                    seen_funcs.insert(info.signature());
                    functions.push(info);
                }
            }
        }
        let (inherited_properties, inherited_functions) =
            self.collect_inherited(reference, &scope, &mut seen_props, &mut seen_funcs);
        InterfaceMetadata {
            class_id: ClassId::new(&file.package, &decl.name),
            simple_name: decl.simple_name().to_string(),
            package_name: file.package.clone(),
            type_parameters: self.type_parameter_infos(decl, file, &scope),
            properties,
            functions,
            inherited_properties: inherited_properties.into_iter().map(|p| p.info).collect(),
            inherited_functions: inherited_functions.into_iter().map(|f| f.info).collect(),
            source_file_path: file.path.clone(),
            validation_time_nanos: 0,
        }
    }

    pub fn extract_class(
        &self,
        reference: DeclRef<'a>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ClassMetadata {
        let decl = reference.decl;
        let file = reference.file;
        let scope = scope_of(decl.type_parameters.iter().map(|p| p.bare_name.clone()));
        let mut abstract_properties = Vec::new();
        let mut open_properties = Vec::new();
        let mut abstract_methods = Vec::new();
        let mut open_methods = Vec::new();
        let mut seen_props = HashSet::new();
        let mut seen_funcs = HashSet::new();
        for member in &decl.members {
            match member {
                Member::Property(p) => {
                    let Some(info) = self.property_info(p, file, &scope) else {
                        continue;
                    };
                    // Every declared member blocks inheritance of the
                    // same name, including final overrides
                    seen_props.insert(info.name.clone());
                    if p.is_abstract {
                        abstract_properties.push(info);
                    } else if is_open_member(p.is_open, p.is_override, p.is_final) {
                        open_properties.push(info);
                    }
                }
                Member::Function(f) => {
                    let info = self.function_info(f, file, &scope);
                    seen_funcs.insert(info.signature());
                    if is_universal(f) {
                        self.note_universal(reference, f, diagnostics);
                        continue;
                    }
                    if f.is_abstract {
                        abstract_methods.push(info);
                    } else if is_open_member(f.is_open, f.is_override, f.is_final) {
                        open_methods.push(info);
                    }
                }
            }
        }
        let (inherited_properties, inherited_functions) =
            self.collect_inherited(reference, &scope, &mut seen_props, &mut seen_funcs);
        for inherited in inherited_properties {
            if inherited.is_abstract {
                abstract_properties.push(inherited.info);
            } else {
                open_properties.push(inherited.info);
            }
        }
        for inherited in inherited_functions {
            if inherited.is_abstract {
                abstract_methods.push(inherited.info);
            } else {
                open_methods.push(inherited.info);
            }
        }
        let constructor_params: Vec<ParameterInfo> = decl
            .constructor_params
            .iter()
            .map(|p| ParameterInfo {
                name: p.name.clone(),
                type_text: self.normalize_type_text(&p.type_text, file, &scope),
                has_default: p.default_source.is_some(),
                default_source: p.default_source.clone(),
                is_vararg: p.is_vararg,
            })
            .collect();
        ClassMetadata {
            class_id: ClassId::new(&file.package, &decl.name),
            simple_name: decl.simple_name().to_string(),
            package_name: file.package.clone(),
            type_parameters: self.type_parameter_infos(decl, file, &scope),
            constructor_params,
            abstract_properties,
            open_properties,
            abstract_methods,
            open_methods,
            source_file_path: file.path.clone(),
            validation_time_nanos: 0,
        }
    }

    fn type_parameter_infos(
        &self,
        decl: &crate::syntax::ast::Declaration,
        file: &SourceFile,
        scope: &[String],
    ) -> Vec<TypeParameterInfo> {
        decl.type_parameters
            .iter()
            .map(|tp| TypeParameterInfo {
                name: tp.name.clone(),
                bounds: tp
                    .bounds
                    .iter()
                    .map(|b| self.normalize_type_text(b, file, scope))
                    .collect(),
            })
            .collect()
    }

    fn note_universal(
        &self,
        reference: DeclRef<'a>,
        function: &FunctionDecl,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        // Only user-declared overrides with a body are worth surfacing
        if function.is_override && function.has_body {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::UniversalMemberSkipped,
                    format!(
                        "{} overrides universal member {}; it is excluded from the fake",
                        reference.decl.simple_name(),
                        function.name
                    ),
                )
                .for_declaration(reference.fqn()),
            );
        }
    }

    fn property_info(
        &self,
        property: &PropertyDecl,
        file: &SourceFile,
        scope: &[String],
    ) -> Option<PropertyInfo> {
        let Some(type_text) = &property.type_text else {
            // Inferred property types are not recoverable from the
            // declaration surface
            trace!("skipping property {} with inferred type", property.name);
            return None;
        };
        let normalized = self.normalize_type_text(type_text, file, scope);
        Some(PropertyInfo {
            name: property.name.clone(),
            is_nullable: is_nullable_text(&normalized),
            type_text: normalized,
            is_mutable: property.mutable,
        })
    }

    fn function_info(
        &self,
        function: &FunctionDecl,
        file: &SourceFile,
        class_scope: &[String],
    ) -> FunctionInfo {
        let mut scope: Vec<String> = class_scope.to_vec();
        scope.extend(function.type_parameters.iter().map(|p| p.bare_name.clone()));
        FunctionInfo {
            name: function.name.clone(),
            parameters: function
                .params
                .iter()
                .map(|p| ParameterInfo {
                    name: p.name.clone(),
                    type_text: self.normalize_type_text(&p.type_text, file, &scope),
                    has_default: p.default_source.is_some(),
                    default_source: p.default_source.clone(),
                    is_vararg: p.is_vararg,
                })
                .collect(),
            return_type: match &function.return_type_text {
                Some(text) => self.normalize_type_text(text, file, &scope),
                None => "Unit".to_string(),
            },
            is_suspend: function.is_suspend,
            is_inline: function.is_inline,
            type_parameters: function
                .type_parameters
                .iter()
                .map(|tp| TypeParameterInfo {
                    name: tp.name.clone(),
                    bounds: tp
                        .bounds
                        .iter()
                        .map(|b| self.normalize_type_text(b, file, &scope))
                        .collect(),
                })
                .collect(),
        }
    }

    /// Walk the transitive supertype graph in declaration order and
    /// collect members not already present in the seen sets.
    fn collect_inherited(
        &self,
        subject: DeclRef<'a>,
        subject_scope: &[String],
        seen_props: &mut HashSet<String>,
        seen_funcs: &mut HashSet<String>,
    ) -> (Vec<InheritedProperty>, Vec<InheritedFunction>) {
        let mut properties = Vec::new();
        let mut functions = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(subject.fqn());
        self.walk(
            subject,
            subject_scope,
            &HashMap::new(),
            seen_props,
            seen_funcs,
            &mut visited,
            &mut properties,
            &mut functions,
        );
        (properties, functions)
    }

    #[allow(clippy::too_many_arguments)]
    fn walk(
        &self,
        current: DeclRef<'a>,
        current_scope: &[String],
        subst: &HashMap<String, CodeType>,
        seen_props: &mut HashSet<String>,
        seen_funcs: &mut HashSet<String>,
        visited: &mut HashSet<String>,
        properties: &mut Vec<InheritedProperty>,
        functions: &mut Vec<InheritedFunction>,
    ) {
        for supertype in &current.decl.supertypes {
            let Ok(parsed) = parse_type(&supertype.type_text) else {
                continue;
            };
            let (head, args) = match &parsed {
                CodeType::Simple(name) => (name.clone(), Vec::new()),
                CodeType::Generic { name, args } => (name.clone(), args.clone()),
                _ => continue,
            };
            let bare = head.rsplit('.').next().unwrap_or(&head).to_string();
            let Some(super_ref) = self.unit.resolve_in_file(current.file, &bare) else {
                // The supertype lives outside the unit; the walk ends
                // here and metadata stays self-contained
                continue;
            };
            if !visited.insert(super_ref.fqn()) {
                continue;
            }
            // Map the supertype's own parameters to the (already
            // qualified and substituted) arguments at this use site
            let mut super_subst: HashMap<String, CodeType> = HashMap::new();
            for (param, arg) in super_ref.decl.type_parameters.iter().zip(args.iter()) {
                let qualified = self.qualify_type(arg, current.file, current_scope);
                super_subst.insert(param.bare_name.clone(), substitute(&qualified, subst));
            }
            let super_scope =
                scope_of(super_ref.decl.type_parameters.iter().map(|p| p.bare_name.clone()));
            let from_class = super_ref.decl.kind == DeclKind::Class;
            for member in &super_ref.decl.members {
                match member {
                    Member::Property(p) => {
                        if from_class
                            && !p.is_abstract
                            && !is_open_member(p.is_open, p.is_override, p.is_final)
                        {
                            continue;
                        }
                        let Some(info) = self.property_info(p, super_ref.file, &super_scope)
                        else {
                            continue;
                        };
                        let info = substitute_property(info, &super_subst);
                        if !seen_props.insert(info.name.clone()) {
                            continue;
                        }
                        let is_abstract = if from_class {
                            p.is_abstract
                        } else {
                            !p.has_initializer
                        };
                        properties.push(InheritedProperty {
                            info,
                            is_abstract,
                        });
                    }
                    Member::Function(f) => {
                        if is_universal(f) {
                            continue;
                        }
                        if from_class
                            && !f.is_abstract
                            && !is_open_member(f.is_open, f.is_override, f.is_final)
                        {
                            continue;
                        }
                        let info = self.function_info(f, super_ref.file, &super_scope);
                        let info = substitute_function(info, &super_subst);
                        if !seen_funcs.insert(info.signature()) {
                            continue;
                        }
                        let is_abstract = if from_class {
                            f.is_abstract
                        } else {
                            !f.has_body
                        };
                        functions.push(InheritedFunction {
                            info,
                            is_abstract,
                        });
                    }
                }
            }
            self.walk(
                super_ref,
                &super_scope,
                &super_subst,
                seen_props,
                seen_funcs,
                visited,
                properties,
                functions,
            );
        }
    }

    /// Qualified textual form with generics preserved; unparseable
    /// texts pass through trimmed.
    pub fn normalize_type_text(&self, text: &str, file: &SourceFile, scope: &[String]) -> String {
        match parse_type(text) {
            Ok(ty) => self.qualify_type(&ty, file, scope).render(),
            Err(_) => text.trim().to_string(),
        }
    }

    fn qualify_type(&self, ty: &CodeType, file: &SourceFile, scope: &[String]) -> CodeType {
        match ty {
            CodeType::Simple(name) => {
                CodeType::Simple(self.qualify_name(name, file, scope))
            }
            CodeType::Nullable(inner) => self.qualify_type(inner, file, scope).nullable(),
            CodeType::Generic { name, args } => CodeType::Generic {
                name: self.qualify_name(name, file, scope),
                args: args
                    .iter()
                    .map(|a| self.qualify_type(a, file, scope))
                    .collect(),
            },
            CodeType::Lambda {
                params,
                ret,
                is_suspend,
            } => CodeType::Lambda {
                params: params
                    .iter()
                    .map(|p| self.qualify_type(p, file, scope))
                    .collect(),
                ret: Box::new(self.qualify_type(ret, file, scope)),
                is_suspend: *is_suspend,
            },
        }
    }

    fn qualify_name(&self, name: &str, file: &SourceFile, scope: &[String]) -> String {
        let (prefix, bare) = match name.rsplit_once(' ') {
            Some((variance, bare)) => (Some(variance), bare),
            None => (None, name),
        };
        if bare == "*" || bare.contains('.') || scope.iter().any(|p| p == bare) {
            return name.to_string();
        }
        match self.unit.qualify(file, bare) {
            Some(fqn) => match prefix {
                Some(variance) => format!("{} {}", variance, fqn),
                None => fqn,
            },
            None => name.to_string(),
        }
    }
}

fn scope_of(names: impl Iterator<Item = String>) -> Vec<String> {
    names.collect()
}

fn is_open_member(is_open: bool, is_override: bool, is_final: bool) -> bool {
    (is_open || is_override) && !is_final
}

pub fn is_universal(function: &FunctionDecl) -> bool {
    matches!(
        (function.name.as_str(), function.params.len()),
        ("equals", 1) | ("hashCode", 0) | ("toString", 0)
    )
}

fn is_nullable_text(text: &str) -> bool {
    match parse_type(text) {
        Ok(ty) => ty.is_nullable(),
        Err(_) => text.trim_end().ends_with('?'),
    }
}

fn substitute(ty: &CodeType, subst: &HashMap<String, CodeType>) -> CodeType {
    if subst.is_empty() {
        return ty.clone();
    }
    match ty {
        CodeType::Simple(name) => match subst.get(name) {
            Some(replacement) => replacement.clone(),
            None => ty.clone(),
        },
        CodeType::Nullable(inner) => substitute(inner, subst).nullable(),
        CodeType::Generic { name, args } => CodeType::Generic {
            name: name.clone(),
            args: args.iter().map(|a| substitute(a, subst)).collect(),
        },
        CodeType::Lambda {
            params,
            ret,
            is_suspend,
        } => CodeType::Lambda {
            params: params.iter().map(|p| substitute(p, subst)).collect(),
            ret: Box::new(substitute(ret, subst)),
            is_suspend: *is_suspend,
        },
    }
}

fn substitute_text(text: &str, subst: &HashMap<String, CodeType>) -> String {
    if subst.is_empty() {
        return text.to_string();
    }
    match parse_type(text) {
        Ok(ty) => substitute(&ty, subst).render(),
        Err(_) => text.to_string(),
    }
}

fn substitute_property(info: PropertyInfo, subst: &HashMap<String, CodeType>) -> PropertyInfo {
    let type_text = substitute_text(&info.type_text, subst);
    PropertyInfo {
        is_nullable: is_nullable_text(&type_text),
        type_text,
        ..info
    }
}

fn substitute_function(info: FunctionInfo, subst: &HashMap<String, CodeType>) -> FunctionInfo {
    FunctionInfo {
        parameters: info
            .parameters
            .into_iter()
            .map(|p| ParameterInfo {
                type_text: substitute_text(&p.type_text, subst),
                ..p
            })
            .collect(),
        return_type: substitute_text(&info.return_type, subst),
        type_parameters: info
            .type_parameters
            .into_iter()
            .map(|tp| TypeParameterInfo {
                bounds: tp
                    .bounds
                    .iter()
                    .map(|b| substitute_text(b, subst))
                    .collect(),
                ..tp
            })
            .collect(),
        ..info
    }
}
