// Generator - fake classes, configuration DSLs and factories

pub mod imports;

use std::fs;
use std::path::PathBuf;

use log::{debug, info};
use thiserror::Error;

use crate::codemodel::builders::{ClassBuilder, FileBuilder, FunctionBuilder, PropertyBuilder};
use crate::codemodel::model::{
    CodeBlock, CodeExpression, CodeModifier, CodeParameter, CodeType, CodeTypeParameter,
};
use crate::codemodel::render::render_file;
use crate::codemodel::type_parser::parse_type;
use crate::context::CompilationContext;
use crate::defaults::{is_unit, DefaultValueStrategy};
use crate::frontend::diagnostics::{Diagnostic, DiagnosticCode};
use crate::generator::imports::ImportResolver;
use crate::metadata::{FunctionInfo, PropertyInfo, TypeParameterInfo, ValidatedDeclaration};
use crate::telemetry::summary::FakeMetrics;

const COUNTER_IMPORT: &str = "java.util.concurrent.atomic.AtomicInteger";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("package segment {0:?} cannot be mapped to an output path")]
    InvalidPackage(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct GeneratedFake {
    pub fqn: String,
    pub relative_path: PathBuf,
    pub content: String,
    pub metrics: FakeMetrics,
}

/// One fakeable member in emission order.
enum FakeMember<'m> {
    Function(&'m FunctionInfo),
    Property(&'m PropertyInfo),
}

struct PlannedMember<'m> {
    member: FakeMember<'m>,
    /// Open members delegate to the superclass implementation when
    /// unconfigured; abstract members fall back to a default value.
    is_open: bool,
    behavior_name: String,
    setter_behavior_name: String,
    counter_backing: String,
    counter_view: String,
}

pub struct FakeGenerator<'c> {
    ctx: &'c CompilationContext,
}

impl<'c> FakeGenerator<'c> {
    pub fn new(ctx: &'c CompilationContext) -> Self {
        Self { ctx }
    }

    /// Generate and write one file per stored declaration. Emission
    /// failures are reported per declaration and never abort the run.
    pub fn generate_all(&self) -> Vec<GeneratedFake> {
        let Some(output_dir) = self.ctx.options.output_dir.clone() else {
            return Vec::new();
        };
        let mut generated = Vec::new();
        for declaration in self.ctx.store.snapshot() {
            let fake = self.build_fake(&declaration);
            let target = output_dir.join(&fake.relative_path);
            match self.write_fake(&fake) {
                Ok(()) => {
                    debug!("wrote {}", target.display());
                    generated.push(fake);
                }
                Err(err) => {
                    self.ctx.report(
                        Diagnostic::new(
                            DiagnosticCode::EmissionFailed,
                            format!("could not write {}: {}", target.display(), err),
                        )
                        .for_declaration(declaration.fqn()),
                    );
                }
            }
        }
        info!("generated {} fake(s)", generated.len());
        generated
    }

    fn write_fake(&self, fake: &GeneratedFake) -> Result<(), GenerateError> {
        for component in fake.relative_path.iter() {
            let text = component.to_string_lossy();
            let valid = !text.is_empty()
                && text
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '.');
            if !valid || text == ".." {
                return Err(GenerateError::InvalidPackage(text.into_owned()));
            }
        }
        let output_dir = self
            .ctx
            .options
            .output_dir
            .as_ref()
            .expect("generate_all checked the output dir");
        let target = output_dir.join(&fake.relative_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, fake.content.as_bytes())?;
        Ok(())
    }

    /// Build the complete source file for one declaration without
    /// touching the file system.
    pub fn build_fake(&self, declaration: &ValidatedDeclaration) -> GeneratedFake {
        let package = declaration.package_name().to_string();
        let relative_name = declaration.class_id().relative_name().to_string();
        let simple = declaration.simple_name().to_string();
        let fqn = declaration.fqn();
        let subject_params = declaration.type_parameters();
        let class_param_names: Vec<String> = subject_params
            .iter()
            .map(|tp| tp.bare_name().to_string())
            .collect();

        let mut resolver = ImportResolver::new(package.clone());
        let members = plan_members(declaration);
        if !members.is_empty() {
            resolver.require(COUNTER_IMPORT);
        }
        let impl_name = format!("Fake{}Impl", simple);
        let config_name = format!("Fake{}Config", simple);
        let factory_name = format!("fake{}", simple);

        // Fake implementation class
        let mut impl_class = ClassBuilder::new(&impl_name);
        for tp in subject_params {
            impl_class = impl_class.type_parameter(self.code_type_parameter(tp, &mut resolver, true));
        }
        let subject_type = subject_reference(&relative_name, &class_param_names);
        let constructor_params = match declaration {
            ValidatedDeclaration::Class(meta) => meta.constructor_params.clone(),
            ValidatedDeclaration::Interface(_) => Vec::new(),
        };
        match declaration {
            ValidatedDeclaration::Interface(_) => {
                impl_class = impl_class.implements(subject_type.clone());
            }
            ValidatedDeclaration::Class(_) => {
                let mut call_args = Vec::new();
                for param in &constructor_params {
                    let ty = self.resolve_text(&param.type_text, &mut resolver);
                    impl_class = impl_class.constructor_param(CodeParameter {
                        name: param.name.clone(),
                        ty,
                        default: None,
                        vararg: param.is_vararg,
                        markers: Vec::new(),
                    });
                    call_args.push(if param.is_vararg {
                        format!("*{}", param.name)
                    } else {
                        param.name.clone()
                    });
                }
                impl_class = impl_class.extends(subject_type.clone(), call_args);
            }
        }
        for planned in &members {
            impl_class = self.add_impl_member(impl_class, planned, &class_param_names, &fqn, &mut resolver);
        }

        // Configuration DSL class
        let mut config_class = ClassBuilder::new(&config_name);
        for tp in subject_params {
            config_class =
                config_class.type_parameter(self.code_type_parameter(tp, &mut resolver, true));
        }
        let impl_type = subject_reference(&impl_name, &class_param_names);
        config_class = config_class.constructor_param(
            CodeParameter::new("impl", impl_type).with_markers(["private", "val"]),
        );
        for planned in &members {
            config_class = self.add_config_member(config_class, planned, &class_param_names, &mut resolver);
        }

        // Factory function
        let mut factory = FunctionBuilder::new(&factory_name);
        for tp in subject_params {
            factory = factory.type_parameter(self.code_type_parameter(tp, &mut resolver, true));
        }
        let mut construction_args = Vec::new();
        for param in &constructor_params {
            let ty = self.resolve_text(&param.type_text, &mut resolver);
            let mut code_param = CodeParameter {
                name: param.name.clone(),
                ty,
                default: None,
                vararg: param.is_vararg,
                markers: Vec::new(),
            };
            // Default-value snippets are re-emitted verbatim
            if let Some(default) = &param.default_source {
                code_param = code_param.with_default(default.clone());
            }
            factory = factory.parameter(code_param);
            construction_args.push(if param.is_vararg {
                format!("*{}", param.name)
            } else {
                param.name.clone()
            });
        }
        let config_receiver = subject_reference(&config_name, &class_param_names);
        factory = factory
            .parameter(
                CodeParameter::new(
                    "configure",
                    CodeType::Simple(format!("{}.() -> Unit", config_receiver.render())),
                )
                .with_default("{}"),
            )
            .returns(subject_type.clone())
            .body_statements([
                format!(
                    "val impl = {}({})",
                    subject_reference(&impl_name, &class_param_names).render(),
                    construction_args.join(", ")
                ),
                format!("val config = {}(impl)", config_name),
                "config.configure()".to_string(),
                "return impl".to_string(),
            ]);

        let file = FileBuilder::new(package.clone())
            .add_imports(resolver.into_imports().into_iter().collect::<Vec<_>>())
            .add_class(impl_class.build())
            .add_class(config_class.build())
            .add_function(factory.build())
            .build();
        let content = render_file(&file);
        let relative_path = relative_output_path(&package, &simple);
        let metrics = FakeMetrics::measure(
            &fqn,
            subject_params,
            members.len(),
            &content,
            file.imports.len(),
        );
        GeneratedFake {
            fqn,
            relative_path,
            content,
            metrics,
        }
    }

    fn add_impl_member<'m>(
        &self,
        mut class: ClassBuilder,
        planned: &PlannedMember<'m>,
        class_params: &[String],
        fqn: &str,
        resolver: &mut ImportResolver,
    ) -> ClassBuilder {
        match &planned.member {
            FakeMember::Function(function) => {
                let plan = self.function_plan(function, class_params, resolver);
                let behavior_ty = CodeType::lambda(
                    plan.behavior_params.clone(),
                    plan.behavior_ret.clone(),
                    function.is_suspend,
                );
                let scope = member_scope(class_params, &function.type_parameters);
                let strategy = DefaultValueStrategy::new(&scope);
                let default = strategy.default_for(&behavior_ty);
                let (behavior_ty, initializer, configured_check) = if planned.is_open {
                    (behavior_ty.nullable(), CodeExpression::NullLit, false)
                } else {
                    match &default {
                        Some(resolved) => (behavior_ty, resolved.expr.clone(), false),
                        None => {
                            self.ctx.report(
                                Diagnostic::new(
                                    DiagnosticCode::UnresolvableDefault,
                                    format!(
                                        "no default value for {}.{}; configuring it is mandatory",
                                        fqn, function.name
                                    ),
                                )
                                .for_declaration(fqn),
                            );
                            (behavior_ty.nullable(), CodeExpression::NullLit, true)
                        }
                    }
                };
                let mut behavior = PropertyBuilder::var(&planned.behavior_name, behavior_ty)
                    .initializer(initializer);
                if default.as_ref().is_some_and(|d| d.needs_unchecked_cast) && !planned.is_open {
                    behavior = behavior.annotation("Suppress(\"UNCHECKED_CAST\")");
                }
                class = class
                    .property(behavior.build())
                    .property(counter_backing(&planned.counter_backing))
                    .property(counter_view(&planned.counter_view, &planned.counter_backing));

                let mut function_builder = FunctionBuilder::new(&function.name)
                    .modifier(CodeModifier::Override);
                if function.is_suspend {
                    function_builder = function_builder.modifier(CodeModifier::Suspend);
                }
                if plan.needs_cast {
                    function_builder =
                        function_builder.annotation("Suppress(\"UNCHECKED_CAST\")");
                }
                for tp in &function.type_parameters {
                    function_builder =
                        function_builder.type_parameter(self.code_type_parameter(tp, resolver, false));
                }
                let mut arg_names = Vec::new();
                for (param, ty) in function.parameters.iter().zip(plan.override_params.iter()) {
                    function_builder = function_builder.parameter(CodeParameter {
                        name: param.name.clone(),
                        ty: ty.clone(),
                        default: None,
                        vararg: param.is_vararg,
                        markers: Vec::new(),
                    });
                    arg_names.push(param.name.clone());
                }
                let returns_unit = is_unit(&plan.override_ret);
                if !returns_unit {
                    function_builder = function_builder.returns(plan.override_ret.clone());
                }
                let call = format!("{}({})", planned.behavior_name, arg_names.join(", "));
                let spread_args: Vec<String> = function
                    .parameters
                    .iter()
                    .map(|p| {
                        if p.is_vararg {
                            format!("*{}", p.name)
                        } else {
                            p.name.clone()
                        }
                    })
                    .collect();
                let mut statements = vec![format!("{}.incrementAndGet()", planned.counter_backing)];
                if planned.is_open {
                    let super_call = format!("super.{}({})", function.name, spread_args.join(", "));
                    let invoke = format!(
                        "{}?.invoke({}) ?: {}",
                        planned.behavior_name,
                        arg_names.join(", "),
                        super_call
                    );
                    statements.push(if returns_unit {
                        invoke
                    } else {
                        format!("return {}", invoke)
                    });
                } else if configured_check {
                    let invoke = format!(
                        "{}?.invoke({}) ?: throw IllegalStateException(\"{} is not configured on this fake\")",
                        planned.behavior_name,
                        arg_names.join(", "),
                        function.name
                    );
                    statements.push(if returns_unit {
                        invoke
                    } else {
                        format!("return {}", invoke)
                    });
                } else if returns_unit {
                    statements.push(call);
                } else if plan.needs_cast {
                    statements.push(format!(
                        "return {} as {}",
                        call,
                        plan.override_ret.render()
                    ));
                } else {
                    statements.push(format!("return {}", call));
                }
                class.function(function_builder.body_statements(statements).build())
            }
            FakeMember::Property(property) => {
                let ty = self.resolve_text(&property.type_text, resolver);
                let getter_ty = CodeType::lambda(vec![], ty.clone(), false);
                let strategy_scope = class_params.to_vec();
                let strategy = DefaultValueStrategy::new(&strategy_scope);
                let default = strategy.default_for(&getter_ty);
                let (getter_field_ty, getter_init, configured_check) = if planned.is_open {
                    (getter_ty.nullable(), CodeExpression::NullLit, false)
                } else {
                    match &default {
                        Some(resolved) => (getter_ty, resolved.expr.clone(), false),
                        None => {
                            self.ctx.report(
                                Diagnostic::new(
                                    DiagnosticCode::UnresolvableDefault,
                                    format!(
                                        "no default value for {}.{}; configuring it is mandatory",
                                        fqn, property.name
                                    ),
                                )
                                .for_declaration(fqn),
                            );
                            (getter_ty.nullable(), CodeExpression::NullLit, true)
                        }
                    }
                };
                let mut behavior = PropertyBuilder::var(&planned.behavior_name, getter_field_ty)
                    .initializer(getter_init);
                if default.as_ref().is_some_and(|d| d.needs_unchecked_cast) && !planned.is_open {
                    behavior = behavior.annotation("Suppress(\"UNCHECKED_CAST\")");
                }
                class = class.property(behavior.build());
                if property.is_mutable {
                    let setter_ty =
                        CodeType::lambda(vec![ty.clone()], CodeType::simple("Unit"), false);
                    let (setter_field_ty, setter_init) = if planned.is_open {
                        (setter_ty.nullable(), CodeExpression::NullLit)
                    } else {
                        // No-op setter; the single parameter stays implicit
                        (
                            setter_ty,
                            CodeExpression::lambda(Vec::new(), CodeExpression::empty()),
                        )
                    };
                    class = class.property(
                        PropertyBuilder::var(&planned.setter_behavior_name, setter_field_ty)
                            .initializer(setter_init)
                            .build(),
                    );
                }
                class = class
                    .property(counter_backing(&planned.counter_backing))
                    .property(counter_view(&planned.counter_view, &planned.counter_backing));

                let getter_invoke = if planned.is_open {
                    format!(
                        "return {}?.invoke() ?: super.{}",
                        planned.behavior_name, property.name
                    )
                } else if configured_check {
                    format!(
                        "return {}?.invoke() ?: throw IllegalStateException(\"{} is not configured on this fake\")",
                        planned.behavior_name, property.name
                    )
                } else {
                    format!("return {}()", planned.behavior_name)
                };
                let mut override_property = if property.is_mutable {
                    PropertyBuilder::var(&property.name, ty.clone())
                } else {
                    PropertyBuilder::val(&property.name, ty.clone())
                }
                .modifier(CodeModifier::Override)
                .getter(CodeBlock::Statements(vec![
                    format!("{}.incrementAndGet()", planned.counter_backing),
                    getter_invoke,
                ]));
                if property.is_mutable {
                    let setter_statements = if planned.is_open {
                        vec![
                            format!("{}.incrementAndGet()", planned.counter_backing),
                            format!("val behavior = {}", planned.setter_behavior_name),
                            format!(
                                "if (behavior != null) behavior(value) else super.{} = value",
                                property.name
                            ),
                        ]
                    } else {
                        vec![
                            format!("{}.incrementAndGet()", planned.counter_backing),
                            format!("{}(value)", planned.setter_behavior_name),
                        ]
                    };
                    override_property =
                        override_property.setter(CodeBlock::Statements(setter_statements));
                }
                class.property(override_property.build())
            }
        }
    }

    fn add_config_member<'m>(
        &self,
        config: ClassBuilder,
        planned: &PlannedMember<'m>,
        class_params: &[String],
        resolver: &mut ImportResolver,
    ) -> ClassBuilder {
        match &planned.member {
            FakeMember::Function(function) => {
                let plan = self.function_plan(function, class_params, resolver);
                let behavior_ty = CodeType::lambda(
                    plan.behavior_params,
                    plan.behavior_ret,
                    function.is_suspend,
                );
                config.function(
                    FunctionBuilder::new(&function.name)
                        .parameter(CodeParameter::new("behavior", behavior_ty))
                        .body_statements([format!(
                            "impl.{} = behavior",
                            planned.behavior_name
                        )])
                        .build(),
                )
            }
            FakeMember::Property(property) => {
                let ty = self.resolve_text(&property.type_text, resolver);
                let mut config = config.function(
                    FunctionBuilder::new(&property.name)
                        .parameter(CodeParameter::new(
                            "behavior",
                            CodeType::lambda(vec![], ty.clone(), false),
                        ))
                        .body_statements([format!(
                            "impl.{} = behavior",
                            planned.behavior_name
                        )])
                        .build(),
                );
                if property.is_mutable {
                    config = config.function(
                        FunctionBuilder::new(format!("{}Setter", property.name))
                            .parameter(CodeParameter::new(
                                "behavior",
                                CodeType::lambda(vec![ty], CodeType::simple("Unit"), false),
                            ))
                            .body_statements([format!(
                                "impl.{} = behavior",
                                planned.setter_behavior_name
                            )])
                            .build(),
                    );
                }
                config
            }
        }
    }

    /// Behavior and override typing for one function, with
    /// function-level type parameters erased from the behavior field.
    fn function_plan(
        &self,
        function: &FunctionInfo,
        _class_params: &[String],
        resolver: &mut ImportResolver,
    ) -> FunctionPlan {
        // Overrides re-declare varargs with the element type; only the
        // behavior field sees the array holder
        let override_params: Vec<CodeType> = function
            .parameters
            .iter()
            .map(|p| self.resolve_text(&p.type_text, resolver))
            .collect();
        let override_ret = self.resolve_text(&function.return_type, resolver);
        let erased: Vec<String> = function
            .type_parameters
            .iter()
            .map(|tp| tp.bare_name().to_string())
            .collect();
        let behavior_params: Vec<CodeType> = function
            .parameters
            .iter()
            .zip(override_params.iter())
            .map(|(p, ty)| {
                let ty = erase_type_params(ty, &erased);
                if p.is_vararg {
                    vararg_holder(&ty)
                } else {
                    ty
                }
            })
            .collect();
        let behavior_ret = erase_type_params(&override_ret, &erased);
        let needs_cast = behavior_ret != override_ret && !is_unit(&override_ret);
        FunctionPlan {
            behavior_params,
            behavior_ret,
            override_params,
            override_ret,
            needs_cast,
        }
    }

    fn code_type_parameter(
        &self,
        tp: &TypeParameterInfo,
        resolver: &mut ImportResolver,
        strip_variance: bool,
    ) -> CodeTypeParameter {
        let name = if strip_variance {
            tp.bare_name().to_string()
        } else {
            tp.name.clone()
        };
        CodeTypeParameter {
            name,
            bounds: tp
                .bounds
                .iter()
                .map(|b| self.resolve_text(b, resolver))
                .collect(),
        }
    }

    fn resolve_text(&self, text: &str, resolver: &mut ImportResolver) -> CodeType {
        match parse_type(text) {
            Ok(ty) => resolver.resolve(&ty),
            Err(_) => CodeType::Simple(text.trim().to_string()),
        }
    }
}

struct FunctionPlan {
    behavior_params: Vec<CodeType>,
    behavior_ret: CodeType,
    override_params: Vec<CodeType>,
    override_ret: CodeType,
    needs_cast: bool,
}

fn plan_members(declaration: &ValidatedDeclaration) -> Vec<PlannedMember<'_>> {
    let mut ordered: Vec<(FakeMember<'_>, bool)> = Vec::new();
    match declaration {
        ValidatedDeclaration::Interface(meta) => {
            for p in &meta.properties {
                ordered.push((FakeMember::Property(p), false));
            }
            for f in &meta.functions {
                ordered.push((FakeMember::Function(f), false));
            }
            for p in &meta.inherited_properties {
                ordered.push((FakeMember::Property(p), false));
            }
            for f in &meta.inherited_functions {
                ordered.push((FakeMember::Function(f), false));
            }
        }
        ValidatedDeclaration::Class(meta) => {
            for p in &meta.abstract_properties {
                ordered.push((FakeMember::Property(p), false));
            }
            for p in &meta.open_properties {
                ordered.push((FakeMember::Property(p), true));
            }
            for f in &meta.abstract_methods {
                ordered.push((FakeMember::Function(f), false));
            }
            for f in &meta.open_methods {
                ordered.push((FakeMember::Function(f), true));
            }
        }
    }
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    ordered
        .into_iter()
        .map(|(member, is_open)| {
            let base = match &member {
                FakeMember::Function(f) => f.name.as_str(),
                FakeMember::Property(p) => p.name.as_str(),
            };
            let occurrence = counts.entry(base).or_insert(0);
            *occurrence += 1;
            // Overloads disambiguate by source-order index: foo, foo2, ...
            let suffix = if *occurrence == 1 {
                String::new()
            } else {
                occurrence.to_string()
            };
            PlannedMember {
                behavior_name: format!("{}{}Behavior", base, suffix),
                setter_behavior_name: format!("{}{}SetBehavior", base, suffix),
                counter_backing: format!("_{}{}CallCount", base, suffix),
                counter_view: format!("{}{}CallCount", base, suffix),
                member,
                is_open,
            }
        })
        .collect()
}

fn member_scope(class_params: &[String], fn_params: &[TypeParameterInfo]) -> Vec<String> {
    let mut scope: Vec<String> = class_params.to_vec();
    scope.extend(fn_params.iter().map(|tp| tp.bare_name().to_string()));
    scope
}

fn counter_backing(name: &str) -> crate::codemodel::model::CodeProperty {
    PropertyBuilder::val(name, CodeType::simple("AtomicInteger"))
        .modifier(CodeModifier::Private)
        .initializer(CodeExpression::call("AtomicInteger", vec![
            CodeExpression::NumberLit("0".to_string()),
        ]))
        .build()
}

fn counter_view(view: &str, backing: &str) -> crate::codemodel::model::CodeProperty {
    PropertyBuilder::val(view, CodeType::simple("Int"))
        .getter(CodeBlock::Expression(CodeExpression::Raw(format!(
            "{}.get()",
            backing
        ))))
        .build()
}

fn subject_reference(name: &str, params: &[String]) -> CodeType {
    if params.is_empty() {
        CodeType::simple(name)
    } else {
        CodeType::generic(
            name,
            params.iter().map(|p| CodeType::simple(p.clone())).collect(),
        )
    }
}

/// Function-level type parameters cannot appear in a class-level
/// behavior field; they erase to `Any?`.
fn erase_type_params(ty: &CodeType, erased: &[String]) -> CodeType {
    if erased.is_empty() {
        return ty.clone();
    }
    match ty {
        CodeType::Simple(name) => {
            if erased.iter().any(|p| p == name) {
                CodeType::simple("Any").nullable()
            } else {
                ty.clone()
            }
        }
        CodeType::Nullable(inner) => erase_type_params(inner, erased).nullable(),
        CodeType::Generic { name, args } => CodeType::Generic {
            name: name.clone(),
            args: args.iter().map(|a| erase_type_params(a, erased)).collect(),
        },
        CodeType::Lambda {
            params,
            ret,
            is_suspend,
        } => CodeType::Lambda {
            params: params.iter().map(|p| erase_type_params(p, erased)).collect(),
            ret: Box::new(erase_type_params(ret, erased)),
            is_suspend: *is_suspend,
        },
    }
}

/// Element type of a `vararg` parameter as seen inside the override.
fn vararg_holder(element: &CodeType) -> CodeType {
    if let CodeType::Simple(name) = element {
        let primitive = match name.rsplit('.').next().unwrap_or(name) {
            "Int" => Some("IntArray"),
            "Long" => Some("LongArray"),
            "Short" => Some("ShortArray"),
            "Byte" => Some("ByteArray"),
            "Float" => Some("FloatArray"),
            "Double" => Some("DoubleArray"),
            "Boolean" => Some("BooleanArray"),
            "Char" => Some("CharArray"),
            _ => None,
        };
        if let Some(primitive) = primitive {
            return CodeType::simple(primitive);
        }
    }
    let projected = match element {
        CodeType::Simple(name) => CodeType::Simple(format!("out {}", name)),
        CodeType::Generic { name, args } => CodeType::Generic {
            name: format!("out {}", name),
            args: args.clone(),
        },
        other => other.clone(),
    };
    CodeType::generic("Array", vec![projected])
}

fn relative_output_path(package: &str, simple: &str) -> PathBuf {
    let mut path = PathBuf::new();
    if !package.is_empty() {
        for segment in package.split('.') {
            path.push(segment);
        }
    }
    path.push(format!("Fake{}Impl.kt", simple));
    path
}
