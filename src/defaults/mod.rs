//! Default-value strategy.
//!
//! Maps a declared return or property type to a syntactic Kotlin
//! expression that is a legal default when the user has not configured a
//! behavior. Types with no resolvable default yield `None`; the caller
//! decides how to surface that (the member is emitted without default
//! behavior and configuring it stays mandatory).

use crate::codemodel::model::{CodeExpression, CodeType};

/// A resolved default expression. `needs_unchecked_cast` is set when the
/// expression is only legal under an unchecked-cast suppression (type
/// parameter defaults).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDefault {
    pub expr: CodeExpression,
    pub needs_unchecked_cast: bool,
}

impl ResolvedDefault {
    fn plain(expr: CodeExpression) -> Self {
        Self {
            expr,
            needs_unchecked_cast: false,
        }
    }
}

/// Strategy scoped to the type parameters visible at the member.
pub struct DefaultValueStrategy<'a> {
    type_param_names: &'a [String],
}

impl<'a> DefaultValueStrategy<'a> {
    pub fn new(type_param_names: &'a [String]) -> Self {
        Self { type_param_names }
    }

    pub fn default_for(&self, ty: &CodeType) -> Option<ResolvedDefault> {
        match ty {
            CodeType::Nullable(_) => Some(ResolvedDefault::plain(CodeExpression::NullLit)),
            CodeType::Simple(name) => self.default_for_named(name, &[]),
            CodeType::Generic { name, args } => self.default_for_named(name, args),
            CodeType::Lambda {
                params,
                ret,
                is_suspend: _,
            } => {
                let inner = self.default_for(ret)?;
                let body = if is_unit(ret) {
                    CodeExpression::empty()
                } else {
                    inner.expr
                };
                // A single parameter is implicit (`it`); only higher
                // arities must declare placeholders
                let placeholders = if params.len() <= 1 {
                    Vec::new()
                } else {
                    vec!["_".to_string(); params.len()]
                };
                Some(ResolvedDefault {
                    expr: CodeExpression::lambda(placeholders, body),
                    needs_unchecked_cast: inner.needs_unchecked_cast,
                })
            }
        }
    }

    fn default_for_named(&self, name: &str, args: &[CodeType]) -> Option<ResolvedDefault> {
        let simple = simple_name(name);
        if args.is_empty() {
            if let Some(expr) = builtin_default(simple) {
                return Some(ResolvedDefault::plain(expr));
            }
            if self.type_param_names.iter().any(|p| p == simple) {
                // Only legal under an unchecked-cast suppression
                return Some(ResolvedDefault {
                    expr: CodeExpression::Raw(format!("null as {}", simple)),
                    needs_unchecked_cast: true,
                });
            }
            return None;
        }
        match simple {
            "List" | "MutableList" | "Collection" | "Iterable" => {
                Some(ResolvedDefault::plain(CodeExpression::call("emptyList", vec![])))
            }
            "Set" | "MutableSet" => {
                Some(ResolvedDefault::plain(CodeExpression::call("emptySet", vec![])))
            }
            "Map" | "MutableMap" => {
                Some(ResolvedDefault::plain(CodeExpression::call("emptyMap", vec![])))
            }
            "Result" => {
                let inner = self.default_for(&args[0])?;
                Some(ResolvedDefault {
                    expr: CodeExpression::call("Result.success", vec![inner.expr]),
                    needs_unchecked_cast: inner.needs_unchecked_cast,
                })
            }
            _ => None,
        }
    }
}

pub fn is_unit(ty: &CodeType) -> bool {
    matches!(ty, CodeType::Simple(name) if simple_name(name) == "Unit")
}

fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn builtin_default(simple: &str) -> Option<CodeExpression> {
    let expr = match simple {
        "Int" | "Short" | "Byte" => CodeExpression::NumberLit("0".to_string()),
        "Long" => CodeExpression::NumberLit("0L".to_string()),
        "Double" => CodeExpression::NumberLit("0.0".to_string()),
        "Float" => CodeExpression::NumberLit("0.0f".to_string()),
        "Char" => CodeExpression::Raw("'\\u0000'".to_string()),
        "Boolean" => CodeExpression::BoolLit(false),
        "String" | "CharSequence" => CodeExpression::StringLit(String::new()),
        "Unit" => CodeExpression::Name("Unit".to_string()),
        _ => return None,
    };
    Some(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codemodel::render::render_expression;
    use crate::codemodel::type_parser::parse_type;

    fn render_default(type_text: &str, params: &[&str]) -> Option<String> {
        let names: Vec<String> = params.iter().map(|s| s.to_string()).collect();
        let strategy = DefaultValueStrategy::new(&names);
        let ty = parse_type(type_text).unwrap();
        strategy
            .default_for(&ty)
            .map(|d| render_expression(&d.expr))
    }

    #[test]
    fn primitive_defaults() {
        assert_eq!(render_default("Int", &[]).unwrap(), "0");
        assert_eq!(render_default("Long", &[]).unwrap(), "0L");
        assert_eq!(render_default("Double", &[]).unwrap(), "0.0");
        assert_eq!(render_default("Char", &[]).unwrap(), "'\\u0000'");
        assert_eq!(render_default("Boolean", &[]).unwrap(), "false");
        assert_eq!(render_default("kotlin.String", &[]).unwrap(), "\"\"");
    }

    #[test]
    fn nullable_is_null() {
        assert_eq!(render_default("String?", &[]).unwrap(), "null");
        assert_eq!(render_default("Map<String, Int>?", &[]).unwrap(), "null");
    }

    #[test]
    fn containers() {
        assert_eq!(render_default("List<String>", &[]).unwrap(), "emptyList()");
        assert_eq!(render_default("Set<Int>", &[]).unwrap(), "emptySet()");
        assert_eq!(
            render_default("Map<String, Int>", &[]).unwrap(),
            "emptyMap()"
        );
    }

    #[test]
    fn result_wraps_inner_default() {
        assert_eq!(
            render_default("Result<String>", &[]).unwrap(),
            "Result.success(\"\")"
        );
        assert_eq!(
            render_default("Result<Unit>", &[]).unwrap(),
            "Result.success(Unit)"
        );
    }

    #[test]
    fn lambda_defaults_match_arity() {
        assert_eq!(
            render_default("(String, Int) -> String", &[]).unwrap(),
            "{ _, _ -> \"\" }"
        );
        assert_eq!(render_default("() -> Unit", &[]).unwrap(), "{ }");
        // One parameter stays implicit
        assert_eq!(render_default("(String) -> String", &[]).unwrap(), "{ \"\" }");
        assert_eq!(render_default("(Int) -> Unit", &[]).unwrap(), "{ }");
    }

    #[test]
    fn type_parameter_needs_suppression() {
        let names = vec!["T".to_string()];
        let strategy = DefaultValueStrategy::new(&names);
        let resolved = strategy
            .default_for(&parse_type("T").unwrap())
            .unwrap();
        assert!(resolved.needs_unchecked_cast);
        assert_eq!(render_expression(&resolved.expr), "null as T");
        // Nullable parameter does not need the cast
        let nullable = strategy
            .default_for(&parse_type("T?").unwrap())
            .unwrap();
        assert!(!nullable.needs_unchecked_cast);
    }

    #[test]
    fn unresolvable_reference_type() {
        assert_eq!(render_default("com.example.User", &[]), None);
        // Unknown generic containers are also unresolvable
        assert_eq!(render_default("Flow<Int>", &[]), None);
    }
}
