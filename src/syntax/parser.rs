//! Declaration parser assembled from the nom combinators in
//! [`helpers`](super::helpers).
//!
//! Only the declaration surface is kept: bodies and initializers are
//! consumed by the balanced scanners. Members the grammar does not
//! cover (extension receivers, destructuring) are skipped with a trace
//! log instead of failing the file. Errors surface as [`SyntaxError`]
//! with a byte offset derived from the deepest failing input.

use log::trace;
use nom::branch::alt;
use nom::character::complete::char as nom_char;
use nom::combinator::opt;
use nom::error::{context, VerboseError, VerboseErrorKind};
use nom::sequence::pair;
use thiserror::Error;

use super::ast::{
    DeclKind, Declaration, FunctionDecl, Import, Member, Modality, ParamDecl, PropertyDecl,
    SourceFile, SupertypeRef, TypeParamDecl,
};
use super::helpers::{
    balanced_block, ctx_error, identifier, inline_trivia, keyword, qualified_name, scan_balanced,
    trivia, ws, SResult, ScanStops,
};

#[derive(Debug, Error)]
#[error("{message} at offset {offset}")]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

const MODIFIER_KEYWORDS: &[&str] = &[
    "public", "private", "internal", "protected", "open", "abstract", "sealed", "final", "data",
    "inner", "enum", "annotation", "suspend", "inline", "override", "operator", "infix",
    "external", "expect", "actual", "lateinit", "const", "tailrec", "value", "companion",
];

pub struct DeclarationParser<'a> {
    path: &'a str,
    source: &'a str,
}

impl<'a> DeclarationParser<'a> {
    pub fn new(path: &'a str, source: &'a str) -> Self {
        Self { path, source }
    }

    fn offset(&self, rest: &str) -> usize {
        self.source.len() - rest.len()
    }

    pub fn parse(&self) -> Result<SourceFile, SyntaxError> {
        match self.source_file(self.source) {
            Ok((_, file)) => Ok(file),
            Err(nom::Err::Error(error)) | Err(nom::Err::Failure(error)) => {
                Err(self.to_syntax_error(error))
            }
            Err(nom::Err::Incomplete(_)) => Err(SyntaxError {
                message: "incomplete input".to_string(),
                offset: self.source.len(),
            }),
        }
    }

    /// The deepest error input gives the offset; the innermost context
    /// entry gives the message.
    fn to_syntax_error(&self, error: VerboseError<&'a str>) -> SyntaxError {
        let offset = error
            .errors
            .first()
            .map(|(input, _)| self.offset(input))
            .unwrap_or(0);
        let message = error
            .errors
            .iter()
            .find_map(|(_, kind)| match kind {
                VerboseErrorKind::Context(message) => Some((*message).to_string()),
                _ => None,
            })
            .unwrap_or_else(|| "syntax error".to_string());
        SyntaxError { message, offset }
    }

    fn source_file(&self, input: &'a str) -> SResult<'a, SourceFile> {
        let (mut input, _) = trivia(input)?;
        // File annotations
        while input.starts_with("@file:") {
            let (r, _) = self.annotation(input)?;
            let (r, _) = trivia(r)?;
            input = r;
        }
        let (input, package_kw) = opt(ws(keyword("package")))(input)?;
        let (input, package) = match package_kw {
            Some(_) => {
                let (input, _) = inline_trivia(input)?;
                context("expected package name", qualified_name)(input)?
            }
            None => (input, String::new()),
        };
        let mut imports = Vec::new();
        let mut rest = input;
        loop {
            let (r, import_kw) = opt(ws(keyword("import")))(rest)?;
            if import_kw.is_none() {
                rest = r;
                break;
            }
            let (r, _) = inline_trivia(r)?;
            let (r, path) = context("expected import path", qualified_name)(r)?;
            let (r, _) = inline_trivia(r)?;
            let (r, alias_kw) = opt(keyword("as"))(r)?;
            let (r, alias) = match alias_kw {
                Some(_) => {
                    let (r, _) = inline_trivia(r)?;
                    let (r, name) = context("expected import alias", identifier)(r)?;
                    (r, Some(name.to_string()))
                }
                None => (r, None),
            };
            imports.push(Import {
                path,
                alias,
            });
            rest = r;
        }
        let mut declarations = Vec::new();
        loop {
            let (r, _) = trivia(rest)?;
            if r.is_empty() {
                rest = r;
                break;
            }
            let (advanced, declaration) = self.top_level(r)?;
            if let Some(declaration) = declaration {
                declarations.push(declaration);
            }
            if advanced.len() == r.len() {
                return Err(ctx_error(r, "parser made no progress"));
            }
            rest = advanced;
        }
        Ok((
            rest,
            SourceFile {
                path: self.path.to_string(),
                package,
                imports,
                declarations,
            },
        ))
    }

    fn top_level(&self, input: &'a str) -> SResult<'a, Option<Declaration>> {
        let (rest, annotations) = self.annotations(input)?;
        let (rest, modifiers) = self.modifiers(rest)?;
        if let (after, Some(_)) = opt(keyword("class"))(rest)? {
            let (rest, decl) = self.type_declaration(
                after,
                class_kind(&modifiers),
                &modifiers,
                annotations,
                input,
            )?;
            return Ok((rest, Some(decl)));
        }
        if let (after, Some(_)) = opt(keyword("interface"))(rest)? {
            let (rest, decl) =
                self.type_declaration(after, DeclKind::Interface, &modifiers, annotations, input)?;
            return Ok((rest, Some(decl)));
        }
        if let (after, Some(_)) = opt(keyword("object"))(rest)? {
            let (rest, decl) =
                self.type_declaration(after, DeclKind::Object, &modifiers, annotations, input)?;
            return Ok((rest, Some(decl)));
        }
        if let (after, Some(_)) = opt(keyword("typealias"))(rest)? {
            let (r, name) =
                context("expected typealias name", ws(identifier))(after)?;
            let (r, _) = self.skip_statement(r)?;
            let decl = Declaration {
                kind: DeclKind::TypeAlias,
                modality: Modality::Final,
                is_data: false,
                annotations,
                name: name.to_string(),
                type_parameters: Vec::new(),
                constructor_params: Vec::new(),
                supertypes: Vec::new(),
                members: Vec::new(),
                nested: Vec::new(),
                span: (self.offset(input), self.offset(r)),
            };
            return Ok((r, Some(decl)));
        }
        if let (after, Some(_)) = opt(keyword("fun"))(rest)? {
            let (r, _) = self.function(after, &modifiers, input)?;
            return Ok((r, None));
        }
        if let (after, Some(_)) = opt(keyword("val"))(rest)? {
            let (r, _) = self.property(after, false, &modifiers, input)?;
            return Ok((r, None));
        }
        if let (after, Some(_)) = opt(keyword("var"))(rest)? {
            let (r, _) = self.property(after, true, &modifiers, input)?;
            return Ok((r, None));
        }
        Err(ctx_error(rest, "expected a top-level declaration"))
    }

    fn annotations(&self, input: &'a str) -> SResult<'a, Vec<String>> {
        let (mut rest, _) = trivia(input)?;
        let mut annotations = Vec::new();
        while rest.starts_with('@') {
            let (r, name) = self.annotation(rest)?;
            annotations.push(name);
            let (r, _) = trivia(r)?;
            rest = r;
        }
        Ok((rest, annotations))
    }

    fn annotation(&self, input: &'a str) -> SResult<'a, String> {
        let (input, _) = nom_char('@')(input)?;
        // Optional use-site target, e.g. `@field:` or `@file:`
        let (input, _) = opt(pair(identifier, nom_char(':')))(input)?;
        let (input, name) = context("expected annotation name", qualified_name)(input)?;
        if input.starts_with('(') {
            let (input, _) = context("unbalanced annotation arguments", |i| {
                balanced_block(i, '(', ')')
            })(input)?;
            return Ok((input, name));
        }
        Ok((input, name))
    }

    fn modifiers(&self, input: &'a str) -> SResult<'a, Vec<String>> {
        let (mut rest, _) = trivia(input)?;
        let mut modifiers = Vec::new();
        'outer: loop {
            for modifier in MODIFIER_KEYWORDS {
                if let (after, Some(_)) = opt(keyword(modifier))(rest)? {
                    let (lookahead, _) = trivia(after)?;
                    // `enum`/`annotation`/`companion` only modify a
                    // following `class`/`object` keyword, never stand
                    // alone here
                    let stands = match *modifier {
                        "enum" | "annotation" | "companion" | "data" | "value" => {
                            opt(keyword("class"))(lookahead)?.1.is_some()
                                || opt(keyword("interface"))(lookahead)?.1.is_some()
                                || opt(keyword("object"))(lookahead)?.1.is_some()
                                || !modifiers.is_empty()
                        }
                        _ => true,
                    };
                    if stands {
                        modifiers.push(modifier.to_string());
                        rest = lookahead;
                        continue 'outer;
                    }
                }
            }
            return Ok((rest, modifiers));
        }
    }

    fn type_declaration(
        &self,
        input: &'a str,
        kind: DeclKind,
        modifiers: &[String],
        annotations: Vec<String>,
        span_start: &'a str,
    ) -> SResult<'a, Declaration> {
        let (rest, _) = trivia(input)?;
        // Companion objects may be anonymous
        let (mut rest, name) = match opt(identifier)(rest)? {
            (r, Some(name)) => (r, name.to_string()),
            (r, None) if kind == DeclKind::Object => (r, "Companion".to_string()),
            (r, None) => return Err(ctx_error(r, "expected declaration name")),
        };
        let mut type_parameters = Vec::new();
        let (trimmed, _) = trivia(rest)?;
        if trimmed.starts_with('<') {
            let (r, params) = self.type_parameters(trimmed)?;
            type_parameters = params;
            rest = r;
        }
        // Primary constructor, possibly prefixed with its own modifiers
        let mut constructor_params = Vec::new();
        let (mut trimmed, _) = trivia(rest)?;
        let (after_mods, _) = self.modifiers(trimmed)?;
        let (after_kw, _) = opt(keyword("constructor"))(after_mods)?;
        let (after_kw, _) = trivia(after_kw)?;
        if after_kw.starts_with('(') {
            let (r, params) = self.value_parameters(after_kw)?;
            constructor_params = params;
            let (r, _) = trivia(r)?;
            trimmed = r;
        }
        rest = trimmed;
        // Supertype list
        let mut supertypes = Vec::new();
        if let (after_colon, Some(_)) = opt(nom_char(':'))(rest)? {
            let (mut r, _) = trivia(after_colon)?;
            loop {
                let stops = ScanStops {
                    chars: &[',', '{', '('],
                    keywords: &["by", "where"],
                    stop_on_newline: true,
                };
                let (after_type, type_text) = scan_balanced(r, &stops)?;
                let type_text = type_text.trim().to_string();
                if type_text.is_empty() {
                    return Err(ctx_error(r, "expected supertype"));
                }
                let mut has_call = false;
                let mut r2 = after_type;
                if r2.starts_with('(') {
                    let (next, _) = context("unbalanced supertype call", |i| {
                        balanced_block(i, '(', ')')
                    })(r2)?;
                    r2 = next;
                    has_call = true;
                }
                let (r2, _) = trivia(r2)?;
                let (r2, by_kw) = opt(keyword("by"))(r2)?;
                let r2 = if by_kw.is_some() {
                    let stops = ScanStops {
                        chars: &[',', '{'],
                        keywords: &["where"],
                        stop_on_newline: true,
                    };
                    let (r3, _) = trivia(r2)?;
                    scan_balanced(r3, &stops)?.0
                } else {
                    r2
                };
                supertypes.push(SupertypeRef {
                    type_text,
                    has_call,
                });
                let (r3, _) = trivia(r2)?;
                match opt(nom_char(','))(r3)? {
                    (next, Some(_)) => {
                        let (next, _) = trivia(next)?;
                        r = next;
                    }
                    (_, None) => {
                        r = r3;
                        break;
                    }
                }
            }
            rest = r;
        }
        // Where clause bounds fold into the matching type parameter
        let (trimmed, _) = trivia(rest)?;
        if let (after_where, Some(_)) = opt(keyword("where"))(trimmed)? {
            let (r, entries) = self.where_clause(after_where)?;
            merge_where_bounds(&mut type_parameters, entries);
            rest = r;
        }
        // Body
        let mut members = Vec::new();
        let mut nested = Vec::new();
        let (trimmed, _) = trivia(rest)?;
        if trimmed.starts_with('{') {
            if matches!(kind, DeclKind::EnumClass | DeclKind::AnnotationClass | DeclKind::Object) {
                let (r, _) = context("unbalanced declaration body", |i| {
                    balanced_block(i, '{', '}')
                })(trimmed)?;
                rest = r;
            } else {
                let (r, (body_members, body_nested)) = self.class_body(trimmed, &name)?;
                members = body_members;
                nested = body_nested;
                rest = r;
            }
        } else {
            rest = trimmed;
        }
        let declaration = Declaration {
            kind,
            modality: modality_of(modifiers, kind),
            is_data: modifiers.iter().any(|m| m == "data"),
            annotations,
            name,
            type_parameters,
            constructor_params,
            supertypes,
            members,
            nested,
            span: (self.offset(span_start), self.offset(rest)),
        };
        Ok((rest, declaration))
    }

    fn type_parameters(&self, input: &'a str) -> SResult<'a, Vec<TypeParamDecl>> {
        let (mut rest, _) = nom_char('<')(input)?;
        let mut params = Vec::new();
        loop {
            let (r, _) = self.annotations(rest)?;
            let (r, _) = trivia(r)?;
            let (r, variance) = opt(alt((keyword("out"), keyword("in"))))(r)?;
            let (r, _) = trivia(r)?;
            let (r, bare) = context("expected type parameter name", identifier)(r)?;
            let (r, _) = trivia(r)?;
            let (mut r, colon) = opt(nom_char(':'))(r)?;
            let mut bounds = Vec::new();
            if colon.is_some() {
                let (after, _) = trivia(r)?;
                let stops = ScanStops {
                    chars: &[',', '>'],
                    keywords: &[],
                    stop_on_newline: false,
                };
                let (after, bound) = scan_balanced(after, &stops)?;
                bounds.push(bound.trim().to_string());
                r = after;
            }
            params.push(TypeParamDecl {
                name: match variance {
                    Some(marker) => format!("{} {}", marker, bare),
                    None => bare.to_string(),
                },
                bare_name: bare.to_string(),
                bounds,
            });
            let (r, _) = trivia(r)?;
            if let (next, Some(_)) = opt(nom_char(','))(r)? {
                rest = next;
            } else if let (next, Some(_)) = opt(nom_char('>'))(r)? {
                return Ok((next, params));
            } else {
                return Err(ctx_error(r, "expected ',' or '>' in type parameter list"));
            }
        }
    }

    fn value_parameters(&self, input: &'a str) -> SResult<'a, Vec<ParamDecl>> {
        let (mut rest, _) = nom_char('(')(input)?;
        let mut params = Vec::new();
        loop {
            let (trimmed, _) = trivia(rest)?;
            if let (next, Some(_)) = opt(nom_char(')'))(trimmed)? {
                return Ok((next, params));
            }
            let (r, _) = self.annotations(trimmed)?;
            let (mut r, _) = trivia(r)?;
            let mut is_vararg = false;
            let mut is_property = false;
            loop {
                let mut matched = false;
                for modifier in [
                    "vararg", "val", "var", "noinline", "crossinline", "private", "internal",
                    "protected", "public", "override", "final", "open",
                ] {
                    if let (after, Some(_)) = opt(keyword(modifier))(r)? {
                        match modifier {
                            "vararg" => is_vararg = true,
                            "val" | "var" => is_property = true,
                            _ => {}
                        }
                        let (after, _) = trivia(after)?;
                        r = after;
                        matched = true;
                        break;
                    }
                }
                if !matched {
                    break;
                }
            }
            let (r, name) = context("expected parameter name", identifier)(r)?;
            let (r, _) = trivia(r)?;
            let (r, _) = context("expected ':' after parameter name", nom_char(':'))(r)?;
            let (r, _) = trivia(r)?;
            let stops = ScanStops {
                chars: &[',', ')', '='],
                keywords: &[],
                stop_on_newline: false,
            };
            let (mut r, type_text) = scan_balanced(r, &stops)?;
            let mut default_source = None;
            if let (after_eq, Some(_)) = opt(nom_char('='))(r)? {
                let (after_eq, _) = trivia(after_eq)?;
                let stops = ScanStops {
                    chars: &[',', ')'],
                    keywords: &[],
                    stop_on_newline: false,
                };
                let (after_default, default_text) = scan_balanced(after_eq, &stops)?;
                default_source = Some(default_text.trim().to_string());
                r = after_default;
            }
            params.push(ParamDecl {
                name: name.to_string(),
                type_text: type_text.trim().to_string(),
                default_source,
                is_vararg,
                is_property,
            });
            let (trimmed, _) = trivia(r)?;
            if let (next, Some(_)) = opt(nom_char(','))(trimmed)? {
                rest = next;
            } else if let (next, Some(_)) = opt(nom_char(')'))(trimmed)? {
                return Ok((next, params));
            } else {
                return Err(ctx_error(trimmed, "expected ',' or ')' in parameter list"));
            }
        }
    }

    fn where_clause(&self, input: &'a str) -> SResult<'a, Vec<(String, String)>> {
        let (mut rest, _) = trivia(input)?;
        let mut entries = Vec::new();
        loop {
            let (r, name) = context("expected type parameter", identifier)(rest)?;
            let (r, _) = trivia(r)?;
            let (r, _) = context("expected ':' in where clause", nom_char(':'))(r)?;
            let (r, _) = trivia(r)?;
            let stops = ScanStops {
                chars: &[',', '{', '='],
                keywords: &[],
                stop_on_newline: true,
            };
            let (r, bound) = scan_balanced(r, &stops)?;
            entries.push((name.to_string(), bound.trim().to_string()));
            let (trimmed, _) = trivia(r)?;
            match opt(nom_char(','))(trimmed)? {
                (next, Some(_)) => {
                    let (next, _) = trivia(next)?;
                    rest = next;
                }
                (_, None) => return Ok((r, entries)),
            }
        }
    }

    #[allow(clippy::type_complexity)]
    fn class_body(
        &self,
        input: &'a str,
        parent_name: &str,
    ) -> SResult<'a, (Vec<Member>, Vec<Declaration>)> {
        let (mut rest, _) = nom_char('{')(input)?;
        let mut members = Vec::new();
        let mut nested = Vec::new();
        loop {
            let (r, _) = trivia(rest)?;
            rest = r;
            if rest.is_empty() {
                return Err(ctx_error(rest, "unclosed class body"));
            }
            if let (next, Some(_)) = opt(nom_char('}'))(rest)? {
                return Ok((next, (members, nested)));
            }
            if let (next, Some(_)) = opt(nom_char(';'))(rest)? {
                rest = next;
                continue;
            }
            let member_start = rest;
            let (r, annotations) = self.annotations(rest)?;
            let (r, modifiers) = self.modifiers(r)?;
            if let (after, Some(_)) = opt(keyword("class"))(r)? {
                let (r, mut decl) = self.type_declaration(
                    after,
                    class_kind(&modifiers),
                    &modifiers,
                    annotations,
                    member_start,
                )?;
                add_name_prefix(&mut decl, parent_name);
                nested.push(decl);
                rest = r;
                continue;
            }
            if let (after, Some(_)) = opt(keyword("interface"))(r)? {
                let (r, mut decl) = self.type_declaration(
                    after,
                    DeclKind::Interface,
                    &modifiers,
                    annotations,
                    member_start,
                )?;
                add_name_prefix(&mut decl, parent_name);
                nested.push(decl);
                rest = r;
                continue;
            }
            if let (after, Some(_)) = opt(keyword("object"))(r)? {
                let (r, mut decl) = self.type_declaration(
                    after,
                    DeclKind::Object,
                    &modifiers,
                    annotations,
                    member_start,
                )?;
                add_name_prefix(&mut decl, parent_name);
                nested.push(decl);
                rest = r;
                continue;
            }
            if let (after, Some(_)) = opt(keyword("constructor"))(r)? {
                // Secondary constructor: parameters, optional delegation,
                // optional body
                let (after, _) = trivia(after)?;
                let (r, _) = self.value_parameters(after)?;
                let (mut r, _) = trivia(r)?;
                if let (after_colon, Some(_)) = opt(nom_char(':'))(r)? {
                    let stops = ScanStops {
                        chars: &['{'],
                        keywords: &[],
                        stop_on_newline: true,
                    };
                    r = scan_balanced(after_colon, &stops)?.0;
                }
                let (r, _) = trivia(r)?;
                rest = if r.starts_with('{') {
                    context("unbalanced constructor body", |i| balanced_block(i, '{', '}'))(r)?.0
                } else {
                    r
                };
                continue;
            }
            if let (after, Some(_)) = opt(keyword("init"))(r)? {
                let (after, _) = trivia(after)?;
                let (r, _) =
                    context("expected init block", |i| balanced_block(i, '{', '}'))(after)?;
                rest = r;
                continue;
            }
            if let (after, Some(_)) = opt(keyword("typealias"))(r)? {
                let (r, _) = self.skip_statement(after)?;
                rest = r;
                continue;
            }
            if let (after, Some(_)) = opt(keyword("fun"))(r)? {
                let (r, function) = self.function(after, &modifiers, member_start)?;
                if let Some(function) = function {
                    members.push(Member::Function(function));
                }
                rest = r;
                continue;
            }
            if let (after, Some(_)) = opt(keyword("val"))(r)? {
                let (r, property) = self.property(after, false, &modifiers, member_start)?;
                if let Some(property) = property {
                    members.push(Member::Property(property));
                }
                rest = r;
                continue;
            }
            if let (after, Some(_)) = opt(keyword("var"))(r)? {
                let (r, property) = self.property(after, true, &modifiers, member_start)?;
                if let Some(property) = property {
                    members.push(Member::Property(property));
                }
                rest = r;
                continue;
            }
            trace!(
                "{}: skipping unrecognized member at offset {}",
                self.path,
                self.offset(r)
            );
            let (r, _) = self.skip_statement(r)?;
            rest = r;
        }
    }

    fn function(
        &self,
        input: &'a str,
        modifiers: &[String],
        span_start: &'a str,
    ) -> SResult<'a, Option<FunctionDecl>> {
        let (mut rest, _) = trivia(input)?;
        let mut type_parameters = Vec::new();
        if rest.starts_with('<') {
            let (r, params) = self.type_parameters(rest)?;
            let (r, _) = trivia(r)?;
            type_parameters = params;
            rest = r;
        }
        // Everything up to the parameter list; extension receivers show
        // up as a dotted header and are skipped as unfakeable
        let stops = ScanStops {
            chars: &['('],
            keywords: &[],
            stop_on_newline: true,
        };
        let (r, header) = scan_balanced(rest, &stops)?;
        if !r.starts_with('(') {
            let (r, _) = self.skip_statement(rest)?;
            return Ok((r, None));
        }
        let header = header.trim();
        let name: String = header
            .chars()
            .rev()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if name.is_empty() {
            return Err(ctx_error(rest, "expected function name"));
        }
        if name.len() != header.len() {
            trace!("{}: skipping extension function {}", self.path, header);
            let (r, _) =
                context("unbalanced parameter list", |i| balanced_block(i, '(', ')'))(r)?;
            let (r, _) = self.skip_statement(r)?;
            return Ok((r, None));
        }
        let (r, params) = self.value_parameters(r)?;
        let (mut rest, _) = trivia(r)?;
        let mut return_type_text = None;
        if let (after_colon, Some(_)) = opt(nom_char(':'))(rest)? {
            let (after_colon, _) = trivia(after_colon)?;
            let stops = ScanStops {
                chars: &['{', '=', ';'],
                keywords: &["where"],
                stop_on_newline: true,
            };
            let (r, type_text) = scan_balanced(after_colon, &stops)?;
            return_type_text = Some(type_text.trim().to_string());
            rest = r;
        }
        let (trimmed, _) = trivia(rest)?;
        let rest = match opt(keyword("where"))(trimmed)? {
            (after_where, Some(_)) => {
                let (r, entries) = self.where_clause(after_where)?;
                merge_where_bounds(&mut type_parameters, entries);
                r
            }
            _ => rest,
        };
        let (trimmed, _) = trivia(rest)?;
        let (rest, has_body) = if trimmed.starts_with('{') {
            let (r, _) =
                context("unbalanced function body", |i| balanced_block(i, '{', '}'))(trimmed)?;
            (r, true)
        } else if let (after_eq, Some(_)) = opt(nom_char('='))(trimmed)? {
            let (r, _) = self.skip_statement(after_eq)?;
            (r, true)
        } else {
            (rest, false)
        };
        let function = FunctionDecl {
            name,
            type_parameters,
            params,
            return_type_text,
            is_suspend: has_modifier(modifiers, "suspend"),
            is_inline: has_modifier(modifiers, "inline"),
            is_abstract: has_modifier(modifiers, "abstract"),
            is_open: has_modifier(modifiers, "open"),
            is_final: has_modifier(modifiers, "final"),
            is_override: has_modifier(modifiers, "override"),
            has_body,
            span: (self.offset(span_start), self.offset(rest)),
        };
        Ok((rest, Some(function)))
    }

    fn property(
        &self,
        input: &'a str,
        mutable: bool,
        modifiers: &[String],
        span_start: &'a str,
    ) -> SResult<'a, Option<PropertyDecl>> {
        let (rest, _) = trivia(input)?;
        let (r, name) = match opt(identifier)(rest)? {
            (r, Some(name)) => (r, name),
            (_, None) => {
                // Destructuring or receiver-qualified property: skip
                trace!("{}: skipping unsupported property form", self.path);
                let (r, _) = self.skip_statement(rest)?;
                return Ok((r, None));
            }
        };
        // A dotted name means an extension property
        if ws(nom_char('.'))(r).is_ok() {
            trace!("{}: skipping extension property {}", self.path, name);
            let (r, _) = self.skip_statement(r)?;
            return Ok((r, None));
        }
        let mut type_text = None;
        let (mut r, _) = inline_trivia(r)?;
        if let (after_colon, Some(_)) = opt(nom_char(':'))(r)? {
            let (after_colon, _) = inline_trivia(after_colon)?;
            let stops = ScanStops {
                chars: &['=', ';'],
                keywords: &["by"],
                stop_on_newline: true,
            };
            let (after_type, text) = scan_balanced(after_colon, &stops)?;
            type_text = Some(text.trim().to_string());
            r = after_type;
        }
        let mut has_initializer = false;
        let (trimmed, _) = inline_trivia(r)?;
        if let (after_eq, Some(_)) = opt(nom_char('='))(trimmed)? {
            let (after_init, _) = self.skip_statement(after_eq)?;
            has_initializer = true;
            r = after_init;
        } else if let (after_by, Some(_)) = opt(keyword("by"))(trimmed)? {
            let (after_delegate, _) = self.skip_statement(after_by)?;
            has_initializer = true;
            r = after_delegate;
        }
        // Accessors on following lines
        loop {
            let (lookahead, _) = trivia(r)?;
            let (after_mods, _) = self.modifiers(lookahead)?;
            let (after_kw, accessor) =
                opt(alt((keyword("get"), keyword("set"))))(after_mods)?;
            if accessor.is_none() {
                break;
            }
            let (after_kw, _) = inline_trivia(after_kw)?;
            if !after_kw.starts_with('(') {
                break;
            }
            let (after_parens, _) = context("unbalanced accessor parameters", |i| {
                balanced_block(i, '(', ')')
            })(after_kw)?;
            let (trimmed, _) = inline_trivia(after_parens)?;
            if let (after_eq, Some(_)) = opt(nom_char('='))(trimmed)? {
                let (after_body, _) = self.skip_statement(after_eq)?;
                r = after_body;
            } else if trimmed.starts_with('{') {
                let (after_body, _) = context("unbalanced accessor body", |i| {
                    balanced_block(i, '{', '}')
                })(trimmed)?;
                r = after_body;
            } else {
                r = after_parens;
            }
            has_initializer = true;
        }
        let property = PropertyDecl {
            name: name.to_string(),
            type_text,
            mutable,
            is_abstract: has_modifier(modifiers, "abstract"),
            is_open: has_modifier(modifiers, "open"),
            is_final: has_modifier(modifiers, "final"),
            is_override: has_modifier(modifiers, "override"),
            has_initializer,
            span: (self.offset(span_start), self.offset(r)),
        };
        Ok((r, Some(property)))
    }

    /// Consume to the end of the current statement: the next `;` or
    /// newline at zero bracket depth.
    fn skip_statement(&self, input: &'a str) -> SResult<'a, &'a str> {
        let stops = ScanStops {
            chars: &[';'],
            keywords: &[],
            stop_on_newline: true,
        };
        let (rest, text) = scan_balanced(input, &stops)?;
        let (rest, _) = opt(nom_char(';'))(rest)?;
        Ok((rest, text))
    }
}

fn class_kind(modifiers: &[String]) -> DeclKind {
    if has_modifier(modifiers, "enum") {
        DeclKind::EnumClass
    } else if has_modifier(modifiers, "annotation") {
        DeclKind::AnnotationClass
    } else {
        DeclKind::Class
    }
}

fn modality_of(modifiers: &[String], kind: DeclKind) -> Modality {
    if has_modifier(modifiers, "sealed") {
        Modality::Sealed
    } else if has_modifier(modifiers, "abstract") {
        Modality::Abstract
    } else if has_modifier(modifiers, "open") || kind == DeclKind::Interface {
        Modality::Open
    } else {
        Modality::Final
    }
}

fn has_modifier(modifiers: &[String], name: &str) -> bool {
    modifiers.iter().any(|m| m == name)
}

fn merge_where_bounds(params: &mut [TypeParamDecl], entries: Vec<(String, String)>) {
    for (name, bound) in entries {
        if let Some(param) = params.iter_mut().find(|p| p.bare_name == name) {
            if !bound.is_empty() {
                param.bounds.push(bound);
            }
        }
    }
}

fn add_name_prefix(declaration: &mut Declaration, prefix: &str) {
    declaration.name = format!("{}.{}", prefix, declaration.name);
    for nested in &mut declaration.nested {
        add_name_prefix(nested, prefix);
    }
}
