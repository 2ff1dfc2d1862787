//! Deterministic renderer producing UTF-8 Kotlin source from a
//! [`CodeFile`]. Indentation is four spaces; imports are deduplicated and
//! sorted lexicographically; member order follows the model.

use super::model::{
    ClassKind, CodeBlock, CodeClass, CodeDeclaration, CodeExpression, CodeFile, CodeFunction,
    CodeMember, CodeParameter, CodeProperty, CodeType, CodeTypeParameter,
};

const INDENT: &str = "    ";

pub fn render_file(file: &CodeFile) -> String {
    let mut out = String::new();
    if !file.package.is_empty() {
        out.push_str("package ");
        out.push_str(&file.package);
        out.push('\n');
    }
    let mut imports: Vec<&String> = file.imports.iter().collect();
    imports.sort();
    if !imports.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        for import in imports {
            out.push_str("import ");
            out.push_str(import);
            out.push('\n');
        }
    }
    for declaration in &file.declarations {
        if !out.is_empty() {
            out.push('\n');
        }
        match declaration {
            CodeDeclaration::Class(class) => render_class(&mut out, class, 0),
            CodeDeclaration::Function(function) => render_function(&mut out, function, 0),
            CodeDeclaration::Property(property) => render_property(&mut out, property, 0),
        }
    }
    out
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

fn push_annotations(out: &mut String, annotations: &[String], level: usize) {
    for annotation in annotations {
        push_indent(out, level);
        out.push('@');
        out.push_str(annotation);
        out.push('\n');
    }
}

fn push_modifiers(out: &mut String, modifiers: &[super::model::CodeModifier]) {
    for modifier in modifiers {
        out.push_str(modifier.as_str());
        out.push(' ');
    }
}

/// Type parameters with a single bound render inline; parameters with
/// more than one bound contribute to a trailing `where` clause.
fn render_type_parameters(params: &[CodeTypeParameter]) -> (String, Vec<String>) {
    if params.is_empty() {
        return (String::new(), Vec::new());
    }
    let mut where_entries = Vec::new();
    let mut rendered = Vec::new();
    for param in params {
        match param.bounds.len() {
            0 => rendered.push(param.name.clone()),
            1 => rendered.push(format!("{} : {}", param.name, param.bounds[0].render())),
            _ => {
                rendered.push(param.name.clone());
                for bound in &param.bounds {
                    where_entries.push(format!("{} : {}", param.bare_name(), bound.render()));
                }
            }
        }
    }
    (format!("<{}>", rendered.join(", ")), where_entries)
}

fn render_parameter(param: &CodeParameter) -> String {
    let mut text = String::new();
    for marker in &param.markers {
        text.push_str(marker);
        text.push(' ');
    }
    if param.vararg {
        text.push_str("vararg ");
    }
    text.push_str(&param.name);
    text.push_str(": ");
    text.push_str(&param.ty.render());
    if let Some(default) = &param.default {
        text.push_str(" = ");
        text.push_str(default);
    }
    text
}

fn render_class(out: &mut String, class: &CodeClass, level: usize) {
    push_annotations(out, &class.annotations, level);
    push_indent(out, level);
    push_modifiers(out, &class.modifiers);
    out.push_str(match class.kind {
        ClassKind::Class => "class ",
        ClassKind::Object => "object ",
    });
    out.push_str(&class.name);
    let (type_params, where_entries) = render_type_parameters(&class.type_parameters);
    out.push_str(&type_params);
    if !class.constructor_params.is_empty() {
        let params: Vec<String> = class.constructor_params.iter().map(render_parameter).collect();
        out.push('(');
        out.push_str(&params.join(", "));
        out.push(')');
    }
    if !class.supertypes.is_empty() {
        out.push_str(" : ");
        let entries: Vec<String> = class
            .supertypes
            .iter()
            .map(|s| match &s.call_args {
                Some(args) => format!("{}({})", s.ty.render(), args.join(", ")),
                None => s.ty.render(),
            })
            .collect();
        out.push_str(&entries.join(", "));
    }
    if !where_entries.is_empty() {
        out.push_str(" where ");
        out.push_str(&where_entries.join(", "));
    }
    if class.members.is_empty() {
        out.push('\n');
        return;
    }
    out.push_str(" {\n");
    for (index, member) in class.members.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        match member {
            CodeMember::Property(property) => render_property(out, property, level + 1),
            CodeMember::Function(function) => render_function(out, function, level + 1),
            CodeMember::Class(nested) => render_class(out, nested, level + 1),
        }
    }
    push_indent(out, level);
    out.push_str("}\n");
}

fn render_property(out: &mut String, property: &CodeProperty, level: usize) {
    push_annotations(out, &property.annotations, level);
    push_indent(out, level);
    push_modifiers(out, &property.modifiers);
    out.push_str(if property.mutable { "var " } else { "val " });
    out.push_str(&property.name);
    out.push_str(": ");
    out.push_str(&property.ty.render());
    if let Some(initializer) = &property.initializer {
        out.push_str(" = ");
        out.push_str(&render_expression(initializer));
    }
    out.push('\n');
    if let Some(getter) = &property.getter {
        render_accessor(out, "get()", getter, level + 1);
    }
    if let Some(setter) = &property.setter {
        render_accessor(out, "set(value)", setter, level + 1);
    }
}

fn render_accessor(out: &mut String, head: &str, block: &CodeBlock, level: usize) {
    push_indent(out, level);
    out.push_str(head);
    match block {
        CodeBlock::Expression(expr) => {
            out.push_str(" = ");
            out.push_str(&render_expression(expr));
            out.push('\n');
        }
        CodeBlock::Statements(lines) => {
            out.push_str(" {\n");
            for line in lines {
                push_indent(out, level + 1);
                out.push_str(line);
                out.push('\n');
            }
            push_indent(out, level);
            out.push_str("}\n");
        }
    }
}

fn render_function(out: &mut String, function: &CodeFunction, level: usize) {
    push_annotations(out, &function.annotations, level);
    push_indent(out, level);
    push_modifiers(out, &function.modifiers);
    out.push_str("fun ");
    let (type_params, where_entries) = render_type_parameters(&function.type_parameters);
    if !type_params.is_empty() {
        out.push_str(&type_params);
        out.push(' ');
    }
    out.push_str(&function.name);
    let params: Vec<String> = function.parameters.iter().map(render_parameter).collect();
    out.push('(');
    out.push_str(&params.join(", "));
    out.push(')');
    if let Some(return_type) = &function.return_type {
        out.push_str(": ");
        out.push_str(&return_type.render());
    }
    if !where_entries.is_empty() {
        out.push_str(" where ");
        out.push_str(&where_entries.join(", "));
    }
    match &function.body {
        None => out.push('\n'),
        Some(CodeBlock::Expression(expr)) => {
            out.push_str(" = ");
            out.push_str(&render_expression(expr));
            out.push('\n');
        }
        Some(CodeBlock::Statements(lines)) => {
            out.push_str(" {\n");
            for line in lines {
                push_indent(out, level + 1);
                out.push_str(line);
                out.push('\n');
            }
            push_indent(out, level);
            out.push_str("}\n");
        }
    }
}

pub fn render_expression(expr: &CodeExpression) -> String {
    match expr {
        CodeExpression::StringLit(text) => format!("\"{}\"", escape_string(text)),
        CodeExpression::NumberLit(text) => text.clone(),
        CodeExpression::BoolLit(value) => value.to_string(),
        CodeExpression::NullLit => "null".to_string(),
        CodeExpression::Name(name) => name.clone(),
        CodeExpression::Raw(text) => text.clone(),
        CodeExpression::Call { target, args } => {
            let rendered: Vec<String> = args.iter().map(render_expression).collect();
            format!("{}({})", render_expression(target), rendered.join(", "))
        }
        CodeExpression::PropertyAccess { receiver, name } => {
            format!("{}.{}", render_expression(receiver), name)
        }
        CodeExpression::Lambda { params, body } => {
            let body_text = render_expression(body);
            match (params.is_empty(), body_text.is_empty()) {
                (true, true) => "{ }".to_string(),
                (true, false) => format!("{{ {} }}", body_text),
                (false, true) => format!("{{ {} -> }}", params.join(", ")),
                (false, false) => format!("{{ {} -> {} }}", params.join(", "), body_text),
            }
        }
        CodeExpression::When { subject, branches } => {
            let head = match subject {
                Some(subject) => format!("when ({})", render_expression(subject)),
                None => "when".to_string(),
            };
            let rendered: Vec<String> = branches
                .iter()
                .map(|(condition, value)| {
                    format!("{} -> {}", condition, render_expression(value))
                })
                .collect();
            format!("{} {{ {} }}", head, rendered.join("; "))
        }
    }
}

fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '$' => escaped.push_str("\\$"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}
