use fakt::frontend::diagnostics::DiagnosticCode;
use fakt::metadata::ValidatedDeclaration;
use fakt::options::FaktOptions;

use crate::common::{annotated, validate_sources, validate_with_options};

#[test]
fn extracts_interface_members_in_source_order() {
    let source = annotated(
        "com.example",
        r#"
@Fake
interface Service {
    val id: String
    fun greet(name: String): String
    suspend fun fetch(url: String): Result<String>
}
"#,
    );
    let ctx = validate_sources(&[("Service.kt", &source)]);
    assert_eq!(ctx.store.len(), 1);
    let declaration = ctx.store.get("com.example.Service").expect("stored");
    let ValidatedDeclaration::Interface(meta) = declaration.as_ref() else {
        panic!("expected interface metadata");
    };
    assert_eq!(meta.simple_name, "Service");
    assert_eq!(meta.package_name, "com.example");
    assert_eq!(meta.properties.len(), 1);
    assert_eq!(meta.properties[0].name, "id");
    assert!(!meta.properties[0].is_mutable);
    let names: Vec<&str> = meta.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["greet", "fetch"]);
    assert!(meta.functions[1].is_suspend);
    assert_eq!(meta.functions[1].return_type, "Result<String>");
    assert!(declaration.validation_time_nanos() > 0);
    assert_eq!(
        declaration.class_id().as_canonical_string(),
        "com/example/Service"
    );
}

#[test]
fn unannotated_declarations_are_ignored() {
    let source = annotated(
        "p",
        r#"
interface Plain {
    fun x(): Int
}

@Fake
interface Wanted {
    fun y(): Int
}
"#,
    );
    let ctx = validate_sources(&[("a.kt", &source)]);
    assert_eq!(ctx.store.len(), 1);
    assert!(ctx.store.get("p.Wanted").is_some());
}

#[test]
fn configured_annotation_set_replaces_default() {
    let source = "package p\n\nimport com.acme.Double\n\n@Double\ninterface A { fun x(): Int }\n";
    let options = FaktOptions {
        fake_annotations: vec!["com.acme.Double".to_string()],
        ..FaktOptions::default()
    };
    let ctx = validate_with_options(&[("a.kt", source)], options);
    assert_eq!(ctx.store.len(), 1);
    // The default annotation is no longer recognized
    let default_source = annotated("p", "@Fake\ninterface B { fun x(): Int }");
    let options = FaktOptions {
        fake_annotations: vec!["com.acme.Double".to_string()],
        ..FaktOptions::default()
    };
    let ctx = validate_with_options(&[("b.kt", &default_source)], options);
    assert_eq!(ctx.store.len(), 0);
}

#[test]
fn inherited_members_are_collected_transitively() {
    let source = annotated(
        "p",
        r#"
interface Closeable {
    fun close()
}

interface Stream : Closeable {
    fun read(): Int
}

@Fake
interface Buffered : Stream {
    fun buffer(): Int
    override fun read(): Int
}
"#,
    );
    let ctx = validate_sources(&[("a.kt", &source)]);
    let declaration = ctx.store.get("p.Buffered").expect("stored");
    let ValidatedDeclaration::Interface(meta) = declaration.as_ref() else {
        panic!("expected interface");
    };
    // Own members: buffer and the override of read
    let own: Vec<&str> = meta.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(own, vec!["buffer", "read"]);
    // Inherited: close (read is overridden in the subject)
    let inherited: Vec<&str> = meta
        .inherited_functions
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(inherited, vec!["close"]);
}

#[test]
fn supertype_type_arguments_are_substituted() {
    let source = annotated(
        "p",
        r#"
interface Box<T> {
    fun unwrap(): T
    fun replace(value: T): Box<T>
}

@Fake
interface StringBox : Box<String> {
    fun label(): String
}
"#,
    );
    let ctx = validate_sources(&[("a.kt", &source)]);
    let declaration = ctx.store.get("p.StringBox").expect("stored");
    let ValidatedDeclaration::Interface(meta) = declaration.as_ref() else {
        panic!("expected interface");
    };
    let unwrap = meta
        .inherited_functions
        .iter()
        .find(|f| f.name == "unwrap")
        .expect("inherited unwrap");
    assert_eq!(unwrap.return_type, "String");
    let replace = meta
        .inherited_functions
        .iter()
        .find(|f| f.name == "replace")
        .expect("inherited replace");
    assert_eq!(replace.parameters[0].type_text, "String");
    assert_eq!(replace.return_type, "p.Box<String>");
}

#[test]
fn universal_members_are_excluded() {
    let source = annotated(
        "p",
        r#"
@Fake
interface Entity {
    fun save(): Boolean
    override fun equals(other: Any?): Boolean
    override fun hashCode(): Int
    override fun toString(): String
}
"#,
    );
    let ctx = validate_sources(&[("a.kt", &source)]);
    let declaration = ctx.store.get("p.Entity").expect("stored");
    let ValidatedDeclaration::Interface(meta) = declaration.as_ref() else {
        panic!("expected interface");
    };
    let names: Vec<&str> = meta.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["save"]);
}

#[test]
fn class_members_are_classified_abstract_or_open() {
    let source = annotated(
        "p",
        r#"
@Fake
abstract class Handler(val name: String) {
    abstract fun handle(event: String): Boolean
    abstract val label: String
    open fun retries(): Int = 3
    open var state: Int = 0
    fun sealedBehavior(): Int = 1
}
"#,
    );
    let ctx = validate_sources(&[("a.kt", &source)]);
    let declaration = ctx.store.get("p.Handler").expect("stored");
    let ValidatedDeclaration::Class(meta) = declaration.as_ref() else {
        panic!("expected class");
    };
    assert_eq!(meta.abstract_methods.len(), 1);
    assert_eq!(meta.abstract_methods[0].name, "handle");
    assert_eq!(meta.abstract_properties.len(), 1);
    assert_eq!(meta.abstract_properties[0].name, "label");
    assert_eq!(meta.open_methods.len(), 1);
    assert_eq!(meta.open_methods[0].name, "retries");
    assert_eq!(meta.open_properties.len(), 1);
    assert_eq!(meta.open_properties[0].name, "state");
    // Final members never appear
    assert!(meta
        .open_methods
        .iter()
        .all(|f| f.name != "sealedBehavior"));
    assert_eq!(meta.constructor_params.len(), 1);
    assert_eq!(meta.constructor_params[0].name, "name");
}

#[test]
fn final_class_without_overridable_members_is_rejected() {
    let source = annotated(
        "p",
        r#"
@Fake
class Rigid {
    fun compute(): Int = 1
}
"#,
    );
    let ctx = validate_sources(&[("a.kt", &source)]);
    assert_eq!(ctx.store.len(), 0);
    let diagnostics = ctx.diagnostics_snapshot();
    assert!(diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::AnnotationOnFinalClassWithoutOverrides));
}

#[test]
fn unsupported_kinds_produce_diagnostics_and_no_metadata() {
    let source = annotated(
        "p",
        r#"
@Fake
object Singleton {
    fun helper(): Int = 1
}

@Fake
enum class Color { RED, GREEN }

@Fake
sealed class Event {
    abstract fun id(): Int
}
"#,
    );
    let ctx = validate_sources(&[("a.kt", &source)]);
    assert_eq!(ctx.store.len(), 0);
    let diagnostics = ctx.diagnostics_snapshot();
    let unsupported = diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::AnnotationOnUnsupportedKind)
        .count();
    assert_eq!(unsupported, 3);
}

#[test]
fn duplicate_fqns_keep_first_and_warn() {
    let first = annotated("p", "@Fake\ninterface Twin { fun a(): Int }");
    let second = annotated("p", "@Fake\ninterface Twin { fun b(): Int }");
    let ctx = validate_sources(&[("a.kt", &first), ("b.kt", &second)]);
    assert_eq!(ctx.store.len(), 1);
    let declaration = ctx.store.get("p.Twin").expect("stored");
    let ValidatedDeclaration::Interface(meta) = declaration.as_ref() else {
        panic!("expected interface");
    };
    assert_eq!(meta.functions[0].name, "a");
    assert!(ctx
        .diagnostics_snapshot()
        .iter()
        .any(|d| d.code == DiagnosticCode::DuplicateAnnotatedName));
}

#[test]
fn type_names_are_qualified_through_imports() {
    let user_file = "package com.acme.model\n\nclass User\n";
    let service = "package com.example\n\nimport com.acme.model.User\nimport dev.fakt.annotations.Fake\n\n@Fake\ninterface Users {\n    fun find(id: String): User?\n    fun all(): List<User>\n}\n";
    let ctx = validate_sources(&[("User.kt", user_file), ("Users.kt", service)]);
    let declaration = ctx.store.get("com.example.Users").expect("stored");
    let ValidatedDeclaration::Interface(meta) = declaration.as_ref() else {
        panic!("expected interface");
    };
    assert_eq!(meta.functions[0].return_type, "com.acme.model.User?");
    assert!(!meta.functions[0].is_suspend);
    assert_eq!(meta.functions[1].return_type, "List<com.acme.model.User>");
}

#[test]
fn vararg_parameters_record_element_type_and_flag() {
    let source = annotated(
        "p",
        r#"
@Fake
interface Tags {
    fun tag(first: String, vararg rest: String): Int
}
"#,
    );
    let ctx = validate_sources(&[("a.kt", &source)]);
    let declaration = ctx.store.get("p.Tags").expect("stored");
    let ValidatedDeclaration::Interface(meta) = declaration.as_ref() else {
        panic!("expected interface");
    };
    let params = &meta.functions[0].parameters;
    assert!(!params[0].is_vararg);
    assert!(params[1].is_vararg);
    assert_eq!(params[1].type_text, "String");
}

#[test]
fn default_value_snippets_are_preserved_verbatim() {
    let source = annotated(
        "p",
        r#"
@Fake
interface Pager {
    fun page(size: Int = 20, label: String = "page-" + 1): List<String>
}
"#,
    );
    let ctx = validate_sources(&[("a.kt", &source)]);
    let declaration = ctx.store.get("p.Pager").expect("stored");
    let ValidatedDeclaration::Interface(meta) = declaration.as_ref() else {
        panic!("expected interface");
    };
    let params = &meta.functions[0].parameters;
    assert!(params[0].has_default);
    assert_eq!(params[0].default_source.as_deref(), Some("20"));
    assert_eq!(params[1].default_source.as_deref(), Some("\"page-\" + 1"));
}
