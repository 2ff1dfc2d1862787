use fakt::frontend::diagnostics::DiagnosticCode;
use fakt::generator::{FakeGenerator, GeneratedFake};

use crate::common::{annotated, validate_sources};

/// Validate the sources and build (without writing) every fake.
fn build_fakes(sources: &[(&str, &str)]) -> Vec<GeneratedFake> {
    let ctx = validate_sources(sources);
    let generator = FakeGenerator::new(&ctx);
    let fakes: Vec<GeneratedFake> = ctx
        .store
        .snapshot()
        .iter()
        .map(|declaration| generator.build_fake(declaration))
        .collect();
    for diagnostic in ctx.diagnostics_snapshot().iter() {
        assert_ne!(
            diagnostic.code,
            DiagnosticCode::ExtractionFailed,
            "unexpected extraction failure: {}",
            diagnostic
        );
    }
    fakes
}

fn build_single(source: &str) -> GeneratedFake {
    let mut fakes = build_fakes(&[("Subject.kt", source)]);
    assert_eq!(fakes.len(), 1, "expected exactly one fake");
    fakes.remove(0)
}

#[test]
fn trivial_interface_generates_behavior_counter_config_and_factory() {
    let source = annotated(
        "com.example",
        r#"
@Fake
interface S {
    fun g(x: String): String
}
"#,
    );
    let fake = build_single(&source);
    assert_eq!(
        fake.relative_path.to_string_lossy(),
        "com/example/FakeSImpl.kt"
    );
    insta::assert_snapshot!(fake.content, @r###"
package com.example

import java.util.concurrent.atomic.AtomicInteger

class FakeSImpl : S {
    var gBehavior: (String) -> String = { "" }

    private val _gCallCount: AtomicInteger = AtomicInteger(0)

    val gCallCount: Int
        get() = _gCallCount.get()

    override fun g(x: String): String {
        _gCallCount.incrementAndGet()
        return gBehavior(x)
    }
}

class FakeSConfig(private val impl: FakeSImpl) {
    fun g(behavior: (String) -> String) {
        impl.gBehavior = behavior
    }
}

fun fakeS(configure: FakeSConfig.() -> Unit = {}): S {
    val impl = FakeSImpl()
    val config = FakeSConfig(impl)
    config.configure()
    return impl
}
"###);
}

#[test]
fn suspend_functions_stay_suspend_everywhere() {
    let source = annotated(
        "com.example",
        r#"
@Fake
interface A {
    suspend fun fetch(url: String): Result<String>
}
"#,
    );
    let fake = build_single(&source);
    assert!(fake
        .content
        .contains("var fetchBehavior: suspend (String) -> Result<String> = { Result.success(\"\") }"));
    assert!(fake
        .content
        .contains("override suspend fun fetch(url: String): Result<String> {"));
    assert!(fake
        .content
        .contains("fun fetch(behavior: suspend (String) -> Result<String>) {"));
}

#[test]
fn generic_interface_preserves_type_parameters() {
    let source = annotated(
        "com.example",
        r#"
@Fake
interface R<T> {
    fun save(x: T): T
    fun findById(id: String): T?
}
"#,
    );
    let fake = build_single(&source);
    assert!(fake.content.contains("class FakeRImpl<T> : R<T> {"));
    assert!(fake.content.contains("var saveBehavior: (T) -> T ="));
    assert!(fake
        .content
        .contains("var findByIdBehavior: (String) -> T? = { null }"));
    assert!(fake
        .content
        .contains("fun <T> fakeR(configure: FakeRConfig<T>.() -> Unit = {}): R<T> {"));
    assert!(fake.content.contains("val impl = FakeRImpl<T>()"));
    // Unbounded parameter defaults need the unchecked-cast suppression
    assert!(fake.content.contains("@Suppress(\"UNCHECKED_CAST\")"));
}

#[test]
fn open_class_members_delegate_to_super_by_default() {
    let source = annotated(
        "com.example",
        r#"
@Fake
open class U {
    open fun hello(): String = "hi"
}
"#,
    );
    let fake = build_single(&source);
    assert!(fake
        .content
        .contains("var helloBehavior: (() -> String)? = null"));
    assert!(fake
        .content
        .contains("return helloBehavior?.invoke() ?: super.hello()"));
    assert!(fake.content.contains("class FakeUImpl : U() {"));
}

#[test]
fn class_constructor_parameters_flow_through_the_factory() {
    let source = annotated(
        "com.example",
        r#"
@Fake
abstract class Repo(val name: String, retries: Int = 3) {
    abstract fun load(id: String): String
}
"#,
    );
    let fake = build_single(&source);
    assert!(fake
        .content
        .contains("class FakeRepoImpl(name: String, retries: Int) : Repo(name, retries) {"));
    // Defaults re-emitted verbatim on the factory only
    assert!(fake.content.contains(
        "fun fakeRepo(name: String, retries: Int = 3, configure: FakeRepoConfig.() -> Unit = {}): Repo {"
    ));
    assert!(fake.content.contains("val impl = FakeRepoImpl(name, retries)"));
}

#[test]
fn overloads_disambiguate_by_source_order() {
    let source = annotated(
        "com.example",
        r#"
@Fake
interface Overloaded {
    fun foo(x: Int): Int
    fun foo(x: String): Int
    fun foo(x: Int, y: Int): Int
}
"#,
    );
    let fake = build_single(&source);
    assert!(fake.content.contains("var fooBehavior: (Int) -> Int"));
    assert!(fake.content.contains("var foo2Behavior: (String) -> Int"));
    assert!(fake.content.contains("var foo3Behavior: (Int, Int) -> Int"));
    assert!(fake.content.contains("val fooCallCount: Int"));
    assert!(fake.content.contains("val foo2CallCount: Int"));
    assert!(fake.content.contains("val foo3CallCount: Int"));
    // The DSL keeps the plain member name for every overload
    assert_eq!(fake.content.matches("fun foo(behavior:").count(), 3);
}

#[test]
fn unresolvable_default_keeps_configuration_mandatory() {
    let sources = [
        ("Engine.kt", "package com.example\n\nclass Engine\n"),
        (
            "Car.kt",
            "package com.example\n\nimport dev.fakt.annotations.Fake\n\n@Fake\ninterface Car {\n    fun engine(): Engine\n}\n",
        ),
    ];
    let ctx = validate_sources(&sources);
    let generator = FakeGenerator::new(&ctx);
    let snapshot = ctx.store.snapshot();
    let fake = generator.build_fake(&snapshot[0]);
    assert!(fake
        .content
        .contains("var engineBehavior: (() -> Engine)? = null"));
    assert!(fake.content.contains(
        "return engineBehavior?.invoke() ?: throw IllegalStateException(\"engine is not configured on this fake\")"
    ));
    assert!(ctx
        .diagnostics_snapshot()
        .iter()
        .any(|d| d.code == DiagnosticCode::UnresolvableDefault));
}

#[test]
fn interface_with_only_inherited_members_still_generates() {
    let source = annotated(
        "com.example",
        r#"
interface Base {
    fun ping(): String
}

@Fake
interface Derived : Base
"#,
    );
    let fake = build_single(&source);
    assert!(fake.content.contains("class FakeDerivedImpl : Derived {"));
    assert!(fake.content.contains("var pingBehavior: () -> String = { \"\" }"));
    assert!(fake.content.contains("override fun ping(): String {"));
}

#[test]
fn mutable_properties_generate_getter_and_setter_behaviors() {
    let source = annotated(
        "com.example",
        r#"
@Fake
interface Counter {
    var value: Int
}
"#,
    );
    let fake = build_single(&source);
    assert!(fake.content.contains("var valueBehavior: () -> Int = { 0 }"));
    assert!(fake
        .content
        .contains("var valueSetBehavior: (Int) -> Unit = { }"));
    assert!(fake.content.contains("override var value: Int"));
    assert!(fake.content.contains("fun valueSetter(behavior: (Int) -> Unit) {"));
}

#[test]
fn vararg_members_pass_the_holder_array_to_behaviors() {
    let source = annotated(
        "com.example",
        r#"
@Fake
interface Tagger {
    fun tag(vararg tags: String): Int
    fun sum(vararg values: Int): Int
}
"#,
    );
    let fake = build_single(&source);
    assert!(fake
        .content
        .contains("var tagBehavior: (Array<out String>) -> Int = { 0 }"));
    assert!(fake.content.contains("override fun tag(vararg tags: String): Int {"));
    assert!(fake.content.contains("var sumBehavior: (IntArray) -> Int = { 0 }"));
}

#[test]
fn generated_output_is_deterministic() {
    let source = annotated(
        "com.example",
        r#"
@Fake
interface Stable {
    fun a(): Int
    fun b(x: List<String>): Map<String, Int>
}
"#,
    );
    let first = build_single(&source);
    let second = build_single(&source);
    assert_eq!(first.content, second.content);
    assert_eq!(first.content.as_bytes(), second.content.as_bytes());
}

#[test]
fn metrics_reflect_the_rendered_file() {
    let source = annotated(
        "com.example",
        r#"
@Fake
interface Metered {
    fun a(): Int
    fun b(): Int
}
"#,
    );
    let fake = build_single(&source);
    assert_eq!(fake.metrics.member_count, 2);
    assert_eq!(fake.metrics.line_count, fake.content.lines().count());
    assert_eq!(fake.metrics.byte_count, fake.content.len());
    assert!(fake.metrics.import_count >= 1);
}
