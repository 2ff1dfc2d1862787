use std::fs;

use fakt::frontend::diagnostics::DiagnosticCode;
use fakt::options::{FaktOptions, LogLevel};
use fakt::pipeline::Compilation;

use crate::common::{annotated, ScratchDir};

fn options_for(dir: &ScratchDir) -> FaktOptions {
    FaktOptions {
        enabled: true,
        output_dir: Some(dir.file("generated")),
        ..FaktOptions::default()
    }
}

fn sources_from(dir: &ScratchDir, files: &[(&str, String)]) -> Vec<(String, String)> {
    files
        .iter()
        .map(|(name, content)| {
            let path = dir.write(name, content);
            (path.to_string_lossy().into_owned(), content.clone())
        })
        .collect()
}

#[test]
fn full_pipeline_emits_one_file_per_declaration() {
    let dir = ScratchDir::new("pipeline");
    let sources = sources_from(
        &dir,
        &[
            (
                "src/Service.kt",
                annotated(
                    "com.example.api",
                    "@Fake\ninterface Service {\n    fun call(payload: String): String\n}",
                ),
            ),
            (
                "src/Worker.kt",
                annotated(
                    "com.example.impl",
                    "@Fake\nabstract class Worker {\n    abstract fun work(): Int\n    open fun idle(): Boolean = true\n}",
                ),
            ),
        ],
    );
    let compilation = Compilation::new(options_for(&dir));
    let result = compilation.run(&sources);
    assert!(!result.diagnostics.has_errors());
    assert_eq!(result.summary.total_files, 2);
    assert_eq!(result.summary.interfaces_discovered, 1);
    assert_eq!(result.summary.classes_discovered, 1);
    assert!(result.summary.total_lines > 0);
    assert!(result.success_message.starts_with("✅ 2 fakes generated in"));

    let service = dir
        .file("generated")
        .join("com/example/api/FakeServiceImpl.kt");
    let worker = dir
        .file("generated")
        .join("com/example/impl/FakeWorkerImpl.kt");
    assert!(service.exists());
    assert!(worker.exists());
    let worker_content = fs::read_to_string(&worker).unwrap();
    assert!(worker_content.contains("package com.example.impl"));
    assert!(worker_content.contains("?: super.idle()"));
}

#[test]
fn runs_are_byte_deterministic() {
    let source = annotated(
        "com.example",
        "@Fake\ninterface Stable {\n    fun a(x: Map<String, Int>): List<String>\n    fun b(): Unit\n}",
    );
    let mut outputs = Vec::new();
    for _ in 0..2 {
        let dir = ScratchDir::new("determinism");
        let sources = sources_from(&dir, &[("src/Stable.kt", source.clone())]);
        let compilation = Compilation::new(options_for(&dir));
        compilation.run(&sources);
        let content = fs::read(
            dir.file("generated")
                .join("com/example/FakeStableImpl.kt"),
        )
        .unwrap();
        outputs.push(content);
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn disabled_plugin_does_nothing() {
    let dir = ScratchDir::new("disabled");
    let sources = sources_from(
        &dir,
        &[(
            "src/Service.kt",
            annotated("p", "@Fake\ninterface S { fun x(): Int }"),
        )],
    );
    let options = FaktOptions {
        enabled: false,
        output_dir: Some(dir.file("generated")),
        ..FaktOptions::default()
    };
    let compilation = Compilation::new(options);
    assert!(compilation.is_disabled());
    let result = compilation.run(&sources);
    assert_eq!(result.summary.total_files, 0);
    assert!(result.success_message.is_empty());
    assert!(!dir.file("generated").exists());
}

#[test]
fn missing_output_dir_disables_with_a_configuration_error() {
    let options = FaktOptions {
        enabled: true,
        output_dir: None,
        ..FaktOptions::default()
    };
    let compilation = Compilation::new(options);
    assert!(compilation.is_disabled());
    let result = compilation.run(&[]);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::InvalidConfiguration));
}

#[test]
fn syntax_errors_are_reported_and_other_files_proceed() {
    let dir = ScratchDir::new("syntax-error");
    let sources = sources_from(
        &dir,
        &[
            ("src/Broken.kt", "interface {".to_string()),
            (
                "src/Good.kt",
                annotated("p", "@Fake\ninterface Good { fun x(): Int }"),
            ),
        ],
    );
    let compilation = Compilation::new(options_for(&dir));
    let result = compilation.run(&sources);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::SyntaxError));
    // The healthy file still generated
    assert_eq!(result.summary.total_files, 1);
    assert!(dir.file("generated").join("p/FakeGoodImpl.kt").exists());
}

#[test]
fn quiet_level_suppresses_the_success_message() {
    let dir = ScratchDir::new("quiet");
    let sources = sources_from(
        &dir,
        &[(
            "src/Service.kt",
            annotated("p", "@Fake\ninterface S { fun x(): Int }"),
        )],
    );
    let options = FaktOptions {
        log_level: Some(LogLevel::Quiet),
        ..options_for(&dir)
    };
    let compilation = Compilation::new(options);
    let result = compilation.run(&sources);
    assert!(result.success_message.is_empty());
    assert_eq!(result.summary.total_files, 1);
}

#[test]
fn trace_report_lists_phases_and_fakes() {
    let dir = ScratchDir::new("trace");
    let sources = sources_from(
        &dir,
        &[(
            "src/Service.kt",
            annotated("p", "@Fake\ninterface S { fun x(): Int }"),
        )],
    );
    let options = FaktOptions {
        log_level: Some(LogLevel::Trace),
        ..options_for(&dir)
    };
    let compilation = Compilation::new(options);
    let result = compilation.run(&sources);
    assert!(result.success_message.contains("frontend"));
    assert!(result.success_message.contains("generation"));
    assert!(result.success_message.contains("p.S"));
    // Child phase durations never exceed their parent
    for phase in &result.summary.phases {
        let child_sum: u64 = phase.sub_phases.iter().map(|p| p.duration_nanos).sum();
        assert!(child_sum <= phase.duration_nanos);
    }
}

#[test]
fn nested_declarations_generate_with_dotted_subject_references() {
    let dir = ScratchDir::new("nested");
    let sources = sources_from(
        &dir,
        &[(
            "src/Outer.kt",
            annotated(
                "p",
                "class Outer {\n    @Fake\n    interface Inner {\n        fun ping(): String\n    }\n}",
            ),
        )],
    );
    let compilation = Compilation::new(options_for(&dir));
    let result = compilation.run(&sources);
    assert!(!result.diagnostics.has_errors());
    let generated = dir.file("generated").join("p/FakeInnerImpl.kt");
    assert!(generated.exists());
    let content = fs::read_to_string(&generated).unwrap();
    assert!(content.contains("class FakeInnerImpl : Outer.Inner {"));
    assert!(content.contains("fun fakeInner(configure: FakeInnerConfig.() -> Unit = {}): Outer.Inner {"));
}
