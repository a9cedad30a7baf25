//! Orchestrator behavior against an in-memory backend.
//!
//! These tests verify that:
//! 1. All targets run concurrently and embed the same version
//! 2. Preludes are the first emitted code
//! 3. Any failure leaves no output files behind
//! 4. Reports follow declaration order, not completion order

mod helpers;

use std::fs;
use std::sync::atomic::Ordering;
use std::time::Duration;

use helpers::{FakeBackend, create_default_project};
use tote_bundler::shim::{CJS_IMPORT_META_PRELUDE, ESM_RUNTIME_PRELUDE};
use tote_bundler::{ArtifactIssue, BuildTarget, Error, Orchestrator, plan_targets};
use tote_config::{ShimMode, TargetConfig, ToteConfig, resolve_version};

fn default_targets(project: &tempfile::TempDir) -> Vec<BuildTarget> {
    let version = resolve_version(project.path().join("package.json")).expect("version");
    plan_targets(&ToteConfig::default(), &version).expect("plan")
}

#[tokio::test]
async fn builds_all_targets_with_one_version() {
    let project = create_default_project("1.2.3");
    let targets = default_targets(&project);
    let backend = FakeBackend::new().into_arc();

    let report = Orchestrator::new(backend.clone(), project.path())
        .run(&targets)
        .await
        .expect("build succeeds");

    assert_eq!(report.targets.len(), 3);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 3);

    for rel in ["bundle/gemini.js", "bundle/api.js", "bundle/api.cjs"] {
        let code = fs::read_to_string(project.path().join(rel)).expect("output exists");
        assert!(code.contains("const version = \"1.2.3\";"), "{rel}: {code}");
        assert!(!code.contains("process.env.CLI_VERSION"), "{rel}");
    }
}

#[tokio::test]
async fn targets_are_in_flight_together() {
    let project = create_default_project("1.0.0");
    let targets = default_targets(&project);
    let backend = FakeBackend::new()
        .with_delay("cli", Duration::from_millis(100))
        .with_delay("api-esm", Duration::from_millis(100))
        .with_delay("api-cjs", Duration::from_millis(100))
        .into_arc();

    Orchestrator::new(backend.clone(), project.path())
        .run(&targets)
        .await
        .expect("build succeeds");

    assert_eq!(backend.max_in_flight.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn report_follows_declaration_order() {
    let project = create_default_project("1.0.0");
    let targets = default_targets(&project);
    let backend = FakeBackend::new()
        .with_delay("cli", Duration::from_millis(120))
        .with_delay("api-esm", Duration::from_millis(60))
        .with_delay("api-cjs", Duration::from_millis(5))
        .into_arc();

    let report = Orchestrator::new(backend, project.path())
        .run(&targets)
        .await
        .expect("build succeeds");

    let names: Vec<_> = report.targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["cli", "api-esm", "api-cjs"]);
    assert_eq!(
        report.total_size(),
        report.targets.iter().map(|t| t.size).sum::<usize>()
    );
}

#[tokio::test]
async fn preludes_come_first() {
    let project = create_default_project("1.0.0");
    let targets = default_targets(&project);
    let backend = FakeBackend::new().into_arc();

    Orchestrator::new(backend, project.path())
        .run(&targets)
        .await
        .expect("build succeeds");

    let esm = fs::read_to_string(project.path().join("bundle/gemini.js")).unwrap();
    assert!(esm.starts_with(ESM_RUNTIME_PRELUDE));

    let cjs = fs::read_to_string(project.path().join("bundle/api.cjs")).unwrap();
    assert!(cjs.starts_with(CJS_IMPORT_META_PRELUDE));
    assert!(cjs.contains("const here = _importMetaUrl;"));
    assert!(!cjs.contains("import.meta.url"));
}

#[tokio::test]
async fn hashbang_stays_above_prelude() {
    let project = create_default_project("1.0.0");
    let targets = default_targets(&project);
    let backend = FakeBackend {
        hashbang_on: Some("cli".to_string()),
        ..FakeBackend::default()
    }
    .into_arc();

    Orchestrator::new(backend, project.path())
        .run(&targets)
        .await
        .expect("build succeeds");

    let esm = fs::read_to_string(project.path().join("bundle/gemini.js")).unwrap();
    let expected_start = format!("#!/usr/bin/env node\n{ESM_RUNTIME_PRELUDE}\n");
    assert!(esm.starts_with(&expected_start));
}

#[tokio::test]
async fn one_failure_writes_nothing() {
    let project = create_default_project("1.0.0");
    let targets = default_targets(&project);
    let backend = FakeBackend::failing_on("api-cjs")
        .with_delay("cli", Duration::from_millis(200))
        .with_delay("api-esm", Duration::from_millis(200))
        .into_arc();

    let err = Orchestrator::new(backend, project.path())
        .run(&targets)
        .await
        .unwrap_err();

    match err {
        Error::Bundler {
            target,
            diagnostics,
        } => {
            assert_eq!(target, "api-cjs");
            assert_eq!(diagnostics.len(), 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!project.path().join("bundle").exists());
}

#[tokio::test]
async fn failure_keeps_previous_outputs_untouched() {
    let project = create_default_project("1.0.0");
    fs::create_dir_all(project.path().join("bundle")).unwrap();
    fs::write(project.path().join("bundle/gemini.js"), "previous build").unwrap();

    let targets = default_targets(&project);
    let backend = FakeBackend::failing_on("api-esm").into_arc();

    Orchestrator::new(backend, project.path())
        .run(&targets)
        .await
        .unwrap_err();

    assert_eq!(
        fs::read_to_string(project.path().join("bundle/gemini.js")).unwrap(),
        "previous build"
    );
    assert!(!project.path().join("bundle/api.js").exists());
}

#[tokio::test]
async fn missing_entry_submits_nothing() {
    let project = create_default_project("1.0.0");
    fs::remove_file(project.path().join("packages/cli/index.ts")).unwrap();

    let targets = default_targets(&project);
    let backend = FakeBackend::new().into_arc();

    let err = Orchestrator::new(backend.clone(), project.path())
        .run(&targets)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::EntryNotFound { ref target, .. } if target == "cli"));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    assert!(!project.path().join("bundle").exists());
}

#[tokio::test]
async fn panicking_task_is_a_target_failure() {
    let project = create_default_project("1.0.0");
    let targets = default_targets(&project);
    let backend = FakeBackend {
        panic_on: Some("api-esm".to_string()),
        ..FakeBackend::default()
    }
    .into_arc();

    let err = Orchestrator::new(backend, project.path())
        .run(&targets)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::TaskFailed { ref target, .. } if target == "api-esm"));
    assert!(!project.path().join("bundle").exists());
}

#[tokio::test]
async fn unshimmed_cjs_fails_artifact_check() {
    let project = create_default_project("1.0.0");
    let version = resolve_version(project.path().join("package.json")).unwrap();
    let config = ToteConfig {
        targets: vec![
            TargetConfig::new("api-cjs", "index.ts", "bundle/api.cjs")
                .format(tote_config::OutputFormat::Cjs)
                .shim(ShimMode::None),
        ],
        ..ToteConfig::default()
    };
    let targets = plan_targets(&config, &version).unwrap();

    let err = Orchestrator::new(FakeBackend::new().into_arc(), project.path())
        .run(&targets)
        .await
        .unwrap_err();

    match err {
        Error::ArtifactCheck { target, issues } => {
            assert_eq!(target, "api-cjs");
            assert_eq!(issues, vec![ArtifactIssue::ImportMetaInCjs]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!project.path().join("bundle/api.cjs").exists());
}

#[tokio::test]
async fn bundle_all_does_not_write() {
    let project = create_default_project("2.0.0");
    let targets = default_targets(&project);

    let artifacts = Orchestrator::new(FakeBackend::new().into_arc(), project.path())
        .bundle_all(&targets)
        .await
        .expect("bundles");

    assert_eq!(artifacts.len(), 3);
    assert_eq!(artifacts[2].output_path, std::path::Path::new("bundle/api.cjs"));
    assert!(artifacts[0].code.starts_with(ESM_RUNTIME_PRELUDE));
    assert!(!project.path().join("bundle").exists());
}
