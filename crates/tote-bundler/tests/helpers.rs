//! Shared test utilities for tote-bundler tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tote_bundler::{
    BuildTarget, BundleBackend, DiagnosticKind, Error, ExtractedDiagnostic, Result,
};

/// A project laid out like the default targets expect.
pub fn create_default_project(version: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join("package.json"),
        format!(r#"{{ "name": "@scope/pkg", "version": "{version}" }}"#),
    )
    .expect("write package.json");
    fs::create_dir_all(dir.path().join("packages/cli")).expect("create packages/cli");
    fs::write(
        dir.path().join("packages/cli/index.ts"),
        "console.log(process.env.CLI_VERSION);\n",
    )
    .expect("write cli entry");
    fs::write(
        dir.path().join("index.ts"),
        "export const version = process.env.CLI_VERSION;\n",
    )
    .expect("write api entry");
    dir
}

/// In-memory backend that mimics define substitution.
///
/// Emits `const version = <define>;` and, for targets whose `import.meta.url`
/// is not replaced, a raw `import.meta.url` reference.
#[derive(Default)]
pub struct FakeBackend {
    pub fail_on: Option<String>,
    pub panic_on: Option<String>,
    pub hashbang_on: Option<String>,
    /// Per-target delay; declared order can finish in any order.
    pub delays: Vec<(String, Duration)>,
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.push((name.to_string(), delay));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn delay_for(&self, name: &str) -> Duration {
        self.delays
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| *d)
            .unwrap_or(Duration::from_millis(20))
    }
}

#[async_trait]
impl BundleBackend for FakeBackend {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn bundle(&self, target: &BuildTarget, _cwd: &Path) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.panic_on.as_deref() == Some(target.name()) {
            panic!("backend exploded");
        }

        if self.fail_on.as_deref() == Some(target.name()) {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            return Err(Error::Bundler {
                target: target.name().to_string(),
                diagnostics: vec![ExtractedDiagnostic::new(
                    DiagnosticKind::UnresolvedImport,
                    "Could not resolve 'missing-dep'",
                )],
            });
        }

        tokio::time::sleep(self.delay_for(target.name())).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let version = target
            .define()
            .get("process.env.CLI_VERSION")
            .map(String::as_str)
            .unwrap_or("process.env.CLI_VERSION");
        let url = target
            .define()
            .get("import.meta.url")
            .map(String::as_str)
            .unwrap_or("import.meta.url");

        let mut code = String::new();
        if self.hashbang_on.as_deref() == Some(target.name()) {
            code.push_str("#!/usr/bin/env node\n");
        }
        code.push_str(&format!("const version = {version};\nconst here = {url};\n"));
        Ok(code)
    }
}
