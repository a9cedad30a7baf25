use std::path::Path;

use async_trait::async_trait;
use rolldown::{
    BundlerBuilder as RolldownBundlerBuilder, BundlerOptions, InputItem, IsExternal,
    OutputFormat as RolldownFormat, Platform as RolldownPlatform, ResolveOptions,
};
use rolldown_common::Output;
use tote_config::{OutputFormat, Platform};

use super::BundleBackend;
use crate::diagnostics::{DiagnosticKind, ExtractedDiagnostic};
use crate::target::BuildTarget;
use crate::{Error, Result};

/// Bundles targets in-process with Rolldown.
#[derive(Debug, Default, Clone, Copy)]
pub struct RolldownBackend;

impl RolldownBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BundleBackend for RolldownBackend {
    fn name(&self) -> &'static str {
        "rolldown"
    }

    async fn bundle(&self, target: &BuildTarget, cwd: &Path) -> Result<String> {
        let options = configure_rolldown_options(target, cwd);

        let mut bundler = RolldownBundlerBuilder::default()
            .with_options(options)
            .build()
            .map_err(|e| Error::from_rolldown_batch(target.name(), &e))?;

        let bundle = bundler
            .generate()
            .await
            .map_err(|e| Error::from_rolldown_batch(target.name(), &e))?;

        let mut chunks = bundle.assets.iter().filter_map(|output| match output {
            Output::Chunk(chunk) => Some(chunk),
            _ => None,
        });

        let first = chunks.next();
        if chunks.next().is_some() {
            return Err(single_file_violation(target));
        }

        match first {
            Some(chunk) if chunk.is_entry => {
                tracing::trace!(
                    target_name = target.name(),
                    chunk = %chunk.filename,
                    bytes = chunk.code.len(),
                    "rolldown produced entry chunk"
                );
                Ok(chunk.code.clone())
            }
            _ => Err(single_file_violation(target)),
        }
    }
}

/// Map a target onto Rolldown options.
fn configure_rolldown_options(target: &BuildTarget, cwd: &Path) -> BundlerOptions {
    let format = match target.format() {
        OutputFormat::Esm => RolldownFormat::Esm,
        OutputFormat::Cjs => RolldownFormat::Cjs,
    };
    let platform = match target.platform() {
        Platform::Node => RolldownPlatform::Node,
    };

    BundlerOptions {
        input: Some(vec![InputItem {
            name: Some(target.name().to_string()),
            import: cwd.join(target.entry_point()).to_string_lossy().into_owned(),
        }]),
        cwd: Some(cwd.to_path_buf()),
        format: Some(format),
        platform: Some(platform),
        external: Some(IsExternal::from(
            target.external().iter().cloned().collect::<Vec<_>>(),
        )),
        define: Some(
            target
                .define()
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        // One output file per target, so dynamic imports are inlined.
        inline_dynamic_imports: Some(true),
        resolve: Some(configure_resolution(cwd, target.format())),
        ..Default::default()
    }
}

/// Node resolution. The `import`/`require` condition follows the output format.
fn configure_resolution(cwd: &Path, format: OutputFormat) -> ResolveOptions {
    let mut modules = Vec::new();
    let mut current = Some(cwd);
    while let Some(dir) = current {
        modules.push(dir.join("node_modules").to_string_lossy().into_owned());
        current = dir.parent();
    }
    modules.push("node_modules".to_string());

    let module_condition = match format {
        OutputFormat::Esm => "import",
        OutputFormat::Cjs => "require",
    };

    ResolveOptions {
        main_fields: Some(vec!["module".to_string(), "main".to_string()]),
        condition_names: Some(vec![
            "node".to_string(),
            module_condition.to_string(),
            "default".to_string(),
        ]),
        extensions: Some(
            [".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs", ".json"]
                .into_iter()
                .map(String::from)
                .collect(),
        ),
        modules: Some(modules),
        symlinks: Some(true),
        ..Default::default()
    }
}

fn single_file_violation(target: &BuildTarget) -> Error {
    Error::Bundler {
        target: target.name().to_string(),
        diagnostics: vec![
            ExtractedDiagnostic::new(
                DiagnosticKind::Other("SingleFileViolation".to_string()),
                "bundle did not produce exactly one entry chunk",
            )
            .with_file(target.entry_point().to_string_lossy()),
        ],
    }
}
