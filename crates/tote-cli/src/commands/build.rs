//! Build command implementation.

use std::time::Instant;

use tote_bundler::{Orchestrator, plan_targets};
use tote_config::resolve_version;

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

/// Execute the build command.
///
/// # Build Process
///
/// 1. Load config (defaults < file < `TOTE_*` env < CLI flags)
/// 2. Narrow to `--only` targets
/// 3. Resolve the version once, before anything is bundled
/// 4. Plan targets and bundle them concurrently
/// 5. Commit all outputs, then print the summary
///
/// # Errors
///
/// Any failure aborts the run and leaves every output path untouched.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let start_time = Instant::now();

    let root = utils::resolve_project_root(args.cwd.as_deref())?;
    let mut config = utils::load_config(&root, args.config.as_deref())?;

    if let Some(manifest) = args.manifest {
        config.manifest = manifest;
    }
    let config = config.select_targets(&args.only)?;

    let manifest_path = utils::resolve_path(&config.manifest, &root);
    let version = resolve_version(&manifest_path).with_hint(utils::MANIFEST_HINT)?;
    ui::info(&format!(
        "Version {} from {}",
        version,
        utils::display_relative(&manifest_path, &root)
    ));

    let targets = plan_targets(&config, &version)?;
    let names: Vec<&str> = targets.iter().map(|t| t.name()).collect();
    ui::info(&format!(
        "Building {} target(s): {}",
        targets.len(),
        names.join(", ")
    ));

    let orchestrator = Orchestrator::rolldown(&root);
    tracing::debug!(
        backend = orchestrator.backend_name(),
        root = %orchestrator.root().display(),
        "starting build"
    );
    let report = match orchestrator.run(&targets).await {
        Ok(report) => report,
        Err(err) => {
            report_failure(&err);
            return Err(CliError::Build(err));
        }
    };

    let rows: Vec<ui::SummaryRow> = report
        .targets
        .iter()
        .map(|t| ui::SummaryRow {
            target: t.name.clone(),
            output: utils::display_relative(&t.output_path, &root),
            size: t.size as u64,
            elapsed: t.elapsed,
        })
        .collect();
    ui::print_build_summary(&rows, report.elapsed);

    ui::success(&format!(
        "Build completed in {}",
        ui::format_duration(start_time.elapsed())
    ));
    Ok(())
}

/// Print every bundler diagnostic; miette only renders the summary.
fn report_failure(err: &tote_bundler::Error) {
    if let tote_bundler::Error::Bundler {
        target,
        diagnostics,
    } = err
    {
        if diagnostics.len() > 1 {
            for diag in diagnostics {
                ui::error(&format!("[{target}] {diag}"));
            }
        }
    }
    ui::warning("No output files were written");
}
