//! Verify command implementation.
//!
//! Re-runs the post-build artifact checks on outputs already on disk.

use tote_bundler::{plan_targets, verify_outputs};
use tote_config::{VersionString, resolve_version};

use crate::cli::VerifyArgs;
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the verify command.
///
/// # Errors
///
/// Fails when any output is missing or has artifact issues.
pub fn execute(args: VerifyArgs) -> Result<()> {
    let root = utils::resolve_project_root(args.cwd.as_deref())?;
    let config = utils::load_config(&root, args.config.as_deref())?;

    // Checks don't depend on the version; a placeholder keeps verify usable
    // without a descriptor.
    let version = resolve_version(utils::resolve_path(&config.manifest, &root))
        .unwrap_or_else(|_| VersionString::new("0.0.0"));
    let targets = plan_targets(&config, &version)?;

    let results = verify_outputs(&targets, &root)?;
    let mut failed = 0usize;

    for result in &results {
        let shown = utils::display_relative(&result.path, &root);
        if result.is_ok() {
            ui::success(&format!("{} ({shown})", result.target));
        } else {
            failed += 1;
            for issue in &result.issues {
                ui::error(&format!("{} ({shown}): {issue}", result.target));
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Custom(format!(
            "{failed} of {} output(s) failed verification",
            results.len()
        )));
    }

    ui::success("All outputs verified");
    Ok(())
}
