//! Init command implementation.

use std::fs;

use tote_config::ToteConfig;

use crate::cli::InitArgs;
use crate::commands::utils;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

const CONFIG_FILE: &str = "tote.toml";

const HEADER: &str = "\
# tote configuration
#
# Every target is bundled concurrently with the version from `manifest`
# embedded at each key in `version_defines`. Outputs are only written when
# all targets succeed.

";

/// Execute the init command.
///
/// # Errors
///
/// Refuses to replace an existing `tote.toml` unless `--force` is given.
pub fn execute(args: InitArgs) -> Result<()> {
    let root = utils::resolve_project_root(args.cwd.as_deref())?;
    let path = root.join(CONFIG_FILE);

    if path.exists() && !args.force {
        return Err(CliError::InvalidArgument(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let body = ToteConfig::default().to_toml_string()?;
    fs::write(&path, format!("{HEADER}{body}")).with_path(&path)?;

    ui::success(&format!("Wrote {}", path.display()));
    ui::info("Run `tote check` to validate it, then `tote build`.");
    Ok(())
}
