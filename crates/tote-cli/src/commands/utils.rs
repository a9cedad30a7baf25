//! Shared helpers for command implementations.

use std::path::{Path, PathBuf};

use tote_config::{ConfigDiscovery, ConfigSource, ToteConfig};

use crate::error::{CliError, Result, ResultExt};
use crate::ui;

/// Hint attached to package descriptor errors.
pub const MANIFEST_HINT: &str =
    "Run tote from the package root, or point `manifest` (or TOTE_MANIFEST) at package.json";

/// Resolve a path relative to a working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Resolve the project root from `--cwd`, defaulting to the current directory.
///
/// # Errors
///
/// Returns `InvalidArgument` if the directory does not exist or is not a
/// directory.
pub fn resolve_project_root(explicit_cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir().context("Cannot determine the current directory")?;

    let Some(cwd_path) = explicit_cwd else {
        return Ok(current);
    };

    let absolute = resolve_path(cwd_path, &current);
    if !absolute.exists() {
        return Err(CliError::InvalidArgument(format!(
            "Specified --cwd directory does not exist: {}",
            absolute.display()
        )));
    }
    if !absolute.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "Specified --cwd is not a directory: {}",
            absolute.display()
        )));
    }

    tracing::debug!(root = %absolute.display(), "using project root from --cwd");
    Ok(absolute)
}

/// Load the layered config for `root` and report where it came from.
pub fn load_config(root: &Path, config: Option<&Path>) -> Result<ToteConfig> {
    let (config, source) = ConfigDiscovery::new(root).load(config)?;
    ui::info(&describe_source(&source, root));
    Ok(config)
}

fn describe_source(source: &ConfigSource, root: &Path) -> String {
    match source {
        ConfigSource::Defaults => "No config found, using built-in targets".to_string(),
        ConfigSource::File(path) => format!("Using config {}", display_relative(path, root)),
        ConfigSource::PackageJson(path) => {
            format!("Using \"tote\" field of {}", display_relative(path, root))
        }
    }
}

/// Display `path` relative to `root` when possible.
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
