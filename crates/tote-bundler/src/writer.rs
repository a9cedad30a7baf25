//! Atomic commit of bundle outputs.
//!
//! Every output is first written to a sibling temp file. Only when all temp
//! files are written are they renamed into place, so a failed build never
//! leaves a partially written bundle behind. Output paths are validated to
//! stay inside the project root.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::{Error, Result};

/// One file to commit: path relative to the root, plus its bytes.
pub type PendingWrite<'a> = (&'a Path, &'a [u8]);

/// Write every file under `root`, all or nothing.
///
/// Returns the absolute paths written, in input order.
///
/// # Errors
///
/// - [`Error::InvalidOutputPath`] if a path escapes `root`
/// - [`Error::WriteFailure`] if a directory, temp file, or rename fails
pub fn commit_files(root: &Path, files: &[PendingWrite<'_>]) -> Result<Vec<PathBuf>> {
    let root = normalize_root(root)?;

    let mut operations = Vec::with_capacity(files.len());
    for (relative, content) in files {
        let target_path = validate_output_path(&root, relative)?;
        operations.push((target_path, *content));
    }

    write_files_atomic(&operations)?;

    Ok(operations.into_iter().map(|(path, _)| path).collect())
}

fn normalize_root(root: &Path) -> Result<PathBuf> {
    let cleaned = root.clean();
    if cleaned.is_absolute() {
        return Ok(cleaned);
    }

    let cwd = std::env::current_dir().map_err(|e| {
        Error::InvalidOutputPath(format!("Failed to get current directory: {e}"))
    })?;
    Ok(cwd.join(cleaned).clean())
}

/// Resolve `relative` under `base_dir`, rejecting anything that escapes it.
pub(crate) fn validate_output_path(base_dir: &Path, relative: &Path) -> Result<PathBuf> {
    if relative.as_os_str().is_empty() {
        return Err(Error::InvalidOutputPath("Output path is empty".to_string()));
    }

    if relative.to_string_lossy().contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Output path contains null byte".to_string(),
        ));
    }

    let full_path = base_dir.join(relative).clean();

    if full_path == base_dir || !full_path.starts_with(base_dir) {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes project root '{}' (resolved to '{}')",
            relative.display(),
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

/// `bundle/api.js` -> `bundle/api.js.tote-tmp`.
///
/// The full file name is kept so `api.js` and `api.cjs` never share a temp.
fn temp_path_for(target_path: &Path) -> PathBuf {
    let mut name = target_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tote-tmp");
    target_path.with_file_name(name)
}

fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut temp_files: Vec<(PathBuf, PathBuf)> = Vec::new();

    // Phase 1: temp files
    for (target_path, content) in operations {
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                cleanup_temp_files(&temp_files);
                Error::WriteFailure(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = temp_path_for(target_path);
        // Tracked before writing so a partial temp is cleaned up too.
        temp_files.push((temp_path.clone(), target_path.clone()));
        if let Err(e) = fs::write(&temp_path, content) {
            cleanup_temp_files(&temp_files);
            return Err(Error::WriteFailure(format!(
                "Failed to write temporary file '{}': {}",
                temp_path.display(),
                e
            )));
        }
    }

    // Phase 2: rename into place
    for (index, (temp_path, target_path)) in temp_files.iter().enumerate() {
        if let Err(e) = fs::rename(temp_path, target_path) {
            if index > 0 {
                tracing::warn!(
                    committed = index,
                    "rename failed after some outputs were already replaced"
                );
            }
            cleanup_temp_files(&temp_files[index..]);
            return Err(Error::WriteFailure(format!(
                "Failed to rename '{}' to '{}': {}",
                temp_path.display(),
                target_path.display(),
                e
            )));
        }
        tracing::debug!(path = %target_path.display(), "committed output");
    }

    Ok(())
}

/// Best-effort removal of temp files; we are already failing.
fn cleanup_temp_files(temp_files: &[(PathBuf, PathBuf)]) {
    for (temp_path, _) in temp_files {
        if temp_path.exists() {
            if let Err(e) = fs::remove_file(temp_path) {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %e,
                    "failed to clean up temporary file"
                );
            }
        }
    }
}
