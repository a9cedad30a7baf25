//! Version resolution from the package descriptor.
//!
//! The descriptor is read exactly once per run. The resulting [`VersionString`]
//! is cheap to clone and is shared by every build target, so all emitted
//! bundles embed the same version constant.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Version declared by the package descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionString(Arc<str>);

impl VersionString {
    pub fn new(version: impl AsRef<str>) -> Self {
        Self(Arc::from(version.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The version as a JavaScript string literal, ready to be used as the
    /// replacement text of a compile-time define.
    ///
    /// ```
    /// use tote_config::VersionString;
    ///
    /// assert_eq!(VersionString::new("1.2.3").to_js_literal(), "\"1.2.3\"");
    /// ```
    pub fn to_js_literal(&self) -> String {
        Value::from(self.as_str()).to_string()
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read the `version` field of a package descriptor.
///
/// # Errors
///
/// - [`ConfigError::ManifestRead`] if the file is absent or unreadable
/// - [`ConfigError::ManifestParse`] if it is not JSON
/// - [`ConfigError::MissingVersion`] if `version` is absent, not a string, or blank
pub fn resolve_version(path: impl AsRef<Path>) -> Result<VersionString> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|source| ConfigError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::ManifestParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let version = parsed
        .get("version")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingVersion(path.to_path_buf()))?;

    tracing::debug!(manifest = %path.display(), version, "resolved package version");

    Ok(VersionString::new(version))
}
