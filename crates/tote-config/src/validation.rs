//! Pluggable config validation strategies
//!
//! Separates filesystem validation (for CLI use) from schema validation.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::config::{OutputFormat, ShimMode, ToteConfig};
use crate::error::{ConfigError, Result};

/// Trait for pluggable config validation strategies
pub trait ConfigValidator {
    fn validate(&self, config: &ToteConfig) -> Result<()>;
}

/// Schema-only validation (no filesystem checks)
///
/// # Example
///
/// ```
/// use tote_config::{ConfigValidator, SchemaValidator, ToteConfig};
///
/// SchemaValidator.validate(&ToteConfig::default()).unwrap();
/// ```
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, config: &ToteConfig) -> Result<()> {
        if config.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        if config.manifest.as_os_str().is_empty() {
            return Err(schema_error(
                "manifest path cannot be empty",
                "Point 'manifest' at your package.json",
            ));
        }

        for key in &config.version_defines {
            if key.trim().is_empty() {
                return Err(schema_error(
                    "version define keys cannot be empty",
                    "Remove empty strings from 'version_defines'",
                ));
            }
        }

        let mut names: HashSet<&str> = HashSet::new();
        let mut outputs: HashMap<PathBuf, &str> = HashMap::new();

        for target in &config.targets {
            if target.name.trim().is_empty() {
                return Err(schema_error(
                    "target names cannot be empty",
                    "Give every target a unique 'name'",
                ));
            }

            if !names.insert(target.name.as_str()) {
                return Err(ConfigError::DuplicateTarget(target.name.clone()));
            }

            if target.entry.as_os_str().is_empty() || target.outfile.as_os_str().is_empty() {
                return Err(schema_error(
                    format!("target '{}' needs both 'entry' and 'outfile'", target.name),
                    "Paths are relative to the project root",
                ));
            }

            // Targets run concurrently, so their outputs must be disjoint.
            let normalized = target.outfile.clean();
            if let Some(first) = outputs.insert(normalized.clone(), target.name.as_str()) {
                return Err(ConfigError::DuplicateOutput {
                    path: normalized,
                    first: first.to_string(),
                    second: target.name.clone(),
                });
            }

            if target.external.iter().any(|e| e.trim().is_empty()) {
                return Err(schema_error(
                    format!("target '{}' has an empty external module name", target.name),
                    "Remove empty strings from the 'external' array",
                ));
            }

            match (target.shim, target.format) {
                (ShimMode::EsmRuntime, OutputFormat::Cjs) => {
                    return Err(schema_error(
                        format!(
                            "target '{}' uses the esm-runtime shim with cjs output",
                            target.name
                        ),
                        "CommonJS already provides require and __dirname; use 'auto' or 'none'",
                    ));
                }
                (ShimMode::CjsImportMeta, OutputFormat::Esm) => {
                    return Err(schema_error(
                        format!(
                            "target '{}' uses the cjs-import-meta shim with esm output",
                            target.name
                        ),
                        "ES modules already provide import.meta.url; use 'auto' or 'none'",
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs schema validation, then checks that every entry point exists under
/// the project root.
pub struct FsValidator {
    root: PathBuf,
}

impl FsValidator {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ConfigValidator for FsValidator {
    fn validate(&self, config: &ToteConfig) -> Result<()> {
        SchemaValidator.validate(config)?;

        for target in &config.targets {
            let path = self.root.join(&target.entry);
            if !path.is_file() {
                return Err(ConfigError::EntryNotFound {
                    target: target.name.clone(),
                    path,
                });
            }
        }

        Ok(())
    }
}

/// Convenience: schema-only validation.
pub fn validate_schema(config: &ToteConfig) -> Result<()> {
    SchemaValidator.validate(config)
}

/// Convenience: schema and filesystem validation against `root`.
pub fn validate_fs(config: &ToteConfig, root: impl AsRef<Path>) -> Result<()> {
    FsValidator::new(root).validate(config)
}

fn schema_error(message: impl Into<String>, hint: impl Into<String>) -> ConfigError {
    ConfigError::SchemaValidation {
        message: message.into(),
        hint: Some(hint.into()),
    }
}
