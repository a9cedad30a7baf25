//! File-based config discovery and layered loading.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults ([`ToteConfig::default`])
//! 2. the config file (explicit path, or discovered in the project root)
//! 3. `TOTE_*` environment variables (currently `TOTE_MANIFEST`)

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use serde_json::Value;

use crate::config::ToteConfig;
use crate::error::{ConfigError, Result};

/// Environment variables consulted after the config file.
const ENV_PREFIX: &str = "TOTE_";
const ENV_KEYS: &[&str] = &["manifest"];

/// Where a loaded config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
    PackageJson(PathBuf),
}

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use tote_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let (config, _source) = discovery.load(None).unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a config file in the root directory
    ///
    /// Searches in this order:
    /// 1. tote.toml
    /// 2. tote.json
    /// 3. package.json (tote field)
    pub fn find(&self) -> Option<ConfigSource> {
        for name in ["tote.toml", "tote.json"] {
            let path = self.root.join(name);
            if path.exists() {
                return Some(ConfigSource::File(path));
            }
        }

        let pkg_path = self.root.join("package.json");
        let content = fs::read_to_string(&pkg_path).ok()?;
        let parsed = serde_json::from_str::<Value>(&content).ok()?;
        match parsed.get("tote") {
            Some(value) if !value.is_null() => Some(ConfigSource::PackageJson(pkg_path)),
            _ => None,
        }
    }

    /// Load the layered config.
    ///
    /// An explicit `config_path` (relative to the root) must exist; otherwise
    /// discovery is used and the defaults apply when nothing is found.
    pub fn load(&self, config_path: Option<&Path>) -> Result<(ToteConfig, ConfigSource)> {
        let source = match config_path {
            Some(path) => {
                let path = self.root.join(path);
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                ConfigSource::File(path)
            }
            None => self.find().unwrap_or(ConfigSource::Defaults),
        };

        let mut figment = Figment::new().merge(Serialized::defaults(ToteConfig::default()));

        figment = match &source {
            ConfigSource::Defaults => figment,
            ConfigSource::File(path) => match path.extension().and_then(|e| e.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                other => {
                    return Err(ConfigError::UnsupportedFormat(
                        other.unwrap_or("<none>").to_string(),
                    ));
                }
            },
            ConfigSource::PackageJson(path) => {
                figment.merge(Serialized::defaults(read_package_field(path)?))
            }
        };

        figment = figment.merge(Env::prefixed(ENV_PREFIX).only(ENV_KEYS));

        let config: ToteConfig = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            hint: Some(e.to_string()),
        })?;

        tracing::debug!(?source, targets = config.targets.len(), "loaded configuration");

        Ok((config, source))
    }
}

/// Read and validate the `"tote"` object of a package descriptor.
fn read_package_field(path: &Path) -> Result<ToteConfig> {
    let content = fs::read_to_string(path)?;

    let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: "package.json".to_string(),
        hint: Some(format!("Invalid JSON: {e}")),
    })?;

    match parsed.get("tote") {
        Some(value) if value.is_object() => ToteConfig::from_value(value.clone()),
        _ => Err(ConfigError::InvalidValue {
            field: "tote".to_string(),
            hint: Some("The 'tote' field in package.json must be an object".to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_config() {
        let dir = TempDir::new().unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn toml_wins_over_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tote.json"), "{}").unwrap();
        fs::write(dir.path().join("tote.toml"), "").unwrap();

        let found = ConfigDiscovery::new(dir.path()).find().unwrap();
        assert_eq!(found, ConfigSource::File(dir.path().join("tote.toml")));
    }

    #[test]
    fn package_json_without_field_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{ "name": "x", "version": "1.0.0" }"#,
        )
        .unwrap();
        assert!(ConfigDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn load_without_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, source) = ConfigDiscovery::new(dir.path()).load(None).unwrap();
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config.targets.len(), 3);
    }

    #[test]
    fn explicit_missing_path_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = ConfigDiscovery::new(dir.path())
            .load(Some(Path::new("custom.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn explicit_path_with_unknown_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tote.yaml"), "targets: []").unwrap();
        let err = ConfigDiscovery::new(dir.path())
            .load(Some(Path::new("tote.yaml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "yaml"));
    }
}
