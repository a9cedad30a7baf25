//! Top-level configuration for tote.
//!
//! A [`ToteConfig`] names the package descriptor to take the version from and
//! declares the build targets. The defaults describe the standard layout: a
//! CLI bundle plus ESM and CommonJS API bundles.

use std::path::PathBuf;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Define key replaced with the package version in every target.
pub const DEFAULT_VERSION_DEFINE: &str = "process.env.CLI_VERSION";

/// Modules left as external references in the API bundles.
///
/// These are provided by the host runtime (Node.js built-ins) or by the
/// consumer's own dependency tree.
pub const DEFAULT_API_EXTERNALS: &[&str] = &[
    "@google/genai",
    "assert",
    "buffer",
    "child_process",
    "crypto",
    "events",
    "fs",
    "http",
    "https",
    "net",
    "os",
    "path",
    "stream",
    "tty",
    "url",
    "util",
    "zlib",
];

/// Output module format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Static `import`/`export` syntax
    #[default]
    Esm,
    /// `require`/`module.exports`
    Cjs,
}

/// Target platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Node,
}

/// Which runtime-compatibility prelude to inject into a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ShimMode {
    /// Pick the shim matching the output format
    #[default]
    Auto,
    /// No shim
    None,
    /// `require` and `__dirname` for ESM output
    EsmRuntime,
    /// `import.meta.url` for CommonJS output
    CjsImportMeta,
}

/// One output bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Unique target name (used by `--only` and in reports)
    pub name: String,

    /// Entry point, relative to the project root
    pub entry: PathBuf,

    /// Output file, relative to the project root
    pub outfile: PathBuf,

    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub platform: Platform,

    /// Modules to keep as external references instead of inlining
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external: Vec<String>,

    #[serde(default)]
    pub shim: ShimMode,

    /// Text emitted after the shim prelude, before any bundled code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,

    /// Extra compile-time replacements (identifier → JavaScript expression)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub define: IndexMap<String, String>,
}

impl TargetConfig {
    pub fn new(
        name: impl Into<String>,
        entry: impl Into<PathBuf>,
        outfile: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            entry: entry.into(),
            outfile: outfile.into(),
            format: OutputFormat::Esm,
            platform: Platform::Node,
            external: Vec::new(),
            shim: ShimMode::Auto,
            banner: None,
            define: IndexMap::new(),
        }
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn external<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for module in modules {
            let value = module.into();
            if !self.external.contains(&value) {
                self.external.push(value);
            }
        }
        self
    }

    pub fn define(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.define.insert(key.into(), value.into());
        self
    }

    pub fn shim(mut self, shim: ShimMode) -> Self {
        self.shim = shim;
        self
    }

    pub fn banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = Some(banner.into());
        self
    }
}

/// tote configuration - loaded from tote.toml, tote.json or package.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ToteConfig {
    /// Package descriptor holding the version, relative to the project root
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Define keys that receive the package version as a string literal
    #[serde(default = "default_version_defines")]
    pub version_defines: Vec<String>,

    /// Bundles to produce
    #[serde(default = "default_targets")]
    pub targets: Vec<TargetConfig>,
}

impl Default for ToteConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            version_defines: default_version_defines(),
            targets: default_targets(),
        }
    }
}

impl ToteConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use tote_config::ToteConfig;
    /// use serde_json::json;
    ///
    /// let config = ToteConfig::from_value(json!({
    ///     "targets": [{ "name": "lib", "entry": "src/index.ts", "outfile": "dist/index.js" }]
    /// }))
    /// .unwrap();
    /// assert_eq!(config.targets.len(), 1);
    /// assert_eq!(config.manifest.to_str(), Some("package.json"));
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Keep only the named targets, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if a name doesn't match any declared target.
    pub fn select_targets(mut self, names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self);
        }

        if let Some(unknown) = names
            .iter()
            .find(|name| !self.targets.iter().any(|t| &t.name == *name))
        {
            let available = self
                .targets
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ConfigError::InvalidValue {
                field: "only".to_string(),
                hint: Some(format!("unknown target '{unknown}' (available: {available})")),
            });
        }

        self.targets.retain(|t| names.contains(&t.name));
        Ok(self)
    }

    /// Generate JSON Schema for tote config files.
    pub fn json_schema() -> Value {
        let schema = schemars::schema_for!(ToteConfig);
        serde_json::to_value(schema).unwrap_or(Value::Null)
    }

    /// Render the config as a `tote.toml` document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_version_defines() -> Vec<String> {
    vec![DEFAULT_VERSION_DEFINE.to_string()]
}

/// The CLI bundle plus the ESM and CommonJS API bundles.
pub fn default_targets() -> Vec<TargetConfig> {
    vec![
        TargetConfig::new("cli", "packages/cli/index.ts", "bundle/gemini.js"),
        TargetConfig::new("api-esm", "index.ts", "bundle/api.js")
            .external(DEFAULT_API_EXTERNALS.iter().copied()),
        TargetConfig::new("api-cjs", "index.ts", "bundle/api.cjs")
            .format(OutputFormat::Cjs)
            .external(DEFAULT_API_EXTERNALS.iter().copied()),
    ]
}
