//! Build target types.
//!
//! A [`BuildTarget`] is everything a backend needs to produce one output
//! file. Targets are immutable once built; construct them through
//! [`BuildTargetBuilder`].

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use tote_config::{OutputFormat, Platform};

/// One fully-resolved bundle to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    name: String,
    entry_point: PathBuf,
    output_path: PathBuf,
    format: OutputFormat,
    platform: Platform,
    external: IndexSet<String>,
    define: IndexMap<String, String>,
    prelude: Option<String>,
}

impl BuildTarget {
    /// Start building a target.
    ///
    /// # Examples
    ///
    /// ```
    /// use tote_bundler::BuildTarget;
    /// use tote_config::OutputFormat;
    ///
    /// let target = BuildTarget::builder("api", "index.ts", "bundle/api.cjs")
    ///     .format(OutputFormat::Cjs)
    ///     .external(["fs", "path"])
    ///     .define("process.env.CLI_VERSION", "\"1.2.3\"")
    ///     .build();
    ///
    /// assert!(target.is_external("fs"));
    /// assert_eq!(target.format(), OutputFormat::Cjs);
    /// ```
    pub fn builder(
        name: impl Into<String>,
        entry_point: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> BuildTargetBuilder {
        BuildTargetBuilder {
            target: BuildTarget {
                name: name.into(),
                entry_point: entry_point.into(),
                output_path: output_path.into(),
                format: OutputFormat::Esm,
                platform: Platform::Node,
                external: IndexSet::new(),
                define: IndexMap::new(),
                prelude: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry point, relative to the project root.
    pub fn entry_point(&self) -> &Path {
        &self.entry_point
    }

    /// Output file, relative to the project root.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn external(&self) -> &IndexSet<String> {
        &self.external
    }

    pub fn is_external(&self, module: &str) -> bool {
        self.external.contains(module)
    }

    pub fn define(&self) -> &IndexMap<String, String> {
        &self.define
    }

    pub fn prelude(&self) -> Option<&str> {
        self.prelude.as_deref()
    }
}

/// Builder for [`BuildTarget`].
#[derive(Debug, Clone)]
pub struct BuildTargetBuilder {
    target: BuildTarget,
}

impl BuildTargetBuilder {
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.target.format = format;
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.target.platform = platform;
        self
    }

    /// Add modules that must stay external references.
    pub fn external<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target.external.extend(modules.into_iter().map(Into::into));
        self
    }

    /// Add a compile-time replacement. A later definition of the same key wins.
    pub fn define(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.target.define.insert(key.into(), value.into());
        self
    }

    pub fn prelude(mut self, prelude: impl Into<String>) -> Self {
        self.target.prelude = Some(prelude.into());
        self
    }

    pub fn build(self) -> BuildTarget {
        self.target
    }
}
