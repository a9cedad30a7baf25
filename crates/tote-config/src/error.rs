//! Error types for configuration loading, validation and version resolution.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Package descriptor errors
    #[error("failed to read package descriptor {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("package descriptor {} is not valid JSON: {message}", .path.display())]
    ManifestParse { path: PathBuf, message: String },

    #[error("package descriptor {} has no usable \"version\" field", .0.display())]
    MissingVersion(PathBuf),

    // Config parsing/loading errors
    #[error("config not found in {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config value for '{field}'{}", hint_suffix(.hint))]
    InvalidValue { field: String, hint: Option<String> },

    // Schema validation errors (no filesystem checks)
    #[error("no targets declared")]
    NoTargets,

    #[error("target '{0}' is declared more than once")]
    DuplicateTarget(String),

    #[error("targets '{first}' and '{second}' both write {}", .path.display())]
    DuplicateOutput {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error("schema validation failed: {message}{}", hint_suffix(.hint))]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    // Filesystem validation errors (for CLI use)
    #[error("entry point of target '{target}' not found: {}", .path.display())]
    EntryNotFound { target: String, path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default()
}
