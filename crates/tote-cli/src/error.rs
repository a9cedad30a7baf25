//! Error handling for the tote CLI.
//!
//! Library errors convert into [`CliError`] via `#[from]`; `main` renders the
//! final error through miette.
//!
//! # Example
//!
//! ```rust,no_run
//! use tote_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_manifest(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//!         .with_hint("Run tote from the package root or pass --cwd")
//! }
//! ```

use std::path::PathBuf;

use miette::Report;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Config discovery, parsing, validation or version resolution failed
    #[error("Configuration error: {0}")]
    Config(#[from] tote_config::ConfigError),

    /// Bundling, artifact checks or the output commit failed
    #[error(transparent)]
    Build(#[from] tote_bundler::Error),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{err}\n\nHint: {hint}"))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{msg}: {err}"))
        })
    }
}

/// Convert a CLI error into a miette report.
///
/// Bundler errors keep their diagnostic code and help text.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(tote_bundler::Error::Config(e)) => {
            miette::miette!("Configuration error: {}", e)
        }
        CliError::Build(e) => Report::new(e),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tote_config::ConfigError;

    #[test]
    fn config_error_converts() {
        let cli_err: CliError = ConfigError::NoTargets.into();
        assert!(matches!(cli_err, CliError::Config(_)));
        assert!(cli_err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn build_error_is_transparent() {
        let err = tote_bundler::Error::WriteFailure("disk full".to_string());
        let expected = err.to_string();
        let cli_err: CliError = err.into();
        assert_eq!(cli_err.to_string(), expected);
    }

    #[test]
    fn with_path_maps_not_found() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let err = result.with_path("/test/package.json").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn with_path_keeps_other_io_errors() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.with_path("/test/package.json").unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn with_hint_appends() {
        let result: std::result::Result<(), ConfigError> =
            Err(ConfigError::NotFound(PathBuf::from("tote.toml")));
        let msg = result.with_hint("Try tote init").unwrap_err().to_string();
        assert!(msg.contains("Hint: Try tote init"));
    }

    #[test]
    fn context_prefixes() {
        let result: std::result::Result<(), ConfigError> = Err(ConfigError::NoTargets);
        let msg = result.context("Failed to plan").unwrap_err().to_string();
        assert!(msg.starts_with("Failed to plan: "));
    }

    #[test]
    fn bundler_errors_keep_their_code() {
        let err = CliError::Build(tote_bundler::Error::InvalidOutputPath("../x".to_string()));
        let report = cli_error_to_miette(err);
        assert_eq!(
            report.code().map(|c| c.to_string()).as_deref(),
            Some("INVALID_OUTPUT_PATH")
        );
    }
}
