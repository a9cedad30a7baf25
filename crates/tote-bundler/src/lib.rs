//! # tote-bundler
//!
//! Builds the self-contained JavaScript bundles of a Node.js package from
//! one version source, concurrently and all-or-nothing.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tote_bundler::{Orchestrator, plan_targets};
//! use tote_config::{ToteConfig, resolve_version};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ToteConfig::default();
//! let version = resolve_version("package.json")?;
//! let targets = plan_targets(&config, &version)?;
//!
//! let report = Orchestrator::rolldown(".").run(&targets).await?;
//! for target in &report.targets {
//!     println!("{} -> {} ({} bytes)", target.name, target.output_path.display(), target.size);
//! }
//! # Ok(()) }
//! ```

use std::path::PathBuf;

pub mod backend;
pub mod diagnostics;
pub mod orchestrator;
pub mod plan;
pub mod shim;
pub mod target;
pub mod verify;
pub mod writer;

pub use backend::{BundleBackend, RolldownBackend};
pub use diagnostics::{DiagnosticKind, ExtractedDiagnostic};
pub use orchestrator::{BuildReport, BundledArtifact, Orchestrator, TargetReport};
pub use plan::plan_targets;
pub use shim::{Shim, apply_prelude};
pub use target::{BuildTarget, BuildTargetBuilder};
pub use verify::{ArtifactIssue, VerifiedOutput, check_artifact, verify_outputs};

/// Error types for tote-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The bundler rejected a target.
    #[error("Build failed for target '{target}': {}", format_bundler_error(.diagnostics))]
    Bundler {
        target: String,
        diagnostics: Vec<ExtractedDiagnostic>,
    },

    /// A target's entry point does not exist.
    #[error("Entry point for target '{target}' not found: {}", .path.display())]
    EntryNotFound { target: String, path: PathBuf },

    /// A bundled artifact failed its post-build checks.
    #[error("Artifact check failed for target '{target}': {}", format_issues(.issues))]
    ArtifactCheck {
        target: String,
        issues: Vec<ArtifactIssue>,
    },

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// A build task panicked or was cancelled.
    #[error("Build task for target '{target}' failed: {message}")]
    TaskFailed { target: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] tote_config::ConfigError),
}

/// Result type alias for tote-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a bundler error for `target` from a Rolldown error.
    pub fn from_rolldown_batch(target: &str, error: &dyn std::fmt::Debug) -> Self {
        Error::Bundler {
            target: target.to_string(),
            diagnostics: diagnostics::extract_from_rolldown_error(error),
        }
    }

    /// Name of the target the error belongs to, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Error::Bundler { target, .. }
            | Error::EntryNotFound { target, .. }
            | Error::ArtifactCheck { target, .. }
            | Error::TaskFailed { target, .. } => Some(target),
            _ => None,
        }
    }
}

fn format_bundler_error(diagnostics: &[ExtractedDiagnostic]) -> String {
    match diagnostics {
        [] => "Unknown bundler error".to_string(),
        [diag] => format!("{}: {}", diag.kind, diag.message),
        _ => format!(
            "{} errors: {}",
            diagnostics.len(),
            diagnostics
                .iter()
                .map(|d| format!("{}: {}", d.kind, d.message))
                .collect::<Vec<_>>()
                .join("; ")
        ),
    }
}

fn format_issues(issues: &[ArtifactIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Bundler { .. } => "BUNDLER_ERROR",
            Error::EntryNotFound { .. } => "ENTRY_NOT_FOUND",
            Error::ArtifactCheck { .. } => "ARTIFACT_CHECK",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
            Error::TaskFailed { .. } => "TASK_FAILED",
            Error::Io(_) => "IO_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Bundler { diagnostics, .. } => match diagnostics.as_slice() {
                [diag] => diag
                    .help
                    .as_ref()
                    .map(|h| Box::new(h.clone()) as Box<dyn std::fmt::Display>),
                [] => None,
                _ => Some(Box::new(
                    "Multiple bundler errors occurred. See details above.".to_string(),
                )),
            },
            Error::EntryNotFound { .. } => Some(Box::new(concat!(
                "Entry points are resolved from the project root. ",
                "Check the target's 'entry' or pass --cwd."
            ))),
            Error::ArtifactCheck { .. } => Some(Box::new(
                "Nothing was written. Check the target's 'external' list and 'shim' setting."
                    .to_string(),
            )),
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{path}' is invalid. Ensure it's within the project directory."
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {msg}"
            ))),
            Error::TaskFailed { .. } => Some(Box::new(
                "A build task stopped unexpectedly. Re-run with --verbose for details.".to_string(),
            )),
            _ => None,
        }
    }
}
