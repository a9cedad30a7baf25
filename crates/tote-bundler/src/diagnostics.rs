//! Diagnostic extraction from Rolldown errors.
//!
//! Rolldown reports failures as batched diagnostics. They are flattened here
//! into [`ExtractedDiagnostic`]s so the rest of the pipeline never depends on
//! Rolldown's error types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One bundler diagnostic in a stable, cloneable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDiagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub file: Option<String>,
    pub help: Option<String>,
}

impl ExtractedDiagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file: None,
            help: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for ExtractedDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}: {} ({})", self.kind, self.message, file),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Diagnostic kind (mirrors the Rolldown event kinds tote cares about).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ParseError,
    UnresolvedEntry,
    UnresolvedImport,
    MissingExport,
    InvalidOption,
    Other(String),
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::ParseError => write!(f, "ParseError"),
            DiagnosticKind::UnresolvedEntry => write!(f, "UnresolvedEntry"),
            DiagnosticKind::UnresolvedImport => write!(f, "UnresolvedImport"),
            DiagnosticKind::MissingExport => write!(f, "MissingExport"),
            DiagnosticKind::InvalidOption => write!(f, "InvalidOption"),
            DiagnosticKind::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Extract diagnostics from a Rolldown error.
///
/// Rolldown's diagnostic API is still moving, so this works from the
/// formatted error and falls back to a single `Other` diagnostic.
pub fn extract_from_rolldown_error(error: &dyn fmt::Debug) -> Vec<ExtractedDiagnostic> {
    let error_str = format!("{error:?}");

    let parts: Vec<&str> = error_str
        .split("BuildDiagnostic")
        .map(str::trim)
        .filter(|part| part.len() > 2)
        .collect();

    if parts.len() > 1 {
        parts.into_iter().map(extract_single).collect()
    } else {
        vec![extract_single(&error_str)]
    }
}

fn extract_single(text: &str) -> ExtractedDiagnostic {
    let kind = classify(text);
    let help = match kind {
        DiagnosticKind::UnresolvedEntry => {
            Some("Check the target's 'entry' path; it is resolved from the project root")
        }
        DiagnosticKind::UnresolvedImport => {
            Some("Install the missing package or add it to the target's 'external' list")
        }
        _ => None,
    };

    let mut diagnostic = ExtractedDiagnostic::new(kind, text);
    if let Some(file) = extract_file_path(text) {
        diagnostic = diagnostic.with_file(file);
    }
    if let Some(help) = help {
        diagnostic = diagnostic.with_help(help);
    }
    diagnostic
}

fn classify(text: &str) -> DiagnosticKind {
    if text.contains("UnresolvedEntry") {
        DiagnosticKind::UnresolvedEntry
    } else if text.contains("UnresolvedImport") || text.contains("Could not resolve") {
        DiagnosticKind::UnresolvedImport
    } else if text.contains("MissingExport") {
        DiagnosticKind::MissingExport
    } else if text.contains("ParseError") || text.contains("Syntax") || text.contains("Expected") {
        DiagnosticKind::ParseError
    } else if text.contains("InvalidOption") {
        DiagnosticKind::InvalidOption
    } else {
        DiagnosticKind::Other("BundlerError".to_string())
    }
}

/// Find the first quoted path ending in a JavaScript-ish extension.
fn extract_file_path(text: &str) -> Option<String> {
    const EXTENSIONS: &[&str] = &[".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs"];

    text.split(['"', '\''])
        .map(str::trim)
        .find(|candidate| {
            !candidate.contains(char::is_whitespace)
                && EXTENSIONS.iter().any(|ext| candidate.ends_with(ext))
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    #[allow(dead_code)]
    struct FakeError(&'static str);

    #[test]
    fn classifies_unresolved_entry() {
        let diags = extract_from_rolldown_error(&FakeError(
            "UnresolvedEntry: Cannot resolve entry module \"src/missing.ts\"",
        ));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnresolvedEntry);
        assert_eq!(diags[0].file.as_deref(), Some("src/missing.ts"));
        assert!(diags[0].help.is_some());
    }

    #[test]
    fn classifies_unresolved_import() {
        let diags =
            extract_from_rolldown_error(&FakeError("Could not resolve 'left-pad' in index.ts"));
        assert_eq!(diags[0].kind, DiagnosticKind::UnresolvedImport);
    }

    #[test]
    fn unknown_errors_fall_back_to_other() {
        let diags = extract_from_rolldown_error(&FakeError("boom"));
        assert_eq!(diags[0].kind, DiagnosticKind::Other("BundlerError".to_string()));
    }

    #[test]
    fn display_includes_file() {
        let diag = ExtractedDiagnostic::new(DiagnosticKind::ParseError, "Unexpected token")
            .with_file("src/a.ts");
        assert_eq!(diag.to_string(), "ParseError: Unexpected token (src/a.ts)");
    }
}
