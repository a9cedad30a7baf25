//! Post-bundle artifact checks.
//!
//! These run on the final code (prelude applied) before commit, and on
//! files already on disk for `tote verify`. Emitted code is parsed with oxc
//! so only real `import.meta` expressions and Rolldown's `//#region` module
//! markers count; the same text inside strings or other comments does not.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use oxc_allocator::Allocator;
use oxc_ast::ast::MetaProperty;
use oxc_ast_visit::Visit;
use oxc_parser::{ParseOptions, Parser, ParserReturn};
use oxc_span::SourceType;
use serde::Serialize;
use tote_config::OutputFormat;

use crate::shim::split_hashbang;
use crate::target::BuildTarget;
use crate::{Error, Result};

/// A problem found in a bundled artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactIssue {
    /// The output file does not exist.
    Missing,
    /// CommonJS output still references `import.meta` (typically `import.meta.url`).
    ImportMetaInCjs,
    /// The configured prelude is not the first thing in the file.
    MissingPrelude,
    /// A module declared external was bundled from `node_modules`.
    InlinedExternal { module: String },
    /// The code could not be parsed, so it was not inspected.
    Unparseable { message: String },
}

impl fmt::Display for ArtifactIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactIssue::Missing => write!(f, "output file is missing"),
            ArtifactIssue::ImportMetaInCjs => {
                write!(f, "CommonJS output still references import.meta")
            }
            ArtifactIssue::MissingPrelude => write!(f, "prelude is not at the start of the file"),
            ArtifactIssue::InlinedExternal { module } => {
                write!(f, "external module '{module}' was bundled")
            }
            ArtifactIssue::Unparseable { message } => {
                write!(f, "output could not be parsed: {message}")
            }
        }
    }
}

/// Issues found for one target on disk.
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedOutput {
    pub target: String,
    pub path: PathBuf,
    pub issues: Vec<ArtifactIssue>,
}

impl VerifiedOutput {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check final artifact code against its target.
pub fn check_artifact(target: &BuildTarget, code: &str) -> Vec<ArtifactIssue> {
    let mut issues = Vec::new();

    if let Some(prelude) = target.prelude() {
        let (_, body) = split_hashbang(code);
        if !body.starts_with(prelude) {
            issues.push(ArtifactIssue::MissingPrelude);
        }
    }

    let is_cjs = target.format() == OutputFormat::Cjs;
    if !is_cjs && target.external().is_empty() {
        return issues;
    }

    let scan = match scan_code(code) {
        Ok(scan) => scan,
        Err(message) => {
            issues.push(ArtifactIssue::Unparseable { message });
            return issues;
        }
    };

    if is_cjs && scan.import_meta {
        issues.push(ArtifactIssue::ImportMetaInCjs);
    }

    for module in target.external() {
        let marker = format!("node_modules/{module}/");
        if scan.regions.iter().any(|region| region.contains(&marker)) {
            issues.push(ArtifactIssue::InlinedExternal {
                module: module.clone(),
            });
        }
    }

    issues
}

/// What parsing found in emitted code.
#[derive(Debug, Default)]
struct CodeScan {
    import_meta: bool,
    /// Module paths from `//#region <path>` comments.
    regions: Vec<String>,
}

fn scan_code(code: &str) -> std::result::Result<CodeScan, String> {
    let allocator = Allocator::default();
    // Module goal so `import.meta` always parses; CJS bundles are strict code.
    let options = ParseOptions {
        allow_return_outside_function: true,
        ..ParseOptions::default()
    };
    let ParserReturn {
        program,
        errors,
        panicked,
        ..
    } = Parser::new(&allocator, code, SourceType::mjs())
        .with_options(options)
        .parse();

    if panicked {
        return Err(errors
            .first()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unrecoverable syntax error".to_string()));
    }

    let mut finder = ImportMetaFinder::default();
    finder.visit_program(&program);

    let regions = program
        .comments
        .iter()
        .filter_map(|comment| {
            let span = comment.content_span();
            let text = &code[span.start as usize..span.end as usize];
            text.trim_start()
                .strip_prefix("#region")
                .map(|path| path.trim().to_string())
        })
        .collect();

    Ok(CodeScan {
        import_meta: finder.found,
        regions,
    })
}

#[derive(Default)]
struct ImportMetaFinder {
    found: bool,
}

impl<'a> Visit<'a> for ImportMetaFinder {
    fn visit_meta_property(&mut self, meta: &MetaProperty<'a>) {
        if meta.meta.name.as_str() == "import" && meta.property.name.as_str() == "meta" {
            self.found = true;
        }
    }
}

/// Like [`check_artifact`], but fails with [`Error::ArtifactCheck`].
pub fn ensure_artifact(target: &BuildTarget, code: &str) -> Result<()> {
    let issues = check_artifact(target, code);
    if issues.is_empty() {
        return Ok(());
    }

    for issue in &issues {
        tracing::warn!(target_name = target.name(), %issue, "artifact check failed");
    }
    Err(Error::ArtifactCheck {
        target: target.name().to_string(),
        issues,
    })
}

/// Check the committed outputs of every target under `root`.
///
/// A missing file is reported as [`ArtifactIssue::Missing`], not an error.
pub fn verify_outputs(targets: &[BuildTarget], root: &Path) -> Result<Vec<VerifiedOutput>> {
    let mut results = Vec::with_capacity(targets.len());

    for target in targets {
        let path = root.join(target.output_path());
        let issues = match fs::read_to_string(&path) {
            Ok(code) => check_artifact(target, &code),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => vec![ArtifactIssue::Missing],
            Err(e) => return Err(Error::Io(e)),
        };

        results.push(VerifiedOutput {
            target: target.name().to_string(),
            path,
            issues,
        });
    }

    Ok(results)
}
