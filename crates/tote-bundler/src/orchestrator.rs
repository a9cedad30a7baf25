//! Concurrent build orchestration.
//!
//! Every target is submitted to a [`JoinSet`] before any result is awaited.
//! Results are held in memory; files are only written once every target has
//! bundled and passed its artifact checks. The first failure aborts the
//! remaining tasks and nothing is written.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tokio::task::{Id, JoinSet};
use tote_config::OutputFormat;

use crate::backend::{BundleBackend, RolldownBackend};
use crate::shim::apply_prelude;
use crate::target::BuildTarget;
use crate::verify::ensure_artifact;
use crate::writer::{PendingWrite, commit_files};
use crate::{Error, Result};

/// Bundled code for one target, prelude applied, not yet on disk.
#[derive(Debug, Clone)]
pub struct BundledArtifact {
    pub target: String,
    /// Relative to the project root.
    pub output_path: PathBuf,
    pub code: String,
    pub elapsed: Duration,
}

/// Outcome of one committed target.
#[derive(Debug, Clone)]
pub struct TargetReport {
    pub name: String,
    /// Absolute path of the written file.
    pub output_path: PathBuf,
    pub format: OutputFormat,
    pub size: usize,
    pub elapsed: Duration,
}

/// Outcome of a full run, in target declaration order.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub targets: Vec<TargetReport>,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn total_size(&self) -> usize {
        self.targets.iter().map(|t| t.size).sum()
    }
}

/// Runs build targets against a backend, rooted at a project directory.
pub struct Orchestrator {
    backend: Arc<dyn BundleBackend>,
    root: PathBuf,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn BundleBackend>, root: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            root: root.into(),
        }
    }

    /// Orchestrator backed by [`RolldownBackend`].
    pub fn rolldown(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(RolldownBackend::new()), root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Bundle, check and commit every target.
    ///
    /// # Errors
    ///
    /// Fails on the first missing entry, bundler failure, panicked task,
    /// failed artifact check or write failure. In every case no output file
    /// is created or replaced.
    pub async fn run(&self, targets: &[BuildTarget]) -> Result<BuildReport> {
        let started = Instant::now();

        let artifacts = self.bundle_all(targets).await?;

        for (target, artifact) in targets.iter().zip(&artifacts) {
            ensure_artifact(target, &artifact.code)?;
        }

        let pending: Vec<PendingWrite<'_>> = artifacts
            .iter()
            .map(|a| (a.output_path.as_path(), a.code.as_bytes()))
            .collect();
        let written = commit_files(&self.root, &pending)?;

        let reports: Vec<TargetReport> = targets
            .iter()
            .zip(artifacts)
            .zip(written)
            .map(|((target, artifact), output_path)| TargetReport {
                name: artifact.target,
                output_path,
                format: target.format(),
                size: artifact.code.len(),
                elapsed: artifact.elapsed,
            })
            .collect();

        let report = BuildReport {
            targets: reports,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            targets = report.targets.len(),
            bytes = report.total_size(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "build committed"
        );
        Ok(report)
    }

    /// Bundle every target concurrently without writing anything.
    ///
    /// Artifacts are returned in the order of `targets`.
    pub async fn bundle_all(&self, targets: &[BuildTarget]) -> Result<Vec<BundledArtifact>> {
        self.check_entries(targets)?;

        let mut join_set = JoinSet::new();
        let mut task_names: FxHashMap<Id, String> = FxHashMap::default();

        for (index, target) in targets.iter().enumerate() {
            let backend = Arc::clone(&self.backend);
            let root = self.root.clone();
            let target = target.clone();
            let name = target.name().to_string();

            let handle = join_set.spawn(async move {
                let started = Instant::now();
                let code = backend.bundle(&target, &root).await?;
                Ok::<_, Error>((
                    index,
                    BundledArtifact {
                        target: target.name().to_string(),
                        output_path: target.output_path().to_path_buf(),
                        code: apply_prelude(target.prelude(), &code),
                        elapsed: started.elapsed(),
                    },
                ))
            });

            tracing::debug!(target_name = %name, backend = self.backend.name(), "submitted target");
            task_names.insert(handle.id(), name);
        }

        let mut slots: Vec<Option<BundledArtifact>> = vec![None; targets.len()];

        while let Some(joined) = join_set.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(join_err) => Err(Error::TaskFailed {
                    target: task_names
                        .get(&join_err.id())
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: join_err.to_string(),
                }),
            };

            match outcome {
                Ok((index, artifact)) => {
                    tracing::debug!(
                        target_name = %artifact.target,
                        bytes = artifact.code.len(),
                        elapsed_ms = artifact.elapsed.as_millis() as u64,
                        "target bundled"
                    );
                    slots[index] = Some(artifact);
                }
                Err(err) => {
                    tracing::debug!(
                        error = %err,
                        remaining = join_set.len(),
                        "aborting remaining targets"
                    );
                    join_set.abort_all();
                    return Err(err);
                }
            }
        }

        slots
            .into_iter()
            .zip(targets)
            .map(|(slot, target)| {
                slot.ok_or_else(|| Error::TaskFailed {
                    target: target.name().to_string(),
                    message: "task finished without a result".to_string(),
                })
            })
            .collect()
    }

    fn check_entries(&self, targets: &[BuildTarget]) -> Result<()> {
        for target in targets {
            let path = self.root.join(target.entry_point());
            if !path.is_file() {
                return Err(Error::EntryNotFound {
                    target: target.name().to_string(),
                    path,
                });
            }
        }
        Ok(())
    }
}
