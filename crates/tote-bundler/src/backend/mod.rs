//! Bundle backends.
//!
//! A backend turns one [`BuildTarget`] into the code of a single
//! self-contained output file. It never writes to disk; the orchestrator
//! owns prelude application, verification, and the final commit.

mod rolldown_backend;

use std::path::Path;

use async_trait::async_trait;

use crate::Result;
use crate::target::BuildTarget;

pub use self::rolldown_backend::RolldownBackend;

/// Something that can bundle one target into one file.
#[async_trait]
pub trait BundleBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Bundle `target`, resolving its entry point and modules from `cwd`.
    ///
    /// Returns the bundled code without any prelude applied.
    async fn bundle(&self, target: &BuildTarget, cwd: &Path) -> Result<String>;
}
