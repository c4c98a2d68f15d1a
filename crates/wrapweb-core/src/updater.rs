//! Write-side contract: regenerating the wrap and archive for a branch.

use crate::error::Result;

pub trait Updater {
    /// Fetch `clone_url` at `branch`, build the wrap and archive for `project`
    /// and persist them. Readers must observe either the old or the new
    /// artifacts, never a partial update.
    ///
    /// Failures are reported as [`crate::WrapError::GenerationFailed`].
    fn update(&self, project: &str, clone_url: &str, branch: &str) -> Result<()>;
}

/// Opens one [`Updater`] handle per dispatched regeneration.
pub trait UpdaterProvider: Send + Sync {
    fn open(&self) -> Result<Box<dyn Updater>>;
}
