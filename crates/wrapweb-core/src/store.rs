//! Read-side contract between the router and the wrap database.
//!
//! Handles are request scoped: a handler calls [`StoreProvider::open`] once,
//! uses the returned handle for the duration of the request and drops it on
//! every exit path. Nothing holds a handle across requests.

use crate::error::Result;
use crate::types::{ArtifactKind, Version};

pub trait QueryStore {
    /// Project names containing `substring`, sorted. An empty substring matches all.
    fn search_names(&self, substring: &str) -> Result<Vec<String>>;

    /// All versions of `project`. Empty when the project is unknown.
    fn list_versions(&self, project: &str) -> Result<Vec<Version>>;

    fn get_wrap(&self, project: &str, branch: &str, revision: u64) -> Result<Option<Vec<u8>>>;

    fn get_zip(&self, project: &str, branch: &str, revision: u64) -> Result<Option<Vec<u8>>>;

    fn get_artifact(
        &self,
        kind: ArtifactKind,
        project: &str,
        branch: &str,
        revision: u64,
    ) -> Result<Option<Vec<u8>>> {
        match kind {
            ArtifactKind::Wrap => self.get_wrap(project, branch, revision),
            ArtifactKind::Zip => self.get_zip(project, branch, revision),
        }
    }
}

/// Opens one [`QueryStore`] handle per logical request.
pub trait StoreProvider: Send + Sync {
    fn open(&self) -> Result<Box<dyn QueryStore>>;
}
