use serde::{Deserialize, Serialize};

/// One buildable state of a project: a branch and a revision number within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub branch: String,
    pub revision: u64,
}

impl Version {
    pub fn new(branch: impl Into<String>, revision: u64) -> Self {
        Self {
            branch: branch.into(),
            revision,
        }
    }
}

/// The two artifacts a version can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Wrap,
    Zip,
}

impl ArtifactKind {
    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Wrap => "text/plain",
            ArtifactKind::Zip => "application/zip",
        }
    }

    /// Download filename for the artifact, if it is served as an attachment.
    pub fn attachment_name(&self, project: &str, branch: &str, revision: u64) -> Option<String> {
        match self {
            ArtifactKind::Wrap => None,
            ArtifactKind::Zip => Some(format!("{project}-{branch}-{revision}-wrap.zip")),
        }
    }
}
