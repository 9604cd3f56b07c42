//! Artifact types produced by extraction.

use serde::{Deserialize, Serialize};

/// A file to be materialised in the target tree.
///
/// `path` is the artifact's identity and stays stable from extraction
/// through resolution; only `code` may be replaced by a reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileArtifact {
    /// Target path, relative to the tree root.
    pub path: String,

    /// Full block text, hint line included.
    pub code: String,
}

/// Everything extracted from one drop document, in document order.
///
/// Commands are raw directive strings; a multi-line block is one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub files: Vec<FileArtifact>,
    pub commands: Vec<String>,
}

impl Manifest {
    /// Whether extraction found nothing to distribute.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.commands.is_empty()
    }
}
