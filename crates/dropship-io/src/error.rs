//! Error types for dropship-io

use thiserror::Error;

/// Errors that can occur at the capability boundary
#[derive(Error, Debug)]
pub enum IoError {
    /// Filesystem operation failed
    #[error("filesystem operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Confirmation prompt could not be read
    #[error("confirmation prompt failed: {0}")]
    Gate(String),

    /// Artifact path points outside the target tree
    #[error("path escapes the target tree: {0}")]
    PathEscape(String),

    /// Command could not be spawned
    #[error("command spawn failed: {0}")]
    Spawn(String),
}

/// Result type for capability operations
pub type IoResult<T> = std::result::Result<T, IoError>;
