//! Pipeline-level error taxonomy for dropship.

/// Errors that abort a distribution run.
///
/// Recoverable conditions (schema parse failures, structural discrepancies,
/// command exit codes) are decision points handled inside the pipeline, not
/// errors; only capability failures and a missing document end the run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("drop document not found: {0}")]
    DocumentNotFound(String),

    #[error("capability failure: {0}")]
    Io(#[from] dropship_io::IoError),
}

/// Result type for dropship-core operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
