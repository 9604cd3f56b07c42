//! Capability trait definitions for dropship
//!
//! These traits define what the pipeline needs from its environment:
//! - `ConfirmGate`: operator confirmations (the only human suspension point)
//! - `TreeStore`: the target file tree (reads for reconciliation, writes for
//!   distribution)
//! - `CommandRunner`: execution of shell directives
//!
//! All traits are async and backend-agnostic. In-memory fakes are provided
//! for testing via the `fakes` module.

use async_trait::async_trait;

use crate::error::IoResult;

// ---------------------------------------------------------------------------
// ConfirmGate — operator confirmations
// ---------------------------------------------------------------------------

/// A yes/no question put to the operator.
///
/// Every destructive decision in the pipeline flows through this gate, and
/// every call site supplies a non-destructive `default` so that an operator
/// who just presses enter never loses data.
#[async_trait]
pub trait ConfirmGate: Send + Sync {
    /// Ask the operator a yes/no question. `default` is the answer taken
    /// when the operator gives no explicit one.
    async fn ask(&self, prompt: &str, default: bool) -> IoResult<bool>;
}

// ---------------------------------------------------------------------------
// TreeStore — the target file tree
// ---------------------------------------------------------------------------

/// Read/write access to the target file tree, keyed by the relative paths
/// that appear in the drop document.
///
/// Guarantees:
/// - `write` creates missing parent directories.
/// - `read` distinguishes "file absent" (`Ok(None)`) from read failure.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Read a file's content, or `None` if no file exists at `path`.
    async fn read(&self, path: &str) -> IoResult<Option<String>>;

    /// Write `content` to `path`, creating intermediate directories.
    async fn write(&self, path: &str, content: &str) -> IoResult<()>;

    /// Check whether a file exists at `path`.
    async fn exists(&self, path: &str) -> IoResult<bool>;
}

// ---------------------------------------------------------------------------
// CommandRunner — shell directive execution
// ---------------------------------------------------------------------------

/// Captured output of one executed directive.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Exit code (0 = success, -1 when the process was killed by a signal).
    pub exit_code: i32,
}

impl CommandOutput {
    /// Whether the command exited cleanly.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes one shell directive at a time.
///
/// Callers are responsible for ordering and fail-fast semantics; the runner
/// itself only reports what happened.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a single directive to completion and capture its output.
    async fn run(&self, command: &str) -> IoResult<CommandOutput>;
}
