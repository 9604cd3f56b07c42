//! Dropship-IO: Capability Backends for Dropship
//!
//! This crate provides the boundary between the reconciliation engine and
//! the outside world. Everything the pipeline needs from its environment is
//! expressed as a trait here, so the engine can be driven deterministically
//! in tests and wired to real backends in the CLI.
//!
//! ## Key Components
//!
//! - `ConfirmGate`: operator yes/no confirmations with a safe default
//! - `TreeStore`: read/write access to the target file tree
//! - `CommandRunner`: sequential shell directive execution
//!
//! In-memory fakes for all three traits live in the `fakes` module.

mod error;
pub mod fakes;
mod fs;
mod shell;
mod terminal;
mod traits;

pub use error::{IoError, IoResult};
pub use fs::FsTree;
pub use shell::ShellRunner;
pub use terminal::TerminalGate;
pub use traits::{CommandOutput, CommandRunner, ConfirmGate, TreeStore};
