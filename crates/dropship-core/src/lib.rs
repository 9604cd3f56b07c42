//! Dropship Core Library
//!
//! Turns a markdown drop document into typed artifacts (file writes and
//! shell directives) and reconciles each artifact against the existing
//! working tree before anything is written. The hard part lives in the
//! reconcilers: format-aware structural diffs decide whether an overwrite
//! is safe, needs a merge, or needs the operator to sign off.
//!
//! ## Key Components
//!
//! - `extract`: fence lexer + artifact extraction from the document
//! - `classify`: routes each file artifact to a reconciliation strategy
//! - `schema`: structural containment diff for Prisma-style schemas
//! - `exports`: export-set diff and cherry-pick merge for styled modules
//! - `resolve`: the coordinator that applies routing and collects outcomes
//! - `pipeline`: end-to-end run, generic over the capability traits

pub mod artifact;
pub mod classify;
pub mod config;
pub mod digest;
mod error;
pub mod exports;
pub mod extract;
pub mod marker;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod schema;
pub mod telemetry;

pub use artifact::{FileArtifact, Manifest};
pub use classify::{classify, Strategy};
pub use config::{DistributeConfig, DEFAULT_DOCUMENT};
pub use digest::ContentDigest;
pub use error::{PipelineError, Result};
pub use exports::{reconcile_exports, ExportDiff, ExportOutcome};
pub use extract::{extract, lex_blocks, Block, BlockKind};
pub use marker::{is_marked, mark, COMPLETION_MARKER};
pub use pipeline::Distributor;
pub use report::{
    CommandDisposition, CommandReport, DistributionReport, FileDisposition, FileReport, RunId,
};
pub use resolve::{resolve, DropReason, DropRecord, ReconcileAction, Resolution, ResolvedFile};
pub use schema::{
    containment_diff, introspect, reconcile_schema, MissingCategory, MissingItem, SchemaError,
    SchemaModel, SchemaOutcome,
};
pub use telemetry::init_tracing;

/// Dropship version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
