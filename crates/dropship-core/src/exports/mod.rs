//! Export-aware reconciliation for component modules.
//!
//! The export set is a cheap syntactic proxy for "does this edit remove
//! public surface". Purely additive incoming modules are merged by
//! cherry-picking the new declarations into the existing file; removals
//! need the operator to sign off on a full overwrite.

mod reconcile;
mod set;
mod span;

pub use reconcile::{reconcile_exports, ExportDiff, ExportOutcome};
pub use set::export_set;
pub use span::declaration_span;
