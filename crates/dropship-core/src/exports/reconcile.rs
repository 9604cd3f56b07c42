//! Export reconciliation: decide merge/overwrite/skip for a module.

use std::collections::BTreeSet;

use dropship_io::ConfirmGate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::set::export_set;
use super::span::declaration_span;
use crate::error::Result;
use crate::resolve::ReconcileAction;

/// Named-export delta between existing and incoming module source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDiff {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl ExportDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Decision for a component-module artifact.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub action: ReconcileAction,

    /// Merged content when `action` is `Merge`.
    pub final_content: Option<String>,

    pub diff: ExportDiff,
}

/// Append the spans for `added` exports to the existing content, separated
/// by blank lines.
fn merge_content(existing: &str, incoming: &str, added: &BTreeSet<String>) -> String {
    let mut merged = existing.to_string();
    if !merged.ends_with('\n') {
        merged.push('\n');
    }
    for name in added {
        match declaration_span(incoming, name) {
            Some(span) => {
                merged.push('\n');
                merged.push_str(span.trim_end());
                merged.push('\n');
            }
            None => debug!(name = %name, "could not locate declaration span, not merged"),
        }
    }
    merged
}

/// Reconcile an incoming component module against the existing file.
///
/// Additions win over removals: when both are present the added
/// declarations are cherry-picked into the existing content and nothing is
/// deleted. A pure removal is destructive and needs the operator's yes.
pub async fn reconcile_exports(
    existing: Option<&str>,
    incoming: &str,
    path: &str,
    gate: &dyn ConfirmGate,
) -> Result<ExportOutcome> {
    let Some(existing) = existing else {
        return Ok(ExportOutcome {
            action: ReconcileAction::Overwrite,
            final_content: None,
            diff: ExportDiff {
                added: export_set(incoming),
                removed: BTreeSet::new(),
            },
        });
    };

    let existing_set = export_set(existing);
    let incoming_set = export_set(incoming);
    let diff = ExportDiff {
        added: incoming_set.difference(&existing_set).cloned().collect(),
        removed: existing_set.difference(&incoming_set).cloned().collect(),
    };

    if !diff.added.is_empty() {
        info!(path = %path, added = diff.added.len(), "merging new exports into existing module");
        let merged = merge_content(existing, incoming, &diff.added);
        return Ok(ExportOutcome {
            action: ReconcileAction::Merge,
            final_content: Some(merged),
            diff,
        });
    }

    if !diff.removed.is_empty() {
        let removed: Vec<&str> = diff.removed.iter().map(String::as_str).collect();
        let proceed = gate
            .ask(
                &format!(
                    "The incoming module no longer exports: {}. Overwrite {} with the incoming version?",
                    removed.join(", "),
                    path,
                ),
                false,
            )
            .await?;
        return Ok(if proceed {
            ExportOutcome {
                action: ReconcileAction::Overwrite,
                final_content: None,
                diff,
            }
        } else {
            info!(path = %path, "module update skipped by operator");
            ExportOutcome {
                action: ReconcileAction::Skip,
                final_content: None,
                diff,
            }
        });
    }

    // Identical export sets: an in-place edit of the components' internals.
    Ok(ExportOutcome {
        action: ReconcileAction::Overwrite,
        final_content: None,
        diff,
    })
}
