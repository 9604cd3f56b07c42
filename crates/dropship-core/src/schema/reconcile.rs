//! Schema reconciliation: decide overwrite/skip for a schema artifact.

use dropship_io::ConfirmGate;
use tracing::{info, warn};

use super::diff::{containment_diff, MissingItem};
use super::introspect::introspect;
use crate::error::Result;
use crate::resolve::ReconcileAction;

/// Decision for a schema artifact.
#[derive(Debug, Clone)]
pub struct SchemaOutcome {
    pub action: ReconcileAction,

    /// Structural discrepancies shown to the operator (empty when the
    /// incoming schema was a superset or could not be checked).
    pub missing: Vec<MissingItem>,

    /// When true, schema-apply commands must be pruned from the run.
    pub prune_schema_commands: bool,
}

impl SchemaOutcome {
    fn overwrite(missing: Vec<MissingItem>) -> Self {
        Self {
            action: ReconcileAction::Overwrite,
            missing,
            prune_schema_commands: false,
        }
    }

    fn skip(missing: Vec<MissingItem>) -> Self {
        Self {
            action: ReconcileAction::Skip,
            missing,
            prune_schema_commands: true,
        }
    }
}

/// Reconcile an incoming schema against the existing one.
///
/// A missing existing file is not a conflict; parse failures on either side
/// degrade to a confirmed unchecked overwrite; a non-empty containment diff
/// requires the operator to accept the loss explicitly. The default answer
/// on every prompt is the non-destructive one.
pub async fn reconcile_schema(
    existing: Option<&str>,
    incoming: &str,
    gate: &dyn ConfirmGate,
) -> Result<SchemaOutcome> {
    let Some(existing) = existing else {
        return Ok(SchemaOutcome::overwrite(Vec::new()));
    };

    let incoming_model = match introspect(incoming) {
        Ok(model) => model,
        Err(e) => {
            warn!(error = %e, "incoming schema failed to parse");
            let proceed = gate
                .ask(
                    "The incoming schema is invalid. Continue without the structural check and overwrite the existing schema?",
                    false,
                )
                .await?;
            return Ok(if proceed {
                SchemaOutcome::overwrite(Vec::new())
            } else {
                info!("schema update skipped: incoming schema invalid");
                SchemaOutcome::skip(Vec::new())
            });
        }
    };

    let existing_model = match introspect(existing) {
        Ok(model) => model,
        Err(e) => {
            warn!(error = %e, "existing schema failed to parse");
            let proceed = gate
                .ask(
                    "The existing schema failed to parse, so the structural check cannot run. Overwrite it with the incoming schema?",
                    false,
                )
                .await?;
            return Ok(if proceed {
                SchemaOutcome::overwrite(Vec::new())
            } else {
                info!("schema update skipped: existing schema unreadable");
                SchemaOutcome::skip(Vec::new())
            });
        }
    };

    let missing = containment_diff(&existing_model, &incoming_model);
    if missing.is_empty() {
        return Ok(SchemaOutcome::overwrite(missing));
    }

    for item in &missing {
        warn!(entity = %item.entity, "{}", item.message);
    }
    let proceed = gate
        .ask(
            "The incoming schema has a discrepancy. Are you sure you want to overwrite the existing schema?",
            false,
        )
        .await?;

    Ok(if proceed {
        SchemaOutcome::overwrite(missing)
    } else {
        info!("schema update skipped by operator");
        SchemaOutcome::skip(missing)
    })
}
