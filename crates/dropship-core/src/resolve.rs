//! Resolution coordinator: route artifacts, collect outcomes, prune
//! dependent commands.
//!
//! Artifacts are reconciled strictly one at a time: each confirmation's
//! answer can change what the next step sees (a declined schema overwrite
//! prunes the commands that would have applied it), so nothing here is
//! concurrent.

use dropship_io::{ConfirmGate, TreeStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::artifact::{FileArtifact, Manifest};
use crate::classify::{classify, Strategy};
use crate::config::DistributeConfig;
use crate::digest::ContentDigest;
use crate::error::Result;
use crate::exports::reconcile_exports;
use crate::schema::reconcile_schema;

/// What a reconciler decided for one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    Skip,
    Overwrite,
    Merge,
}

/// Why something was dropped from the final lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Path is on the denylist.
    Denylisted,
    /// Operator declined the schema overwrite.
    SchemaDeclined,
    /// Operator declined the module overwrite.
    ExportsDeclined,
    /// Schema-apply command pruned after a declined schema update.
    SchemaCommandPruned,
}

/// Provenance record for one dropped artifact or command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropRecord {
    /// The dropped path or command text.
    pub what: String,
    pub reason: DropReason,
}

/// A surviving file artifact with its resolution.
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    /// Final artifact, content already replaced for merges.
    pub artifact: FileArtifact,
    pub strategy: Strategy,
    pub action: ReconcileAction,
    /// Incoming content was byte-identical to the existing file.
    pub unchanged: bool,
}

/// Final artifact lists plus the provenance of everything dropped.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub files: Vec<ResolvedFile>,
    pub commands: Vec<String>,
    pub drops: Vec<DropRecord>,
}

fn keep(files: &mut Vec<ResolvedFile>, artifact: FileArtifact, strategy: Strategy) {
    files.push(ResolvedFile {
        artifact,
        strategy,
        action: ReconcileAction::Overwrite,
        unchanged: false,
    });
}

/// Remove schema-apply commands, recording each as a drop. Returns the kept
/// commands in their original order.
fn prune_schema_commands(
    commands: Vec<String>,
    config: &DistributeConfig,
    drops: &mut Vec<DropRecord>,
) -> Vec<String> {
    let mut kept = Vec::new();
    for command in commands {
        if config.is_schema_command(&command) {
            info!(command = %command, "pruning schema-apply command after declined overwrite");
            drops.push(DropRecord {
                what: command,
                reason: DropReason::SchemaCommandPruned,
            });
        } else {
            kept.push(command);
        }
    }
    kept
}

/// Resolve every artifact in the manifest against the existing tree.
///
/// Document order is preserved for both survivors lists. The returned
/// collections are fresh; the manifest is never mutated.
pub async fn resolve(
    manifest: &Manifest,
    gate: &dyn ConfirmGate,
    tree: &dyn TreeStore,
    config: &DistributeConfig,
) -> Result<Resolution> {
    let mut files = Vec::new();
    let mut drops = Vec::new();
    let mut commands = manifest.commands.clone();

    for artifact in &manifest.files {
        let strategy = classify(artifact, config);

        if strategy == Strategy::Denied {
            info!(path = %artifact.path, "artifact denylisted");
            drops.push(DropRecord {
                what: artifact.path.clone(),
                reason: DropReason::Denylisted,
            });
            continue;
        }

        let existing = tree.read(&artifact.path).await?;

        // Byte-identical content can never need a prompt.
        if let Some(existing) = &existing {
            if ContentDigest::from_bytes(existing.as_bytes())
                == ContentDigest::from_bytes(artifact.code.as_bytes())
            {
                debug!(path = %artifact.path, "incoming content unchanged");
                files.push(ResolvedFile {
                    artifact: artifact.clone(),
                    strategy,
                    action: ReconcileAction::Overwrite,
                    unchanged: true,
                });
                continue;
            }
        }

        match strategy {
            Strategy::SchemaStructural => {
                let outcome =
                    reconcile_schema(existing.as_deref(), &artifact.code, gate).await?;
                if outcome.action == ReconcileAction::Skip {
                    drops.push(DropRecord {
                        what: artifact.path.clone(),
                        reason: DropReason::SchemaDeclined,
                    });
                    if outcome.prune_schema_commands {
                        commands = prune_schema_commands(commands, config, &mut drops);
                    }
                } else {
                    keep(&mut files, artifact.clone(), strategy);
                }
            }
            Strategy::ExportAwareMerge => {
                let outcome =
                    reconcile_exports(existing.as_deref(), &artifact.code, &artifact.path, gate)
                        .await?;
                match outcome.action {
                    ReconcileAction::Skip => drops.push(DropRecord {
                        what: artifact.path.clone(),
                        reason: DropReason::ExportsDeclined,
                    }),
                    action => {
                        let code = outcome
                            .final_content
                            .unwrap_or_else(|| artifact.code.clone());
                        files.push(ResolvedFile {
                            artifact: FileArtifact {
                                path: artifact.path.clone(),
                                code,
                            },
                            strategy,
                            action,
                            unchanged: false,
                        });
                    }
                }
            }
            Strategy::PassThrough => keep(&mut files, artifact.clone(), strategy),
            Strategy::Denied => {}
        }
    }

    Ok(Resolution {
        files,
        commands,
        drops,
    })
}
