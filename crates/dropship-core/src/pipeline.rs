//! End-to-end distribution pipeline.
//!
//! One run: read document → marker check → extract → resolve → write files
//! → execute commands (each gated, fail-fast) → mark document. Generic over
//! the capability traits so the whole flow runs against fakes in tests and
//! against the terminal/filesystem/shell in the CLI.

use chrono::Utc;
use dropship_io::{CommandRunner, ConfirmGate, TreeStore};
use tracing::{debug, error, info, warn};

use crate::classify::Strategy;
use crate::config::DistributeConfig;
use crate::digest::ContentDigest;
use crate::error::{PipelineError, Result};
use crate::extract::extract;
use crate::marker;
use crate::report::{
    CommandDisposition, CommandReport, DistributionReport, FileDisposition, FileReport, RunId,
};
use crate::resolve::{resolve, DropReason, ReconcileAction, Resolution};

/// Orchestrates one distribution run over injected capabilities.
pub struct Distributor<'a> {
    gate: &'a dyn ConfirmGate,
    tree: &'a dyn TreeStore,
    runner: &'a dyn CommandRunner,
    config: DistributeConfig,
}

impl<'a> Distributor<'a> {
    pub fn new(
        gate: &'a dyn ConfirmGate,
        tree: &'a dyn TreeStore,
        runner: &'a dyn CommandRunner,
        config: DistributeConfig,
    ) -> Self {
        Self {
            gate,
            tree,
            runner,
            config,
        }
    }

    /// Run the full pipeline against the document at `document`.
    ///
    /// Recoverable conditions (parse failures, declined overwrites, failing
    /// commands) are decisions recorded in the report; only a missing
    /// document or a capability failure returns an error.
    pub async fn run(&self, document: &str) -> Result<DistributionReport> {
        let run_id = RunId::new();
        let started_at = Utc::now();

        let doc = self
            .tree
            .read(document)
            .await?
            .ok_or_else(|| PipelineError::DocumentNotFound(document.to_string()))?;
        let document_digest = ContentDigest::from_bytes(doc.as_bytes());

        info!(run_id = %run_id, document = %document, digest = %document_digest.short(), "starting distribution");

        if marker::is_marked(&doc) {
            let proceed = self
                .gate
                .ask(
                    "This document appears to have been processed already. Would you like to proceed with the distribution again?",
                    false,
                )
                .await?;
            if !proceed {
                info!(run_id = %run_id, "re-entry declined, aborting with no changes");
                return Ok(DistributionReport {
                    run_id,
                    document: document.to_string(),
                    document_digest: document_digest.as_str().to_string(),
                    started_at,
                    finished_at: Utc::now(),
                    aborted: true,
                    files: Vec::new(),
                    commands: Vec::new(),
                    drops: Vec::new(),
                    marked: false,
                });
            }
        }

        let manifest = extract(&doc, &self.config);
        info!(
            run_id = %run_id,
            files = manifest.files.len(),
            commands = manifest.commands.len(),
            "extracted artifacts"
        );

        let resolution = resolve(&manifest, self.gate, self.tree, &self.config).await?;

        let files = self.write_files(&resolution).await;
        let (commands, any_failed) = self.run_commands(&resolution).await?;

        let marked = if any_failed {
            warn!(run_id = %run_id, "leaving document unmarked after command failure");
            false
        } else {
            self.tree.write(document, &marker::mark(&doc)).await?;
            info!(run_id = %run_id, "document marked complete");
            true
        };

        let report = DistributionReport {
            run_id,
            document: document.to_string(),
            document_digest: document_digest.as_str().to_string(),
            started_at,
            finished_at: Utc::now(),
            aborted: false,
            files,
            commands,
            drops: resolution.drops,
            marked,
        };
        info!(
            run_id = %report.run_id,
            written = report.written_count(),
            commands_ok = report.commands_succeeded(),
            "distribution finished"
        );
        Ok(report)
    }

    /// Write every surviving artifact. A failed write is recorded and the
    /// rest of the batch continues.
    async fn write_files(&self, resolution: &Resolution) -> Vec<FileReport> {
        let mut files = Vec::new();

        for resolved in &resolution.files {
            let path = &resolved.artifact.path;
            let disposition = match self.tree.write(path, &resolved.artifact.code).await {
                Ok(()) => {
                    info!(path = %path, "wrote artifact");
                    if resolved.unchanged {
                        FileDisposition::Unchanged
                    } else if resolved.action == ReconcileAction::Merge {
                        FileDisposition::Merged
                    } else {
                        FileDisposition::Written
                    }
                }
                Err(e) => {
                    error!(path = %path, error = %e, "write failed, continuing with remaining artifacts");
                    FileDisposition::WriteFailed {
                        error: e.to_string(),
                    }
                }
            };
            files.push(FileReport {
                path: path.clone(),
                strategy: resolved.strategy,
                disposition,
            });
        }

        for drop in &resolution.drops {
            let strategy = match drop.reason {
                DropReason::Denylisted => Strategy::Denied,
                DropReason::SchemaDeclined => Strategy::SchemaStructural,
                DropReason::ExportsDeclined => Strategy::ExportAwareMerge,
                DropReason::SchemaCommandPruned => continue,
            };
            files.push(FileReport {
                path: drop.what.clone(),
                strategy,
                disposition: FileDisposition::Skipped,
            });
        }

        files
    }

    /// Execute surviving commands in order, each behind its own gate. The
    /// first non-zero exit halts everything after it.
    async fn run_commands(&self, resolution: &Resolution) -> Result<(Vec<CommandReport>, bool)> {
        let mut commands = Vec::new();
        let mut halted = false;
        let mut any_failed = false;

        for command in &resolution.commands {
            if halted {
                commands.push(CommandReport {
                    command: command.clone(),
                    disposition: CommandDisposition::Halted,
                });
                continue;
            }

            let run_it = self
                .gate
                .ask(&format!("Do you want to run this command?\n  {command}"), false)
                .await?;
            if !run_it {
                info!(command = %command, "command declined");
                commands.push(CommandReport {
                    command: command.clone(),
                    disposition: CommandDisposition::Declined,
                });
                continue;
            }

            info!(command = %command, "executing directive");
            let output = self.runner.run(command).await?;
            if !output.stderr.is_empty() {
                // stderr alone is not a failure; plenty of tools log there.
                warn!(command = %command, stderr = %output.stderr.trim_end(), "directive wrote to stderr");
            }
            if !output.stdout.is_empty() {
                debug!(stdout = %output.stdout.trim_end(), "directive output");
            }

            if !output.success() {
                error!(
                    command = %command,
                    exit_code = output.exit_code,
                    "directive failed, halting remaining commands"
                );
                any_failed = true;
                halted = true;
            }
            commands.push(CommandReport {
                command: command.clone(),
                disposition: CommandDisposition::Ran {
                    exit_code: output.exit_code,
                },
            });
        }

        for drop in &resolution.drops {
            if drop.reason == DropReason::SchemaCommandPruned {
                commands.push(CommandReport {
                    command: drop.what.clone(),
                    disposition: CommandDisposition::Pruned,
                });
            }
        }

        Ok((commands, any_failed))
    }
}
