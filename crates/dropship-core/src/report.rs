//! Run identity and the distribution receipt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::Strategy;
use crate::resolve::DropRecord;

/// Unique identifier for one distribution run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new random RunId
    pub fn new() -> Self {
        RunId(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened to one file artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileDisposition {
    /// Written with incoming (or confirmed) content.
    Written,
    /// Written with merged content.
    Merged,
    /// Incoming content was byte-identical; written as-is.
    Unchanged,
    /// Dropped by a reconciler or the denylist.
    Skipped,
    /// The write itself failed; the rest of the batch continued.
    WriteFailed { error: String },
}

/// Per-file entry in the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub strategy: Strategy,
    pub disposition: FileDisposition,
}

/// What happened to one command directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandDisposition {
    /// Executed; exit code recorded.
    Ran { exit_code: i32 },
    /// Operator declined to run it.
    Declined,
    /// Pruned after a declined schema update.
    Pruned,
    /// Never reached: an earlier command failed.
    Halted,
}

/// Per-command entry in the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReport {
    pub command: String,
    pub disposition: CommandDisposition,
}

/// Receipt for one distribution run.
///
/// Everything the run decided, in order, so an operator can audit what was
/// written, what was skipped and why, and where command execution stopped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionReport {
    pub run_id: RunId,

    /// Document path as given.
    pub document: String,

    /// SHA-256 of the document as read.
    pub document_digest: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// True when the operator declined re-entry on a marked document; no
    /// state was touched.
    pub aborted: bool,

    pub files: Vec<FileReport>,
    pub commands: Vec<CommandReport>,

    /// Provenance for every dropped artifact and pruned command.
    pub drops: Vec<DropRecord>,

    /// Whether the completion marker was written back.
    pub marked: bool,
}

impl DistributionReport {
    /// Files actually materialised (written, merged, or unchanged).
    pub fn written_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| {
                matches!(
                    f.disposition,
                    FileDisposition::Written | FileDisposition::Merged | FileDisposition::Unchanged
                )
            })
            .count()
    }

    /// Commands that executed and exited cleanly.
    pub fn commands_succeeded(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c.disposition, CommandDisposition::Ran { exit_code: 0 }))
            .count()
    }

    /// Whether any executed command failed.
    pub fn command_failed(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c.disposition, CommandDisposition::Ran { exit_code } if exit_code != 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_is_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }

    #[test]
    fn test_report_counters() {
        let report = DistributionReport {
            run_id: RunId::new(),
            document: "distribute.md".to_string(),
            document_digest: "abc".to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            aborted: false,
            files: vec![
                FileReport {
                    path: "a.js".to_string(),
                    strategy: Strategy::PassThrough,
                    disposition: FileDisposition::Written,
                },
                FileReport {
                    path: "b.js".to_string(),
                    strategy: Strategy::ExportAwareMerge,
                    disposition: FileDisposition::Skipped,
                },
            ],
            commands: vec![
                CommandReport {
                    command: "echo ok".to_string(),
                    disposition: CommandDisposition::Ran { exit_code: 0 },
                },
                CommandReport {
                    command: "false".to_string(),
                    disposition: CommandDisposition::Ran { exit_code: 1 },
                },
                CommandReport {
                    command: "echo never".to_string(),
                    disposition: CommandDisposition::Halted,
                },
            ],
            drops: Vec::new(),
            marked: false,
        };
        assert_eq!(report.written_count(), 1);
        assert_eq!(report.commands_succeeded(), 1);
        assert!(report.command_failed());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = DistributionReport {
            run_id: RunId::new(),
            document: "distribute.md".to_string(),
            document_digest: "abc".to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            aborted: true,
            files: Vec::new(),
            commands: Vec::new(),
            drops: Vec::new(),
            marked: false,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"aborted\":true"));
    }
}
