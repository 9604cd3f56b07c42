//! In-memory fakes for capability traits (testing only)
//!
//! Provides `ScriptedGate`, `MemoryTree`, and `ScriptedRunner` that satisfy
//! the trait contracts without touching a terminal, the filesystem, or a
//! shell. Each fake records what it was asked so tests can assert on the
//! exact interaction sequence.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::IoResult;
use crate::traits::{CommandOutput, CommandRunner, ConfirmGate, TreeStore};

// ---------------------------------------------------------------------------
// ScriptedGate
// ---------------------------------------------------------------------------

/// Gate that answers from a pre-seeded script.
///
/// Answers are consumed front-to-back; once the script is exhausted every
/// further question gets its default, which mirrors an operator who stops
/// reading and just presses enter.
#[derive(Debug, Default)]
pub struct ScriptedGate {
    answers: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGate {
    /// Gate with no scripted answers (everything resolves to its default).
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate that answers the given sequence, then falls back to defaults.
    pub fn with_answers(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt text asked so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of questions asked so far.
    pub fn asked(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ConfirmGate for ScriptedGate {
    async fn ask(&self, prompt: &str, default: bool) -> IoResult<bool> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let answer = self.answers.lock().unwrap().pop_front();
        Ok(answer.unwrap_or(default))
    }
}

// ---------------------------------------------------------------------------
// MemoryTree
// ---------------------------------------------------------------------------

/// In-memory tree store backed by a `BTreeMap<path, content>`.
#[derive(Debug, Default)]
pub struct MemoryTree {
    files: Mutex<BTreeMap<String, String>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree pre-populated with `(path, content)` pairs.
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<String>,
        C: Into<String>,
    {
        Self {
            files: Mutex::new(
                files
                    .into_iter()
                    .map(|(p, c)| (p.into(), c.into()))
                    .collect(),
            ),
        }
    }

    /// Snapshot of every path currently in the tree.
    pub fn paths(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    /// Direct content lookup for assertions.
    pub fn content(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

#[async_trait]
impl TreeStore for MemoryTree {
    async fn read(&self, path: &str) -> IoResult<Option<String>> {
        Ok(self.files.lock().unwrap().get(path).cloned())
    }

    async fn write(&self, path: &str, content: &str) -> IoResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn exists(&self, path: &str) -> IoResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }
}

// ---------------------------------------------------------------------------
// ScriptedRunner
// ---------------------------------------------------------------------------

/// Runner that replays scripted outputs and records every directive it ran.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    outputs: Mutex<VecDeque<CommandOutput>>,
    executed: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    /// Runner where every directive succeeds with empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that replays the given outputs, then succeeds with empty
    /// output once the script is exhausted.
    pub fn with_outputs(outputs: impl IntoIterator<Item = CommandOutput>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into_iter().collect()),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// A scripted output that fails with the given exit code.
    pub fn failure(exit_code: i32) -> CommandOutput {
        CommandOutput {
            stdout: String::new(),
            stderr: format!("scripted failure (exit {exit_code})"),
            exit_code,
        }
    }

    /// Every directive executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, command: &str) -> IoResult<CommandOutput> {
        self.executed.lock().unwrap().push(command.to_string());
        let output = self.outputs.lock().unwrap().pop_front();
        Ok(output.unwrap_or(CommandOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_gate_replays_then_defaults() {
        let gate = ScriptedGate::with_answers([true, false]);
        assert!(gate.ask("first?", false).await.unwrap());
        assert!(!gate.ask("second?", true).await.unwrap());
        // Script exhausted; default wins.
        assert!(gate.ask("third?", true).await.unwrap());
        assert_eq!(gate.asked(), 3);
        assert_eq!(gate.prompts()[0], "first?");
    }

    #[tokio::test]
    async fn test_memory_tree_roundtrip() {
        let tree = MemoryTree::new();
        assert!(tree.read("a/b.txt").await.unwrap().is_none());
        tree.write("a/b.txt", "content").await.unwrap();
        assert_eq!(tree.read("a/b.txt").await.unwrap().unwrap(), "content");
        assert!(tree.exists("a/b.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_scripted_runner_records_order() {
        let runner = ScriptedRunner::with_outputs([ScriptedRunner::failure(2)]);
        let first = runner.run("npm install").await.unwrap();
        assert_eq!(first.exit_code, 2);
        let second = runner.run("echo done").await.unwrap();
        assert!(second.success());
        assert_eq!(runner.executed(), vec!["npm install", "echo done"]);
    }
}
