//! Shell-backed command runner.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{IoError, IoResult};
use crate::traits::{CommandOutput, CommandRunner};

/// Runs directives through `sh -c`, one at a time.
///
/// Directives are taken verbatim from the drop document; a multi-line block
/// is a single invocation, which is what lets authors chain `cd` and the
/// commands that depend on it.
pub struct ShellRunner {
    workdir: Option<PathBuf>,
}

impl ShellRunner {
    /// Runner that executes in the current working directory.
    pub fn new() -> Self {
        Self { workdir: None }
    }

    /// Runner that executes in a specific directory.
    pub fn in_dir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: Some(workdir.into()),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> IoResult<CommandOutput> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|e| IoError::Spawn(e.to_string()))?;
        let output = child.wait_with_output().await?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}
