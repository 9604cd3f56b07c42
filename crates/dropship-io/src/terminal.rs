//! Terminal confirmation gate.

use async_trait::async_trait;
use dialoguer::Confirm;

use crate::error::{IoError, IoResult};
use crate::traits::ConfirmGate;

/// Interactive gate that asks on the controlling terminal.
///
/// The prompt itself is blocking, so it runs on the blocking pool; the
/// pipeline task suspends until the operator answers. There is deliberately
/// no timeout; operator attention is the limiting resource here.
pub struct TerminalGate;

#[async_trait]
impl ConfirmGate for TerminalGate {
    async fn ask(&self, prompt: &str, default: bool) -> IoResult<bool> {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            Confirm::new()
                .with_prompt(prompt)
                .default(default)
                .interact()
        })
        .await
        .map_err(|e| IoError::Gate(e.to_string()))?
        .map_err(|e| IoError::Gate(e.to_string()))
    }
}
