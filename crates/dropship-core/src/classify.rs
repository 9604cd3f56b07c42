//! Artifact classification: which reconciliation strategy applies.

use serde::{Deserialize, Serialize};

use crate::artifact::FileArtifact;
use crate::config::DistributeConfig;

/// Reconciliation strategy for one file artifact.
///
/// A closed set: new strategies are added by extending the variant, not by
/// scattering path checks through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Denylisted path; dropped before any reconciler sees it.
    Denied,
    /// Structural containment diff against the existing schema.
    SchemaStructural,
    /// Export-set diff with cherry-pick merge for additive changes.
    ExportAwareMerge,
    /// Kept unconditionally, no reconciliation.
    PassThrough,
}

fn is_script_path(path: &str) -> bool {
    let ext = path.rsplit('.').next().unwrap_or("");
    matches!(ext, "js" | "mjs" | "jsx")
}

/// Whether the source imports the styling convention module.
fn imports_styling_module(code: &str, module: &str) -> bool {
    code.lines().any(|line| {
        line.contains(module) && (line.contains("import") || line.contains("require("))
    })
}

/// Select the strategy for an artifact. Predicates are checked in priority
/// order; the first match wins.
pub fn classify(artifact: &FileArtifact, config: &DistributeConfig) -> Strategy {
    if config.is_denied(&artifact.path) {
        return Strategy::Denied;
    }
    if artifact.path.ends_with(&config.schema_file_name) {
        return Strategy::SchemaStructural;
    }
    if is_script_path(&artifact.path)
        && imports_styling_module(&artifact.code, &config.styling_module)
    {
        return Strategy::ExportAwareMerge;
    }
    Strategy::PassThrough
}
