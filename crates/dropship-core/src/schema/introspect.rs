//! Schema introspection: text → structural model.
//!
//! Parses the Prisma-style schema subset the distribution pipeline cares
//! about: `enum` blocks (one value per line) and `model` blocks (field name
//! first on each line). `generator` and `datasource` blocks are recognised
//! and skipped; their contents carry no structural information.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

/// Structural view of one schema text.
///
/// Recomputed per reconciliation call; never cached across calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaModel {
    /// Enum name → value names.
    pub enums: BTreeMap<String, BTreeSet<String>>,

    /// Model name → field names.
    pub models: BTreeMap<String, BTreeSet<String>>,
}

/// Errors from schema introspection
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("schema parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

fn parse_err(line: usize, message: impl Into<String>) -> SchemaError {
    SchemaError::Parse {
        line,
        message: message.into(),
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

enum BlockCtx {
    Enum(String),
    Model(String),
    Ignored,
}

/// Parse a schema text into a [`SchemaModel`].
pub fn introspect(text: &str) -> Result<SchemaModel, SchemaError> {
    let mut model = SchemaModel::default();
    let mut current: Option<BlockCtx> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        match &current {
            None => {
                let mut parts = line.split_whitespace();
                let keyword = parts.next().unwrap_or("");
                if !line.ends_with('{') {
                    return Err(parse_err(
                        line_no,
                        format!("expected a block header ending in '{{', got `{line}`"),
                    ));
                }
                match keyword {
                    "enum" | "model" => {
                        let name = parts
                            .next()
                            .map(|n| n.trim_end_matches('{'))
                            .filter(|n| !n.is_empty())
                            .ok_or_else(|| {
                                parse_err(line_no, format!("{keyword} block header missing a name"))
                            })?;
                        if !is_identifier(name) {
                            return Err(parse_err(
                                line_no,
                                format!("invalid {keyword} name `{name}`"),
                            ));
                        }
                        if keyword == "enum" {
                            model.enums.entry(name.to_string()).or_default();
                            current = Some(BlockCtx::Enum(name.to_string()));
                        } else {
                            model.models.entry(name.to_string()).or_default();
                            current = Some(BlockCtx::Model(name.to_string()));
                        }
                    }
                    "generator" | "datasource" => {
                        current = Some(BlockCtx::Ignored);
                    }
                    _ => {
                        return Err(parse_err(
                            line_no,
                            format!("unexpected top-level token `{keyword}`"),
                        ));
                    }
                }
            }
            Some(ctx) => {
                if line == "}" {
                    current = None;
                    continue;
                }
                match ctx {
                    BlockCtx::Ignored => {}
                    BlockCtx::Enum(name) => {
                        if line.starts_with("@@") {
                            continue;
                        }
                        let value = line.split_whitespace().next().unwrap_or("");
                        if !is_identifier(value) {
                            return Err(parse_err(
                                line_no,
                                format!("invalid enum value `{value}`"),
                            ));
                        }
                        model
                            .enums
                            .get_mut(name)
                            .expect("enum entry created at block open")
                            .insert(value.to_string());
                    }
                    BlockCtx::Model(name) => {
                        if line.starts_with("@@") {
                            continue;
                        }
                        let mut parts = line.split_whitespace();
                        let field = parts.next().unwrap_or("");
                        if !is_identifier(field) {
                            return Err(parse_err(
                                line_no,
                                format!("invalid field name `{field}`"),
                            ));
                        }
                        if parts.next().is_none() {
                            return Err(parse_err(
                                line_no,
                                format!("field `{field}` is missing a type"),
                            ));
                        }
                        model
                            .models
                            .get_mut(name)
                            .expect("model entry created at block open")
                            .insert(field.to_string());
                    }
                }
            }
        }
    }

    if current.is_some() {
        return Err(parse_err(text.lines().count(), "unclosed block"));
    }

    Ok(model)
}
