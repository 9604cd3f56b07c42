//! Block extraction: document text → typed artifacts.
//!
//! The lexer turns the document into a flat sequence of text and fenced
//! code blocks; the extractor then reads each code block's language tag and
//! produces file artifacts and command directives. Blocks the extractor
//! does not recognise are dropped silently; an empty document is not an
//! error.

use tracing::debug;

use crate::artifact::{FileArtifact, Manifest};
use crate::config::DistributeConfig;

/// What a lexed block is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Prose between fences. Carried for completeness; the extractor
    /// ignores it.
    Text,
    /// A fenced code block with its (lowercased) language tag.
    Code { language: String },
}

/// One ordered element of the lexed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Block body without the fence lines themselves.
    pub text: String,
}

/// Lex a document into a flat block sequence.
///
/// Fences are GFM-style: a line whose trimmed form starts with three
/// backticks opens a block (the rest of the line is the info string, of
/// which the first word is the language tag), and the next fence line
/// closes it. An unterminated fence runs to end of input.
pub fn lex_blocks(doc: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut text_run: Vec<&str> = Vec::new();
    let mut code_run: Vec<&str> = Vec::new();
    let mut in_fence: Option<String> = None;

    for line in doc.lines() {
        let trimmed = line.trim_start();
        match &in_fence {
            None => {
                if let Some(info) = trimmed.strip_prefix("```") {
                    if !text_run.is_empty() {
                        blocks.push(Block {
                            kind: BlockKind::Text,
                            text: text_run.join("\n"),
                        });
                        text_run.clear();
                    }
                    let language = info
                        .trim()
                        .split_whitespace()
                        .next()
                        .unwrap_or("")
                        .to_lowercase();
                    in_fence = Some(language);
                } else {
                    text_run.push(line);
                }
            }
            Some(language) => {
                if trimmed.starts_with("```") {
                    blocks.push(Block {
                        kind: BlockKind::Code {
                            language: language.clone(),
                        },
                        text: code_run.join("\n"),
                    });
                    code_run.clear();
                    in_fence = None;
                } else {
                    code_run.push(line);
                }
            }
        }
    }

    // Unterminated fence runs to EOF.
    if let Some(language) = in_fence {
        blocks.push(Block {
            kind: BlockKind::Code { language },
            text: code_run.join("\n"),
        });
    } else if !text_run.is_empty() {
        blocks.push(Block {
            kind: BlockKind::Text,
            text: text_run.join("\n"),
        });
    }

    blocks
}

/// Read the path hint from a content block.
///
/// The hint is the block's own first line with a leading `// ` comment
/// leader stripped; it must be a single token containing `/` or `.`.
fn path_hint(text: &str) -> Option<String> {
    let first = text.lines().next()?.trim();
    let candidate = first.strip_prefix("// ").unwrap_or(first).trim();
    if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
        return None;
    }
    if candidate.contains('/') || candidate.contains('.') {
        Some(candidate.to_string())
    } else {
        None
    }
}

/// Extract file artifacts and command directives from a document.
///
/// Both output lists follow document order. Zero matches yields an empty
/// manifest, never an error.
pub fn extract(doc: &str, config: &DistributeConfig) -> Manifest {
    let mut manifest = Manifest::default();

    for Block { kind, text } in lex_blocks(doc) {
        let BlockKind::Code { language } = kind else {
            continue;
        };

        if config.is_content_language(&language) {
            match path_hint(&text) {
                Some(path) => manifest.files.push(FileArtifact { path, code: text }),
                None => debug!(language = %language, "content block without a valid path hint, dropped"),
            }
        } else if config.is_command_language(&language) {
            manifest.commands.push(text);
        } else if !language.is_empty() {
            debug!(language = %language, "unrecognized block language, dropped");
        }
    }

    manifest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DistributeConfig {
        DistributeConfig::default()
    }

    #[test]
    fn test_empty_document_yields_empty_manifest() {
        let manifest = extract("", &config());
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_prose_only_document_yields_empty_manifest() {
        let doc = "# Release notes\n\nJust text, no fences.\n";
        let manifest = extract(doc, &config());
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_file_and_command_in_document_order() {
        let doc = "\
intro

```js
// src/a.js
export const a = 1;
```

```shell
echo hi
```
";
        let manifest = extract(doc, &config());
        assert_eq!(manifest.files.len(), 1);
        assert_eq!(manifest.files[0].path, "src/a.js");
        assert_eq!(manifest.commands, vec!["echo hi"]);
    }

    #[test]
    fn test_hint_line_stays_in_content() {
        let doc = "```js\n// src/a.js\nexport const a = 1;\n```\n";
        let manifest = extract(doc, &config());
        assert!(manifest.files[0].code.starts_with("// src/a.js\n"));
    }

    #[test]
    fn test_hint_with_whitespace_is_rejected() {
        let doc = "```js\n// not a path\nconst x = 1;\n```\n";
        let manifest = extract(doc, &config());
        assert!(manifest.files.is_empty());
    }

    #[test]
    fn test_hint_without_slash_or_dot_is_rejected() {
        let doc = "```sql\n-- plain\nSELECT 1;\n```\n```css\nbody\n```\n";
        let manifest = extract(doc, &config());
        assert!(manifest.files.is_empty());
    }

    #[test]
    fn test_bare_path_hint_without_comment_leader() {
        let doc = "```prisma\nprisma/schema.prisma\nmodel User { id Int }\n```\n";
        let manifest = extract(doc, &config());
        assert_eq!(manifest.files[0].path, "prisma/schema.prisma");
    }

    #[test]
    fn test_language_tag_is_case_insensitive() {
        let doc = "```JSON\n// config/app.json\n{}\n```\n";
        let manifest = extract(doc, &config());
        assert_eq!(manifest.files.len(), 1);
    }

    #[test]
    fn test_multiline_shell_block_is_one_command() {
        let doc = "```bash\nnpm install\nnpx prisma generate\n```\n";
        let manifest = extract(doc, &config());
        assert_eq!(manifest.commands.len(), 1);
        assert_eq!(manifest.commands[0], "npm install\nnpx prisma generate");
    }

    #[test]
    fn test_unrecognized_language_dropped_silently() {
        let doc = "```rust\nfn main() {}\n```\n";
        let manifest = extract(doc, &config());
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_unterminated_fence_runs_to_eof() {
        let doc = "```shell\necho a\necho b";
        let manifest = extract(doc, &config());
        assert_eq!(manifest.commands, vec!["echo a\necho b"]);
    }

    #[test]
    fn test_lexer_separates_text_and_code() {
        let blocks = lex_blocks("before\n```js\ncode\n```\nafter\n");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].kind, BlockKind::Text);
        assert!(matches!(blocks[1].kind, BlockKind::Code { .. }));
        assert_eq!(blocks[2].text, "after");
    }

    #[test]
    fn test_info_string_extra_words_ignored() {
        let blocks = lex_blocks("```js title=app\ncode\n```\n");
        assert_eq!(
            blocks[0].kind,
            BlockKind::Code {
                language: "js".to_string()
            }
        );
    }
}
