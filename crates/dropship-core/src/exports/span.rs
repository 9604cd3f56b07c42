//! Source-span extraction for added exports.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

fn export_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*export\b").expect("export-line regex is valid"))
}

/// Whether `line` is the exporting declaration for `name`.
fn declares(line: &str, name: &str) -> bool {
    if !export_line_re().is_match(line) {
        return false;
    }
    // Whole-word containment; identifier characters on either side mean a
    // different, longer name.
    line.match_indices(name).any(|(at, _)| {
        let before = line[..at].chars().next_back();
        let after = line[at + name.len()..].chars().next();
        let boundary =
            |c: Option<char>| !c.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        boundary(before) && boundary(after)
    })
}

/// Extract the source span of one exported declaration.
///
/// The span starts at the exporting declaration line. The primary heuristic
/// tracks template-literal backticks: the span ends on the first line where
/// the backtick count comes back to even, the shape of a styled-components
/// value. When no backtick close is found, an index scan ends the span just
/// before the next top-level `export` line (or EOF) instead.
pub fn declaration_span(source: &str, name: &str) -> Option<String> {
    let lines: Vec<&str> = source.lines().collect();
    let start = lines.iter().position(|line| declares(line, name))?;

    // Primary: backtick parity from the declaration line onward. Only
    // applies when the declaration itself opens a template literal;
    // otherwise a later declaration's backticks would falsely close the
    // span.
    if lines[start].contains('`') {
        let mut backticks = 0usize;
        for (offset, line) in lines[start..].iter().enumerate() {
            backticks += line.matches('`').count();
            if backticks % 2 == 0 {
                return Some(lines[start..=start + offset].join("\n"));
            }
        }
        debug!(name = %name, "no template close found, falling back to index scan");
    }

    // Fallback: scan to the next top-level export or EOF.
    let end = lines[start + 1..]
        .iter()
        .position(|line| export_line_re().is_match(line))
        .map(|rel| start + 1 + rel)
        .unwrap_or(lines.len());

    let mut span: Vec<&str> = lines[start..end].to_vec();
    while span.last().is_some_and(|l| l.trim().is_empty()) {
        span.pop();
    }
    Some(span.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "\
import styled from \"styled-components\";

export const Button = styled.button`
  color: red;
`;

export const Card = styled.div`
  border: 1px solid;
  padding: 8px;
`;

export function helper() {
  return 42;
}

export const Inline = styled.span`font-weight: bold;`;
";

    #[test]
    fn test_template_span_ends_at_closing_backtick() {
        let span = declaration_span(SOURCE, "Card").unwrap();
        assert!(span.starts_with("export const Card"));
        assert!(span.ends_with("`;"));
        assert!(span.contains("padding: 8px;"));
        assert!(!span.contains("helper"));
    }

    #[test]
    fn test_single_line_template_span() {
        let span = declaration_span(SOURCE, "Inline").unwrap();
        assert_eq!(
            span,
            "export const Inline = styled.span`font-weight: bold;`;"
        );
    }

    #[test]
    fn test_fallback_scans_to_next_export() {
        let span = declaration_span(SOURCE, "helper").unwrap();
        assert!(span.starts_with("export function helper"));
        assert!(span.contains("return 42;"));
        assert!(!span.contains("Inline"));
    }

    #[test]
    fn test_fallback_runs_to_eof_for_last_declaration() {
        let source = "export function last() {\n  return 1;\n}\n";
        let span = declaration_span(source, "last").unwrap();
        assert_eq!(span, "export function last() {\n  return 1;\n}");
    }

    #[test]
    fn test_unknown_name_yields_none() {
        assert!(declaration_span(SOURCE, "Missing").is_none());
    }

    #[test]
    fn test_name_matching_is_whole_word() {
        let source = "export const ButtonGroup = styled.div`margin: 0;`;\n\
                      export const Button = styled.button`color: red;`;\n";
        let span = declaration_span(source, "Button").unwrap();
        assert!(span.starts_with("export const Button ="));
        assert!(!span.contains("ButtonGroup"));
    }
}
