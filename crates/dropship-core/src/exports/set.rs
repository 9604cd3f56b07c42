//! Export-set extraction from module source.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

fn decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?m)^\s*export\s+(?:async\s+)?(const|let|var|function|class)\s+([A-Za-z_$][A-Za-z0-9_$]*)(.*)$",
        )
        .expect("declaration regex is valid")
    })
}

fn brace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*export\s*\{([^}]*)\}").expect("re-export regex is valid")
    })
}

fn extra_declarator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_$][A-Za-z0-9_$]*)\s*(=|;|$)")
            .expect("declarator regex is valid")
    })
}

/// Extract the set of named exported identifiers from a module source.
///
/// Counts declaration-level exports (`export const|let|var|function|class`,
/// every declarator of a multi-declarator statement) and re-export
/// specifiers (`export { A, B as C }` yields `A` and `C`). `export default`
/// is anonymous and never counts.
pub fn export_set(source: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    for caps in decl_re().captures_iter(source) {
        let keyword = &caps[1];
        names.insert(caps[2].to_string());

        // `export const A = 1, B = 2;` declares both A and B. Segments that
        // are not `identifier =` come from commas inside the initializer and
        // are rejected by the declarator pattern.
        if matches!(keyword, "const" | "let" | "var") {
            for segment in caps[3].split(',').skip(1) {
                if let Some(extra) = extra_declarator_re().captures(segment) {
                    names.insert(extra[1].to_string());
                }
            }
        }
    }

    for caps in brace_re().captures_iter(source) {
        for item in caps[1].split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            // `A as B` exports the alias; plain `A` exports itself.
            let exported = match item.rsplit_once(" as ") {
                Some((_, alias)) => alias.trim(),
                None => item,
            };
            if !exported.is_empty() && exported != "default" {
                names.insert(exported.to_string());
            }
        }
    }

    names
}
