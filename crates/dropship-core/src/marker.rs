//! Completion marker for processed documents.

/// Sentinel line prepended to a document after a successful run.
pub const COMPLETION_MARKER: &str = "[dropship-complete]";

/// Whether the document has already been processed.
pub fn is_marked(doc: &str) -> bool {
    doc.lines().next() == Some(COMPLETION_MARKER)
}

/// Return the document with the marker prepended. Idempotent: an already
/// marked document is returned unchanged.
pub fn mark(doc: &str) -> String {
    if is_marked(doc) {
        return doc.to_string();
    }
    format!("{COMPLETION_MARKER}\n{doc}")
}
