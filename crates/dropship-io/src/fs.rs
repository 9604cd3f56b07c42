//! Filesystem-backed tree store rooted at a base directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::error::{IoError, IoResult};
use crate::traits::TreeStore;

/// Extensions that get a `// <path>` header comment prepended on write, so a
/// distributed file records where it was materialised.
const HEADER_EXTENSIONS: &[&str] = &["js", "mjs", "prisma"];

/// Tree store backed by the real filesystem.
///
/// All artifact paths are resolved relative to `root`; absolute paths and
/// `..` traversal are rejected before any I/O happens.
pub struct FsTree {
    root: PathBuf,
}

impl FsTree {
    /// Create a tree store rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, path: &str) -> IoResult<PathBuf> {
        let rel = Path::new(path);
        if rel.is_absolute() {
            return Err(IoError::PathEscape(path.to_string()));
        }
        for component in rel.components() {
            if matches!(component, Component::ParentDir) {
                return Err(IoError::PathEscape(path.to_string()));
            }
        }
        Ok(self.root.join(rel))
    }
}

/// Prepend the `// <path>` header for source files that conventionally carry
/// one, unless the content already starts with it.
fn decorate(path: &str, content: &str) -> String {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    if !HEADER_EXTENSIONS.contains(&ext) {
        return content.to_string();
    }
    let header = format!("// {path}");
    if content.starts_with(&header) {
        return content.to_string();
    }
    format!("{header}\n\n{content}")
}

#[async_trait]
impl TreeStore for FsTree {
    async fn read(&self, path: &str) -> IoResult<Option<String>> {
        let full = self.resolve(path)?;
        match fs::read_to_string(&full) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(IoError::Io(e)),
        }
    }

    async fn write(&self, path: &str, content: &str) -> IoResult<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, decorate(path, content))?;
        tracing::debug!(path = %path, "wrote file");
        Ok(())
    }

    async fn exists(&self, path: &str) -> IoResult<bool> {
        Ok(self.resolve(path)?.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tree() -> (tempfile::TempDir, FsTree) {
        let dir = tempfile::tempdir().unwrap();
        let tree = FsTree::new(dir.path());
        (dir, tree)
    }

    #[tokio::test]
    async fn test_read_missing_is_none() {
        let (_dir, tree) = make_tree();
        assert!(tree.read("src/app.js").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let (dir, tree) = make_tree();
        tree.write("src/components/Button.css", "a { color: red }")
            .await
            .unwrap();
        assert!(dir.path().join("src/components/Button.css").exists());
    }

    #[tokio::test]
    async fn test_write_read_roundtrip() {
        let (_dir, tree) = make_tree();
        tree.write("notes/readme.md", "hello").await.unwrap();
        let got = tree.read("notes/readme.md").await.unwrap();
        assert_eq!(got.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_js_write_gets_header_comment() {
        let (_dir, tree) = make_tree();
        tree.write("src/app.js", "const x = 1;").await.unwrap();
        let got = tree.read("src/app.js").await.unwrap().unwrap();
        assert!(got.starts_with("// src/app.js\n\n"));
        assert!(got.ends_with("const x = 1;"));
    }

    #[tokio::test]
    async fn test_header_not_duplicated() {
        let (_dir, tree) = make_tree();
        tree.write("src/app.js", "// src/app.js\n\nconst x = 1;")
            .await
            .unwrap();
        let got = tree.read("src/app.js").await.unwrap().unwrap();
        assert_eq!(got.matches("// src/app.js").count(), 1);
    }

    #[tokio::test]
    async fn test_parent_traversal_rejected() {
        let (_dir, tree) = make_tree();
        let err = tree.write("../escape.txt", "nope").await.unwrap_err();
        assert!(matches!(err, IoError::PathEscape(_)));
    }

    #[tokio::test]
    async fn test_absolute_path_rejected() {
        let (_dir, tree) = make_tree();
        let err = tree.read("/etc/passwd").await.unwrap_err();
        assert!(matches!(err, IoError::PathEscape(_)));
    }
}
