//! Distribution configuration and fixed conventions.

/// Conventional location of the drop document.
pub const DEFAULT_DOCUMENT: &str = "distribute.md";

/// Configuration for one distribution run.
///
/// The language sets are closed by convention; they are carried here rather
/// than hard-coded at the call sites so the classifier and extractor stay
/// pure functions of `(artifact, config)`.
#[derive(Debug, Clone)]
pub struct DistributeConfig {
    /// Fence language tags whose blocks carry file content.
    pub content_languages: Vec<String>,

    /// Fence language tags whose blocks are executable directives.
    pub command_languages: Vec<String>,

    /// Paths that are never distributed, regardless of content.
    pub denylist: Vec<String>,

    /// File name that routes an artifact to the schema reconciler.
    pub schema_file_name: String,

    /// Module whose import routes a script artifact to the export-set
    /// reconciler.
    pub styling_module: String,

    /// Commands with this prefix are pruned when a schema update is
    /// declined.
    pub schema_command_prefix: String,
}

impl Default for DistributeConfig {
    fn default() -> Self {
        Self {
            content_languages: ["javascript", "js", "prisma", "json", "sql", "css"]
                .map(String::from)
                .to_vec(),
            command_languages: ["shell", "bash"].map(String::from).to_vec(),
            denylist: [".env", "package-lock.json", "yarn.lock"]
                .map(String::from)
                .to_vec(),
            schema_file_name: "schema.prisma".to_string(),
            styling_module: "styled-components".to_string(),
            schema_command_prefix: "npx prisma".to_string(),
        }
    }
}

impl DistributeConfig {
    /// Whether a (lowercased) language tag is in the content set.
    pub fn is_content_language(&self, lang: &str) -> bool {
        self.content_languages.iter().any(|l| l == lang)
    }

    /// Whether a (lowercased) language tag is in the command set.
    pub fn is_command_language(&self, lang: &str) -> bool {
        self.command_languages.iter().any(|l| l == lang)
    }

    /// Whether a path is excluded from distribution. Matches the full
    /// relative path or its final component.
    pub fn is_denied(&self, path: &str) -> bool {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        self.denylist
            .iter()
            .any(|entry| entry == path || entry == file_name)
    }

    /// Whether a directive is a schema-apply command.
    pub fn is_schema_command(&self, command: &str) -> bool {
        command.trim_start().starts_with(&self.schema_command_prefix)
    }
}
