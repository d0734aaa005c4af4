//! Generator configuration.

use tlbt_schema::ir::type_identity;

/// Base name of the shared primitives artifact.
pub const PRELUDE_STEM: &str = "tl_prelude";

/// Configuration for template generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Generate referenced types as separate artifacts.
    pub recursive: bool,
    /// Regenerate artifacts that already exist in the output.
    pub force: bool,
    /// Artifact file name prefix.
    pub file_prefix: String,
    /// Artifact file extension, without the dot.
    pub extension: String,
    /// Prefix of the synthesized flag-bit booleans.
    pub flag_prefix: String,
    /// One level of indentation.
    pub indent: String,
    /// Emit and include the primitive prelude.
    pub prelude: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            force: false,
            file_prefix: "struct_".to_string(),
            extension: "bt".to_string(),
            flag_prefix: "has_".to_string(),
            indent: "    ".to_string(),
            prelude: true,
        }
    }
}

impl GeneratorConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets recursive generation.
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Sets whether existing artifacts are regenerated.
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Sets the artifact file name prefix.
    #[must_use]
    pub fn file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Sets the artifact file extension.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Sets the flag-bit boolean prefix.
    #[must_use]
    pub fn flag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.flag_prefix = prefix.into();
        self
    }

    /// Sets the indentation unit.
    #[must_use]
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets whether the primitive prelude is emitted.
    #[must_use]
    pub fn prelude(mut self, prelude: bool) -> Self {
        self.prelude = prelude;
        self
    }

    /// Returns the artifact file name for an abstract type.
    #[must_use]
    pub fn artifact_name(&self, type_name: &str) -> String {
        format!(
            "{}{}.{}",
            self.file_prefix,
            type_identity(type_name),
            self.extension
        )
    }

    /// Returns the file name of the prelude artifact.
    #[must_use]
    pub fn prelude_name(&self) -> String {
        format!("{}.{}", PRELUDE_STEM, self.extension)
    }
}

/// Returns the include-guard macro for an artifact file name.
#[must_use]
pub fn header_guard(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
