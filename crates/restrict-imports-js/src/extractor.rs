//! Language-agnostic extraction types and trait.
//!
//! `LanguageExtractor` is the extension point for adding new languages.
//! Implement it to teach restrict-imports how to find import statements
//! in another language via Tree-sitter.

use std::path::{Path, PathBuf};

use restrict_imports_core::ImportSite;

/// Result of analyzing a single source file with Tree-sitter.
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    /// Path of the analyzed file, as given by the caller.
    pub file_path: PathBuf,
    /// All import statements found, in source order.
    pub imports: Vec<ImportSite>,
}

/// Errors raised while extracting imports.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Loader message.
        message: String,
    },

    /// Tree-sitter produced no tree.
    #[error("failed to parse {path} as {language}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Language identifier.
        language: &'static str,
    },
}

/// Trait for language-specific Tree-sitter extraction.
///
/// The extractor receives raw source text and returns a [`FileAnalysis`]
/// listing every import declaration with its location.
pub trait LanguageExtractor: Send + Sync {
    /// Language identifier (e.g., `"javascript"`, `"tsx"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".js", ".mjs"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extract import declarations from source code.
    ///
    /// # Errors
    ///
    /// Returns error if the grammar cannot be loaded or parsing aborts.
    fn analyze(&self, path: &Path, source: &str) -> Result<FileAnalysis, ExtractError>;
}

/// Returns the `.ext` form of a path's extension, or an empty string.
#[must_use]
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

/// Picks the extractor responsible for `path` by file extension.
#[must_use]
pub fn find_extractor<'a>(
    extractors: &'a [Box<dyn LanguageExtractor>],
    path: &Path,
) -> Option<&'a dyn LanguageExtractor> {
    let ext = dotted_extension(path);
    extractors
        .iter()
        .find(|e| e.extensions().contains(&ext.as_str()))
        .map(|e| &**e)
}
