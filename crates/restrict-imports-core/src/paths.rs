//! Path normalization.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// A project-root-relative path with `/` separators and no empty segments.
///
/// Policies match against this form, so `src/core/a.js` means the same thing
/// on every platform and regardless of how the host spelled the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    /// Canonicalizes an already-relative path string.
    ///
    /// Both `/` and `\` are treated as separators. Empty and `.` segments
    /// are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use restrict_imports_core::NormalizedPath;
    ///
    /// assert_eq!(NormalizedPath::new("//src\\core//a.js").as_str(), "src/core/a.js");
    /// ```
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let joined = raw
            .split(['/', '\\'])
            .filter(|seg| !seg.is_empty() && *seg != ".")
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strips `project_root` from `file_path` and canonicalizes the rest.
///
/// The root is stripped component-wise, so `/repo` is not a prefix of
/// `/repo2/a.js`. A path outside the root is normalized as given.
#[must_use]
pub fn normalize_path(file_path: &Path, project_root: &Path) -> NormalizedPath {
    let relative = file_path.strip_prefix(project_root).unwrap_or(file_path);
    NormalizedPath::new(&relative.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_root_and_joins_segments() {
        let n = normalize_path(Path::new("/repo/src/core/a.js"), Path::new("/repo"));
        assert_eq!(n.as_str(), "src/core/a.js");
    }

    #[test]
    fn root_with_trailing_separator() {
        let n = normalize_path(Path::new("/repo/src/a.js"), Path::new("/repo/"));
        assert_eq!(n.as_str(), "src/a.js");
    }

    #[test]
    fn root_is_stripped_on_component_boundary_only() {
        let n = normalize_path(Path::new("/repo2/a.js"), Path::new("/repo"));
        assert_eq!(n.as_str(), "repo2/a.js");
    }

    #[test]
    fn relative_input_and_current_dir_root() {
        let n = normalize_path(Path::new("./src/ui/b.tsx"), Path::new("."));
        assert_eq!(n.as_str(), "src/ui/b.tsx");
    }

    #[test]
    fn drops_empty_and_dot_segments() {
        assert_eq!(NormalizedPath::new("src//./core///a.js").as_str(), "src/core/a.js");
    }

    #[test]
    fn canonicalizes_backslashes() {
        assert_eq!(NormalizedPath::new("src\\core\\a.js").as_str(), "src/core/a.js");
    }

    #[test]
    fn root_level_file() {
        let n = normalize_path(Path::new("/repo/.eslintrc.js"), Path::new("/repo"));
        assert_eq!(n.as_str(), ".eslintrc.js");
    }
}
