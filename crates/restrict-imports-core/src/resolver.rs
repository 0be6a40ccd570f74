//! Policy resolution: maps a file path to the one policy that governs it.

use crate::paths::NormalizedPath;
use crate::pattern::Pattern;
use crate::policy::{Policy, PolicySet};

/// Lint configuration scripts that never need a policy.
pub const DEFAULT_EXEMPT: &[&str] = &[
    ".eslintrc.js",
    ".eslintrc.cjs",
    "eslint.config.js",
    "eslint.config.mjs",
    "eslint.config.cjs",
];

/// Paths excluded from policy resolution entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExemptList {
    patterns: Vec<Pattern>,
}

impl ExemptList {
    /// Creates an exempt list from explicit patterns (no defaults).
    #[must_use]
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    /// The built-in exempt list extended with `extra`.
    #[must_use]
    pub fn with_defaults(extra: Vec<Pattern>) -> Self {
        let mut patterns: Vec<Pattern> = DEFAULT_EXEMPT
            .iter()
            .map(|name| Pattern::Exact((*name).to_string()))
            .collect();
        patterns.extend(extra);
        Self { patterns }
    }

    /// Tests whether `path` is exempt.
    #[must_use]
    pub fn contains(&self, path: &NormalizedPath) -> bool {
        self.patterns.iter().any(|p| p.matches(path.as_str()))
    }
}

impl Default for ExemptList {
    fn default() -> Self {
        Self::with_defaults(Vec::new())
    }
}

/// Zero or several policies matched a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousPolicy<'a> {
    /// The path being resolved.
    pub path: NormalizedPath,
    /// Every policy whose `import_to` matched, in configuration order.
    pub matching: Vec<&'a Policy>,
}

impl AmbiguousPolicy<'_> {
    /// Renders the matching policies as JSON for diagnostics.
    #[must_use]
    pub fn matching_json(&self) -> String {
        serde_json::to_string(&self.matching).unwrap_or_else(|_| "[]".to_string())
    }
}

impl std::fmt::Display for AmbiguousPolicy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "expected exactly 1 policy for {}, got {}",
            self.path,
            self.matching.len()
        )
    }
}

/// Selects the single policy whose `import_to` matches `path`.
///
/// # Errors
///
/// Returns [`AmbiguousPolicy`] when no policy or more than one policy matches.
pub fn resolve<'a>(
    path: &NormalizedPath,
    policies: &'a PolicySet,
) -> Result<&'a Policy, AmbiguousPolicy<'a>> {
    let matching: Vec<&Policy> = policies
        .iter()
        .filter(|p| p.applies_to(path.as_str()))
        .collect();

    if let [only] = matching[..] {
        return Ok(only);
    }
    Err(AmbiguousPolicy {
        path: path.clone(),
        matching,
    })
}

/// Tests whether `specifier` is on the policy's allow-list.
///
/// A policy without an allow-list admits every specifier.
#[must_use]
pub fn check_import(policy: &Policy, specifier: &str) -> bool {
    policy
        .can_import_from()
        .map_or(true, |allow| allow.iter().any(|p| p.matches(specifier)))
}

/// Returns the first deny-list pattern matching `specifier`, if any.
#[must_use]
pub fn check_denied<'a>(policy: &'a Policy, specifier: &str) -> Option<&'a Pattern> {
    policy
        .cannot_import_from()
        .iter()
        .find(|p| p.matches(specifier))
}
