//! Import rule engine.
//!
//! Evaluates one file's import sites against the policy set, producing
//! [`Violation`]s. Each file is independent; the engine holds only
//! immutable configuration and is safe to share across threads.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::paths::{normalize_path, NormalizedPath};
use crate::policy::{Policy, PolicySet};
use crate::resolver::{self, AmbiguousPolicy, ExemptList};
use crate::types::{Location, Severity, Suggestion, Violation};

/// Name of the rule all diagnostics belong to.
pub const RULE_NAME: &str = "restrict-import-folders";

/// Diagnostic code and name for a file governed by zero or several policies.
pub const EXPECTED_ONE_RULE: (&str, &str) = ("RIF001", "expected-one-rule");
/// Diagnostic code and name for an import missing from the allow-list.
pub const IMPORT_NOT_ALLOWED: (&str, &str) = ("RIF002", "import-not-allowed");
/// Diagnostic code and name for an import matching the deny-list.
pub const IMPORT_DENIED: (&str, &str) = ("RIF003", "import-denied");

const CONFIG_FILE_NAME: &str = "restrict-imports.toml";
const CLEAN_ARCHITECTURE_URL: &str =
    "https://blog.cleancoder.com/uncle-bob/2012/08/13/the-clean-architecture.html";

/// A single import statement found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    /// Module specifier exactly as written (quotes stripped).
    pub specifier: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed byte offset within line).
    pub column: usize,
    /// Length of the import statement in bytes.
    pub length: usize,
}

impl ImportSite {
    /// Creates an import site with unknown length.
    #[must_use]
    pub fn new(specifier: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            specifier: specifier.into(),
            line,
            column,
            length: 0,
        }
    }
}

/// How a file relates to the policy set.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// The file is exempt from policy resolution.
    Exempt,
    /// Exactly one policy governs the file.
    Governed(&'a Policy),
    /// Zero or several policies matched.
    Ambiguous(AmbiguousPolicy<'a>),
}

/// Outcome of checking one file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// The normalized path the policies were matched against.
    pub path: NormalizedPath,
    /// Whether the file was skipped as exempt.
    pub exempt: bool,
    /// Violations found, in import order.
    pub violations: Vec<Violation>,
}

/// Evaluates folder import policies against extracted imports.
#[derive(Debug, Clone)]
pub struct ImportRuleEngine {
    policies: PolicySet,
    exempt: ExemptList,
    severity: Severity,
}

impl ImportRuleEngine {
    /// Creates an engine from a policy set and exempt list.
    #[must_use]
    pub fn new(policies: PolicySet, exempt: ExemptList) -> Self {
        Self {
            policies,
            exempt,
            severity: Severity::Error,
        }
    }

    /// Creates an engine from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.policies.clone(), config.exempt.clone()).with_severity(config.severity)
    }

    /// Overrides the severity of reported violations (default: error).
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// The configured policies.
    #[must_use]
    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    /// Determines which policy governs `path`.
    #[must_use]
    pub fn resolve(&self, path: &NormalizedPath) -> Resolution<'_> {
        if self.exempt.contains(path) {
            return Resolution::Exempt;
        }
        match resolver::resolve(path, &self.policies) {
            Ok(policy) => Resolution::Governed(policy),
            Err(ambiguous) => Resolution::Ambiguous(ambiguous),
        }
    }

    /// Checks every import of one file.
    ///
    /// `file_path` is the physical path; `project_root` is stripped from it
    /// before matching.
    #[must_use]
    pub fn check_file(
        &self,
        file_path: &Path,
        project_root: &Path,
        imports: &[ImportSite],
    ) -> FileOutcome {
        let path = normalize_path(file_path, project_root);
        let file = PathBuf::from(path.as_str());

        let policy = match self.resolve(&path) {
            Resolution::Exempt => {
                debug!(file = %path, "exempt from import policies");
                return FileOutcome {
                    path,
                    exempt: true,
                    violations: Vec::new(),
                };
            }
            Resolution::Ambiguous(ambiguous) => {
                debug!(file = %path, matching = ambiguous.matching.len(), "no single policy");
                let violation = self.expected_one_rule(file, &ambiguous);
                return FileOutcome {
                    path,
                    exempt: false,
                    violations: vec![violation],
                };
            }
            Resolution::Governed(policy) => policy,
        };

        debug!(file = %path, policy = %policy.import_to(), imports = imports.len(), "checking imports");

        let violations = imports
            .iter()
            .filter_map(|site| self.check_site(policy, site, &file))
            .collect();

        FileOutcome {
            path,
            exempt: false,
            violations,
        }
    }

    fn check_site(&self, policy: &Policy, site: &ImportSite, file: &Path) -> Option<Violation> {
        let location = Location::new(file.to_path_buf(), site.line, site.column + 1)
            .with_length(site.length);

        if let Some(denied) = resolver::check_denied(policy, &site.specifier) {
            let (code, name) = IMPORT_DENIED;
            return Some(
                Violation::new(
                    code,
                    name,
                    self.severity,
                    location,
                    format!(
                        "{} forbids importing from {}: it matches {}.",
                        policy.import_to(),
                        site.specifier,
                        denied
                    ),
                )
                .with_suggestion(Suggestion::new(format!(
                    "Remove the import, or remove {denied} from cannot_import_from in {CONFIG_FILE_NAME}."
                ))),
            );
        }

        if resolver::check_import(policy, &site.specifier) {
            return None;
        }

        let allowed = policy.can_import_from().unwrap_or_default();
        let allowed_json = serde_json::to_string(allowed).unwrap_or_else(|_| "[]".to_string());
        let (code, name) = IMPORT_NOT_ALLOWED;
        Some(
            Violation::new(
                code,
                name,
                self.severity,
                location,
                format!(
                    "{} disallows importing from all packages and modules other than: {}.",
                    policy.import_to(),
                    allowed_json
                ),
            )
            .with_suggestion(Suggestion::new(format!(
                "If this import should be allowed, you can add it to can_import_from in \
                 {CONFIG_FILE_NAME}. Make sure to review {CLEAN_ARCHITECTURE_URL} first."
            ))),
        )
    }

    fn expected_one_rule(&self, file: PathBuf, ambiguous: &AmbiguousPolicy<'_>) -> Violation {
        let (code, name) = EXPECTED_ONE_RULE;
        Violation::new(
            code,
            name,
            self.severity,
            Location::new(file, 1, 1).with_length(5),
            format!(
                "Expected exactly 1 {RULE_NAME} rule for {}. Got: {}.",
                ambiguous.path,
                ambiguous.matching_json()
            ),
        )
        .with_suggestion(Suggestion::new(format!(
            "Modify {CONFIG_FILE_NAME} to add a policy for this directory."
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;

    fn pat(raw: &str) -> Pattern {
        Pattern::parse(raw).unwrap()
    }

    fn core_policy() -> Policy {
        Policy::allow(pat("src/core/*"), vec![pat("src/core/*"), pat("lodash")]).unwrap()
    }

    fn engine(policies: Vec<Policy>) -> ImportRuleEngine {
        ImportRuleEngine::new(PolicySet::new(policies).unwrap(), ExemptList::default())
    }

    fn check(engine: &ImportRuleEngine, file: &str, imports: &[&str]) -> FileOutcome {
        let sites: Vec<ImportSite> = imports
            .iter()
            .enumerate()
            .map(|(i, s)| ImportSite::new(*s, i + 1, 0))
            .collect();
        engine.check_file(Path::new(&format!("/repo/{file}")), Path::new("/repo"), &sites)
    }

    #[test]
    fn disallowed_import_names_policy_and_allow_list() {
        let e = engine(vec![core_policy()]);
        let out = check(&e, "src/core/a.js", &["src/ui/b.js"]);
        assert_eq!(out.violations.len(), 1);
        let v = &out.violations[0];
        assert_eq!(v.code, "RIF002");
        assert_eq!(v.rule, "import-not-allowed");
        assert_eq!(
            v.message,
            r#"src/core/* disallows importing from all packages and modules other than: ["src/core/*","lodash"]."#
        );
        assert_eq!(v.location.file, PathBuf::from("src/core/a.js"));
        assert_eq!((v.location.line, v.location.column), (1, 1));
        assert!(v.suggestion.is_some());
    }

    #[test]
    fn allowed_import_is_silent() {
        let e = engine(vec![core_policy()]);
        assert!(check(&e, "src/core/a.js", &["lodash"]).violations.is_empty());
    }

    #[test]
    fn every_disallowed_import_is_reported() {
        let e = engine(vec![core_policy()]);
        let out = check(&e, "src/core/a.js", &["react", "lodash", "src/ui/b.js"]);
        let lines: Vec<usize> = out.violations.iter().map(|v| v.location.line).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn no_matching_policy_reports_once_at_file_start() {
        let e = engine(vec![core_policy()]);
        let out = check(&e, "src/other/a.js", &["x", "y"]);
        assert_eq!(out.violations.len(), 1);
        let v = &out.violations[0];
        assert_eq!(v.code, "RIF001");
        assert_eq!(
            v.message,
            "Expected exactly 1 restrict-import-folders rule for src/other/a.js. Got: []."
        );
        assert_eq!((v.location.line, v.location.column, v.location.length), (1, 1, 5));
    }

    #[test]
    fn overlapping_policies_list_both() {
        let e = engine(vec![
            Policy::allow(pat("src/*"), vec![]).unwrap(),
            Policy::allow(pat("src/shared/*"), vec![pat("lodash")]).unwrap(),
        ]);
        let out = check(&e, "src/shared/a.js", &["lodash"]);
        assert_eq!(out.violations.len(), 1);
        assert!(out.violations[0].message.contains(
            r#"[{"importTo":"src/*","canImportFrom":[]},{"importTo":"src/shared/*","canImportFrom":["lodash"]}]"#
        ));
    }

    #[test]
    fn exempt_file_is_silent_without_policy() {
        let e = engine(vec![core_policy()]);
        let out = check(&e, ".eslintrc.js", &["anything"]);
        assert!(out.exempt);
        assert!(out.violations.is_empty());
    }

    #[test]
    fn deny_list_wins_over_allow_list() {
        let policy = Policy::new(
            pat("src/core/*"),
            Some(vec![pat("src/core/*")]),
            vec![pat("src/core/internal/*")],
        )
        .unwrap();
        let e = engine(vec![policy]);
        let out = check(&e, "src/core/a.js", &["src/core/internal/x.js", "src/core/b.js"]);
        assert_eq!(out.violations.len(), 1);
        assert_eq!(out.violations[0].code, "RIF003");
        assert!(out.violations[0]
            .message
            .contains("it matches src/core/internal/*"));
    }

    #[test]
    fn deny_only_policy_allows_everything_else() {
        let policy = Policy::new(pat("src/*"), None, vec![pat("fs")]).unwrap();
        let e = engine(vec![policy]);
        let out = check(&e, "src/a.js", &["react", "fs", "path"]);
        assert_eq!(out.violations.len(), 1);
        assert_eq!(out.violations[0].location.line, 2);
    }

    #[test]
    fn severity_override_applies() {
        let e = engine(vec![core_policy()]).with_severity(Severity::Warning);
        let out = check(&e, "src/core/a.js", &["react"]);
        assert_eq!(out.violations[0].severity, Severity::Warning);
    }

    #[test]
    fn resolve_reports_each_case() {
        let e = engine(vec![core_policy()]);
        assert!(matches!(
            e.resolve(&NormalizedPath::new(".eslintrc.js")),
            Resolution::Exempt
        ));
        assert!(matches!(
            e.resolve(&NormalizedPath::new("src/core/a.js")),
            Resolution::Governed(_)
        ));
        assert!(matches!(
            e.resolve(&NormalizedPath::new("src/x.js")),
            Resolution::Ambiguous(_)
        ));
    }

    #[test]
    fn column_is_reported_one_indexed() {
        let e = engine(vec![core_policy()]);
        let site = ImportSite {
            specifier: "react".into(),
            line: 4,
            column: 2,
            length: 20,
        };
        let out = e.check_file(Path::new("src/core/a.js"), Path::new("."), &[site]);
        let loc = &out.violations[0].location;
        assert_eq!((loc.line, loc.column, loc.length), (4, 3, 20));
    }
}
