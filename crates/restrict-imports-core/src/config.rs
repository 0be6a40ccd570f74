//! TOML configuration for folder import policies.
//!
//! ```toml
//! [analyzer]
//! root = "."
//! exclude = ["**/node_modules/**"]
//! exempt = ["scripts/*"]
//! severity = "error"
//!
//! [[rules]]
//! import_to = "src/core/*"
//! can_import_from = ["src/core/*", "lodash", { regex = "^@core/" }]
//! cannot_import_from = ["src/core/internal/*"]
//! ```
//!
//! `importTo`, `canImportFrom` and `cannotImportFrom` are accepted as
//! aliases. Unknown keys are rejected.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::pattern::{Pattern, PatternError};
use crate::policy::{ModelError, Policy, PolicySet};
use crate::resolver::ExemptList;
use crate::types::Severity;

/// Validated configuration: where to look and which policies apply.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root directory. Relative roots are resolved against the
    /// directory being checked.
    pub root: PathBuf,
    /// Glob patterns excluded from discovery.
    pub exclude: Vec<String>,
    /// Paths exempt from policy resolution (built-in defaults included).
    pub exempt: ExemptList,
    /// Severity of reported violations.
    pub severity: Severity,
    /// The policies, in configuration order.
    pub policies: PolicySet,
}

// ── DTO layer ──

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    analyzer: AnalyzerSection,
    #[serde(default)]
    rules: Vec<RuleDto>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnalyzerSection {
    #[serde(default = "default_root")]
    root: PathBuf,
    #[serde(default = "default_exclude")]
    exclude: Vec<String>,
    #[serde(default)]
    exempt: Vec<PatternDto>,
    #[serde(default = "default_severity")]
    severity: Severity,
}

impl Default for AnalyzerSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_exclude(),
            exempt: Vec::new(),
            severity: default_severity(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleDto {
    #[serde(alias = "importTo")]
    import_to: PatternDto,
    #[serde(default, alias = "canImportFrom")]
    can_import_from: Option<Vec<PatternDto>>,
    #[serde(default, alias = "cannotImportFrom")]
    cannot_import_from: Vec<PatternDto>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PatternDto {
    Plain(String),
    Regex(RegexDto),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegexDto {
    regex: String,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_severity() -> Severity {
    Severity::Error
}

fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

impl PatternDto {
    fn compile(&self, context: impl FnOnce() -> String) -> Result<Pattern, ConfigError> {
        let compiled = match self {
            Self::Plain(raw) => Pattern::parse(raw),
            Self::Regex(r) => Pattern::regex(&r.regex),
        };
        compiled.map_err(|source| ConfigError::Pattern {
            context: context(),
            source,
        })
    }
}

fn compile_list(dtos: &[PatternDto], ctx: &str) -> Result<Vec<Pattern>, ConfigError> {
    dtos.iter()
        .enumerate()
        .map(|(i, dto)| dto.compile(|| format!("{ctx}[{i}]")))
        .collect()
}

fn convert_rule(dto: &RuleDto, index: usize) -> Result<Policy, ConfigError> {
    let ctx = format!("rules[{index}]");
    let import_to = dto.import_to.compile(|| format!("{ctx}.import_to"))?;
    let can_import_from = dto
        .can_import_from
        .as_deref()
        .map(|list| compile_list(list, &format!("{ctx}.can_import_from")))
        .transpose()?;
    let cannot_import_from =
        compile_list(&dto.cannot_import_from, &format!("{ctx}.cannot_import_from"))?;

    Policy::new(import_to, can_import_from, cannot_import_from).map_err(|source| {
        ConfigError::Model {
            context: ctx,
            source,
        }
    })
}

impl Config {
    /// Loads from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses and validates a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is invalid or a policy is malformed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        let policies = raw
            .rules
            .iter()
            .enumerate()
            .map(|(i, r)| convert_rule(r, i))
            .collect::<Result<Vec<_>, _>>()?;
        let policies = PolicySet::new(policies).map_err(|source| ConfigError::Model {
            context: "rules".to_string(),
            source,
        })?;

        let exempt = compile_list(&raw.analyzer.exempt, "analyzer.exempt")?;

        tracing::debug!(policies = policies.len(), "loaded import policies");

        Ok(Self {
            root: raw.analyzer.root,
            exclude: raw.analyzer.exclude,
            exempt: ExemptList::with_defaults(exempt),
            severity: raw.analyzer.severity,
            policies,
        })
    }
}

/// Errors when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },

    /// Failed to parse TOML (including unknown keys and pattern kinds).
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },

    /// A pattern could not be built.
    #[error("{context}: {source}")]
    Pattern {
        /// Where the pattern was found (e.g., `rules[0].can_import_from[1]`).
        context: String,
        /// The underlying error.
        source: PatternError,
    },

    /// A policy or the policy set violates an invariant.
    #[error("{context}: {source}")]
    Model {
        /// Where the problem was found.
        context: String,
        /// The underlying error.
        source: ModelError,
    },
}
