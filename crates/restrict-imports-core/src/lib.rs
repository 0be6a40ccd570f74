//! # restrict-imports-core
//!
//! Policy core for enforcing directional import boundaries between folders.
//!
//! Every source file must be governed by exactly one policy, selected by
//! matching the file's project-relative path against the policy's
//! `import_to` pattern. The policy's allow-list (and optional deny-list)
//! then decides which module specifiers the file may import.
//!
//! - [`Pattern`] for exact, prefix (`foo/*`) and regex matching
//! - [`Policy`] and [`PolicySet`] for validated configuration
//! - [`resolver`] for the "exactly one policy" rule and import checks
//! - [`ImportRuleEngine`] for turning one file's imports into [`Violation`]s
//! - [`Config`] for TOML-based policy definitions
//!
//! ## Example
//!
//! ```
//! use restrict_imports_core::{Config, ImportRuleEngine, ImportSite};
//! use std::path::Path;
//!
//! let config = Config::parse(r#"
//! [[rules]]
//! import_to = "src/core/*"
//! can_import_from = ["src/core/*", "lodash"]
//! "#)?;
//!
//! let engine = ImportRuleEngine::from_config(&config);
//! let outcome = engine.check_file(
//!     Path::new("/repo/src/core/a.js"),
//!     Path::new("/repo"),
//!     &[ImportSite::new("src/ui/b.js", 1, 0)],
//! );
//! assert_eq!(outcome.violations.len(), 1);
//! # Ok::<(), restrict_imports_core::ConfigError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod paths;
mod pattern;
mod policy;
mod types;

pub mod resolver;

pub use config::{Config, ConfigError};
pub use engine::{
    FileOutcome, ImportRuleEngine, ImportSite, Resolution, EXPECTED_ONE_RULE, IMPORT_DENIED,
    IMPORT_NOT_ALLOWED, RULE_NAME,
};
pub use paths::{normalize_path, NormalizedPath};
pub use pattern::{Pattern, PatternError};
pub use policy::{ModelError, Policy, PolicySet};
pub use resolver::{AmbiguousPolicy, ExemptList};
pub use types::{LintResult, Location, Severity, Suggestion, Violation};
