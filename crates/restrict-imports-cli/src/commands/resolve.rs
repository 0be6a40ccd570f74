//! Resolve command: explains which policy governs a file.

use anyhow::Result;
use restrict_imports_core::{normalize_path, ImportRuleEngine, Policy, Resolution};
use std::fmt::Write;
use std::path::Path;

use crate::config_resolver::{self, ConfigSource};

/// Runs the resolve command.
pub fn run(project: &Path, file: &Path, source: &ConfigSource) -> Result<()> {
    let (report, ambiguous) = explain_file(project, file, source)?;
    print!("{report}");

    if ambiguous {
        std::process::exit(1);
    }
    Ok(())
}

/// Describes the policy governing `file`. The flag is set when no single
/// policy does.
///
/// Relative file arguments are taken from the current directory.
fn explain_file(project: &Path, file: &Path, source: &ConfigSource) -> Result<(String, bool)> {
    let config = source.load()?;
    let root = config_resolver::project_root(source, &config, project);
    let file = if file.is_absolute() {
        config_resolver::canonical(file)
    } else {
        config_resolver::canonical(&std::env::current_dir()?.join(file))
    };

    let engine = ImportRuleEngine::from_config(&config);
    let path = normalize_path(&file, &root);
    let resolution = engine.resolve(&path);
    let ambiguous = matches!(resolution, Resolution::Ambiguous(_));
    Ok((describe(path.as_str(), &resolution), ambiguous))
}

fn describe(path: &str, resolution: &Resolution<'_>) -> String {
    let mut out = String::new();
    match resolution {
        Resolution::Exempt => {
            let _ = writeln!(out, "{path}: exempt from import policies");
        }
        Resolution::Governed(policy) => {
            let _ = writeln!(out, "{path}: governed by import_to = {}", policy.import_to());
            describe_lists(&mut out, policy);
        }
        Resolution::Ambiguous(ambiguous) => {
            let _ = writeln!(
                out,
                "{path}: expected exactly 1 policy, got {}",
                ambiguous.matching.len()
            );
            for policy in &ambiguous.matching {
                let _ = writeln!(out, "  - import_to = {}", policy.import_to());
            }
        }
    }
    out
}

fn describe_lists(out: &mut String, policy: &Policy) {
    let join = |patterns: &[restrict_imports_core::Pattern]| {
        patterns
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    match policy.can_import_from() {
        Some(allow) => {
            let _ = writeln!(out, "  can_import_from: [{}]", join(allow));
        }
        None => {
            let _ = writeln!(out, "  can_import_from: (any)");
        }
    }
    if !policy.cannot_import_from().is_empty() {
        let _ = writeln!(
            out,
            "  cannot_import_from: [{}]",
            join(policy.cannot_import_from())
        );
    }
}
