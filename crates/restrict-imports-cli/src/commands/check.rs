//! Check command implementation.
//!
//! Discovers JavaScript/TypeScript sources under the configured root,
//! extracts their import declarations with Tree-sitter, and evaluates each
//! file against its folder policy.

use anyhow::{Context, Result};
use restrict_imports_core::{Config, ImportRuleEngine, LintResult, NormalizedPath};
use restrict_imports_js::{
    default_extractors, dotted_extension, find_extractor, LanguageExtractor,
};
use std::path::{Path, PathBuf};

use crate::config_resolver::{self, ConfigSource};
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    exclude: &[String],
    source: &ConfigSource,
) -> Result<()> {
    let result = lint(path, exclude, source)?;

    super::output::print(&result, format)?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Loads the config, derives the project root, and checks everything under
/// `path`. Paths are matched relative to the root, wherever `path` points.
fn lint(path: &Path, exclude: &[String], source: &ConfigSource) -> Result<LintResult> {
    let config = source.load()?;
    let root = config_resolver::project_root(source, &config, path);
    let walk_dir = config_resolver::canonical(path);
    tracing::debug!(root = %root.display(), walk = %walk_dir.display(), "resolved project root");

    let mut patterns = config.exclude.clone();
    patterns.extend(exclude.iter().cloned());
    let excludes = compile_excludes(&patterns)?;

    check_tree(&walk_dir, &root, &config, &excludes)
}

fn compile_excludes(patterns: &[String]) -> Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| glob::Pattern::new(p).with_context(|| format!("Invalid exclude pattern `{p}`")))
        .collect()
}

/// Checks every supported file under `walk_dir` against policies rooted at `root`.
///
/// Files that cannot be read or parsed are logged and skipped.
fn check_tree(
    walk_dir: &Path,
    root: &Path,
    config: &Config,
    excludes: &[glob::Pattern],
) -> Result<LintResult> {
    let engine = ImportRuleEngine::from_config(config);
    let extractors = default_extractors();
    let files = discover_files(walk_dir, root, excludes, &extractors)?;

    tracing::info!(
        "Checking {} files against {} policies",
        files.len(),
        engine.policies().len()
    );

    let mut result = LintResult::new();

    for file_path in &files {
        let Some(extractor) = find_extractor(&extractors, file_path) else {
            continue;
        };

        let source = match std::fs::read_to_string(file_path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", file_path.display());
                continue;
            }
        };

        let analysis = match extractor.analyze(file_path, &source) {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", file_path.display());
                continue;
            }
        };

        let outcome = engine.check_file(file_path, root, &analysis.imports);
        if outcome.exempt {
            result.files_exempt += 1;
        } else {
            result.files_checked += 1;
        }
        result.violations.extend(outcome.violations);
    }

    result.sort();
    Ok(result)
}

fn discover_files(
    walk_dir: &Path,
    root: &Path,
    excludes: &[glob::Pattern],
    extractors: &[Box<dyn LanguageExtractor>],
) -> Result<Vec<PathBuf>> {
    let supported_exts: Vec<&str> = extractors
        .iter()
        .flat_map(|e| e.extensions().iter().copied())
        .collect();

    let mut builder = ignore::WalkBuilder::new(walk_dir);
    builder.hidden(false).git_ignore(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if !supported_exts.contains(&dotted_extension(path).as_str()) {
            continue;
        }

        let rel = NormalizedPath::new(&path.strip_prefix(root).unwrap_or(path).to_string_lossy());
        if excludes.iter().any(|p| p.matches(rel.as_str())) {
            tracing::debug!("Excluded {rel}");
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[analyzer]
exclude = ["**/node_modules/**", "**/dist/**"]

[[rules]]
import_to = "src/core/*"
can_import_from = ["src/core/*", "lodash"]

[[rules]]
import_to = "src/ui/*"
can_import_from = ["src/core/*", "src/ui/*", "react"]
cannot_import_from = ["src/core/internal/*"]
"#;

    fn write(root: &Path, rel: &str, content: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, content).unwrap();
    }

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(root, ".eslintrc.js", "module.exports = {};\n");
        write(
            root,
            "src/core/a.js",
            "import _ from \"lodash\";\nimport b from \"src/ui/b.js\";\n",
        );
        write(
            root,
            "src/ui/b.tsx",
            "import React from \"react\";\nimport x from \"src/core/internal/x\";\n",
        );
        write(root, "src/other/c.ts", "import a from \"src/core/a.js\";\n");
        write(root, "src/ui/dist/bundle.js", "import z from \"zzz\";\n");
        write(root, "node_modules/pkg/index.js", "import y from \"yyy\";\n");
        write(root, "README.md", "import nothing from \"here\";\n");
        tmp
    }

    fn run_check(root: &Path) -> LintResult {
        let config = Config::parse(CONFIG).unwrap();
        let excludes = compile_excludes(&config.exclude).unwrap();
        check_tree(root, root, &config, &excludes).unwrap()
    }

    #[test]
    fn reports_violations_across_files() {
        let tmp = project();
        let result = run_check(tmp.path());

        let found: Vec<(String, usize, &str)> = result
            .violations
            .iter()
            .map(|v| {
                (
                    v.location.file.display().to_string(),
                    v.location.line,
                    v.rule.as_str(),
                )
            })
            .collect();
        assert_eq!(
            found,
            vec![
                ("src/core/a.js".to_string(), 2, "import-not-allowed"),
                ("src/other/c.ts".to_string(), 1, "expected-one-rule"),
                ("src/ui/b.tsx".to_string(), 2, "import-denied"),
            ]
        );
    }

    #[test]
    fn counts_checked_and_exempt_files() {
        let tmp = project();
        let result = run_check(tmp.path());
        assert_eq!(result.files_checked, 3);
        assert_eq!(result.files_exempt, 1);
        assert!(result.has_errors());
    }

    #[test]
    fn discovery_skips_excluded_and_unsupported_files() {
        let tmp = project();
        let excludes = compile_excludes(&["**/node_modules/**".into(), "**/dist/**".into()]).unwrap();
        let files = discover_files(tmp.path(), tmp.path(), &excludes, &default_extractors()).unwrap();
        let rel: Vec<String> = files
            .iter()
            .map(|f| {
                NormalizedPath::new(&f.strip_prefix(tmp.path()).unwrap().to_string_lossy())
                    .to_string()
            })
            .collect();
        assert_eq!(
            rel,
            vec![".eslintrc.js", "src/core/a.js", "src/other/c.ts", "src/ui/b.tsx"]
        );
    }

    #[test]
    fn invalid_exclude_pattern_is_an_error() {
        assert!(compile_excludes(&["[".to_string()]).is_err());
    }

    fn found(result: &LintResult) -> Vec<(String, usize, &str)> {
        result
            .violations
            .iter()
            .map(|v| {
                (
                    v.location.file.display().to_string(),
                    v.location.line,
                    v.rule.as_str(),
                )
            })
            .collect()
    }

    fn project_with_config() -> TempDir {
        let tmp = project();
        write(tmp.path(), "restrict-imports.toml", CONFIG);
        tmp
    }

    #[test]
    fn lint_from_project_directory_uses_discovered_config() {
        let tmp = project_with_config();
        let source = config_resolver::resolve(tmp.path(), None);
        let result = lint(tmp.path(), &[], &source).unwrap();
        assert_eq!(found(&result), found(&run_check(tmp.path())));
        assert_eq!(result.files_exempt, 1);
    }

    #[test]
    fn lint_from_subdirectory_keeps_paths_relative_to_config() {
        let tmp = project_with_config();
        let src = tmp.path().join("src");
        let source = config_resolver::resolve(&src, None);
        let result = lint(&src, &[], &source).unwrap();
        assert_eq!(
            found(&result),
            vec![
                ("src/core/a.js".to_string(), 2, "import-not-allowed"),
                ("src/other/c.ts".to_string(), 1, "expected-one-rule"),
                ("src/ui/b.tsx".to_string(), 2, "import-denied"),
            ]
        );
        // .eslintrc.js sits outside the walked directory
        assert_eq!((result.files_checked, result.files_exempt), (3, 0));
    }

    #[test]
    fn lint_nested_directory_only_checks_that_subtree() {
        let tmp = project_with_config();
        let core = tmp.path().join("src").join("core");
        let source = config_resolver::resolve(&core, None);
        let result = lint(&core, &[], &source).unwrap();
        assert_eq!(
            found(&result),
            vec![("src/core/a.js".to_string(), 2, "import-not-allowed")]
        );
    }

    #[test]
    fn cli_excludes_are_added_to_config_excludes() {
        let tmp = project_with_config();
        let source = config_resolver::resolve(tmp.path(), None);
        let result = lint(tmp.path(), &["src/other/**".to_string()], &source).unwrap();
        assert!(found(&result)
            .iter()
            .all(|(file, _, _)| file != "src/other/c.ts"));
    }

    #[test]
    fn unreadable_source_is_skipped() {
        let tmp = project();
        fs::write(tmp.path().join("src/core/bad.js"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let result = run_check(tmp.path());
        assert_eq!(found(&result).len(), 3);
        assert_eq!(result.files_checked, 3);
    }
}
