//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# restrict-imports configuration
# Every JavaScript/TypeScript file must be governed by exactly one rule.
# A file's rule is the one whose import_to matches its path relative to root.

[analyzer]
root = "."
exclude = ["**/node_modules/**", "**/dist/**"]
# Extra files that need no rule (eslint configs are always exempt)
# exempt = ["vite.config.ts"]
# severity = "error"

# Patterns:
#   "lodash"                  exact match
#   "src/core/*"              prefix match (trailing * only)
#   { regex = "^@app/core" }  regular expression

[[rules]]
import_to = "src/core/*"
can_import_from = ["src/core/*", "lodash"]

[[rules]]
import_to = "src/ui/*"
can_import_from = ["src/core/*", "src/ui/*", "react", { regex = "^react-dom(/|$)" }]
cannot_import_from = ["src/core/internal/*"]

# Omit can_import_from to allow everything not denied.
# [[rules]]
# import_to = "scripts/*"
# cannot_import_from = ["src/*"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_template(Path::new("restrict-imports.toml"), force)?;

    println!("Created restrict-imports.toml");
    println!();
    println!("Next steps:");
    println!("  1. Edit [[rules]] so every source folder has exactly one rule");
    println!("  2. Run: restrict-imports check");

    Ok(())
}

fn write_template(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }
    std::fs::write(config_path, CONFIG_TEMPLATE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use restrict_imports_core::Config;
    use tempfile::TempDir;

    #[test]
    fn template_is_a_valid_config() {
        let config = Config::parse(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.policies.len(), 2);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("restrict-imports.toml");
        std::fs::write(&path, "keep").unwrap();

        let err = write_template(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep");

        write_template(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), CONFIG_TEMPLATE);
    }
}
