//! Configuration file resolution with global fallback.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `restrict-imports.toml` or `.restrict-imports.toml` in the project
//!    directory or the nearest ancestor that has one
//! 3. `~/.restrict-imports/config.toml` (global fallback)
//! 4. Nothing found → the caller asks the user to run `init`

use anyhow::{bail, Context, Result};
use restrict_imports_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory or one of its ancestors.
    Project(PathBuf),
    /// Loaded from the global config directory (`~/.restrict-imports/`).
    Global(PathBuf),
    /// No config file anywhere.
    NotFound,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::NotFound => None,
        }
    }

    /// Returns `true` if the config was loaded from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }

    /// Loads and validates the resolved configuration.
    ///
    /// # Errors
    ///
    /// There is no built-in policy set, so a missing config is an error, as
    /// is a config that cannot be read or fails validation.
    pub fn load(&self) -> Result<Config> {
        let Some(p) = self.path() else {
            bail!("No restrict-imports.toml found. Run `restrict-imports init` to create one.");
        };
        if self.is_global() {
            tracing::info!("Using global config: {}", p.display());
        }
        Config::from_file(p).with_context(|| format!("Failed to load {}", p.display()))
    }

    /// Directory a relative `[analyzer] root` is resolved against.
    ///
    /// For a project or explicit config this is the directory holding the
    /// file, so the root does not depend on where the command was started.
    /// A global config has no project of its own and uses `fallback`.
    #[must_use]
    pub fn base_dir(&self, fallback: &Path) -> PathBuf {
        match self {
            Self::Explicit(p) | Self::Project(p) => p
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map_or_else(|| fallback.to_path_buf(), Path::to_path_buf),
            Self::Global(_) | Self::NotFound => fallback.to_path_buf(),
        }
    }
}

/// The directory policies are matched relative to, canonicalized.
#[must_use]
pub fn project_root(source: &ConfigSource, config: &Config, fallback: &Path) -> PathBuf {
    let root = if config.root.is_absolute() {
        config.root.clone()
    } else {
        source.base_dir(fallback).join(&config.root)
    };
    canonical(&root)
}

/// Canonicalizes `path`, keeping it as given when that fails.
#[must_use]
pub fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["restrict-imports.toml", ".restrict-imports.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file path.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(project_dir, explicit, global_config_dir())
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_project_config(project_dir) {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.exists() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::NotFound
}

/// Searches `start` and then each ancestor for a project config file.
fn find_project_config(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    start.ancestors().find_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Returns the global config directory path.
///
/// Resolution: `$RESTRICT_IMPORTS_CONFIG_DIR` > `~/.restrict-imports/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("RESTRICT_IMPORTS_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".restrict-imports"))
}
