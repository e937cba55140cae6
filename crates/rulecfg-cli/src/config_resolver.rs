//! Where configuration comes from.
//!
//! Without `--config`, documents are discovered per file by walking up from
//! the file's directory (see [`rulecfg::Cascade`]). A file with no document
//! above it falls back to the global document, and then to an empty one:
//!
//! 1. `--config` flag (one document for every file, no cascading)
//! 2. `rulecfg.toml`, `.rulecfg.toml` or `.rulecfg.json` in the file's
//!    directory or any ancestor, up to a `root = true` document
//! 3. `$RULECFG_CONFIG_DIR/config.toml` or `~/.rulecfg/config.toml`
//! 4. Empty document

use std::path::{Path, PathBuf};

use rulecfg::find_config_in;

/// How documents are found for this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config`.
    Explicit(PathBuf),
    /// Discovered per file, with the global document for files outside
    /// every project.
    Cascade {
        /// Global document, if one exists.
        global: Option<PathBuf>,
    },
}

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Picks the configuration source.
#[must_use]
pub fn resolve(explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(explicit, global_config_dir())
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    let global = global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file());
    if let Some(p) = &global {
        tracing::debug!("Found global config: {}", p.display());
    }
    ConfigSource::Cascade { global }
}

/// Nearest project document in `dir` or above it.
#[must_use]
pub fn nearest_project_config(dir: &Path) -> Option<PathBuf> {
    dir.ancestors().find_map(find_config_in)
}

/// Returns the global config directory path.
///
/// Resolution: `$RULECFG_CONFIG_DIR` > `~/.rulecfg/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("RULECFG_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".rulecfg"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_is_trusted_as_is() {
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_inner(
            Some(Path::new("/nonexistent.toml")),
            Some(global.path().to_path_buf()),
        );
        assert_eq!(result, ConfigSource::Explicit(PathBuf::from("/nonexistent.toml")));
    }

    #[test]
    fn cascade_carries_existing_global_document() {
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_inner(None, Some(global.path().to_path_buf()));
        assert_eq!(
            result,
            ConfigSource::Cascade {
                global: Some(global.path().join("config.toml"))
            }
        );
    }

    #[test]
    fn cascade_without_global_document() {
        let global = TempDir::new().unwrap();
        assert_eq!(
            resolve_inner(None, Some(global.path().to_path_buf())),
            ConfigSource::Cascade { global: None }
        );
        assert_eq!(resolve_inner(None, None), ConfigSource::Cascade { global: None });
    }

    #[test]
    fn nearest_project_config_walks_upward() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("app/src/lib");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join("app/.rulecfg.json"), "{}").unwrap();

        assert_eq!(
            nearest_project_config(&nested),
            Some(tmp.path().join("app/.rulecfg.json"))
        );
        fs::write(tmp.path().join("app/src/rulecfg.toml"), "").unwrap();
        assert_eq!(
            nearest_project_config(&nested),
            Some(tmp.path().join("app/src/rulecfg.toml"))
        );
    }
}
