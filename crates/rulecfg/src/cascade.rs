//! Hierarchical configuration discovery.
//!
//! For a file, configuration documents are collected from its directory
//! upward until one declares `root = true`. They apply outermost first, so
//! the closest document wins on rule conflicts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use rulecfg_core::{normalize_path, ConfigDocument, ConfigResolver, LoadError, Registry, ResolvedConfig};
use tracing::debug;

/// Config file names to search for in each directory, in priority order.
pub const CONFIG_CANDIDATES: &[&str] = &["rulecfg.toml", ".rulecfg.toml", ".rulecfg.json"];

/// Returns the first config file present in `dir`.
#[must_use]
pub fn find_config_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Resolves files against every configuration document above them.
///
/// Built resolvers are cached per directory, so resolving many files in a
/// tree loads each document once.
#[derive(Debug)]
pub struct Cascade {
    registry: Arc<Registry>,
    cache: Mutex<HashMap<PathBuf, Option<Arc<ConfigResolver>>>>,
}

impl Cascade {
    /// Creates a cascade over `registry`.
    #[must_use]
    pub fn new(registry: impl Into<Arc<Registry>>) -> Self {
        Self {
            registry: registry.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a cascade over the built-in registry.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(rulecfg_presets::builtin_registry())
    }

    /// Resolvers that apply to `file`, outermost first.
    ///
    /// Relative paths are taken from the current directory.
    ///
    /// # Errors
    ///
    /// Returns the first error from loading or building any document in
    /// the chain.
    pub fn chain(&self, file: &Path) -> Result<Vec<Arc<ConfigResolver>>, LoadError> {
        let file = absolute(file)?;
        let mut chain = Vec::new();
        let mut dir = file.parent();
        while let Some(current) = dir {
            if let Some(resolver) = self.resolver_for_dir(current)? {
                let is_root = resolver.document().is_root();
                chain.push(resolver);
                if is_root {
                    break;
                }
            }
            dir = current.parent();
        }
        chain.reverse();
        debug!(file = %file.display(), documents = chain.len(), "collected configuration chain");
        Ok(chain)
    }

    /// Resolves `file` against its whole chain. Returns `None` when no
    /// configuration document applies.
    ///
    /// Relative paths are taken from the current directory.
    ///
    /// # Errors
    ///
    /// Returns the first error from loading or building any document in
    /// the chain.
    pub fn resolve_for_file(&self, file: &Path) -> Result<Option<ResolvedConfig>, LoadError> {
        let file = absolute(file)?;
        let mut resolved: Option<ResolvedConfig> = None;
        for resolver in self.chain(&file)? {
            let layer = resolver.resolve_for_file(&file);
            match resolved.as_mut() {
                Some(acc) => acc.layer(layer, resolver.document().option_merge()),
                None => resolved = Some(layer),
            }
        }
        Ok(resolved)
    }

    fn resolver_for_dir(&self, dir: &Path) -> Result<Option<Arc<ConfigResolver>>, LoadError> {
        if let Some(cached) = self.lock().get(dir) {
            return Ok(cached.clone());
        }

        let resolver = match find_config_in(dir) {
            Some(path) => {
                let doc = ConfigDocument::from_file(&path)?;
                let resolver = ConfigResolver::builder()
                    .document(doc)
                    .registry(Arc::clone(&self.registry))
                    .build()?;
                Some(Arc::new(resolver))
            }
            None => None,
        };
        self.lock().insert(dir.to_path_buf(), resolver.clone());
        Ok(resolver)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Option<Arc<ConfigResolver>>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Anchors `file` at the current directory and folds `.`/`..` segments, so
/// the upward walk visits real ancestors.
pub(crate) fn absolute(file: &Path) -> Result<PathBuf, LoadError> {
    if file.is_absolute() {
        return Ok(normalize_path(file));
    }
    let cwd = std::env::current_dir().map_err(|source| LoadError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    Ok(normalize_path(&cwd.join(file)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_in_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_config_in(dir.path()), None);
        std::fs::write(dir.path().join(".rulecfg.json"), "{}").unwrap();
        assert_eq!(find_config_in(dir.path()), Some(dir.path().join(".rulecfg.json")));
        std::fs::write(dir.path().join("rulecfg.toml"), "").unwrap();
        assert_eq!(find_config_in(dir.path()), Some(dir.path().join("rulecfg.toml")));
    }

    #[test]
    fn lone_root_document_resolves_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cascade = Cascade::new(Registry::new());
        // root marker keeps configs above the tempdir out
        std::fs::write(dir.path().join("rulecfg.toml"), "root = true").unwrap();
        let resolved = cascade.resolve_for_file(&dir.path().join("a.ts")).unwrap().unwrap();
        assert!(resolved.rules.is_empty());
    }

    #[test]
    fn relative_and_dotted_paths_walk_real_ancestors() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolute(Path::new("src/a.ts")).unwrap(), cwd.join("src/a.ts"));
        assert_eq!(
            absolute(Path::new("/repo/web/../app/./src/a.ts")).unwrap(),
            PathBuf::from("/repo/app/src/a.ts")
        );

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("app/src")).unwrap();
        std::fs::create_dir_all(dir.path().join("web")).unwrap();
        std::fs::write(dir.path().join("app/rulecfg.toml"), "root = true").unwrap();
        std::fs::write(dir.path().join("web/rulecfg.toml"), "root = true").unwrap();
        let cascade = Cascade::new(Registry::new());
        let chain = cascade
            .chain(&dir.path().join("web/../app/src/a.ts"))
            .unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(
            chain[0].document().source(),
            Some(dir.path().join("app/rulecfg.toml").as_path())
        );
    }
}
