//! Subcommand implementations.

pub mod check_name;
pub mod init;
pub mod list_presets;
pub mod output;
pub mod resolve;
pub mod scan;

use anyhow::{Context, Result};
use rulecfg::{normalize_path, Cascade, ConfigDocument, ConfigResolver, ResolvedConfig};
use std::path::{Path, PathBuf};

use crate::config_resolver::{nearest_project_config, ConfigSource};

/// How files are resolved for this invocation.
pub enum Resolution {
    /// One document applies to every file.
    Single(ConfigResolver),
    /// Documents are discovered above each file; `fallback` serves files
    /// with none.
    Cascade {
        /// Per-file discovery.
        cascade: Cascade,
        /// Global or empty document.
        fallback: ConfigResolver,
    },
}

impl Resolution {
    /// Builds the resolution for a config source.
    pub fn from_source(source: &ConfigSource) -> Result<Self> {
        match source {
            ConfigSource::Explicit(p) => {
                let p = absolute(p)?;
                let resolver = rulecfg::load(&p)
                    .with_context(|| format!("Failed to load config: {}", p.display()))?;
                Ok(Self::Single(resolver))
            }
            ConfigSource::Cascade { global } => {
                let cwd = current_dir()?;
                match nearest_project_config(&cwd) {
                    Some(p) => tracing::debug!("Nearest project config: {}", p.display()),
                    None => tracing::debug!("No project config above {}", cwd.display()),
                }
                let fallback = match global {
                    Some(p) => rulecfg::load(p)
                        .with_context(|| format!("Failed to load global config: {}", p.display()))?,
                    None => ConfigResolver::builder()
                        .document(ConfigDocument::new())
                        .registry(rulecfg::presets::builtin_registry())
                        .build()
                        .context("Failed to build default configuration")?,
                };
                Ok(Self::Cascade {
                    cascade: Cascade::builtin(),
                    fallback,
                })
            }
        }
    }

    /// Resolves one file.
    pub fn resolve(&self, file: &Path) -> Result<ResolvedConfig> {
        let absolute = absolute(file)?;
        match self {
            Self::Single(resolver) => resolve_single(resolver, &absolute),
            Self::Cascade { cascade, fallback } => {
                let resolved = cascade
                    .resolve_for_file(&absolute)
                    .with_context(|| format!("Failed to resolve configuration for {}", file.display()))?;
                match resolved {
                    Some(resolved) => Ok(resolved),
                    None => {
                        tracing::debug!("No project config applies to {}, using fallback", file.display());
                        resolve_single(fallback, &absolute)
                    }
                }
            }
        }
    }
}

/// A document whose directory does not contain the file sees the file
/// relative to the working directory.
fn resolve_single(resolver: &ConfigResolver, absolute: &Path) -> Result<ResolvedConfig> {
    let inside = resolver
        .document()
        .base_dir()
        .is_some_and(|dir| absolute.starts_with(dir));
    if inside {
        return Ok(resolver.resolve_for_file(absolute));
    }
    let cwd = current_dir()?;
    let relative = absolute.strip_prefix(&cwd).unwrap_or(absolute);
    Ok(resolver.resolve_for_file(relative))
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to read current directory")
}

/// Anchors relative paths at the current directory. The file itself need
/// not exist.
fn absolute(file: &Path) -> Result<PathBuf> {
    if file.is_absolute() {
        return Ok(normalize_path(file));
    }
    Ok(normalize_path(&current_dir()?.join(file)))
}
