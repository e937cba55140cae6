//! Validated domain model for configuration documents.
//!
//! No serde deserialization and no I/O happens here. Invariants are
//! enforced at construction time; the loader is the only producer.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::naming::NamingPriority;
use crate::types::{OptionMerge, RuleConfig};

/// Parser used when neither the document nor any override names one.
pub const DEFAULT_PARSER: &str = "espree";

// ────────────────────────────────────────────
// Globs
// ────────────────────────────────────────────

/// A validated file glob.
///
/// Patterns without `/` match the file name alone (`*.svelte` matches
/// `src/App.svelte`). Patterns with `/` match the path relative to the
/// declaring document's directory; `*` stops at `/`, `**` crosses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    raw: String,
    compiled: glob::Pattern,
    match_base: bool,
}

const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl GlobPattern {
    /// Compiles a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty or has invalid glob syntax.
    pub fn new(pattern: &str) -> Result<Self, ModelError> {
        let trimmed = pattern.strip_prefix("./").unwrap_or(pattern);
        if trimmed.is_empty() {
            return Err(ModelError::EmptyGlobPattern);
        }
        let compiled = glob::Pattern::new(trimmed).map_err(|e| ModelError::InvalidGlobPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
            match_base: !trimmed.contains('/'),
        })
    }

    /// Tests whether a path (relative to the declaring document) matches.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        if self.match_base {
            return path
                .file_name()
                .is_some_and(|name| self.compiled.matches_with(&name.to_string_lossy(), MATCH_OPTIONS));
        }
        let normalized = path.to_string_lossy().replace('\\', "/");
        let normalized = normalized.strip_prefix("./").unwrap_or(&normalized);
        self.compiled.matches_with(normalized, MATCH_OPTIONS)
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Include/exclude glob sets for one override.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    files: Vec<GlobPattern>,
    excluded: Vec<GlobPattern>,
}

impl FileMatcher {
    /// Creates a matcher. At least one include pattern is required.
    ///
    /// # Errors
    ///
    /// Returns error if `files` is empty.
    pub fn new(files: Vec<GlobPattern>, excluded: Vec<GlobPattern>) -> Result<Self, ModelError> {
        if files.is_empty() {
            return Err(ModelError::EmptyOverrideFiles);
        }
        Ok(Self { files, excluded })
    }

    /// Convenience constructor from raw pattern strings.
    ///
    /// # Errors
    ///
    /// Returns error if any pattern is invalid or `files` is empty.
    pub fn from_patterns(files: &[&str], excluded: &[&str]) -> Result<Self, ModelError> {
        let files = files
            .iter()
            .map(|p| GlobPattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let excluded = excluded
            .iter()
            .map(|p| GlobPattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(files, excluded)
    }

    /// Tests whether the path is included and not excluded.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        self.files.iter().any(|p| p.matches(path)) && !self.excluded.iter().any(|p| p.matches(path))
    }

    /// Returns the include patterns.
    #[must_use]
    pub fn files(&self) -> &[GlobPattern] {
        &self.files
    }
}

// ────────────────────────────────────────────
// Parser options
// ────────────────────────────────────────────

/// Module system of the analyzed sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Classic scripts.
    Script,
    /// ES modules.
    Module,
    /// CommonJS modules.
    Commonjs,
}

impl SourceType {
    /// Parses a source type literal.
    ///
    /// # Errors
    ///
    /// Returns error for unknown literals.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value {
            "script" => Ok(Self::Script),
            "module" => Ok(Self::Module),
            "commonjs" => Ok(Self::Commonjs),
            _ => Err(ModelError::InvalidSourceType {
                value: value.to_string(),
            }),
        }
    }
}

/// ECMAScript language version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcmaVersion {
    /// ES3.
    Es3,
    /// ES5.
    Es5,
    /// Yearly editions (2015 and later).
    Year(u16),
    /// Newest version the parser supports.
    Latest,
}

impl EcmaVersion {
    /// Parses a year (`2020`), an edition number (`11`), or `"latest"`.
    /// Edition numbers from 6 up are normalized to years.
    ///
    /// # Errors
    ///
    /// Returns error for any other value.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        let invalid = || ModelError::InvalidEcmaVersion {
            value: value.to_string(),
        };
        match value {
            Value::String(s) if s == "latest" => Ok(Self::Latest),
            Value::Number(n) => match n.as_u64().ok_or_else(invalid)? {
                3 => Ok(Self::Es3),
                5 => Ok(Self::Es5),
                edition @ 6..=30 => Ok(Self::Year(2009 + u16::try_from(edition).map_err(|_| invalid())?)),
                year @ 2015..=2039 => Ok(Self::Year(u16::try_from(year).map_err(|_| invalid())?)),
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }
}

impl Serialize for EcmaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Es3 => serializer.serialize_u16(3),
            Self::Es5 => serializer.serialize_u16(5),
            Self::Year(year) => serializer.serialize_u16(*year),
            Self::Latest => serializer.serialize_str("latest"),
        }
    }
}

/// Options passed through to the selected parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserOptions {
    /// Module system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    /// Language version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecma_version: Option<EcmaVersion>,
    /// Non-JS extensions the parser should accept (e.g. `.svelte`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_file_extensions: Option<Vec<String>>,
    /// Type-aware project reference(s), e.g. `./tsconfig.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<Value>,
    /// Parser-specific keys, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ParserOptions {
    /// Merges `other` over `self`, key by key.
    pub fn merge_from(&mut self, other: &Self) {
        if other.source_type.is_some() {
            self.source_type = other.source_type;
        }
        if other.ecma_version.is_some() {
            self.ecma_version = other.ecma_version;
        }
        if other.extra_file_extensions.is_some() {
            self.extra_file_extensions.clone_from(&other.extra_file_extensions);
        }
        if other.project.is_some() {
            self.project.clone_from(&other.project);
        }
        for (key, value) in &other.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    /// Returns the configured extra file extensions (may be empty).
    #[must_use]
    pub fn extra_extensions(&self) -> &[String] {
        self.extra_file_extensions.as_deref().unwrap_or_default()
    }
}

/// The parser chosen for a file, with its effective options.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParserSelection {
    /// Parser identifier, or `None` for the engine default.
    pub parser: Option<String>,
    /// Effective parser options.
    pub options: ParserOptions,
}

impl ParserSelection {
    /// Returns the parser identifier, falling back to [`DEFAULT_PARSER`].
    #[must_use]
    pub fn name(&self) -> &str {
        self.parser.as_deref().unwrap_or(DEFAULT_PARSER)
    }
}

// ────────────────────────────────────────────
// Globals and preset references
// ────────────────────────────────────────────

/// Whether a known global may be reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalAccess {
    /// Read-only global.
    Readonly,
    /// Writable global.
    Writable,
}

impl GlobalAccess {
    /// Parses `readonly` / `writable` (and the legacy `readable` /
    /// `writeable` spellings).
    ///
    /// # Errors
    ///
    /// Returns error for unknown literals.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value {
            "readonly" | "readable" => Ok(Self::Readonly),
            "writable" | "writeable" => Ok(Self::Writable),
            _ => Err(ModelError::InvalidGlobalAccess {
                value: value.to_string(),
            }),
        }
    }
}

/// An entry of an `extends` chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetRef {
    /// A preset resolved through the registry.
    Named(String),
    /// Another configuration document on disk.
    File(PathBuf),
}

impl PresetRef {
    /// Classifies an `extends` entry. Entries starting with `./`, `../`, or
    /// an absolute path are files, resolved against `base_dir`.
    #[must_use]
    pub fn parse(entry: &str, base_dir: Option<&Path>) -> Self {
        let path = Path::new(entry);
        if entry.starts_with("./") || entry.starts_with("../") || path.is_absolute() {
            let resolved = match base_dir {
                Some(dir) if !path.is_absolute() => dir.join(path),
                _ => path.to_path_buf(),
            };
            Self::File(normalize_path(&resolved))
        } else {
            Self::Named(entry.to_string())
        }
    }

    /// Registry name or path, as written in error messages.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Removes `.` segments and folds `..` into the preceding segment, without
/// touching the filesystem.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

// ────────────────────────────────────────────
// Overrides and documents
// ────────────────────────────────────────────

/// A glob-scoped configuration layer.
#[derive(Debug, Clone)]
pub struct FileOverride {
    /// Which files this layer applies to.
    pub matcher: FileMatcher,
    /// Directory the globs are relative to (`None`: match paths as given).
    pub base_dir: Option<PathBuf>,
    /// Parser for matching files.
    pub parser: Option<String>,
    /// Parser options merged over the document's.
    pub parser_options: Option<ParserOptions>,
    /// Presets applied before this override's own rules.
    pub extends: Vec<PresetRef>,
    /// Additional environments.
    pub env: BTreeSet<String>,
    /// Additional plugins.
    pub plugins: BTreeSet<String>,
    /// Additional globals.
    pub globals: BTreeMap<String, GlobalAccess>,
    /// Rules for matching files.
    pub rules: RuleConfig,
}

impl FileOverride {
    /// Creates an override with only a matcher; fill the rest via fields
    /// or the builder-style methods.
    #[must_use]
    pub fn new(matcher: FileMatcher) -> Self {
        Self {
            matcher,
            base_dir: None,
            parser: None,
            parser_options: None,
            extends: Vec::new(),
            env: BTreeSet::new(),
            plugins: BTreeSet::new(),
            globals: BTreeMap::new(),
            rules: RuleConfig::new(),
        }
    }

    /// Sets the parser.
    #[must_use]
    pub fn parser(mut self, parser: impl Into<String>) -> Self {
        self.parser = Some(parser.into());
        self
    }

    /// Sets the parser options.
    #[must_use]
    pub fn parser_options(mut self, options: ParserOptions) -> Self {
        self.parser_options = Some(options);
        self
    }

    /// Sets the rule table.
    #[must_use]
    pub fn rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Tests whether this override applies to `path`.
    ///
    /// Absolute paths outside `base_dir` never match.
    #[must_use]
    pub fn applies_to(&self, path: &Path) -> bool {
        match (&self.base_dir, path.is_absolute()) {
            (Some(dir), true) => path
                .strip_prefix(dir)
                .is_ok_and(|relative| self.matcher.matches(relative)),
            _ => self.matcher.matches(path),
        }
    }
}

/// A validated configuration document.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    pub(crate) root: bool,
    pub(crate) source: Option<PathBuf>,
    pub(crate) env: BTreeSet<String>,
    pub(crate) extends: Vec<PresetRef>,
    pub(crate) parser: Option<String>,
    pub(crate) parser_options: ParserOptions,
    pub(crate) plugins: BTreeSet<String>,
    pub(crate) globals: BTreeMap<String, GlobalAccess>,
    pub(crate) overrides: Vec<FileOverride>,
    pub(crate) rules: RuleConfig,
    pub(crate) option_merge: OptionMerge,
    pub(crate) naming_priority: NamingPriority,
}

impl ConfigDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether upward config discovery stops at this document.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// The file this document was loaded from, if any.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Directory relative paths in this document resolve against.
    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        self.source.as_deref().and_then(Path::parent)
    }

    /// Declared environments.
    #[must_use]
    pub fn env(&self) -> &BTreeSet<String> {
        &self.env
    }

    /// The extension chain.
    #[must_use]
    pub fn extends(&self) -> &[PresetRef] {
        &self.extends
    }

    /// Default parser.
    #[must_use]
    pub fn parser(&self) -> Option<&str> {
        self.parser.as_deref()
    }

    /// Default parser options.
    #[must_use]
    pub fn parser_options(&self) -> &ParserOptions {
        &self.parser_options
    }

    /// Declared plugins (normalized ids).
    #[must_use]
    pub fn plugins(&self) -> &BTreeSet<String> {
        &self.plugins
    }

    /// Explicit globals.
    #[must_use]
    pub fn globals(&self) -> &BTreeMap<String, GlobalAccess> {
        &self.globals
    }

    /// Overrides in declaration order.
    #[must_use]
    pub fn overrides(&self) -> &[FileOverride] {
        &self.overrides
    }

    /// The document's own rule table.
    #[must_use]
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    /// How rule settings are merged across layers.
    #[must_use]
    pub fn option_merge(&self) -> OptionMerge {
        self.option_merge
    }

    /// How naming-convention selectors are ordered.
    #[must_use]
    pub fn naming_priority(&self) -> NamingPriority {
        self.naming_priority
    }

    /// Builder-style setters used by tests and embedders.
    #[must_use]
    pub fn with_extends(mut self, extends: Vec<PresetRef>) -> Self {
        self.extends = extends;
        self
    }

    /// Replaces the rule table.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Appends an override.
    #[must_use]
    pub fn with_override(mut self, file_override: FileOverride) -> Self {
        self.overrides.push(file_override);
        self
    }

    /// Sets the default parser.
    #[must_use]
    pub fn with_parser(mut self, parser: impl Into<String>) -> Self {
        self.parser = Some(parser.into());
        self
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in domain model construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// Glob pattern is empty.
    #[error("glob pattern must not be empty")]
    EmptyGlobPattern,

    /// Glob pattern has invalid syntax.
    #[error("invalid glob pattern `{pattern}`: {reason}")]
    InvalidGlobPattern {
        /// The invalid pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },

    /// An override declares no `files`.
    #[error("override must declare at least one `files` pattern")]
    EmptyOverrideFiles,

    /// Unknown severity literal.
    #[error("unknown severity `{value}`, expected: off, warn, error (or 0, 1, 2)")]
    UnknownSeverity {
        /// The invalid value.
        value: String,
    },

    /// A rule setting has the wrong shape.
    #[error("malformed rule setting: {reason}")]
    MalformedSetting {
        /// What is wrong.
        reason: String,
    },

    /// Naming-convention options failed to parse.
    #[error("invalid naming-convention options: {reason}")]
    InvalidNamingOptions {
        /// What is wrong.
        reason: String,
    },

    /// Unknown `sourceType`.
    #[error("unknown sourceType `{value}`, expected: script, module, commonjs")]
    InvalidSourceType {
        /// The invalid value.
        value: String,
    },

    /// Unknown `ecmaVersion`.
    #[error("invalid ecmaVersion `{value}`")]
    InvalidEcmaVersion {
        /// The invalid value.
        value: String,
    },

    /// Unknown global access literal.
    #[error("invalid global access `{value}`, expected: readonly, writable")]
    InvalidGlobalAccess {
        /// The invalid value.
        value: String,
    },

    /// Unknown enumerated document option.
    #[error("unknown {field} `{value}`")]
    UnknownChoice {
        /// The document field.
        field: &'static str,
        /// The invalid value.
        value: String,
    },
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- GlobPattern --

    #[test]
    fn basename_glob_matches_in_any_directory() {
        let glob = GlobPattern::new("*.svelte").unwrap();
        assert!(glob.matches(Path::new("x.svelte")));
        assert!(glob.matches(Path::new("src/routes/App.svelte")));
        assert!(!glob.matches(Path::new("x.ts")));
    }

    #[test]
    fn path_glob_respects_separators() {
        let glob = GlobPattern::new("src/*.ts").unwrap();
        assert!(glob.matches(Path::new("src/main.ts")));
        assert!(!glob.matches(Path::new("src/lib/util.ts")));

        let deep = GlobPattern::new("src/**/*.ts").unwrap();
        assert!(deep.matches(Path::new("src/lib/util.ts")));
        assert!(deep.matches(Path::new("src/main.ts")));
        assert!(!deep.matches(Path::new("test/main.ts")));
    }

    #[test]
    fn leading_dot_slash_is_ignored() {
        let glob = GlobPattern::new("./src/*.ts").unwrap();
        assert!(glob.matches(Path::new("src/main.ts")));
        assert!(glob.matches(Path::new("./src/main.ts")));
    }

    #[test]
    fn empty_and_invalid_globs_rejected() {
        assert!(matches!(GlobPattern::new(""), Err(ModelError::EmptyGlobPattern)));
        assert!(matches!(
            GlobPattern::new("src/[.ts"),
            Err(ModelError::InvalidGlobPattern { .. })
        ));
    }

    #[test]
    fn matcher_honours_excludes() {
        let matcher = FileMatcher::from_patterns(&["*.ts"], &["*.d.ts"]).unwrap();
        assert!(matcher.matches(Path::new("a.ts")));
        assert!(!matcher.matches(Path::new("types.d.ts")));
    }

    #[test]
    fn matcher_requires_files() {
        assert!(matches!(
            FileMatcher::from_patterns(&[], &[]),
            Err(ModelError::EmptyOverrideFiles)
        ));
    }

    #[test]
    fn override_ignores_paths_outside_base_dir() {
        let mut ov = FileOverride::new(FileMatcher::from_patterns(&["*.ts"], &[]).unwrap());
        ov.base_dir = Some(PathBuf::from("/repo/web"));
        assert!(ov.applies_to(Path::new("/repo/web/src/a.ts")));
        assert!(!ov.applies_to(Path::new("/repo/api/src/a.ts")));
        assert!(ov.applies_to(Path::new("src/a.ts")));
    }

    // -- Parser options --

    #[test]
    fn ecma_version_normalizes_editions() {
        assert_eq!(EcmaVersion::from_value(&json!(11)).unwrap(), EcmaVersion::Year(2020));
        assert_eq!(EcmaVersion::from_value(&json!(2020)).unwrap(), EcmaVersion::Year(2020));
        assert_eq!(EcmaVersion::from_value(&json!(5)).unwrap(), EcmaVersion::Es5);
        assert_eq!(EcmaVersion::from_value(&json!("latest")).unwrap(), EcmaVersion::Latest);
        assert!(EcmaVersion::from_value(&json!(4)).is_err());
        assert!(EcmaVersion::from_value(&json!("es2020")).is_err());
    }

    #[test]
    fn parser_options_merge_key_by_key() {
        let mut base = ParserOptions {
            source_type: Some(SourceType::Module),
            ecma_version: Some(EcmaVersion::Year(2020)),
            ..ParserOptions::default()
        };
        let mut over = ParserOptions::default();
        over.extra.insert("parser".into(), json!("@typescript-eslint/parser"));
        over.ecma_version = Some(EcmaVersion::Latest);

        base.merge_from(&over);
        assert_eq!(base.source_type, Some(SourceType::Module));
        assert_eq!(base.ecma_version, Some(EcmaVersion::Latest));
        assert_eq!(base.extra["parser"], json!("@typescript-eslint/parser"));
    }

    #[test]
    fn parser_selection_defaults_to_espree() {
        assert_eq!(ParserSelection::default().name(), DEFAULT_PARSER);
    }

    // -- PresetRef --

    #[test]
    fn preset_ref_classifies_entries() {
        let base = Path::new("/repo");
        assert_eq!(
            PresetRef::parse("eslint:recommended", Some(base)),
            PresetRef::Named("eslint:recommended".into())
        );
        assert_eq!(
            PresetRef::parse("./base.toml", Some(base)),
            PresetRef::File(PathBuf::from("/repo/base.toml"))
        );
        assert_eq!(
            PresetRef::parse("../shared.toml", None),
            PresetRef::File(PathBuf::from("../shared.toml"))
        );
    }

    #[test]
    fn preset_ref_collapses_parent_segments() {
        let base = Path::new("/repo/cfg");
        assert_eq!(
            PresetRef::parse("../cfg/./a.toml", Some(base)),
            PresetRef::File(PathBuf::from("/repo/cfg/a.toml"))
        );
        assert_eq!(
            PresetRef::parse("../../../../up.toml", Some(base)),
            PresetRef::File(PathBuf::from("/up.toml"))
        );
    }
}
