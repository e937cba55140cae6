//! # rulecfg-core
//!
//! Core framework for lint rule-configuration resolution.
//!
//! This crate turns a declarative configuration document (presets, plugins,
//! environments, parser wiring, glob-scoped overrides, rule table) into the
//! effective configuration for each file. It includes:
//!
//! - [`ConfigDocument`] and its TOML/JSON loader
//! - [`Registry`] of presets, plugins and environments
//! - [`ConfigResolver`] for per-file resolution
//! - [`NamingConvention`] for checking identifiers against the
//!   naming-convention rule's selector table
//!
//! ## Example
//!
//! ```ignore
//! use rulecfg_core::{ConfigDocument, ConfigResolver};
//!
//! let resolver = ConfigResolver::builder()
//!     .document(ConfigDocument::from_file(".rulecfg.toml".as_ref())?)
//!     .registry(registry)
//!     .build()?;
//!
//! let resolved = resolver.resolve_for_file("src/App.svelte".as_ref());
//! println!("{}", resolved.render_compact());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Configuration documents: DTO layer, loader and domain model.
pub mod document;
mod extends;
pub mod naming;
pub mod registry;
mod resolver;
mod types;

pub use document::loader::LoadError;
pub use document::model::{
    ConfigDocument, EcmaVersion, FileMatcher, FileOverride, GlobPattern, GlobalAccess, ModelError,
    ParserOptions, ParserSelection, PresetRef, SourceType, DEFAULT_PARSER,
};
pub use document::model::normalize_path;
pub use document::{load_document, DocumentFormat};
pub use extends::Layer;
pub use naming::{
    Modifier, NamingConvention, NamingFormat, NamingFormatViolation, NamingPriority,
    NamingSelectorRule, NamingVerdict, Position, Selector, Symbol, UnderscorePolicy, ViolationReason,
    NAMING_CONVENTION_RULE,
};
pub use registry::{EnvironmentDef, PluginDef, Preset, Registry};
pub use resolver::{ConfigResolver, ResolvedConfig, ResolverBuilder};
pub use types::{OptionMerge, RuleConfig, RuleSetting, Severity};
