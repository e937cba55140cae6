//! # rulecfg
//!
//! Rule-configuration resolver for JavaScript/TypeScript/Svelte lint setups.
//!
//! This is the main facade crate that re-exports the core framework and the
//! built-in presets, and adds hierarchical config discovery.
//!
//! ## Single document
//!
//! ```rust,ignore
//! let resolver = rulecfg::load(".rulecfg.toml".as_ref())?;
//! let resolved = resolver.resolve_for_file("src/App.svelte".as_ref());
//! assert_eq!(resolved.parser.name(), "svelte-eslint-parser");
//! ```
//!
//! ## Cascading documents
//!
//! ```rust,ignore
//! let cascade = rulecfg::Cascade::builtin();
//! if let Some(resolved) = cascade.resolve_for_file("packages/web/src/main.ts".as_ref())? {
//!     println!("{}", resolved.render_compact());
//! }
//! ```

#![forbid(unsafe_code)]

use std::path::Path;

// Re-export core types and traits
pub use rulecfg_core::*;

/// Built-in presets, plugins and environments.
pub mod presets {
    pub use rulecfg_presets::*;
}

mod cascade;

pub use cascade::{find_config_in, Cascade, CONFIG_CANDIDATES};

/// Loads one document and builds a resolver over the built-in registry.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded or fails validation.
pub fn load(path: &Path) -> Result<ConfigResolver, LoadError> {
    let document = ConfigDocument::from_file(path)?;
    ConfigResolver::builder()
        .document(document)
        .registry(rulecfg_presets::builtin_registry())
        .build()
}
