//! Expansion of `extends` chains into flat configuration layers.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use crate::document::loader::LoadError;
use crate::document::model::{ConfigDocument, FileOverride, GlobalAccess, ParserOptions, PresetRef};
use crate::registry::{Preset, Registry};
use crate::types::{OptionMerge, RuleConfig};

/// Everything one preset, document or override contributes.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    /// Rules, already folded in chain order.
    pub rules: RuleConfig,
    /// Active plugins.
    pub plugins: BTreeSet<String>,
    /// Enabled environments.
    pub env: BTreeSet<String>,
    /// Explicit globals.
    pub globals: BTreeMap<String, GlobalAccess>,
    /// Last parser named in the chain.
    pub parser: Option<String>,
    /// Parser options, merged key by key.
    pub parser_options: ParserOptions,
    /// Overrides collected from the chain, in order.
    pub overrides: Vec<FileOverride>,
}

impl Layer {
    /// Places `later` on top of this layer.
    pub fn absorb(&mut self, later: Self, merge: OptionMerge) {
        self.rules.overlay(&later.rules, merge);
        self.plugins.extend(later.plugins);
        self.env.extend(later.env);
        self.globals.extend(later.globals);
        if later.parser.is_some() {
            self.parser = later.parser;
        }
        self.parser_options.merge_from(&later.parser_options);
        self.overrides.extend(later.overrides);
    }

    fn from_preset(preset: &Preset) -> Self {
        Self {
            rules: preset.rules().clone(),
            plugins: preset.plugins().clone(),
            env: preset.environments().clone(),
            globals: BTreeMap::new(),
            parser: preset.default_parser().map(str::to_string),
            parser_options: preset.default_parser_options().clone(),
            overrides: preset.overrides().to_vec(),
        }
    }

    /// The document's own top-level contribution (without its `extends`).
    #[must_use]
    pub fn from_document(doc: &ConfigDocument) -> Self {
        Self {
            rules: doc.rules().clone(),
            plugins: doc.plugins().clone(),
            env: doc.env().clone(),
            globals: doc.globals().clone(),
            parser: doc.parser().map(str::to_string),
            parser_options: doc.parser_options().clone(),
            overrides: doc.overrides().to_vec(),
        }
    }

    /// An override's own contribution (without its `extends`).
    #[must_use]
    pub fn from_override(file_override: &FileOverride) -> Self {
        Self {
            rules: file_override.rules.clone(),
            plugins: file_override.plugins.clone(),
            env: file_override.env.clone(),
            globals: file_override.globals.clone(),
            parser: file_override.parser.clone(),
            parser_options: file_override.parser_options.clone().unwrap_or_default(),
            overrides: Vec::new(),
        }
    }
}

/// Depth-first `extends` expansion with cycle detection.
pub struct ChainExpander<'a> {
    registry: &'a Registry,
    merge: OptionMerge,
    stack: Vec<String>,
}

impl<'a> ChainExpander<'a> {
    /// Creates an expander over `registry`.
    #[must_use]
    pub fn new(registry: &'a Registry, merge: OptionMerge) -> Self {
        Self {
            registry,
            merge,
            stack: Vec::new(),
        }
    }

    /// Merge strategy applied between layers.
    #[must_use]
    pub fn merge(&self) -> OptionMerge {
        self.merge
    }

    /// Folds `refs` left to right into one layer. Each entry's own chain is
    /// expanded first, so an entry always wins over what it extends.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPreset`, `UnknownPlugin`, `ExtendsCycle`, or any
    /// error from loading a file preset.
    pub fn expand(&mut self, refs: &[PresetRef], context: &str) -> Result<Layer, LoadError> {
        let mut layer = Layer::default();
        for (i, preset_ref) in refs.iter().enumerate() {
            let entry_context = format!("{context}[{i}]");
            let expanded = self.expand_one(preset_ref, &entry_context)?;
            layer.absorb(expanded, self.merge);
        }
        Ok(layer)
    }

    fn expand_one(&mut self, preset_ref: &PresetRef, context: &str) -> Result<Layer, LoadError> {
        // file presets key on their canonical path
        let key = match preset_ref {
            PresetRef::Named(name) => name.clone(),
            PresetRef::File(path) => std::fs::canonicalize(path)
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?
                .display()
                .to_string(),
        };
        if self.stack.contains(&key) {
            let mut chain = self.stack.clone();
            chain.push(key);
            return Err(LoadError::ExtendsCycle { chain });
        }
        self.stack.push(key);
        let result = match preset_ref {
            PresetRef::Named(name) => self.expand_named(name, context),
            PresetRef::File(path) => self.expand_file(path),
        };
        self.stack.pop();
        result
    }

    fn expand_named(&mut self, name: &str, context: &str) -> Result<Layer, LoadError> {
        let registry = self.registry;
        let preset = registry.lookup_preset(name, context)?;
        let nested: Vec<PresetRef> = preset
            .extends_chain()
            .iter()
            .map(|entry| PresetRef::parse(entry, None))
            .collect();
        let mut layer = self.expand(&nested, &format!("preset `{}`.extends", preset.name()))?;
        layer.absorb(Layer::from_preset(preset), self.merge);
        debug!(preset = preset.name(), rules = layer.rules.len(), "expanded preset");
        Ok(layer)
    }

    fn expand_file(&mut self, path: &Path) -> Result<Layer, LoadError> {
        let doc = ConfigDocument::from_file(path)?;
        let mut layer = self.expand(doc.extends(), &format!("{}: extends", path.display()))?;
        layer.absorb(Layer::from_document(&doc), self.merge);
        debug!(path = %path.display(), rules = layer.rules.len(), "expanded file preset");
        Ok(layer)
    }
}
