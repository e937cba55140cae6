//! Per-file configuration resolution.
//!
//! A [`ConfigResolver`] is built once from a document and a registry. The
//! build step expands every `extends` chain and validates everything the
//! registry can check, so a resolver that exists can resolve any file.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::document::loader::LoadError;
use crate::document::model::{ConfigDocument, FileOverride, GlobalAccess, ParserSelection, PresetRef};
use crate::extends::{ChainExpander, Layer};
use crate::naming::{NamingConvention, NamingPriority, NamingVerdict, Symbol, NAMING_CONVENTION_RULE};
use crate::registry::{rule_namespace, Registry};
use crate::types::{OptionMerge, RuleConfig};

/// The effective configuration for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    /// Effective rule table.
    pub rules: RuleConfig,
    /// Parser and its merged options.
    pub parser: ParserSelection,
    /// Enabled environments.
    pub env: BTreeSet<String>,
    /// Active plugins.
    pub plugins: BTreeSet<String>,
    /// Known globals: environment globals, then explicit ones.
    pub globals: BTreeMap<String, GlobalAccess>,
    #[serde(skip)]
    naming_priority: NamingPriority,
    #[serde(skip)]
    naming: Option<NamingConvention>,
}

impl ResolvedConfig {
    fn new(
        rules: RuleConfig,
        parser: ParserSelection,
        env: BTreeSet<String>,
        plugins: BTreeSet<String>,
        globals: BTreeMap<String, GlobalAccess>,
        naming_priority: NamingPriority,
    ) -> Self {
        let mut resolved = Self {
            rules,
            parser,
            env,
            plugins,
            globals,
            naming_priority,
            naming: None,
        };
        resolved.refresh_naming();
        resolved
    }

    fn refresh_naming(&mut self) {
        // options were validated when the resolver was built
        self.naming = self
            .rules
            .get(NAMING_CONVENTION_RULE)
            .and_then(|s| NamingConvention::from_setting(s, self.naming_priority).ok().flatten());
    }

    /// Places a closer configuration on top of this one.
    ///
    /// Rules follow `merge`; environments, plugins and globals are unioned;
    /// the closer parser wins when it names one.
    pub fn layer(&mut self, closer: Self, merge: OptionMerge) {
        self.rules.overlay(&closer.rules, merge);
        if closer.parser.parser.is_some() {
            self.parser.parser = closer.parser.parser;
        }
        self.parser.options.merge_from(&closer.parser.options);
        self.env.extend(closer.env);
        self.plugins.extend(closer.plugins);
        self.globals.extend(closer.globals);
        self.naming_priority = closer.naming_priority;
        self.refresh_naming();
    }

    /// The naming-convention table in effect, if the rule is enabled.
    #[must_use]
    pub fn naming_convention(&self) -> Option<&NamingConvention> {
        self.naming.as_ref()
    }

    /// Checks a symbol against the naming convention in effect.
    /// Without an enabled naming-convention rule every symbol is unchecked.
    #[must_use]
    pub fn validate_naming(&self, symbol: &Symbol) -> NamingVerdict {
        self.naming
            .as_ref()
            .map_or(NamingVerdict::Unchecked, |naming| naming.validate(symbol))
    }

    /// Number of rules that are not `off`.
    #[must_use]
    pub fn enabled_rule_count(&self) -> usize {
        self.rules.enabled().count()
    }

    /// Renders the configuration as `key: value` lines.
    #[must_use]
    pub fn render_compact(&self) -> String {
        let join = |set: &BTreeSet<String>| {
            if set.is_empty() {
                "(none)".to_string()
            } else {
                set.iter().cloned().collect::<Vec<_>>().join(", ")
            }
        };
        let mut out = format!(
            "parser: {}\nenv: {}\nplugins: {}\n",
            self.parser.name(),
            join(&self.env),
            join(&self.plugins)
        );
        out.push_str(&self.rules.render_compact());
        out
    }
}

/// An override with its own `extends` chain already expanded.
#[derive(Debug, Clone)]
struct CompiledOverride {
    source: FileOverride,
    layer: Layer,
    nested: Vec<CompiledOverride>,
}

impl CompiledOverride {
    fn visit<'s>(&'s self, path: &Path, out: &mut Vec<&'s Self>) {
        if self.source.applies_to(path) {
            out.push(self);
            for nested in &self.nested {
                nested.visit(path, out);
            }
        }
    }
}

/// Resolves effective rule configurations for files.
///
/// Immutable after [`ResolverBuilder::build`]; share it freely across
/// threads.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    registry: Arc<Registry>,
    document: ConfigDocument,
    /// `extends` chain and the document's top level, folded.
    base: Layer,
    overrides: Vec<CompiledOverride>,
}

/// Builder for [`ConfigResolver`].
#[derive(Debug, Default)]
pub struct ResolverBuilder {
    document: Option<ConfigDocument>,
    registry: Option<Arc<Registry>>,
}

impl ResolverBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration document (default: empty document).
    #[must_use]
    pub fn document(mut self, document: ConfigDocument) -> Self {
        self.document = Some(document);
        self
    }

    /// Sets the preset registry (default: empty registry).
    #[must_use]
    pub fn registry(mut self, registry: impl Into<Arc<Registry>>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    /// Expands and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first fatal configuration error: unknown presets,
    /// plugins or environments, extends cycles, unreadable file presets, or
    /// malformed naming-convention options inherited from a preset.
    pub fn build(self) -> Result<ConfigResolver, LoadError> {
        let document = self.document.unwrap_or_default();
        let registry = self.registry.unwrap_or_default();
        let merge = document.option_merge();

        let mut expander = ChainExpander::new(&registry, merge);
        let mut base = expander.expand(document.extends(), "extends")?;
        base.absorb(Layer::from_document(&document), merge);

        let overrides = std::mem::take(&mut base.overrides)
            .into_iter()
            .enumerate()
            .map(|(i, o)| compile_override(&mut expander, o, &format!("overrides[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;

        let resolver = ConfigResolver {
            document,
            base,
            overrides,
            registry,
        };
        resolver.validate()?;

        info!(
            rules = resolver.base.rules.len(),
            overrides = resolver.overrides.len(),
            plugins = resolver.base.plugins.len(),
            "configuration resolved"
        );
        Ok(resolver)
    }
}

fn compile_override(
    expander: &mut ChainExpander<'_>,
    source: FileOverride,
    context: &str,
) -> Result<CompiledOverride, LoadError> {
    let merge_layer = Layer::from_override(&source);
    let mut layer = expander.expand(&source.extends, &format!("{context}.extends"))?;
    let nested = std::mem::take(&mut layer.overrides)
        .into_iter()
        .enumerate()
        .map(|(i, o)| compile_override(expander, o, &format!("{context}.overrides[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;
    layer.absorb(merge_layer, expander.merge());
    Ok(CompiledOverride {
        source,
        layer,
        nested,
    })
}

impl ConfigResolver {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// The document this resolver was built from.
    #[must_use]
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// The registry presets were looked up in.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Folds a chain of presets left to right. A rule set by several
    /// presets resolves to the last one's setting.
    ///
    /// Entries use the same syntax as the document's `extends`; relative
    /// file entries resolve against the document's directory.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPreset` (or the other chain errors) for any entry
    /// that cannot be expanded.
    pub fn resolve_base(&self, chain: &[&str]) -> Result<RuleConfig, LoadError> {
        let refs: Vec<PresetRef> = chain
            .iter()
            .map(|entry| PresetRef::parse(entry, self.document.base_dir()))
            .collect();
        let layer = ChainExpander::new(&self.registry, self.document.option_merge())
            .expand(&refs, "extends")?;
        Ok(layer.rules)
    }

    /// Overlays an explicit rule table onto `base`, rule by rule.
    #[must_use]
    pub fn apply_rule_overrides(&self, base: &RuleConfig, explicit: &RuleConfig) -> RuleConfig {
        let mut rules = base.clone();
        rules.overlay(explicit, self.document.option_merge());
        rules
    }

    /// Returns the parser of the last matching override that names one,
    /// else the document's default parser. Options from every matching
    /// override are merged over the defaults in declaration order.
    #[must_use]
    pub fn select_parser(&self, path: &Path) -> ParserSelection {
        let mut selection = ParserSelection {
            parser: self.base.parser.clone(),
            options: self.base.parser_options.clone(),
        };
        for matched in self.matching(path) {
            if let Some(parser) = &matched.layer.parser {
                selection.parser = Some(parser.clone());
            }
            selection.options.merge_from(&matched.layer.parser_options);
        }
        selection
    }

    /// Resolves the effective configuration for `path`.
    ///
    /// The base chain and the document's own rules come first, then every
    /// matching override in declaration order.
    #[must_use]
    pub fn resolve_for_file(&self, path: &Path) -> ResolvedConfig {
        let merge = self.document.option_merge();
        let mut rules = self.base.rules.clone();
        let mut env = self.base.env.clone();
        let mut plugins = self.base.plugins.clone();
        let mut explicit_globals = self.base.globals.clone();

        let matched = self.matching(path);
        for layer in matched.iter().map(|o| &o.layer) {
            rules.overlay(&layer.rules, merge);
            env.extend(layer.env.iter().cloned());
            plugins.extend(layer.plugins.iter().cloned());
            explicit_globals.extend(layer.globals.iter().map(|(k, v)| (k.clone(), *v)));
        }
        debug!(
            path = %path.display(),
            overrides = matched.len(),
            rules = rules.len(),
            "resolved file"
        );

        let mut globals: BTreeMap<String, GlobalAccess> = env
            .iter()
            .filter_map(|name| self.registry.environment(name))
            .flat_map(|def| def.globals.iter().map(|(k, v)| (k.clone(), *v)))
            .collect();
        globals.extend(explicit_globals);

        ResolvedConfig::new(
            rules,
            self.select_parser(path),
            env,
            plugins,
            globals,
            self.document.naming_priority(),
        )
    }

    /// Checks a symbol against the naming convention in effect for `path`.
    #[must_use]
    pub fn validate_naming_convention(&self, path: &Path, symbol: &Symbol) -> NamingVerdict {
        self.resolve_for_file(path).validate_naming(symbol)
    }

    /// Overrides whose globs match `path`, outer before nested, in
    /// declaration order.
    fn matching(&self, path: &Path) -> Vec<&CompiledOverride> {
        let mut out = Vec::new();
        for compiled in &self.overrides {
            compiled.visit(path, &mut out);
        }
        out
    }

    fn validate(&self) -> Result<(), LoadError> {
        let priority = self.document.naming_priority();
        self.validate_layer(&self.base, &BTreeSet::new(), "", priority)?;
        for (i, compiled) in self.overrides.iter().enumerate() {
            self.validate_override(compiled, &self.base.plugins, &format!("overrides[{i}]"), priority)?;
        }
        Ok(())
    }

    fn validate_override(
        &self,
        compiled: &CompiledOverride,
        inherited_plugins: &BTreeSet<String>,
        context: &str,
        priority: NamingPriority,
    ) -> Result<(), LoadError> {
        self.validate_layer(&compiled.layer, inherited_plugins, context, priority)?;
        let active: BTreeSet<String> = inherited_plugins
            .union(&compiled.layer.plugins)
            .cloned()
            .collect();
        for (i, nested) in compiled.nested.iter().enumerate() {
            self.validate_override(nested, &active, &format!("{context}.overrides[{i}]"), priority)?;
        }
        Ok(())
    }

    fn validate_layer(
        &self,
        layer: &Layer,
        inherited_plugins: &BTreeSet<String>,
        context: &str,
        priority: NamingPriority,
    ) -> Result<(), LoadError> {
        let at = |field: &str| {
            if context.is_empty() {
                field.to_string()
            } else {
                format!("{context}.{field}")
            }
        };

        if let Some(name) = layer.env.iter().find(|e| self.registry.environment(e).is_none()) {
            return Err(LoadError::UnknownEnvironment {
                name: name.clone(),
                context: at("env"),
            });
        }
        if let Some(name) = layer.plugins.iter().find(|p| !self.registry.has_plugin(p)) {
            return Err(LoadError::UnknownPlugin {
                name: name.clone(),
                context: at("plugins"),
            });
        }

        for (rule, setting) in layer.rules.iter() {
            // disabling a rule never requires its plugin
            if let Some(ns) = rule_namespace(rule).filter(|_| setting.is_enabled()) {
                if !layer.plugins.contains(ns) && !inherited_plugins.contains(ns) {
                    return Err(LoadError::UnknownPlugin {
                        name: ns.to_string(),
                        context: format!("{} `{rule}`", at("rules")),
                    });
                }
            }
            if rule == NAMING_CONVENTION_RULE {
                NamingConvention::from_setting(setting, priority).map_err(|e| {
                    LoadError::MalformedOptions {
                        rule: rule.to_string(),
                        context: at("rules"),
                        reason: e.to_string(),
                    }
                })?;
            }
        }
        Ok(())
    }
}
