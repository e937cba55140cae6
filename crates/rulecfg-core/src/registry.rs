//! Registry of presets, plugins and environments.
//!
//! Preset contents are external data: the resolver only knows them through
//! this registry. `rulecfg-presets` ships the built-in registry.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::document::loader::LoadError;
use crate::document::model::{FileOverride, GlobalAccess, ParserOptions};
use crate::types::{RuleConfig, RuleSetting};

/// A named, reusable bundle of configuration.
#[derive(Debug, Clone, Default)]
pub struct Preset {
    name: String,
    description: String,
    extends: Vec<String>,
    plugins: BTreeSet<String>,
    env: BTreeSet<String>,
    parser: Option<String>,
    parser_options: ParserOptions,
    rules: RuleConfig,
    overrides: Vec<FileOverride>,
}

impl Preset {
    /// Creates an empty preset.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets a one-line description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends an entry to this preset's own `extends` chain.
    #[must_use]
    pub fn extends(mut self, preset: impl Into<String>) -> Self {
        self.extends.push(preset.into());
        self
    }

    /// Activates a plugin.
    #[must_use]
    pub fn plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugins.insert(normalize_plugin_id(&plugin.into()));
        self
    }

    /// Enables an environment.
    #[must_use]
    pub fn env(mut self, env: impl Into<String>) -> Self {
        self.env.insert(env.into());
        self
    }

    /// Sets the default parser.
    #[must_use]
    pub fn parser(mut self, parser: impl Into<String>) -> Self {
        self.parser = Some(parser.into());
        self
    }

    /// Sets parser options.
    #[must_use]
    pub fn parser_options(mut self, options: ParserOptions) -> Self {
        self.parser_options = options;
        self
    }

    /// Adds a rule setting.
    #[must_use]
    pub fn rule(mut self, rule: impl Into<String>, setting: RuleSetting) -> Self {
        self.rules.insert(rule, setting);
        self
    }

    /// Adds a glob-scoped layer.
    #[must_use]
    pub fn file_override(mut self, file_override: FileOverride) -> Self {
        self.overrides.push(file_override);
        self
    }

    /// Registry key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.description
    }

    /// Entries this preset itself extends.
    #[must_use]
    pub fn extends_chain(&self) -> &[String] {
        &self.extends
    }

    /// Plugins this preset activates.
    #[must_use]
    pub fn plugins(&self) -> &BTreeSet<String> {
        &self.plugins
    }

    /// Environments this preset enables.
    #[must_use]
    pub fn environments(&self) -> &BTreeSet<String> {
        &self.env
    }

    /// Default parser, if any.
    #[must_use]
    pub fn default_parser(&self) -> Option<&str> {
        self.parser.as_deref()
    }

    /// Parser options.
    #[must_use]
    pub fn default_parser_options(&self) -> &ParserOptions {
        &self.parser_options
    }

    /// Rule table.
    #[must_use]
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    /// Glob-scoped layers.
    #[must_use]
    pub fn overrides(&self) -> &[FileOverride] {
        &self.overrides
    }
}

/// A plugin: a rule namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDef {
    /// Normalized id, also the rule prefix (`@typescript-eslint`).
    pub namespace: String,
    /// Rules the plugin provides, without the namespace.
    pub rules: BTreeSet<String>,
}

impl PluginDef {
    /// Creates a plugin. The id is normalized.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            namespace: normalize_plugin_id(id),
            rules: BTreeSet::new(),
        }
    }

    /// Declares rules provided by the plugin.
    #[must_use]
    pub fn with_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.extend(rules.into_iter().map(Into::into));
        self
    }
}

/// A runtime environment: a named set of predefined globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDef {
    /// Environment name (`browser`, `node`, `es2017`).
    pub name: String,
    /// Globals it predefines.
    pub globals: BTreeMap<String, GlobalAccess>,
}

impl EnvironmentDef {
    /// Creates an environment without globals.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            globals: BTreeMap::new(),
        }
    }

    /// Adds globals with the given access.
    #[must_use]
    pub fn globals<'a>(
        mut self,
        access: GlobalAccess,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.globals
            .extend(names.into_iter().map(|n| (n.to_string(), access)));
        self
    }
}

/// Lookup tables for everything an `extends`, `plugins` or `env` entry can
/// name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    presets: BTreeMap<String, Preset>,
    plugins: BTreeMap<String, PluginDef>,
    environments: BTreeMap<String, EnvironmentDef>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a preset under its name. Replaces an existing entry.
    pub fn register_preset(&mut self, preset: Preset) {
        if self.presets.contains_key(&preset.name) {
            debug!(preset = %preset.name, "replacing registered preset");
        }
        self.presets.insert(preset.name.clone(), preset);
    }

    /// Registers a plugin. Replaces an existing entry.
    pub fn register_plugin(&mut self, plugin: PluginDef) {
        self.plugins.insert(plugin.namespace.clone(), plugin);
    }

    /// Registers an environment. Replaces an existing entry.
    pub fn register_environment(&mut self, env: EnvironmentDef) {
        self.environments.insert(env.name.clone(), env);
    }

    /// Builder-style [`Self::register_preset`].
    #[must_use]
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.register_preset(preset);
        self
    }

    /// Builder-style [`Self::register_plugin`].
    #[must_use]
    pub fn with_plugin(mut self, plugin: PluginDef) -> Self {
        self.register_plugin(plugin);
        self
    }

    /// Builder-style [`Self::register_environment`].
    #[must_use]
    pub fn with_environment(mut self, env: EnvironmentDef) -> Self {
        self.register_environment(env);
        self
    }

    /// Looks up a preset by the name used in `extends`.
    ///
    /// - `eslint:<name>` is looked up as written.
    /// - `plugin:<id>/<name>` requires plugin `<id>` to be registered.
    /// - anything else is a shareable config name (`eslint-config-` prefix
    ///   optional).
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlugin` or `UnknownPreset`.
    pub fn lookup_preset(&self, name: &str, context: &str) -> Result<&Preset, LoadError> {
        let key = if name.starts_with("eslint:") {
            name.to_string()
        } else if let Some(rest) = name.strip_prefix("plugin:") {
            let (plugin, config) = rest.rsplit_once('/').ok_or_else(|| LoadError::UnknownPreset {
                name: name.to_string(),
                context: context.to_string(),
            })?;
            let plugin = normalize_plugin_id(plugin);
            if !self.has_plugin(&plugin) {
                return Err(LoadError::UnknownPlugin {
                    name: plugin,
                    context: format!("{context}: `{name}`"),
                });
            }
            format!("plugin:{plugin}/{config}")
        } else {
            normalize_shareable_name(name)
        };

        self.presets.get(&key).ok_or_else(|| LoadError::UnknownPreset {
            name: name.to_string(),
            context: context.to_string(),
        })
    }

    /// Returns true if the normalized plugin id is registered.
    #[must_use]
    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugins.contains_key(id)
    }

    /// Returns a registered plugin.
    #[must_use]
    pub fn plugin(&self, id: &str) -> Option<&PluginDef> {
        self.plugins.get(id)
    }

    /// Returns a registered environment.
    #[must_use]
    pub fn environment(&self, name: &str) -> Option<&EnvironmentDef> {
        self.environments.get(name)
    }

    /// All presets, by name.
    pub fn presets(&self) -> impl Iterator<Item = &Preset> {
        self.presets.values()
    }

    /// All plugins, by namespace.
    pub fn plugins(&self) -> impl Iterator<Item = &PluginDef> {
        self.plugins.values()
    }

    /// All environments, by name.
    pub fn environments(&self) -> impl Iterator<Item = &EnvironmentDef> {
        self.environments.values()
    }
}

/// Normalizes a plugin id to its rule namespace.
///
/// `eslint-plugin-foo` → `foo`, `@scope/eslint-plugin` → `@scope`,
/// `@scope/eslint-plugin-foo` → `@scope/foo`.
#[must_use]
pub fn normalize_plugin_id(id: &str) -> String {
    normalize_package_name(id, "eslint-plugin")
}

/// Normalizes a shareable config name (`eslint-config-prettier` → `prettier`).
#[must_use]
pub fn normalize_shareable_name(name: &str) -> String {
    normalize_package_name(name, "eslint-config")
}

fn normalize_package_name(name: &str, prefix: &str) -> String {
    if let Some((scope, rest)) = name.split_once('/').filter(|_| name.starts_with('@')) {
        if rest == prefix {
            return scope.to_string();
        }
        let stripped = rest
            .strip_prefix(prefix)
            .and_then(|r| r.strip_prefix('-'))
            .unwrap_or(rest);
        return format!("{scope}/{stripped}");
    }
    name.strip_prefix(prefix)
        .and_then(|r| r.strip_prefix('-'))
        .unwrap_or(name)
        .to_string()
}

/// Returns the plugin namespace of a rule key, or `None` for core rules.
///
/// `@typescript-eslint/no-explicit-any` → `@typescript-eslint`,
/// `svelte/no-at-html-tags` → `svelte`, `curly` → `None`.
#[must_use]
pub fn rule_namespace(rule: &str) -> Option<&str> {
    rule.rsplit_once('/').map(|(ns, _)| ns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    fn registry() -> Registry {
        Registry::new()
            .with_plugin(PluginDef::new("@typescript-eslint"))
            .with_preset(Preset::new("eslint:recommended").rule("no-undef", RuleSetting::new(Severity::Error)))
            .with_preset(Preset::new("plugin:@typescript-eslint/strict").plugin("@typescript-eslint"))
            .with_preset(Preset::new("prettier").rule("curly", RuleSetting::new(Severity::Off)))
    }

    #[test]
    fn plugin_ids_normalize() {
        assert_eq!(normalize_plugin_id("eslint-plugin-svelte"), "svelte");
        assert_eq!(normalize_plugin_id("svelte"), "svelte");
        assert_eq!(normalize_plugin_id("@typescript-eslint/eslint-plugin"), "@typescript-eslint");
        assert_eq!(normalize_plugin_id("@typescript-eslint"), "@typescript-eslint");
        assert_eq!(normalize_plugin_id("@scope/eslint-plugin-foo"), "@scope/foo");
    }

    #[test]
    fn shareable_names_normalize() {
        assert_eq!(normalize_shareable_name("eslint-config-prettier"), "prettier");
        assert_eq!(normalize_shareable_name("prettier"), "prettier");
        assert_eq!(normalize_shareable_name("@scope/eslint-config"), "@scope");
    }

    #[test]
    fn rule_namespaces() {
        assert_eq!(rule_namespace("@typescript-eslint/no-explicit-any"), Some("@typescript-eslint"));
        assert_eq!(rule_namespace("svelte/no-at-html-tags"), Some("svelte"));
        assert_eq!(rule_namespace("curly"), None);
    }

    #[test]
    fn lookup_by_every_name_form() {
        let reg = registry();
        assert_eq!(reg.lookup_preset("eslint:recommended", "extends").unwrap().name(), "eslint:recommended");
        assert_eq!(reg.lookup_preset("eslint-config-prettier", "extends").unwrap().name(), "prettier");
        assert_eq!(
            reg.lookup_preset("plugin:@typescript-eslint/eslint-plugin/strict", "extends")
                .unwrap()
                .name(),
            "plugin:@typescript-eslint/strict"
        );
    }

    #[test]
    fn lookup_unknown_preset() {
        let err = registry().lookup_preset("airbnb", "extends[0]").unwrap_err();
        assert!(matches!(err, LoadError::UnknownPreset { ref name, .. } if name == "airbnb"));
        assert_eq!(err.to_string(), "extends[0]: unknown preset `airbnb`");
    }

    #[test]
    fn lookup_preset_of_unknown_plugin() {
        let err = registry().lookup_preset("plugin:vue/recommended", "extends[0]").unwrap_err();
        assert!(matches!(err, LoadError::UnknownPlugin { ref name, .. } if name == "vue"));
    }

    #[test]
    fn environment_globals() {
        let env = EnvironmentDef::new("browser").globals(GlobalAccess::Readonly, ["window", "document"]);
        let reg = Registry::new().with_environment(env);
        let browser = reg.environment("browser").unwrap();
        assert_eq!(browser.globals["window"], GlobalAccess::Readonly);
        assert!(reg.environment("deno").is_none());
    }
}
