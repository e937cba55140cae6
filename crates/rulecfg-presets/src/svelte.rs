//! The `svelte` plugin and its shared configs.

use rulecfg_core::{FileMatcher, FileOverride, PluginDef, Preset, RuleConfig, RuleSetting, Severity};

use crate::with_rules;

const NS: &str = "svelte";
const PARSER: &str = "svelte-eslint-parser";

const RECOMMENDED: &[&str] = &[
    "comment-directive",
    "no-at-html-tags",
    "no-dupe-else-if-blocks",
    "no-dupe-style-properties",
    "no-dynamic-slot-name",
    "no-inner-declarations",
    "no-not-function-handler",
    "no-object-in-text-mustaches",
    "no-shorthand-style-property-overrides",
    "no-unknown-style-directive-property",
    "no-unused-svelte-ignore",
    "system",
    "valid-compile",
];

const FORMATTING: &[&str] = &[
    "first-attribute-linebreak",
    "html-closing-bracket-spacing",
    "html-quotes",
    "html-self-closing",
    "indent",
    "max-attributes-per-line",
    "mustache-spacing",
    "shorthand-attribute",
    "shorthand-directive",
];

const OTHER: &[&str] = &["no-at-debug-tags", "no-reactive-reassign", "valid-each-key"];

/// The plugin definition.
pub(crate) fn plugin() -> PluginDef {
    PluginDef::new("eslint-plugin-svelte").with_rules([RECOMMENDED, FORMATTING, OTHER].concat())
}

fn name(config: &str) -> String {
    format!("plugin:{NS}/{config}")
}

/// `.svelte` files get the svelte parser. Inside them, core rules that
/// misread component scripts go off.
fn base() -> Preset {
    let preset = Preset::new(name("base"))
        .description("Parser wiring for .svelte files")
        .plugin(NS);
    let rules = RuleConfig::new()
        .with("no-inner-declarations", RuleSetting::new(Severity::Off))
        .with("no-self-assign", RuleSetting::new(Severity::Off))
        .with("svelte/comment-directive", RuleSetting::new(Severity::Error))
        .with("svelte/system", RuleSetting::new(Severity::Error));
    match FileMatcher::from_patterns(&["*.svelte"], &[]) {
        Ok(matcher) => preset.file_override(FileOverride::new(matcher).parser(PARSER).rules(rules)),
        Err(e) => {
            tracing::warn!(error = %e, "skipping svelte file override");
            preset
        }
    }
}

fn recommended() -> Preset {
    let preset = Preset::new(name("recommended"))
        .description("Rules that catch likely bugs in components")
        .extends(name("base"));
    with_rules(preset, Some(NS), Severity::Error, RECOMMENDED)
        .rule("svelte/no-at-debug-tags", RuleSetting::new(Severity::Warn))
}

fn prettier() -> Preset {
    let preset = Preset::new(name("prettier"))
        .description("Turns off component rules that conflict with Prettier")
        .extends(name("base"));
    with_rules(preset, Some(NS), Severity::Off, FORMATTING)
}

/// All shared configs of the plugin.
pub(crate) fn presets() -> Vec<Preset> {
    vec![base(), recommended(), prettier()]
}
