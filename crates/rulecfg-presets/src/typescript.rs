//! The `@typescript-eslint` plugin and its shared configs.

use rulecfg_core::{
    FileMatcher, FileOverride, ParserOptions, PluginDef, Preset, RuleConfig, RuleSetting,
    Severity, SourceType,
};
use serde_json::json;

use crate::with_rules;

const NS: &str = "@typescript-eslint";
const PARSER: &str = "@typescript-eslint/parser";
const TS_FILES: &[&str] = &["*.ts", "*.tsx", "*.mts", "*.cts"];

const RECOMMENDED: &[&str] = &[
    "ban-ts-comment",
    "no-array-constructor",
    "no-duplicate-enum-values",
    "no-explicit-any",
    "no-extra-non-null-assertion",
    "no-misused-new",
    "no-namespace",
    "no-non-null-asserted-optional-chain",
    "no-this-alias",
    "no-unnecessary-type-constraint",
    "no-unsafe-declaration-merging",
    "no-unused-vars",
    "no-var-requires",
    "prefer-as-const",
    "triple-slash-reference",
];

const RECOMMENDED_TYPE_CHECKED: &[&str] = &[
    "await-thenable",
    "no-base-to-string",
    "no-duplicate-type-constituents",
    "no-floating-promises",
    "no-for-in-array",
    "no-implied-eval",
    "no-misused-promises",
    "no-redundant-type-constituents",
    "no-unnecessary-type-assertion",
    "no-unsafe-argument",
    "no-unsafe-assignment",
    "no-unsafe-call",
    "no-unsafe-enum-comparison",
    "no-unsafe-member-access",
    "no-unsafe-return",
    "require-await",
    "restrict-plus-operands",
    "restrict-template-expressions",
    "unbound-method",
];

const STRICT: &[&str] = &[
    "no-dynamic-delete",
    "no-extraneous-class",
    "no-invalid-void-type",
    "no-non-null-asserted-nullish-coalescing",
    "no-non-null-assertion",
    "no-useless-constructor",
    "prefer-literal-enum-member",
    "prefer-ts-expect-error",
    "unified-signatures",
];

const STRICT_TYPE_CHECKED: &[&str] = &[
    "no-confusing-void-expression",
    "no-meaningless-void-operator",
    "no-mixed-enums",
    "no-throw-literal",
    "no-unnecessary-boolean-literal-compare",
    "no-unnecessary-condition",
    "no-unnecessary-type-arguments",
    "prefer-includes",
    "prefer-reduce-type-parameter",
    "prefer-return-this-type",
];

const STYLISTIC: &[&str] = &[
    "adjacent-overload-signatures",
    "array-type",
    "ban-tslint-comment",
    "class-literal-property-style",
    "consistent-generic-constructors",
    "consistent-indexed-object-style",
    "consistent-type-assertions",
    "consistent-type-definitions",
    "no-confusing-non-null-assertion",
    "no-empty-function",
    "no-empty-interface",
    "no-inferrable-types",
    "prefer-for-of",
    "prefer-function-type",
    "prefer-namespace-keyword",
];

const STYLISTIC_TYPE_CHECKED: &[&str] = &[
    "dot-notation",
    "non-nullable-type-assertion-style",
    "prefer-nullish-coalescing",
    "prefer-optional-chain",
    "prefer-string-starts-ends-with",
];

/// Rules outside every shared config, still provided by the plugin.
const UNLISTED: &[&str] = &[
    "explicit-function-return-type",
    "explicit-member-accessibility",
    "explicit-module-boundary-types",
    "naming-convention",
    "no-shadow",
    "prefer-readonly",
    "switch-exhaustiveness-check",
];

/// Extension rules: enabling the plugin version turns off the core rule.
const EXTENDS_CORE: &[&str] = &[
    "dot-notation",
    "no-array-constructor",
    "no-empty-function",
    "no-implied-eval",
    "no-throw-literal",
    "no-unused-vars",
    "no-useless-constructor",
    "require-await",
];

/// Core rules TypeScript itself already checks.
const CHECKED_BY_COMPILER: &[&str] = &[
    "constructor-super",
    "getter-return",
    "no-const-assign",
    "no-dupe-args",
    "no-dupe-class-members",
    "no-dupe-keys",
    "no-func-assign",
    "no-import-assign",
    "no-new-symbol",
    "no-obj-calls",
    "no-redeclare",
    "no-setter-return",
    "no-this-before-super",
    "no-undef",
    "no-unreachable",
    "no-unsafe-negation",
];

/// The plugin definition.
pub(crate) fn plugin() -> PluginDef {
    PluginDef::new(NS).with_rules(
        [
            RECOMMENDED,
            RECOMMENDED_TYPE_CHECKED,
            STRICT,
            STRICT_TYPE_CHECKED,
            STYLISTIC,
            STYLISTIC_TYPE_CHECKED,
            UNLISTED,
        ]
        .concat(),
    )
}

fn name(config: &str) -> String {
    format!("plugin:{NS}/{config}")
}

/// Plugin rules go on, the core rules they replace go off.
fn with_plugin_rules(preset: Preset, names: &[&str]) -> Preset {
    let replaced: Vec<&str> = names
        .iter()
        .copied()
        .filter(|n| EXTENDS_CORE.contains(n))
        .collect();
    let preset = with_rules(preset, None, Severity::Off, &replaced);
    with_rules(preset, Some(NS), Severity::Error, names)
}

fn base() -> Preset {
    Preset::new(name("base"))
        .description("Parser and plugin wiring only")
        .parser(PARSER)
        .parser_options(ParserOptions {
            source_type: Some(SourceType::Module),
            ..ParserOptions::default()
        })
        .plugin(NS)
}

fn eslint_recommended() -> Preset {
    let mut rules: RuleConfig = CHECKED_BY_COMPILER
        .iter()
        .map(|r| ((*r).to_string(), RuleSetting::new(Severity::Off)))
        .collect();
    for rule in ["no-var", "prefer-const", "prefer-rest-params", "prefer-spread"] {
        rules.insert(rule, RuleSetting::new(Severity::Error));
    }
    let preset = Preset::new(name("eslint-recommended"))
        .description("Turns off core rules the TypeScript compiler already checks");
    match FileMatcher::from_patterns(TS_FILES, &[]) {
        Ok(matcher) => preset.file_override(FileOverride::new(matcher).rules(rules)),
        Err(e) => {
            tracing::warn!(error = %e, "skipping TypeScript file override");
            preset
        }
    }
}

fn recommended() -> Preset {
    let preset = Preset::new(name("recommended"))
        .description("Rules that catch likely bugs without type information")
        .extends(name("base"))
        .extends(name("eslint-recommended"));
    with_plugin_rules(preset, RECOMMENDED)
}

fn recommended_type_checked() -> Preset {
    let preset = Preset::new(name("recommended-type-checked"))
        .description("recommended plus rules that need type information")
        .extends(name("recommended"));
    with_plugin_rules(preset, RECOMMENDED_TYPE_CHECKED)
}

fn strict() -> Preset {
    let preset = Preset::new(name("strict"))
        .description("recommended plus opinionated bug-catching rules")
        .extends(name("recommended"));
    with_plugin_rules(preset, STRICT)
}

fn strict_type_checked() -> Preset {
    let preset = Preset::new(name("strict-type-checked"))
        .description("strict plus rules that need type information")
        .extends(name("recommended-type-checked"));
    let preset = with_plugin_rules(preset, STRICT);
    let preset = with_plugin_rules(preset, STRICT_TYPE_CHECKED);
    preset.rule(
        format!("{NS}/restrict-template-expressions"),
        RuleSetting::with_options(
            Severity::Error,
            vec![json!({
                "allowAny": false,
                "allowBoolean": false,
                "allowNullish": false,
                "allowNumber": false,
                "allowRegExp": false,
            })],
        ),
    )
}

fn stylistic() -> Preset {
    let preset = Preset::new(name("stylistic"))
        .description("Consistent TypeScript style without type information")
        .extends(name("base"))
        .extends(name("eslint-recommended"));
    with_plugin_rules(preset, STYLISTIC)
}

fn stylistic_type_checked() -> Preset {
    let preset = Preset::new(name("stylistic-type-checked"))
        .description("stylistic plus rules that need type information")
        .extends(name("stylistic"));
    with_plugin_rules(preset, STYLISTIC_TYPE_CHECKED)
}

/// All shared configs of the plugin.
pub(crate) fn presets() -> Vec<Preset> {
    vec![
        base(),
        eslint_recommended(),
        recommended(),
        recommended_type_checked(),
        strict(),
        strict_type_checked(),
        stylistic(),
        stylistic_type_checked(),
    ]
}
