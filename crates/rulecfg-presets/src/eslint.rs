//! Core presets: `eslint:recommended`, `eslint:all` and `prettier`.

use rulecfg_core::{Preset, Severity};

use crate::with_rules;

/// Core rules enabled by `eslint:recommended`.
const RECOMMENDED: &[&str] = &[
    "constructor-super",
    "for-direction",
    "getter-return",
    "no-async-promise-executor",
    "no-case-declarations",
    "no-class-assign",
    "no-compare-neg-zero",
    "no-cond-assign",
    "no-const-assign",
    "no-constant-condition",
    "no-control-regex",
    "no-debugger",
    "no-delete-var",
    "no-dupe-args",
    "no-dupe-class-members",
    "no-dupe-else-if",
    "no-dupe-keys",
    "no-duplicate-case",
    "no-empty",
    "no-empty-character-class",
    "no-empty-pattern",
    "no-ex-assign",
    "no-extra-boolean-cast",
    "no-extra-semi",
    "no-fallthrough",
    "no-func-assign",
    "no-global-assign",
    "no-import-assign",
    "no-inner-declarations",
    "no-invalid-regexp",
    "no-irregular-whitespace",
    "no-loss-of-precision",
    "no-misleading-character-class",
    "no-mixed-spaces-and-tabs",
    "no-new-symbol",
    "no-nonoctal-decimal-escape",
    "no-obj-calls",
    "no-octal",
    "no-prototype-builtins",
    "no-redeclare",
    "no-regex-spaces",
    "no-self-assign",
    "no-setter-return",
    "no-shadow-restricted-names",
    "no-sparse-arrays",
    "no-this-before-super",
    "no-undef",
    "no-unexpected-multiline",
    "no-unreachable",
    "no-unsafe-finally",
    "no-unsafe-negation",
    "no-unsafe-optional-chaining",
    "no-unused-labels",
    "no-unused-vars",
    "no-useless-backreference",
    "no-useless-catch",
    "no-useless-escape",
    "no-with",
    "require-yield",
    "use-isnan",
    "valid-typeof",
];

/// Further core rules that are not in the recommended set.
const OPTIONAL: &[&str] = &[
    "curly",
    "dot-notation",
    "eqeqeq",
    "no-array-constructor",
    "no-console",
    "no-empty-function",
    "no-implied-eval",
    "no-throw-literal",
    "no-useless-constructor",
    "no-var",
    "prefer-const",
    "prefer-rest-params",
    "prefer-spread",
    "require-await",
];

/// Core formatting rules that conflict with an external formatter.
const FORMATTING: &[&str] = &[
    "array-bracket-spacing",
    "arrow-parens",
    "block-spacing",
    "brace-style",
    "comma-dangle",
    "comma-spacing",
    "eol-last",
    "func-call-spacing",
    "indent",
    "key-spacing",
    "keyword-spacing",
    "max-len",
    "no-extra-semi",
    "no-mixed-spaces-and-tabs",
    "no-multi-spaces",
    "no-trailing-spaces",
    "no-unexpected-multiline",
    "object-curly-spacing",
    "quotes",
    "semi",
    "space-before-function-paren",
    "space-infix-ops",
];

/// Plugin formatting rules the `prettier` preset also disables.
const PLUGIN_FORMATTING: &[&str] = &[
    "@typescript-eslint/brace-style",
    "@typescript-eslint/comma-dangle",
    "@typescript-eslint/indent",
    "@typescript-eslint/member-delimiter-style",
    "@typescript-eslint/quotes",
    "@typescript-eslint/semi",
    "@typescript-eslint/type-annotation-spacing",
    "svelte/indent",
];

/// `eslint:recommended`
#[must_use]
pub fn eslint_recommended() -> Preset {
    with_rules(
        Preset::new("eslint:recommended").description("Core rules that catch likely bugs"),
        None,
        Severity::Error,
        RECOMMENDED,
    )
}

/// `eslint:all`
#[must_use]
pub fn eslint_all() -> Preset {
    let preset = with_rules(
        Preset::new("eslint:all").description("Every core rule known to this registry"),
        None,
        Severity::Error,
        RECOMMENDED,
    );
    let preset = with_rules(preset, None, Severity::Error, OPTIONAL);
    with_rules(preset, None, Severity::Error, FORMATTING)
}

/// `prettier` (`eslint-config-prettier`): turns off every rule that
/// conflicts with the formatter. `curly` is included, so it must be
/// re-enabled after this preset if wanted.
#[must_use]
pub fn prettier() -> Preset {
    let preset = with_rules(
        Preset::new("prettier").description("Turns off rules that conflict with Prettier"),
        None,
        Severity::Off,
        FORMATTING,
    );
    let preset = with_rules(preset, None, Severity::Off, &["curly"]);
    with_rules(preset, None, Severity::Off, PLUGIN_FORMATTING)
}
