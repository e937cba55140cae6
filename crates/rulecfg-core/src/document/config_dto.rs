//! Deserialization types (DTO layer).
//!
//! These types exist solely for serde. TOML and JSON documents both land
//! here, then the loader converts them into domain model types.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocumentDto {
    /// Stop upward discovery at this document.
    #[serde(default)]
    pub root: bool,

    /// Environments, as `{ name = bool }` or a list of names.
    #[serde(default)]
    pub env: Option<EnvDto>,

    /// Extension chain (a single entry or a list).
    #[serde(default)]
    pub extends: Option<OneOrMany<String>>,

    /// Default parser.
    #[serde(default)]
    pub parser: Option<String>,

    /// Default parser options.
    #[serde(default)]
    pub parser_options: Option<ParserOptionsDto>,

    /// Plugin identifiers.
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Explicit globals.
    #[serde(default)]
    pub globals: BTreeMap<String, GlobalDto>,

    /// Glob-scoped layers.
    #[serde(default)]
    pub overrides: Vec<OverrideDto>,

    /// Rule table. Settings stay untyped until the loader validates them.
    #[serde(default)]
    pub rules: BTreeMap<String, Value>,

    /// `replace` (default) or `inherit`.
    #[serde(default)]
    pub option_merge: Option<String>,

    /// `declaration` (default) or `specificity`.
    #[serde(default)]
    pub naming_priority: Option<String>,
}

/// A single value or a list of values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// Single value.
    One(T),
    /// List of values.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Flattens into a list.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

/// Environment declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnvDto {
    /// `{ browser = true, node = false }`; false entries are ignored.
    Map(BTreeMap<String, bool>),
    /// `["browser", "node"]`
    List(Vec<String>),
}

impl EnvDto {
    /// Returns the enabled environment names.
    #[must_use]
    pub fn enabled(self) -> Vec<String> {
        match self {
            Self::Map(map) => map
                .into_iter()
                .filter_map(|(name, on)| {
                    if !on {
                        tracing::debug!(env = %name, "environment disabled, ignoring");
                    }
                    on.then_some(name)
                })
                .collect(),
            Self::List(names) => names,
        }
    }
}

/// A global declaration: access literal or bool (true = writable).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GlobalDto {
    /// `true` / `false`
    Flag(bool),
    /// `"readonly"` / `"writable"`
    Access(String),
}

/// Raw parser options. Unknown keys are kept for the parser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserOptionsDto {
    /// `script`, `module`, or `commonjs`.
    #[serde(default)]
    pub source_type: Option<String>,
    /// Year, edition number, or `"latest"`.
    #[serde(default)]
    pub ecma_version: Option<Value>,
    /// e.g. `[".svelte"]`
    #[serde(default)]
    pub extra_file_extensions: Option<Vec<String>>,
    /// Type-aware project reference(s).
    #[serde(default)]
    pub project: Option<Value>,
    /// Everything else.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Raw override.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideDto {
    /// Include globs.
    pub files: OneOrMany<String>,
    /// Exclude globs.
    #[serde(default)]
    pub excluded_files: Option<OneOrMany<String>>,
    /// Parser for matching files.
    #[serde(default)]
    pub parser: Option<String>,
    /// Parser options for matching files.
    #[serde(default)]
    pub parser_options: Option<ParserOptionsDto>,
    /// Presets for matching files.
    #[serde(default)]
    pub extends: Option<OneOrMany<String>>,
    /// Additional environments.
    #[serde(default)]
    pub env: Option<EnvDto>,
    /// Additional plugins.
    #[serde(default)]
    pub plugins: Vec<String>,
    /// Additional globals.
    #[serde(default)]
    pub globals: BTreeMap<String, GlobalDto>,
    /// Rules for matching files.
    #[serde(default)]
    pub rules: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_empty() {
        let dto: ConfigDocumentDto = toml::from_str("").unwrap();
        assert!(!dto.root);
        assert!(dto.rules.is_empty());
        assert!(dto.overrides.is_empty());
    }

    #[test]
    fn deserialize_full_toml() {
        let toml_str = r#"
root = true
extends = ["eslint:recommended", "prettier"]
parser = "@typescript-eslint/parser"
plugins = ["@typescript-eslint"]

[env]
browser = true
node = false

[parserOptions]
sourceType = "module"
ecmaVersion = 2020
extraFileExtensions = [".svelte"]
project = "./tsconfig.json"

[[overrides]]
files = ["*.svelte"]
parser = "svelte-eslint-parser"

[overrides.parserOptions]
parser = "@typescript-eslint/parser"

[rules]
"no-console" = "warn"
curly = ["error", "all"]
"@typescript-eslint/explicit-function-return-type" = ["error", { allowExpressions = true }]
"#;
        let dto: ConfigDocumentDto = toml::from_str(toml_str).unwrap();
        assert!(dto.root);
        assert_eq!(
            dto.extends.unwrap().into_vec(),
            vec!["eslint:recommended".to_string(), "prettier".to_string()]
        );
        assert_eq!(dto.env.unwrap().enabled(), vec!["browser".to_string()]);
        let options = dto.parser_options.unwrap();
        assert_eq!(options.source_type.as_deref(), Some("module"));
        assert_eq!(options.ecma_version, Some(json!(2020)));
        assert_eq!(dto.overrides.len(), 1);
        let override_options = dto.overrides[0].parser_options.as_ref().unwrap();
        assert_eq!(
            override_options.extra.get("parser"),
            Some(&json!("@typescript-eslint/parser"))
        );
        assert_eq!(dto.rules["no-console"], json!("warn"));
        assert_eq!(dto.rules["curly"], json!(["error", "all"]));
        assert_eq!(
            dto.rules["@typescript-eslint/explicit-function-return-type"],
            json!(["error", { "allowExpressions": true }])
        );
    }

    #[test]
    fn deserialize_json_with_null_format() {
        let json_str = r#"{
            "extends": "eslint:recommended",
            "env": ["node"],
            "overrides": [{ "files": "*.ts", "rules": { "no-undef": "off" } }],
            "rules": {
                "@typescript-eslint/naming-convention": [
                    "error",
                    { "selector": "objectLiteralProperty", "format": null }
                ]
            }
        }"#;
        let dto: ConfigDocumentDto = serde_json::from_str(json_str).unwrap();
        assert_eq!(dto.extends, Some(OneOrMany::One("eslint:recommended".into())));
        assert_eq!(dto.env, Some(EnvDto::List(vec!["node".into()])));
        assert_eq!(dto.overrides[0].files, OneOrMany::One("*.ts".into()));
        assert_eq!(
            dto.rules["@typescript-eslint/naming-convention"][1]["format"],
            Value::Null
        );
    }

    #[test]
    fn globals_accept_flags_and_literals() {
        let dto: ConfigDocumentDto = toml::from_str(
            r#"
[globals]
__APP_VERSION__ = "readonly"
legacy = true
"#,
        )
        .unwrap();
        assert_eq!(dto.globals["__APP_VERSION__"], GlobalDto::Access("readonly".into()));
        assert_eq!(dto.globals["legacy"], GlobalDto::Flag(true));
    }
}
