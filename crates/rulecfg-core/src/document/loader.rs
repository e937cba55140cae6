//! DTO → Domain model conversion with validation.

use miette::Diagnostic;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::naming::{NamingConvention, NamingPriority, NAMING_CONVENTION_RULE};
use crate::registry::normalize_plugin_id;
use crate::types::{OptionMerge, RuleConfig, RuleSetting};

use super::config_dto::{ConfigDocumentDto, GlobalDto, OneOrMany, OverrideDto, ParserOptionsDto};
use super::model::{
    ConfigDocument, EcmaVersion, FileMatcher, FileOverride, GlobPattern, GlobalAccess, ModelError,
    ParserOptions, PresetRef, SourceType,
};

/// Errors while loading or composing configuration. All are fatal.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum LoadError {
    /// A configuration file could not be read.
    #[error("failed to read {}", path.display())]
    #[diagnostic(code(rulecfg::io))]
    Io {
        /// The file.
        path: PathBuf,
        /// The I/O error.
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML/JSON or has the wrong shape.
    #[error("failed to parse {origin}: {message}")]
    #[diagnostic(code(rulecfg::parse))]
    Parse {
        /// File path or `<inline>`.
        origin: String,
        /// Parser message.
        message: String,
    },

    /// A field-level validation error.
    #[error("{context}: {source}")]
    #[diagnostic(code(rulecfg::invalid_field))]
    Validation {
        /// Where the error occurred (e.g., "parserOptions.sourceType").
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// An `extends` entry names no registered preset.
    #[error("{context}: unknown preset `{name}`")]
    #[diagnostic(
        code(rulecfg::unknown_preset),
        help("run `rulecfg list-presets` to see the available presets")
    )]
    UnknownPreset {
        /// The preset name as written.
        name: String,
        /// Where it was referenced.
        context: String,
    },

    /// A plugin (or a namespaced rule's plugin) is not registered or active.
    #[error("{context}: unknown plugin `{name}`")]
    #[diagnostic(
        code(rulecfg::unknown_plugin),
        help("declare the plugin in `plugins` or extend a preset that does")
    )]
    UnknownPlugin {
        /// The normalized plugin id.
        name: String,
        /// Where it was referenced.
        context: String,
    },

    /// An environment is not registered.
    #[error("{context}: unknown environment `{name}`")]
    #[diagnostic(code(rulecfg::unknown_environment))]
    UnknownEnvironment {
        /// The environment name.
        name: String,
        /// Where it was referenced.
        context: String,
    },

    /// An override glob is empty or has invalid syntax.
    #[error("{context}: malformed glob `{pattern}`: {reason}")]
    #[diagnostic(code(rulecfg::malformed_glob))]
    MalformedGlob {
        /// Where the glob was declared.
        context: String,
        /// The pattern as written.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },

    /// A rule setting or its options cannot be parsed.
    #[error("{context}: malformed options for `{rule}`: {reason}")]
    #[diagnostic(code(rulecfg::malformed_options))]
    MalformedOptions {
        /// The rule identifier.
        rule: String,
        /// Where the setting was declared.
        context: String,
        /// What is wrong.
        reason: String,
    },

    /// Presets extend each other in a loop.
    #[error("extends cycle: {}", chain.join(" -> "))]
    #[diagnostic(code(rulecfg::extends_cycle))]
    ExtendsCycle {
        /// The chain, ending with the repeated entry.
        chain: Vec<String>,
    },
}

/// Converts a `ConfigDocumentDto` to a validated `ConfigDocument`.
///
/// `source` is the file the document came from; relative `extends` entries
/// and override globs resolve against its directory.
///
/// # Errors
///
/// Returns the first error encountered during conversion.
pub fn load(dto: ConfigDocumentDto, source: Option<&Path>) -> Result<ConfigDocument, LoadError> {
    let base_dir = source.and_then(Path::parent);

    let option_merge = match dto.option_merge.as_deref() {
        None | Some("replace") => OptionMerge::Replace,
        Some("inherit") => OptionMerge::Inherit,
        Some(other) => return Err(unknown_choice("optionMerge", other)),
    };
    let naming_priority = match dto.naming_priority.as_deref() {
        None | Some("declaration") => NamingPriority::Declaration,
        Some("specificity") => NamingPriority::Specificity,
        Some(other) => return Err(unknown_choice("namingPriority", other)),
    };

    let rules = convert_rules(dto.rules, "rules", naming_priority)?;
    let parser_options = dto
        .parser_options
        .map(|p| convert_parser_options(p, "parserOptions"))
        .transpose()?
        .unwrap_or_default();

    let overrides = dto
        .overrides
        .into_iter()
        .enumerate()
        .map(|(i, o)| convert_override(o, i, base_dir, naming_priority))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConfigDocument {
        root: dto.root,
        source: source.map(Path::to_path_buf),
        env: dto.env.map(|e| e.enabled().into_iter().collect()).unwrap_or_default(),
        extends: convert_extends(dto.extends, base_dir),
        parser: dto.parser,
        parser_options,
        plugins: convert_plugins(&dto.plugins),
        globals: convert_globals(dto.globals, "globals")?,
        overrides,
        rules,
        option_merge,
        naming_priority,
    })
}

fn unknown_choice(field: &'static str, value: &str) -> LoadError {
    LoadError::Validation {
        context: field.to_string(),
        source: ModelError::UnknownChoice {
            field,
            value: value.to_string(),
        },
    }
}

fn convert_extends(extends: Option<OneOrMany<String>>, base_dir: Option<&Path>) -> Vec<PresetRef> {
    extends
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .iter()
        .map(|entry| PresetRef::parse(entry, base_dir))
        .collect()
}

fn convert_plugins(plugins: &[String]) -> BTreeSet<String> {
    plugins.iter().map(|p| normalize_plugin_id(p)).collect()
}

/// Parses and validates a rule table.
///
/// Naming-convention options are parsed eagerly so malformed selectors fail
/// at load time rather than on first use.
///
/// # Errors
///
/// Returns `MalformedOptions` for any setting that does not parse.
pub fn convert_rules(
    raw: BTreeMap<String, Value>,
    context: &str,
    priority: NamingPriority,
) -> Result<RuleConfig, LoadError> {
    raw.into_iter()
        .map(|(rule, value)| {
            let setting = RuleSetting::from_value(&value)
                .map_err(|e| malformed_options(&rule, context, &e))?;
            if rule == NAMING_CONVENTION_RULE {
                NamingConvention::from_setting(&setting, priority)
                    .map_err(|e| malformed_options(&rule, context, &e))?;
            }
            Ok((rule, setting))
        })
        .collect()
}

fn malformed_options(rule: &str, context: &str, error: &ModelError) -> LoadError {
    LoadError::MalformedOptions {
        rule: rule.to_string(),
        context: context.to_string(),
        reason: error.to_string(),
    }
}

fn convert_parser_options(dto: ParserOptionsDto, context: &str) -> Result<ParserOptions, LoadError> {
    let source_type = dto
        .source_type
        .as_deref()
        .map(SourceType::parse)
        .transpose()
        .map_err(|e| LoadError::Validation {
            context: format!("{context}.sourceType"),
            source: e,
        })?;
    let ecma_version = dto
        .ecma_version
        .as_ref()
        .map(EcmaVersion::from_value)
        .transpose()
        .map_err(|e| LoadError::Validation {
            context: format!("{context}.ecmaVersion"),
            source: e,
        })?;
    Ok(ParserOptions {
        source_type,
        ecma_version,
        extra_file_extensions: dto.extra_file_extensions,
        project: dto.project,
        extra: dto.extra,
    })
}

fn convert_globals(
    raw: BTreeMap<String, GlobalDto>,
    context: &str,
) -> Result<BTreeMap<String, GlobalAccess>, LoadError> {
    raw.into_iter()
        .map(|(name, value)| {
            let access = match value {
                GlobalDto::Flag(true) => GlobalAccess::Writable,
                GlobalDto::Flag(false) => GlobalAccess::Readonly,
                GlobalDto::Access(literal) => {
                    GlobalAccess::parse(&literal).map_err(|e| LoadError::Validation {
                        context: format!("{context}.{name}"),
                        source: e,
                    })?
                }
            };
            Ok((name, access))
        })
        .collect()
}

fn convert_globs(
    patterns: Vec<String>,
    context: &str,
) -> Result<Vec<GlobPattern>, LoadError> {
    patterns
        .into_iter()
        .enumerate()
        .map(|(j, pattern)| {
            GlobPattern::new(&pattern).map_err(|e| LoadError::MalformedGlob {
                context: format!("{context}[{j}]"),
                reason: match e {
                    ModelError::InvalidGlobPattern { reason, .. } => reason,
                    other => other.to_string(),
                },
                pattern,
            })
        })
        .collect()
}

fn convert_override(
    dto: OverrideDto,
    index: usize,
    base_dir: Option<&Path>,
    priority: NamingPriority,
) -> Result<FileOverride, LoadError> {
    let ctx = format!("overrides[{index}]");

    let files = convert_globs(dto.files.into_vec(), &format!("{ctx}.files"))?;
    let excluded = convert_globs(
        dto.excluded_files.map(OneOrMany::into_vec).unwrap_or_default(),
        &format!("{ctx}.excludedFiles"),
    )?;
    let matcher = FileMatcher::new(files, excluded).map_err(|e| LoadError::MalformedGlob {
        context: format!("{ctx}.files"),
        pattern: String::new(),
        reason: e.to_string(),
    })?;

    let parser_options = dto
        .parser_options
        .map(|p| convert_parser_options(p, &format!("{ctx}.parserOptions")))
        .transpose()?;

    Ok(FileOverride {
        matcher,
        base_dir: base_dir.map(Path::to_path_buf),
        parser: dto.parser,
        parser_options,
        extends: convert_extends(dto.extends, base_dir),
        env: dto.env.map(|e| e.enabled().into_iter().collect()).unwrap_or_default(),
        plugins: convert_plugins(&dto.plugins),
        globals: convert_globals(dto.globals, &format!("{ctx}.globals"))?,
        rules: convert_rules(dto.rules, &format!("{ctx}.rules"), priority)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use serde_json::json;

    fn load_toml(content: &str) -> Result<ConfigDocument, LoadError> {
        let dto: ConfigDocumentDto = toml::from_str(content).unwrap();
        load(dto, Some(Path::new("/repo/.rulecfg.toml")))
    }

    #[test]
    fn load_minimal() {
        let doc = load_toml("").unwrap();
        assert!(!doc.is_root());
        assert!(doc.rules().is_empty());
        assert_eq!(doc.option_merge(), OptionMerge::Replace);
        assert_eq!(doc.naming_priority(), NamingPriority::Declaration);
    }

    #[test]
    fn load_full_document() {
        let doc = load_toml(
            r#"
root = true
extends = ["eslint:recommended", "./base.toml"]
parser = "@typescript-eslint/parser"
plugins = ["@typescript-eslint/eslint-plugin", "eslint-plugin-svelte"]

[env]
browser = true
es2017 = true
node = false

[parserOptions]
sourceType = "module"
ecmaVersion = 11

[[overrides]]
files = "*.svelte"
excludedFiles = ["*.test.svelte"]
parser = "svelte-eslint-parser"

[rules]
curly = ["error", "all"]
"no-console" = 1
"#,
        )
        .unwrap();

        assert!(doc.is_root());
        assert_eq!(
            doc.extends(),
            &[
                PresetRef::Named("eslint:recommended".into()),
                PresetRef::File(PathBuf::from("/repo/base.toml")),
            ]
        );
        let plugins: Vec<&str> = doc.plugins().iter().map(String::as_str).collect();
        assert_eq!(plugins, vec!["@typescript-eslint", "svelte"]);
        let env: Vec<&str> = doc.env().iter().map(String::as_str).collect();
        assert_eq!(env, vec!["browser", "es2017"]);
        assert_eq!(doc.parser_options().ecma_version, Some(EcmaVersion::Year(2020)));
        assert_eq!(doc.rules().severity("no-console"), Some(Severity::Warn));
        assert_eq!(doc.rules().get("curly").unwrap().options, vec![json!("all")]);

        let ov = &doc.overrides()[0];
        assert_eq!(ov.base_dir.as_deref(), Some(Path::new("/repo")));
        assert!(ov.applies_to(Path::new("/repo/src/App.svelte")));
        assert!(!ov.applies_to(Path::new("/repo/src/App.test.svelte")));
    }

    #[test]
    fn malformed_glob_reports_context() {
        let err = load_toml(
            r#"
[[overrides]]
files = ["src/[.ts"]
"#,
        )
        .unwrap_err();
        match err {
            LoadError::MalformedGlob { context, pattern, .. } => {
                assert_eq!(context, "overrides[0].files[0]");
                assert_eq!(pattern, "src/[.ts");
            }
            other => panic!("expected MalformedGlob, got {other:?}"),
        }
    }

    #[test]
    fn empty_override_files_is_malformed_glob() {
        let err = load_toml(
            r"
[[overrides]]
files = []
",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::MalformedGlob { .. }));
    }

    #[test]
    fn malformed_setting_is_rejected() {
        let err = load_toml(
            r#"
[rules]
curly = "fatal"
"#,
        )
        .unwrap_err();
        match err {
            LoadError::MalformedOptions { rule, context, .. } => {
                assert_eq!(rule, "curly");
                assert_eq!(context, "rules");
            }
            other => panic!("expected MalformedOptions, got {other:?}"),
        }
    }

    #[test]
    fn malformed_naming_options_fail_at_load() {
        let err = load_toml(
            r#"
[[overrides]]
files = "*.ts"

[overrides.rules]
"@typescript-eslint/naming-convention" = ["error", { selector = "variable", format = ["kebab-case"] }]
"#,
        )
        .unwrap_err();
        match err {
            LoadError::MalformedOptions { rule, context, .. } => {
                assert_eq!(rule, NAMING_CONVENTION_RULE);
                assert_eq!(context, "overrides[0].rules");
            }
            other => panic!("expected MalformedOptions, got {other:?}"),
        }
    }

    #[test]
    fn unknown_choices_are_rejected() {
        assert!(matches!(
            load_toml(r#"optionMerge = "deep""#),
            Err(LoadError::Validation { .. })
        ));
        assert!(matches!(
            load_toml(r#"namingPriority = "alphabetical""#),
            Err(LoadError::Validation { .. })
        ));
        let err = load_toml(
            r#"
[parserOptions]
sourceType = "esm"
"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "parserOptions.sourceType: unknown sourceType `esm`, expected: script, module, commonjs"
        );
    }

    #[test]
    fn globals_accept_bools() {
        let doc = load_toml(
            r#"
[globals]
legacy = true
frozen = false
app = "readonly"
"#,
        )
        .unwrap();
        assert_eq!(doc.globals()["legacy"], GlobalAccess::Writable);
        assert_eq!(doc.globals()["frozen"], GlobalAccess::Readonly);
        assert_eq!(doc.globals()["app"], GlobalAccess::Readonly);
    }

    #[test]
    fn inherit_merge_is_parsed() {
        let doc = load_toml(r#"optionMerge = "inherit""#).unwrap();
        assert_eq!(doc.option_merge(), OptionMerge::Inherit);
    }
}
