//! Naming-convention rule options and symbol validation.
//!
//! The rule's options are a priority-ordered table of selector rules. A
//! symbol is checked against the first rule that applies to it; `format`
//! being absent (or `null`) leaves the symbol unchecked.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

use crate::document::model::ModelError;
use crate::types::{RuleSetting, Severity};

/// Rule identifier whose options are a naming-convention table.
pub const NAMING_CONVENTION_RULE: &str = "@typescript-eslint/naming-convention";

/// Category of symbol a selector rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Selector {
    /// Applies to every symbol.
    Default,
    /// Classes, interfaces, type aliases, enums, type parameters.
    TypeLike,
    /// Enum members.
    EnumMember,
    /// Class properties.
    ClassProperty,
    /// Function declarations.
    Function,
    /// Import bindings.
    Import,
    /// Constructor parameter properties.
    ParameterProperty,
    /// Function parameters.
    Parameter,
    /// Object literal keys.
    ObjectLiteralProperty,
    /// Properties of type literals and interfaces.
    TypeProperty,
    /// Variables.
    Variable,
}

impl Selector {
    /// Human-readable name used in diagnostics.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "Identifier",
            Self::TypeLike => "Type",
            Self::EnumMember => "Enum Member",
            Self::ClassProperty => "Class Property",
            Self::Function => "Function",
            Self::Import => "Import",
            Self::ParameterProperty => "Parameter Property",
            Self::Parameter => "Parameter",
            Self::ObjectLiteralProperty => "Object Literal Property",
            Self::TypeProperty => "Type Property",
            Self::Variable => "Variable",
        }
    }

    /// Parses the option spelling (`classProperty`, ...).
    ///
    /// # Errors
    ///
    /// Returns error for unknown selectors.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        serde_json::from_value(Value::String(value.to_string())).map_err(|_| {
            ModelError::InvalidNamingOptions {
                reason: format!("unknown selector `{value}`"),
            }
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualifier on a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum Modifier {
    Private,
    Protected,
    Public,
    Readonly,
    Static,
    Abstract,
    Const,
    Destructured,
    Exported,
    Global,
    Unused,
    Async,
    RequiresQuotes,
}

impl Modifier {
    /// Parses the option spelling (`private`, `requiresQuotes`, ...).
    ///
    /// # Errors
    ///
    /// Returns error for unknown modifiers.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        serde_json::from_value(Value::String(value.to_string())).map_err(|_| {
            ModelError::InvalidNamingOptions {
                reason: format!("unknown modifier `{value}`"),
            }
        })
    }
}

/// A casing convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamingFormat {
    /// `fooBar`
    #[serde(rename = "camelCase")]
    CamelCase,
    /// `fooBar`, no consecutive capitals.
    #[serde(rename = "strictCamelCase")]
    StrictCamelCase,
    /// `FooBar`
    #[serde(rename = "PascalCase")]
    PascalCase,
    /// `FooBar`, no consecutive capitals.
    #[serde(rename = "StrictPascalCase")]
    StrictPascalCase,
    /// `foo_bar`
    #[serde(rename = "snake_case")]
    SnakeCase,
    /// `FOO_BAR`
    #[serde(rename = "UPPER_CASE")]
    UpperCase,
}

impl NamingFormat {
    /// Tests whether `name` satisfies this format. Empty names satisfy all.
    #[must_use]
    pub fn check(self, name: &str) -> bool {
        let Some(first) = name.chars().next() else {
            return true;
        };
        match self {
            Self::CamelCase => !first.is_uppercase() && !name.contains('_'),
            Self::StrictCamelCase => !first.is_uppercase() && has_strict_camel_humps(name, false),
            Self::PascalCase => !first.is_lowercase() && !name.contains('_'),
            Self::StrictPascalCase => !first.is_lowercase() && has_strict_camel_humps(name, true),
            Self::SnakeCase => !name.chars().any(char::is_uppercase) && has_valid_underscores(name),
            Self::UpperCase => !name.chars().any(char::is_lowercase) && has_valid_underscores(name),
        }
    }

    /// Option spelling of this format.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CamelCase => "camelCase",
            Self::StrictCamelCase => "strictCamelCase",
            Self::PascalCase => "PascalCase",
            Self::StrictPascalCase => "StrictPascalCase",
            Self::SnakeCase => "snake_case",
            Self::UpperCase => "UPPER_CASE",
        }
    }
}

impl fmt::Display for NamingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Humps alternate case and never contain two capitals in a row.
fn has_strict_camel_humps(name: &str, mut is_upper: bool) -> bool {
    if name.starts_with('_') {
        return false;
    }
    for c in name.chars().skip(1) {
        if c == '_' {
            return false;
        }
        if is_upper == c.is_uppercase() {
            if is_upper {
                return false;
            }
        } else {
            is_upper = !is_upper;
        }
    }
    true
}

/// No leading, trailing, or doubled underscores.
fn has_valid_underscores(name: &str) -> bool {
    !name.starts_with('_') && !name.ends_with('_') && !name.contains("__")
}

/// Policy for a leading or trailing underscore.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnderscorePolicy {
    /// One underscore may be present; it is ignored for the format check.
    #[default]
    Allow,
    /// Exactly one underscore must be present.
    Require,
    /// No underscore may be present.
    Forbid,
}

/// Order in which selector rules are tried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingPriority {
    /// Declaration order; the first applicable rule wins.
    #[default]
    Declaration,
    /// Concrete selectors before `default`, then more modifiers first,
    /// then declaration order.
    Specificity,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct NamingSelectorRuleDto {
    selector: OneOrMany<Selector>,
    #[serde(default)]
    modifiers: Vec<Modifier>,
    #[serde(default)]
    format: Option<Vec<NamingFormat>>,
    #[serde(default)]
    leading_underscore: UnderscorePolicy,
    #[serde(default)]
    trailing_underscore: UnderscorePolicy,
    #[serde(default)]
    prefix: Vec<String>,
    #[serde(default)]
    suffix: Vec<String>,
}

/// One entry of the naming-convention table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingSelectorRule {
    /// Selectors this rule applies to.
    pub selectors: Vec<Selector>,
    /// Modifiers the symbol must carry (subset match).
    pub modifiers: BTreeSet<Modifier>,
    /// Allowed formats; `None` leaves the name unchecked.
    pub format: Option<Vec<NamingFormat>>,
    /// Leading underscore policy.
    pub leading_underscore: UnderscorePolicy,
    /// Trailing underscore policy.
    pub trailing_underscore: UnderscorePolicy,
    /// Required prefixes (any one), stripped before the format check.
    pub prefix: Vec<String>,
    /// Required suffixes (any one), stripped before the format check.
    pub suffix: Vec<String>,
}

impl NamingSelectorRule {
    /// Creates a rule for one selector with the given formats.
    #[must_use]
    pub fn new(selector: Selector, format: Option<Vec<NamingFormat>>) -> Self {
        Self {
            selectors: vec![selector],
            modifiers: BTreeSet::new(),
            format,
            leading_underscore: UnderscorePolicy::Allow,
            trailing_underscore: UnderscorePolicy::Allow,
            prefix: Vec::new(),
            suffix: Vec::new(),
        }
    }

    /// Adds a required modifier.
    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Sets the leading underscore policy.
    #[must_use]
    pub fn leading(mut self, policy: UnderscorePolicy) -> Self {
        self.leading_underscore = policy;
        self
    }

    /// Sets the trailing underscore policy.
    #[must_use]
    pub fn trailing(mut self, policy: UnderscorePolicy) -> Self {
        self.trailing_underscore = policy;
        self
    }

    /// Returns true if this rule applies to the symbol.
    #[must_use]
    pub fn applies_to(&self, symbol: &Symbol) -> bool {
        self.selectors
            .iter()
            .any(|s| *s == Selector::Default || *s == symbol.selector)
            && self.modifiers.is_subset(&symbol.modifiers)
    }

    fn is_concrete(&self) -> bool {
        !self.selectors.contains(&Selector::Default)
    }

    fn primary_selector(&self) -> Selector {
        self.selectors.first().copied().unwrap_or(Selector::Default)
    }

    fn check(&self, symbol: &Symbol) -> NamingVerdict {
        let Some(formats) = &self.format else {
            return NamingVerdict::Unchecked;
        };
        let fail = |reason: ViolationReason| {
            NamingVerdict::Fail(NamingFormatViolation::new(symbol, self, formats.clone(), reason))
        };

        let mut name = symbol.text.as_str();
        for (policy, position) in [
            (self.leading_underscore, Position::Leading),
            (self.trailing_underscore, Position::Trailing),
        ] {
            name = match strip_underscore(name, policy, position) {
                Ok(rest) => rest,
                Err(reason) => return fail(reason),
            };
        }

        if !self.prefix.is_empty() {
            match self.prefix.iter().find_map(|p| name.strip_prefix(p.as_str())) {
                Some(rest) => name = rest,
                None => return fail(ViolationReason::MissingAffix(Position::Leading)),
            }
        }
        if !self.suffix.is_empty() {
            match self.suffix.iter().find_map(|s| name.strip_suffix(s.as_str())) {
                Some(rest) => name = rest,
                None => return fail(ViolationReason::MissingAffix(Position::Trailing)),
            }
        }

        if formats.is_empty() || formats.iter().any(|f| f.check(name)) {
            NamingVerdict::Pass
        } else {
            fail(ViolationReason::FormatMismatch)
        }
    }
}

fn strip_underscore(
    name: &str,
    policy: UnderscorePolicy,
    position: Position,
) -> Result<&str, ViolationReason> {
    let stripped = match position {
        Position::Leading => name.strip_prefix('_'),
        Position::Trailing => name.strip_suffix('_'),
    };
    match (policy, stripped) {
        (UnderscorePolicy::Forbid, Some(_)) => Err(ViolationReason::UnexpectedUnderscore(position)),
        (UnderscorePolicy::Require, None) => Err(ViolationReason::MissingUnderscore(position)),
        (_, Some(rest)) => Ok(rest),
        (_, None) => Ok(name),
    }
}

/// A symbol to check, as reported by the analysis engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The symbol's category.
    pub selector: Selector,
    /// The symbol's qualifiers.
    pub modifiers: BTreeSet<Modifier>,
    /// The identifier text.
    pub text: String,
}

impl Symbol {
    /// Creates a symbol without modifiers.
    #[must_use]
    pub fn new(selector: Selector, text: impl Into<String>) -> Self {
        Self {
            selector,
            modifiers: BTreeSet::new(),
            text: text.into(),
        }
    }

    /// Adds a modifier.
    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }
}

/// Which end of the name a violation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Start of the name.
    Leading,
    /// End of the name.
    Trailing,
}

impl Position {
    fn as_str(self) -> &'static str {
        match self {
            Self::Leading => "leading",
            Self::Trailing => "trailing",
        }
    }
}

/// Why a name failed its selector rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationReason {
    /// A required underscore is missing.
    MissingUnderscore(Position),
    /// A forbidden underscore is present.
    UnexpectedUnderscore(Position),
    /// None of the required prefixes/suffixes is present.
    MissingAffix(Position),
    /// The name matches none of the allowed formats.
    FormatMismatch,
}

/// A naming-convention diagnostic. Non-fatal; passed to the reporting layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(rulecfg::naming_convention))]
pub struct NamingFormatViolation {
    message: String,
    #[help]
    help: Option<String>,
    /// The offending identifier.
    pub text: String,
    /// The symbol's selector.
    pub selector: Selector,
    /// Selector of the rule that was violated.
    pub rule_selector: Selector,
    /// Formats the rule allows.
    pub formats: Vec<NamingFormat>,
    /// The specific failure.
    pub reason: ViolationReason,
}

impl NamingFormatViolation {
    fn new(
        symbol: &Symbol,
        rule: &NamingSelectorRule,
        formats: Vec<NamingFormat>,
        reason: ViolationReason,
    ) -> Self {
        let kind = symbol.selector.label();
        let text = &symbol.text;
        let message = match reason {
            ViolationReason::MissingUnderscore(pos) => {
                format!("{kind} name `{text}` must have one {} underscore", pos.as_str())
            }
            ViolationReason::UnexpectedUnderscore(pos) => {
                format!("{kind} name `{text}` must not have a {} underscore", pos.as_str())
            }
            ViolationReason::MissingAffix(pos) => {
                let (what, affixes) = match pos {
                    Position::Leading => ("prefixes", &rule.prefix),
                    Position::Trailing => ("suffixes", &rule.suffix),
                };
                format!(
                    "{kind} name `{text}` must have one of the following {what}: {}",
                    affixes.join(", ")
                )
            }
            ViolationReason::FormatMismatch => format!(
                "{kind} name `{text}` must match one of the following formats: {}",
                join_formats(&formats)
            ),
        };
        let help = (!formats.is_empty()).then(|| format!("allowed formats: {}", join_formats(&formats)));
        Self {
            message,
            help,
            text: text.clone(),
            selector: symbol.selector,
            rule_selector: rule.primary_selector(),
            formats,
            reason,
        }
    }

    /// The rendered diagnostic message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

fn join_formats(formats: &[NamingFormat]) -> String {
    formats
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of checking one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingVerdict {
    /// The name satisfies the applicable rule.
    Pass,
    /// No rule applies, or the applicable rule has no format.
    Unchecked,
    /// The name violates the applicable rule.
    Fail(NamingFormatViolation),
}

impl NamingVerdict {
    /// Returns true for [`NamingVerdict::Fail`].
    #[must_use]
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }
}

/// A parsed naming-convention table, in check order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    severity: Severity,
    rules: Vec<NamingSelectorRule>,
}

impl NamingConvention {
    /// Creates a table from rules already in check order.
    #[must_use]
    pub fn new(severity: Severity, rules: Vec<NamingSelectorRule>) -> Self {
        Self { severity, rules }
    }

    /// Parses the rule's options (one object per selector rule).
    ///
    /// # Errors
    ///
    /// Returns error if any entry is not a valid selector rule.
    pub fn from_options(
        severity: Severity,
        options: &[Value],
        priority: NamingPriority,
    ) -> Result<Self, ModelError> {
        let mut rules = options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let dto: NamingSelectorRuleDto =
                    serde_json::from_value(option.clone()).map_err(|e| {
                        ModelError::InvalidNamingOptions {
                            reason: format!("entry {i}: {e}"),
                        }
                    })?;
                Ok(NamingSelectorRule {
                    selectors: dto.selector.into_vec(),
                    modifiers: dto.modifiers.into_iter().collect(),
                    format: dto.format,
                    leading_underscore: dto.leading_underscore,
                    trailing_underscore: dto.trailing_underscore,
                    prefix: dto.prefix,
                    suffix: dto.suffix,
                })
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        if priority == NamingPriority::Specificity {
            // stable: ties keep declaration order
            rules.sort_by_key(|r| (!r.is_concrete(), std::cmp::Reverse(r.modifiers.len())));
        }
        Ok(Self { severity, rules })
    }

    /// Parses from a full rule setting. Returns `Ok(None)` for `off`.
    ///
    /// # Errors
    ///
    /// Returns error if the options are malformed.
    pub fn from_setting(
        setting: &RuleSetting,
        priority: NamingPriority,
    ) -> Result<Option<Self>, ModelError> {
        if !setting.is_enabled() {
            return Ok(None);
        }
        Self::from_options(setting.severity, &setting.options, priority).map(Some)
    }

    /// Severity diagnostics from this table are reported at.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Rules in check order.
    #[must_use]
    pub fn rules(&self) -> &[NamingSelectorRule] {
        &self.rules
    }

    /// Checks a symbol against the first applicable rule.
    #[must_use]
    pub fn validate(&self, symbol: &Symbol) -> NamingVerdict {
        self.rules
            .iter()
            .find(|rule| rule.applies_to(symbol))
            .map_or(NamingVerdict::Unchecked, |rule| rule.check(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn private_property_table() -> NamingConvention {
        NamingConvention::new(
            Severity::Error,
            vec![
                NamingSelectorRule::new(Selector::ClassProperty, Some(vec![NamingFormat::CamelCase]))
                    .modifier(Modifier::Private)
                    .leading(UnderscorePolicy::Require),
                NamingSelectorRule::new(Selector::Default, Some(vec![NamingFormat::CamelCase])),
            ],
        )
    }

    // -- formats --

    #[test]
    fn camel_and_pascal() {
        assert!(NamingFormat::CamelCase.check("fooBar"));
        assert!(!NamingFormat::CamelCase.check("FooBar"));
        assert!(!NamingFormat::CamelCase.check("foo_bar"));
        assert!(NamingFormat::PascalCase.check("FooBar"));
        assert!(NamingFormat::PascalCase.check("HTMLElement"));
        assert!(!NamingFormat::PascalCase.check("fooBar"));
    }

    #[test]
    fn strict_variants_reject_consecutive_capitals() {
        assert!(NamingFormat::StrictCamelCase.check("fooBar"));
        assert!(!NamingFormat::StrictCamelCase.check("fooBAR"));
        assert!(NamingFormat::StrictPascalCase.check("FooBar"));
        assert!(!NamingFormat::StrictPascalCase.check("HTMLElement"));
    }

    #[test]
    fn snake_and_upper() {
        assert!(NamingFormat::SnakeCase.check("foo_bar"));
        assert!(!NamingFormat::SnakeCase.check("foo__bar"));
        assert!(!NamingFormat::SnakeCase.check("fooBar"));
        assert!(NamingFormat::UpperCase.check("MAX_SIZE"));
        assert!(NamingFormat::UpperCase.check("V2"));
        assert!(!NamingFormat::UpperCase.check("MAX_"));
        assert!(!NamingFormat::UpperCase.check("Max"));
    }

    // -- selection --

    #[test]
    fn private_property_requires_leading_underscore() {
        let table = private_property_table();
        let ok = Symbol::new(Selector::ClassProperty, "_foo").modifier(Modifier::Private);
        assert_eq!(table.validate(&ok), NamingVerdict::Pass);

        let missing = Symbol::new(Selector::ClassProperty, "foo").modifier(Modifier::Private);
        let NamingVerdict::Fail(violation) = table.validate(&missing) else {
            panic!("expected failure");
        };
        assert_eq!(violation.reason, ViolationReason::MissingUnderscore(Position::Leading));
        assert_eq!(violation.rule_selector, Selector::ClassProperty);
        assert_eq!(violation.formats, vec![NamingFormat::CamelCase]);
    }

    #[test]
    fn non_private_property_falls_through_to_default() {
        let table = private_property_table();
        let public = Symbol::new(Selector::ClassProperty, "foo");
        assert_eq!(table.validate(&public), NamingVerdict::Pass);

        // `default` allows one leading underscore, so only the casing is checked
        let bad = Symbol::new(Selector::ClassProperty, "Foo");
        let NamingVerdict::Fail(violation) = table.validate(&bad) else {
            panic!("expected failure");
        };
        assert_eq!(violation.rule_selector, Selector::Default);
        assert_eq!(violation.reason, ViolationReason::FormatMismatch);
    }

    #[test]
    fn null_format_is_unchecked() {
        let table = NamingConvention::new(
            Severity::Error,
            vec![
                NamingSelectorRule::new(Selector::ObjectLiteralProperty, None),
                NamingSelectorRule::new(Selector::Default, Some(vec![NamingFormat::CamelCase])),
            ],
        );
        for text in ["Content-Type", "__proto__", "x"] {
            let symbol = Symbol::new(Selector::ObjectLiteralProperty, text);
            assert_eq!(table.validate(&symbol), NamingVerdict::Unchecked);
        }
    }

    #[test]
    fn no_applicable_rule_is_unchecked() {
        let table = NamingConvention::new(
            Severity::Warn,
            vec![NamingSelectorRule::new(Selector::Variable, Some(vec![NamingFormat::CamelCase]))],
        );
        assert_eq!(
            table.validate(&Symbol::new(Selector::Function, "Whatever")),
            NamingVerdict::Unchecked
        );
    }

    #[test]
    fn declaration_order_lets_default_shadow_later_rules() {
        let options = vec![
            json!({ "selector": "default", "format": ["camelCase"] }),
            json!({ "selector": "enumMember", "format": ["UPPER_CASE"] }),
        ];
        let table =
            NamingConvention::from_options(Severity::Error, &options, NamingPriority::Declaration)
                .unwrap();
        assert!(table
            .validate(&Symbol::new(Selector::EnumMember, "MAX"))
            .is_fail());

        let table =
            NamingConvention::from_options(Severity::Error, &options, NamingPriority::Specificity)
                .unwrap();
        assert_eq!(
            table.validate(&Symbol::new(Selector::EnumMember, "MAX")),
            NamingVerdict::Pass
        );
    }

    #[test]
    fn specificity_prefers_more_modifiers() {
        let options = vec![
            json!({ "selector": "variable", "format": ["camelCase"] }),
            json!({ "selector": "variable", "modifiers": ["const"], "format": ["camelCase", "UPPER_CASE"] }),
        ];
        let table =
            NamingConvention::from_options(Severity::Error, &options, NamingPriority::Specificity)
                .unwrap();
        let constant = Symbol::new(Selector::Variable, "MAX_SIZE").modifier(Modifier::Const);
        assert_eq!(table.validate(&constant), NamingVerdict::Pass);
    }

    // -- underscores and affixes --

    #[test]
    fn forbidden_underscores() {
        let table = NamingConvention::new(
            Severity::Error,
            vec![NamingSelectorRule::new(Selector::Default, Some(vec![NamingFormat::CamelCase]))
                .leading(UnderscorePolicy::Forbid)
                .trailing(UnderscorePolicy::Forbid)],
        );
        let lead = table.validate(&Symbol::new(Selector::Variable, "_foo"));
        let NamingVerdict::Fail(v) = lead else {
            panic!("expected failure");
        };
        assert_eq!(v.reason, ViolationReason::UnexpectedUnderscore(Position::Leading));

        let trail = table.validate(&Symbol::new(Selector::Variable, "foo_"));
        let NamingVerdict::Fail(v) = trail else {
            panic!("expected failure");
        };
        assert_eq!(v.reason, ViolationReason::UnexpectedUnderscore(Position::Trailing));
    }

    #[test]
    fn prefix_is_stripped_before_format_check() {
        let options = vec![json!({
            "selector": "variable",
            "format": ["PascalCase"],
            "prefix": ["is", "has"],
        })];
        let table =
            NamingConvention::from_options(Severity::Error, &options, NamingPriority::Declaration)
                .unwrap();
        assert_eq!(
            table.validate(&Symbol::new(Selector::Variable, "isReady")),
            NamingVerdict::Pass
        );
        let NamingVerdict::Fail(v) = table.validate(&Symbol::new(Selector::Variable, "ready")) else {
            panic!("expected failure");
        };
        assert_eq!(v.reason, ViolationReason::MissingAffix(Position::Leading));
        assert!(v.message().contains("is, has"));
    }

    // -- parsing --

    #[test]
    fn parses_selector_arrays_and_null_format() {
        let options = vec![
            json!({ "selector": ["variable", "function"], "format": ["camelCase"] }),
            json!({ "selector": "objectLiteralProperty", "format": null }),
        ];
        let table =
            NamingConvention::from_options(Severity::Error, &options, NamingPriority::Declaration)
                .unwrap();
        assert_eq!(
            table.rules()[0].selectors,
            vec![Selector::Variable, Selector::Function]
        );
        assert_eq!(table.rules()[1].format, None);
    }

    #[test]
    fn rejects_unknown_selector_and_format() {
        let bad_selector = vec![json!({ "selector": "klass", "format": ["camelCase"] })];
        assert!(matches!(
            NamingConvention::from_options(Severity::Error, &bad_selector, NamingPriority::Declaration),
            Err(ModelError::InvalidNamingOptions { .. })
        ));
        let bad_format = vec![json!({ "selector": "default", "format": ["kebab-case"] })];
        assert!(NamingConvention::from_options(
            Severity::Error,
            &bad_format,
            NamingPriority::Declaration
        )
        .is_err());
        for unknown_key in [
            json!({ "selector": "default", "format": ["camelCase"], "leadingUnderScore": "forbid" }),
            json!({ "selector": "variable", "format": ["camelCase"], "filter": "^_" }),
            json!({ "selector": "variable", "format": ["camelCase"], "types": ["boolean"] }),
        ] {
            assert!(matches!(
                NamingConvention::from_options(Severity::Error, &[unknown_key], NamingPriority::Declaration),
                Err(ModelError::InvalidNamingOptions { .. })
            ));
        }
    }

    #[test]
    fn off_setting_yields_no_table() {
        let setting = RuleSetting::with_options(Severity::Off, vec![json!({ "selector": "klass" })]);
        assert_eq!(
            NamingConvention::from_setting(&setting, NamingPriority::Declaration).unwrap(),
            None
        );
    }

    #[test]
    fn violation_message_names_formats() {
        let table = private_property_table();
        let NamingVerdict::Fail(v) = table.validate(&Symbol::new(Selector::Variable, "Foo")) else {
            panic!("expected failure");
        };
        assert_eq!(
            v.message(),
            "Variable name `Foo` must match one of the following formats: camelCase"
        );
    }
}
