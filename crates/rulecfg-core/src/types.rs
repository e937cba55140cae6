//! Core types for rule settings and rule tables.

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::document::model::ModelError;

/// Severity level of a configured rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Rule is disabled.
    Off,
    /// Violations are reported as warnings.
    Warn,
    /// Violations are reported as errors.
    Error,
}

impl Severity {
    /// Parses a severity from its literal (`"off"`, `"warn"`, `"error"`)
    /// or numeric (`0`, `1`, `2`) form.
    ///
    /// # Errors
    ///
    /// Returns an error for any other value.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::String(s) => match s.as_str() {
                "off" => Ok(Self::Off),
                "warn" => Ok(Self::Warn),
                "error" => Ok(Self::Error),
                _ => Err(ModelError::UnknownSeverity { value: s.clone() }),
            },
            Value::Number(n) => match n.as_u64() {
                Some(0) => Ok(Self::Off),
                Some(1) => Ok(Self::Warn),
                Some(2) => Ok(Self::Error),
                _ => Err(ModelError::UnknownSeverity {
                    value: n.to_string(),
                }),
            },
            other => Err(ModelError::UnknownSeverity {
                value: other.to_string(),
            }),
        }
    }

    /// Returns the literal form of this severity.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a later rule setting combines with an earlier one for the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionMerge {
    /// The later setting replaces the earlier one entirely.
    #[default]
    Replace,
    /// A later severity-only setting keeps the earlier setting's options.
    Inherit,
}

/// A single rule setting: severity plus an ordered list of options.
///
/// Serializes back to the compact form: a bare severity when there are no
/// options, otherwise `[severity, option...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetting {
    /// Severity of the rule.
    pub severity: Severity,
    /// Rule-specific options. Opaque to the resolver.
    pub options: Vec<Value>,
}

impl RuleSetting {
    /// Creates a setting without options.
    #[must_use]
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    /// Creates a setting with options.
    #[must_use]
    pub fn with_options(severity: Severity, options: Vec<Value>) -> Self {
        Self { severity, options }
    }

    /// Parses a setting from a severity literal or `[severity, option...]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has neither shape.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        match value {
            Value::String(_) | Value::Number(_) => Ok(Self::new(Severity::from_value(value)?)),
            Value::Array(items) => {
                let (head, rest) = items.split_first().ok_or(ModelError::MalformedSetting {
                    reason: "empty array, expected [severity, ...options]".to_string(),
                })?;
                let severity = Severity::from_value(head)?;
                Ok(Self::with_options(severity, rest.to_vec()))
            }
            other => Err(ModelError::MalformedSetting {
                reason: format!("expected a severity or [severity, ...options], got {other}"),
            }),
        }
    }

    /// Returns true if the rule is not `off`.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.severity != Severity::Off
    }
}

impl Serialize for RuleSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.options.is_empty() {
            return self.severity.serialize(serializer);
        }
        let mut seq = serializer.serialize_seq(Some(self.options.len() + 1))?;
        seq.serialize_element(&self.severity)?;
        for option in &self.options {
            seq.serialize_element(option)?;
        }
        seq.end()
    }
}

/// A rule table: rule identifier to setting, ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuleConfig(BTreeMap<String, RuleSetting>);

impl RuleConfig {
    /// Creates an empty rule table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a rule setting.
    pub fn insert(&mut self, rule: impl Into<String>, setting: RuleSetting) {
        self.0.insert(rule.into(), setting);
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, rule: impl Into<String>, setting: RuleSetting) -> Self {
        self.insert(rule, setting);
        self
    }

    /// Gets the setting for a rule.
    #[must_use]
    pub fn get(&self, rule: &str) -> Option<&RuleSetting> {
        self.0.get(rule)
    }

    /// Gets the severity of a rule, if configured.
    #[must_use]
    pub fn severity(&self, rule: &str) -> Option<Severity> {
        self.0.get(rule).map(|s| s.severity)
    }

    /// Returns true if the rule is configured and not `off`.
    #[must_use]
    pub fn is_enabled(&self, rule: &str) -> bool {
        self.0.get(rule).is_some_and(RuleSetting::is_enabled)
    }

    /// Iterates over all rules in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over the rules that are not `off`.
    pub fn enabled(&self) -> impl Iterator<Item = (&str, &RuleSetting)> {
        self.iter().filter(|(_, s)| s.is_enabled())
    }

    /// Number of configured rules (including `off`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no rules are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlays `other` onto this table, key by key.
    pub fn overlay(&mut self, other: &Self, merge: OptionMerge) {
        for (rule, setting) in &other.0 {
            match (merge, self.0.get_mut(rule)) {
                (OptionMerge::Inherit, Some(existing)) if setting.options.is_empty() => {
                    existing.severity = setting.severity;
                }
                _ => {
                    self.0.insert(rule.clone(), setting.clone());
                }
            }
        }
    }

    /// Renders one `rule: setting` line per rule.
    #[must_use]
    pub fn render_compact(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        for (rule, setting) in &self.0 {
            let rendered = serde_json::to_string(setting)
                .unwrap_or_else(|_| setting.severity.to_string());
            let _ = writeln!(out, "{rule}: {}", rendered.trim_matches('"'));
        }
        out
    }
}

impl FromIterator<(String, RuleSetting)> for RuleConfig {
    fn from_iter<I: IntoIterator<Item = (String, RuleSetting)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn severity_accepts_literals_and_numbers() {
        assert_eq!(Severity::from_value(&json!("warn")).unwrap(), Severity::Warn);
        assert_eq!(Severity::from_value(&json!(2)).unwrap(), Severity::Error);
        assert_eq!(Severity::from_value(&json!(0)).unwrap(), Severity::Off);
    }

    #[test]
    fn severity_rejects_unknown() {
        assert!(matches!(
            Severity::from_value(&json!("fatal")),
            Err(ModelError::UnknownSeverity { .. })
        ));
        assert!(Severity::from_value(&json!(3)).is_err());
        assert!(Severity::from_value(&json!(true)).is_err());
    }

    #[test]
    fn setting_parses_array_form() {
        let setting = RuleSetting::from_value(&json!(["error", "all"])).unwrap();
        assert_eq!(setting.severity, Severity::Error);
        assert_eq!(setting.options, vec![json!("all")]);
    }

    #[test]
    fn setting_rejects_empty_array_and_objects() {
        assert!(matches!(
            RuleSetting::from_value(&json!([])),
            Err(ModelError::MalformedSetting { .. })
        ));
        assert!(matches!(
            RuleSetting::from_value(&json!({ "severity": "error" })),
            Err(ModelError::MalformedSetting { .. })
        ));
    }

    #[test]
    fn setting_serializes_compact() {
        let bare = RuleSetting::new(Severity::Warn);
        assert_eq!(serde_json::to_string(&bare).unwrap(), r#""warn""#);

        let with = RuleSetting::with_options(Severity::Error, vec![json!("type")]);
        assert_eq!(serde_json::to_string(&with).unwrap(), r#"["error","type"]"#);
    }

    #[test]
    fn overlay_replace_drops_earlier_options() {
        let mut base = RuleConfig::new().with(
            "curly",
            RuleSetting::with_options(Severity::Error, vec![json!("all")]),
        );
        let later = RuleConfig::new().with("curly", RuleSetting::new(Severity::Warn));
        base.overlay(&later, OptionMerge::Replace);
        assert_eq!(base.get("curly"), Some(&RuleSetting::new(Severity::Warn)));
    }

    #[test]
    fn overlay_inherit_keeps_earlier_options() {
        let mut base = RuleConfig::new().with(
            "curly",
            RuleSetting::with_options(Severity::Error, vec![json!("all")]),
        );
        let later = RuleConfig::new().with("curly", RuleSetting::new(Severity::Warn));
        base.overlay(&later, OptionMerge::Inherit);
        let setting = base.get("curly").unwrap();
        assert_eq!(setting.severity, Severity::Warn);
        assert_eq!(setting.options, vec![json!("all")]);
    }

    #[test]
    fn overlay_inherit_replaces_when_options_given() {
        let mut base = RuleConfig::new().with(
            "curly",
            RuleSetting::with_options(Severity::Error, vec![json!("all")]),
        );
        let later = RuleConfig::new().with(
            "curly",
            RuleSetting::with_options(Severity::Warn, vec![json!("multi")]),
        );
        base.overlay(&later, OptionMerge::Inherit);
        assert_eq!(base.get("curly").unwrap().options, vec![json!("multi")]);
    }

    #[test]
    fn enabled_skips_off_rules() {
        let rules = RuleConfig::new()
            .with("a", RuleSetting::new(Severity::Off))
            .with("b", RuleSetting::new(Severity::Warn));
        let enabled: Vec<&str> = rules.enabled().map(|(k, _)| k).collect();
        assert_eq!(enabled, vec!["b"]);
        assert!(!rules.is_enabled("a"));
        assert!(!rules.is_enabled("missing"));
    }
}
