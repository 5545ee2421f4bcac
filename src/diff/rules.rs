//! Severity policy: rule keys, override tables and the named presets.
//!
//! Every emission site proposes a default severity together with a rule
//! key `(category, change-kind, sub-kind)`. The policy consults the
//! configured [`BreakingRules`] table: a rule can drop the change
//! entirely (`ignore`) or replace the default severity. Simple mode then
//! forces the severity to [`Severity::Unset`] without dropping anything.

use super::change::{Category, ChangeKind, Severity};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operational mode of a diff run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    /// Report differences without a breaking classification.
    Simple,
    /// Classify every difference (default).
    #[default]
    Breaking,
}

/// One severity override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakingRule {
    /// Drop matching changes entirely.
    pub ignore: bool,
    /// Replace the default severity (breaking mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl BreakingRule {
    /// A rule that drops matching changes.
    pub fn ignored() -> Self {
        Self {
            ignore: true,
            severity: None,
        }
    }

    /// A rule that replaces the default severity.
    pub fn severity(severity: Severity) -> Self {
        Self {
            ignore: false,
            severity: Some(severity),
        }
    }
}

/// Compose the lookup key for a rule.
///
/// With a sub-kind: `{category}.{sub}{Kind}`, e.g.
/// `operation.operationIdModified`. Without one: `{category}.{kind}`,
/// e.g. `endpoint.removed`.
pub fn rule_key(category: Category, kind: ChangeKind, sub: &str) -> String {
    if sub.is_empty() {
        format!("{}.{}", category.as_str(), kind.as_str())
    } else {
        format!("{}.{}{}", category.as_str(), sub, kind.rule_suffix())
    }
}

/// User-configurable severity override table.
///
/// Serializes as a flat map so it can be loaded from a YAML/JSON file:
///
/// ```yaml
/// operation.operationIdModified:
///   ignore: true
/// schema.enumRemoved:
///   severity: warning
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakingRules {
    rules: BTreeMap<String, BreakingRule>,
}

impl BreakingRules {
    /// The default preset: no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// The strict preset: upgrades a documented set of warnings to error.
    pub fn strict() -> Self {
        let mut rules = Self::new();
        for key in [
            "operation.operationIdModified",
            "parameter.formatModified",
            "parameter.styleModified",
            "schema.formatModified",
            "schema.patternModified",
            "schema.propertyRemoved",
            "schema.minLengthModified",
            "security.added",
            "security.scopeRemoved",
            "server.removed",
            "server.variableModified",
        ] {
            rules.insert(key, BreakingRule::severity(Severity::Error));
        }
        rules
    }

    /// The lenient preset: downgrades a documented set to warning.
    pub fn lenient() -> Self {
        let mut rules = Self::new();
        for key in [
            "schema.enumRemoved",
            "schema.requiredAdded",
            "security.removed",
            "parameter.requiredModified",
        ] {
            rules.insert(key, BreakingRule::severity(Severity::Warning));
        }
        rules
    }

    /// Resolve a named preset.
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "default" => Ok(Self::new()),
            "strict" => Ok(Self::strict()),
            "lenient" => Ok(Self::lenient()),
            other => Err(crate::error::OasDiffError::config(format!(
                "unknown rules preset '{other}' (expected default, strict or lenient)"
            ))),
        }
    }

    /// Load a rules table from YAML or JSON content.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Register a rule.
    pub fn insert(&mut self, key: impl Into<String>, rule: BreakingRule) {
        self.rules.insert(key.into(), rule);
    }

    /// Builder-style: drop changes matching `key`.
    #[must_use]
    pub fn with_ignore(mut self, key: impl Into<String>) -> Self {
        self.insert(key, BreakingRule::ignored());
        self
    }

    /// Builder-style: override the severity for `key`.
    #[must_use]
    pub fn with_severity(mut self, key: impl Into<String>, severity: Severity) -> Self {
        self.insert(key, BreakingRule::severity(severity));
        self
    }

    /// Look up a rule by composed key.
    pub fn get(&self, key: &str) -> Option<&BreakingRule> {
        self.rules.get(key)
    }

    /// True when no overrides are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of configured rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

/// Resolves the final severity for each proposed change.
#[derive(Debug, Clone, Copy)]
pub struct SeverityPolicy<'a> {
    mode: DiffMode,
    rules: &'a BreakingRules,
}

impl<'a> SeverityPolicy<'a> {
    /// Build a policy over a rules table.
    pub fn new(mode: DiffMode, rules: &'a BreakingRules) -> Self {
        Self { mode, rules }
    }

    /// The operational mode.
    pub fn mode(&self) -> DiffMode {
        self.mode
    }

    /// Decide the severity for a proposed change.
    ///
    /// Returns `None` when an ignore rule drops the change. Ignore rules
    /// apply in both modes; severity overrides only matter in breaking
    /// mode, and simple mode always resolves to [`Severity::Unset`].
    pub fn resolve(
        &self,
        category: Category,
        kind: ChangeKind,
        sub: &str,
        default: Severity,
    ) -> Option<Severity> {
        let rule = self.rules.get(&rule_key(category, kind, sub));
        if let Some(rule) = rule {
            if rule.ignore {
                return None;
            }
        }

        if self.mode == DiffMode::Simple {
            return Some(Severity::Unset);
        }

        Some(rule.and_then(|r| r.severity).unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_key_composition() {
        assert_eq!(
            rule_key(Category::Operation, ChangeKind::Modified, "operationId"),
            "operation.operationIdModified"
        );
        assert_eq!(
            rule_key(Category::Endpoint, ChangeKind::Removed, ""),
            "endpoint.removed"
        );
        assert_eq!(
            rule_key(Category::Schema, ChangeKind::Removed, "property"),
            "schema.propertyRemoved"
        );
    }

    #[test]
    fn test_default_policy_passes_defaults_through() {
        let rules = BreakingRules::new();
        let policy = SeverityPolicy::new(DiffMode::Breaking, &rules);
        assert_eq!(
            policy.resolve(Category::Endpoint, ChangeKind::Removed, "", Severity::Critical),
            Some(Severity::Critical)
        );
    }

    #[test]
    fn test_strict_preset_upgrades_operation_id() {
        let rules = BreakingRules::strict();
        let policy = SeverityPolicy::new(DiffMode::Breaking, &rules);
        assert_eq!(
            policy.resolve(
                Category::Operation,
                ChangeKind::Modified,
                "operationId",
                Severity::Warning
            ),
            Some(Severity::Error)
        );
    }

    #[test]
    fn test_lenient_preset_downgrades_enum_removal() {
        let rules = BreakingRules::lenient();
        let policy = SeverityPolicy::new(DiffMode::Breaking, &rules);
        assert_eq!(
            policy.resolve(Category::Schema, ChangeKind::Removed, "enum", Severity::Error),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn test_ignore_rule_drops_change_in_both_modes() {
        let rules = BreakingRules::new().with_ignore("operation.operationIdModified");
        for mode in [DiffMode::Breaking, DiffMode::Simple] {
            let policy = SeverityPolicy::new(mode, &rules);
            assert_eq!(
                policy.resolve(
                    Category::Operation,
                    ChangeKind::Modified,
                    "operationId",
                    Severity::Warning
                ),
                None
            );
        }
    }

    #[test]
    fn test_simple_mode_forces_unset() {
        let rules = BreakingRules::strict();
        let policy = SeverityPolicy::new(DiffMode::Simple, &rules);
        assert_eq!(
            policy.resolve(
                Category::Operation,
                ChangeKind::Modified,
                "operationId",
                Severity::Warning
            ),
            Some(Severity::Unset)
        );
    }

    #[test]
    fn test_rules_load_from_yaml() {
        let yaml = r#"
operation.operationIdModified:
  ignore: true
schema.enumRemoved:
  severity: warning
"#;
        let rules = BreakingRules::from_yaml(yaml).expect("rules should parse");
        assert_eq!(rules.len(), 2);
        assert!(rules.get("operation.operationIdModified").map(|r| r.ignore) == Some(true));
        assert_eq!(
            rules.get("schema.enumRemoved").and_then(|r| r.severity),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        assert!(BreakingRules::preset("fussy").is_err());
        assert!(BreakingRules::preset("strict").is_ok());
    }
}
