//! Change records emitted by the diff engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Severity of a single change.
///
/// `Unset` is the simple-mode value: the change is reported without a
/// breaking classification. The remaining ladder orders from informational
/// to contract-breaking.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Unset,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// True for severities that fail a contract gate.
    pub fn is_breaking(self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Bracketed tag used when changes are rendered as warning strings.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Unset => "[change]",
            Self::Info => "[info]",
            Self::Warning => "[warning]",
            Self::Error => "[error]",
            Self::Critical => "[critical]",
        }
    }
}

/// What happened to the element at a change path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl ChangeKind {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
        }
    }

    /// Capitalized form used as a rule-key suffix (`propertyRemoved`).
    pub fn rule_suffix(self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Removed => "Removed",
            Self::Modified => "Modified",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of the document a change belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Endpoint,
    Operation,
    Parameter,
    RequestBody,
    Response,
    Schema,
    Security,
    Server,
    Info,
    Extension,
    Tag,
}

impl Category {
    /// Kebab-case name; also the leading segment of rule keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Endpoint => "endpoint",
            Self::Operation => "operation",
            Self::Parameter => "parameter",
            Self::RequestBody => "request-body",
            Self::Response => "response",
            Self::Schema => "schema",
            Self::Security => "security",
            Self::Server => "server",
            Self::Info => "info",
            Self::Extension => "extension",
            Self::Tag => "tag",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source location attached to a change via a [`SourceMap`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub line: u32,
    pub column: u32,
}

/// Optional decoration table: change path to source location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceMap {
    locations: HashMap<String, SourceLocation>,
}

impl SourceMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a location for a change path.
    pub fn insert(&mut self, path: impl Into<String>, location: SourceLocation) {
        self.locations.insert(path.into(), location);
    }

    /// Look up the location for a change path.
    pub fn get(&self, path: &str) -> Option<&SourceLocation> {
        self.locations.get(path)
    }
}

/// One detected difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Dotted/bracketed location, e.g.
    /// `document.paths./pets.get.responses[200]`.
    pub path: String,
    pub kind: ChangeKind,
    pub category: Category,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocation>,
}

impl Change {
    /// Render the change as a single `[severity] path: message` line.
    pub fn to_warning_string(&self) -> String {
        format!("{} {}: {}", self.severity.tag(), self.path, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Error);
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert!(Severity::Info > Severity::Unset);
    }

    #[test]
    fn test_breaking_severities() {
        assert!(Severity::Critical.is_breaking());
        assert!(Severity::Error.is_breaking());
        assert!(!Severity::Warning.is_breaking());
        assert!(!Severity::Info.is_breaking());
        assert!(!Severity::Unset.is_breaking());
    }

    #[test]
    fn test_warning_string_format() {
        let change = Change {
            path: "document.paths./pets.get.responses[200]".to_string(),
            kind: ChangeKind::Removed,
            category: Category::Response,
            severity: Severity::Error,
            old: Some(serde_json::json!("OK")),
            new: None,
            message: "success response 200 removed".to_string(),
            source: None,
        };
        assert_eq!(
            change.to_warning_string(),
            "[error] document.paths./pets.get.responses[200]: success response 200 removed"
        );
    }

    #[test]
    fn test_category_names_are_kebab_case() {
        assert_eq!(Category::RequestBody.as_str(), "request-body");
        assert_eq!(Category::Endpoint.to_string(), "endpoint");
    }
}
