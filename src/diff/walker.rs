//! Shared traversal state for one diff call.
//!
//! A single walker instance is threaded through the document walk, the
//! node comparators and the schema engine. Every detected difference
//! funnels through [`Walker::record`], which consults the severity
//! policy and appends to the pooled change buffer. There is exactly one
//! traversal regardless of mode; simple mode differs only in the
//! severity the policy resolves.

use super::change::{Category, Change, ChangeKind, Severity, SourceMap};
use super::pool;
use super::rules::SeverityPolicy;
use crate::model::Schema;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

pub(crate) struct Walker<'a> {
    policy: SeverityPolicy<'a>,
    include_info: bool,
    changes: Vec<Change>,
    /// Cycle guard: (source addr, target addr) -> path first seen at.
    visited: HashMap<(usize, usize), String>,
    source_map: Option<&'a SourceMap>,
    target_map: Option<&'a SourceMap>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        policy: SeverityPolicy<'a>,
        include_info: bool,
        source_map: Option<&'a SourceMap>,
        target_map: Option<&'a SourceMap>,
    ) -> Self {
        Self {
            policy,
            include_info,
            changes: pool::acquire_buffer(),
            visited: HashMap::new(),
            source_map,
            target_map,
        }
    }

    /// Whether info-block changes should be walked at all.
    pub(crate) fn include_info(&self) -> bool {
        self.include_info
    }

    /// Finish the walk: copy the buffered changes into an exact-sized
    /// vector owned by the caller and return the buffer to the pool.
    pub(crate) fn finish(mut self) -> Vec<Change> {
        let mut changes = Vec::with_capacity(self.changes.len());
        changes.append(&mut self.changes);
        // append leaves the buffer empty but keeps its capacity
        pool::release_buffer(std::mem::take(&mut self.changes));
        debug_assert!(self.visited.is_empty(), "unbalanced schema pair tracking");
        changes
    }

    /// Submit a proposed change. The severity policy decides whether it
    /// is emitted and at which severity.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn record(
        &mut self,
        path: &str,
        kind: ChangeKind,
        category: Category,
        sub: &str,
        default_severity: Severity,
        old: Option<Value>,
        new: Option<Value>,
        message: impl Into<String>,
    ) {
        let Some(severity) = self.policy.resolve(category, kind, sub, default_severity) else {
            tracing::debug!(path, %category, %kind, "change dropped by ignore rule");
            return;
        };

        // Removed elements point into the source document, everything
        // else into the target.
        let map = match kind {
            ChangeKind::Removed => self.source_map,
            ChangeKind::Added | ChangeKind::Modified => self.target_map,
        };
        let source = map.and_then(|m| m.get(path)).cloned();

        self.changes.push(Change {
            path: path.to_string(),
            kind,
            category,
            severity,
            old,
            new,
            message: message.into(),
            source,
        });
    }

    /// Shorthand for an addition: only the new value is present.
    pub(crate) fn record_added(
        &mut self,
        path: &str,
        category: Category,
        sub: &str,
        default_severity: Severity,
        new: Option<Value>,
        message: impl Into<String>,
    ) {
        self.record(
            path,
            ChangeKind::Added,
            category,
            sub,
            default_severity,
            None,
            new,
            message,
        );
    }

    /// Shorthand for a removal: only the old value is present.
    pub(crate) fn record_removed(
        &mut self,
        path: &str,
        category: Category,
        sub: &str,
        default_severity: Severity,
        old: Option<Value>,
        message: impl Into<String>,
    ) {
        self.record(
            path,
            ChangeKind::Removed,
            category,
            sub,
            default_severity,
            old,
            None,
            message,
        );
    }

    /// Shorthand for a modification carrying both values.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn record_modified(
        &mut self,
        path: &str,
        category: Category,
        sub: &str,
        default_severity: Severity,
        old: Option<Value>,
        new: Option<Value>,
        message: impl Into<String>,
    ) {
        self.record(
            path,
            ChangeKind::Modified,
            category,
            sub,
            default_severity,
            old,
            new,
            message,
        );
    }

    /// Compare an optional text field, emitting at `{path}.{sub}` with
    /// the presence-appropriate kind.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn diff_text_field(
        &mut self,
        path: &str,
        category: Category,
        sub: &str,
        severity: Severity,
        old: Option<&str>,
        new: Option<&str>,
    ) {
        if old == new {
            return;
        }
        let field_path = format!("{path}.{sub}");
        let kind = match (old, new) {
            (None, Some(_)) => ChangeKind::Added,
            (Some(_), None) => ChangeKind::Removed,
            _ => ChangeKind::Modified,
        };
        self.record(
            &field_path,
            kind,
            category,
            sub,
            severity,
            old.map(|v| Value::String(v.to_string())),
            new.map(|v| Value::String(v.to_string())),
            format!("{sub} {}", kind.as_str()),
        );
    }

    // ------------------------------------------------------------------
    // Cycle detection
    // ------------------------------------------------------------------

    /// Mark a schema pair before recursing into it. Returns `false` when
    /// the exact pair is already on the recursion stack, in which case
    /// the caller must skip the recursion (and must not call
    /// [`Walker::exit_schema_pair`]).
    pub(crate) fn enter_schema_pair(
        &mut self,
        source: &Schema,
        target: &Schema,
        path: &str,
    ) -> bool {
        let key = pair_key(source, target);
        if self.visited.contains_key(&key) {
            tracing::debug!(path, "schema pair already visited, skipping recursion");
            return false;
        }
        self.visited.insert(key, path.to_string());
        true
    }

    /// Unmark a schema pair on the way out so the same pair can be
    /// revisited from an unrelated subtree.
    pub(crate) fn exit_schema_pair(&mut self, source: &Schema, target: &Schema) {
        self.visited.remove(&pair_key(source, target));
    }
}

fn pair_key(source: &Schema, target: &Schema) -> (usize, usize) {
    (
        std::ptr::from_ref(source) as usize,
        std::ptr::from_ref(target) as usize,
    )
}

/// Serialize any model value for the old/new slots of a change.
pub(crate) fn json_value<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

/// Compact rendering of a JSON value for change paths and messages.
pub(crate) fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::rules::{BreakingRules, DiffMode};

    fn walker(rules: &BreakingRules) -> Walker<'_> {
        Walker::new(SeverityPolicy::new(DiffMode::Breaking, rules), true, None, None)
    }

    #[test]
    fn test_record_appends_change() {
        let rules = BreakingRules::new();
        let mut w = walker(&rules);
        w.record_removed(
            "document.paths./pets",
            Category::Endpoint,
            "",
            Severity::Critical,
            None,
            "endpoint removed",
        );
        let changes = w.finish();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].severity, Severity::Critical);
        assert_eq!(changes[0].kind, ChangeKind::Removed);
    }

    #[test]
    fn test_ignore_rule_suppresses_record() {
        let rules = BreakingRules::new().with_ignore("endpoint.removed");
        let mut w = walker(&rules);
        w.record_removed(
            "document.paths./pets",
            Category::Endpoint,
            "",
            Severity::Critical,
            None,
            "endpoint removed",
        );
        assert!(w.finish().is_empty());
    }

    #[test]
    fn test_schema_pair_tracking_balances() {
        let rules = BreakingRules::new();
        let mut w = walker(&rules);
        let a = Schema::default();
        let b = Schema::default();

        assert!(w.enter_schema_pair(&a, &b, "document.x"));
        // Re-entering the same pair mid-recursion is refused.
        assert!(!w.enter_schema_pair(&a, &b, "document.x.deeper"));
        w.exit_schema_pair(&a, &b);
        // After exit the pair may be visited again from another subtree.
        assert!(w.enter_schema_pair(&a, &b, "document.y"));
        w.exit_schema_pair(&a, &b);

        assert!(w.finish().is_empty());
    }

    #[test]
    fn test_source_map_decorates_removals() {
        use crate::diff::change::SourceLocation;

        let mut map = SourceMap::new();
        map.insert(
            "document.paths./pets",
            SourceLocation {
                file: Some("old.yaml".to_string()),
                line: 12,
                column: 3,
            },
        );
        let rules = BreakingRules::new();
        let policy = SeverityPolicy::new(DiffMode::Breaking, &rules);
        let mut w = Walker::new(policy, true, Some(&map), None);
        w.record_removed(
            "document.paths./pets",
            Category::Endpoint,
            "",
            Severity::Critical,
            None,
            "endpoint removed",
        );
        let changes = w.finish();
        let location = changes[0].source.as_ref().expect("location");
        assert_eq!(location.line, 12);
        assert_eq!(location.file.as_deref(), Some("old.yaml"));
    }

    #[test]
    fn test_value_label_strings_are_bare() {
        assert_eq!(value_label(&serde_json::json!("gold")), "gold");
        assert_eq!(value_label(&serde_json::json!(3)), "3");
        assert_eq!(value_label(&serde_json::json!(["a"])), "[\"a\"]");
    }
}
