//! Specification-extension (`x-`) comparison.
//!
//! Every node that carries an extension map runs its keys through here.
//! Per the change model, extension changes always receive the extension
//! category and default to info severity regardless of the carrying
//! node. Values are compared by structural equality, so equal JSON with
//! reordered keys is not flagged.

use crate::diff::change::{Category, Severity};
use crate::diff::walker::Walker;
use crate::model::Extensions;
use crate::utils::sorted_union;

impl Walker<'_> {
    /// Key-set diff over the `x-` keys of two extension maps.
    ///
    /// The flattened maps may also hold unrecognized non-extension
    /// fields; those are carried but never compared.
    pub(crate) fn diff_extensions(&mut self, path: &str, source: &Extensions, target: &Extensions) {
        let keys = sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        );
        for key in keys {
            if !key.starts_with("x-") {
                continue;
            }
            let ext_path = format!("{path}.{key}");
            match (source.get(key), target.get(key)) {
                (None, Some(new)) => self.record_added(
                    &ext_path,
                    Category::Extension,
                    "",
                    Severity::Info,
                    Some(new.clone()),
                    format!("extension '{key}' added"),
                ),
                (Some(old), None) => self.record_removed(
                    &ext_path,
                    Category::Extension,
                    "",
                    Severity::Info,
                    Some(old.clone()),
                    format!("extension '{key}' removed"),
                ),
                (Some(old), Some(new)) => {
                    if old != new {
                        self.record_modified(
                            &ext_path,
                            Category::Extension,
                            "",
                            Severity::Info,
                            Some(old.clone()),
                            Some(new.clone()),
                            format!("extension '{key}' modified"),
                        );
                    }
                }
                (None, None) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::diff::change::{Category, ChangeKind, Severity};
    use crate::diff::rules::{BreakingRules, DiffMode, SeverityPolicy};
    use crate::diff::walker::Walker;
    use crate::model::Extensions;

    fn extensions(json: serde_json::Value) -> Extensions {
        serde_json::from_value(json).expect("extensions should parse")
    }

    fn run(source: &Extensions, target: &Extensions) -> Vec<crate::diff::Change> {
        let rules = BreakingRules::new();
        let policy = SeverityPolicy::new(DiffMode::Breaking, &rules);
        let mut walker = Walker::new(policy, true, None, None);
        walker.diff_extensions("document", source, target);
        walker.finish()
    }

    #[test]
    fn test_extension_modified_is_info() {
        let source = extensions(serde_json::json!({"x-api-id": "test-123"}));
        let target = extensions(serde_json::json!({"x-api-id": "test-456"}));
        let changes = run(&source, &target);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "document.x-api-id");
        assert_eq!(changes[0].kind, ChangeKind::Modified);
        assert_eq!(changes[0].category, Category::Extension);
        assert_eq!(changes[0].severity, Severity::Info);
    }

    #[test]
    fn test_nested_extension_change_is_one_change_at_outer_key() {
        let source = extensions(serde_json::json!({"x-meta": {"owner": "a", "tier": 1}}));
        let target = extensions(serde_json::json!({"x-meta": {"owner": "b", "tier": 1}}));
        let changes = run(&source, &target);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "document.x-meta");
    }

    #[test]
    fn test_non_extension_keys_are_ignored() {
        let source = extensions(serde_json::json!({"vendorField": 1}));
        let target = extensions(serde_json::json!({"vendorField": 2}));
        assert!(run(&source, &target).is_empty());
    }

    #[test]
    fn test_added_and_removed_extensions() {
        let source = extensions(serde_json::json!({"x-old": true}));
        let target = extensions(serde_json::json!({"x-new": true}));
        let changes = run(&source, &target);

        assert_eq!(changes.len(), 2);
        // sorted union: x-new before x-old
        assert_eq!(changes[0].path, "document.x-new");
        assert_eq!(changes[0].kind, ChangeKind::Added);
        assert_eq!(changes[1].path, "document.x-old");
        assert_eq!(changes[1].kind, ChangeKind::Removed);
        assert!(changes.iter().all(|c| c.severity == Severity::Info));
    }
}
