//! Tag collection comparison.

use crate::diff::change::{Category, Severity};
use crate::diff::walker::{json_value, Walker};
use crate::model::Tag;
use crate::utils::sorted_union;
use std::collections::BTreeMap;

impl Walker<'_> {
    /// Compare two tag collections, keyed by name. All tag changes are
    /// informational.
    pub(crate) fn diff_tags(&mut self, path: &str, source: &[Tag], target: &[Tag]) {
        let old: BTreeMap<&str, &Tag> = source.iter().map(|t| (t.name.as_str(), t)).collect();
        let new: BTreeMap<&str, &Tag> = target.iter().map(|t| (t.name.as_str(), t)).collect();

        for name in sorted_union(old.keys().copied(), new.keys().copied()) {
            let tag_path = format!("{path}[{name}]");
            match (old.get(name), new.get(name)) {
                (None, Some(tag)) => self.record_added(
                    &tag_path,
                    Category::Tag,
                    "",
                    Severity::Info,
                    json_value(tag),
                    format!("tag '{name}' added"),
                ),
                (Some(tag), None) => self.record_removed(
                    &tag_path,
                    Category::Tag,
                    "",
                    Severity::Info,
                    json_value(tag),
                    format!("tag '{name}' removed"),
                ),
                (Some(old), Some(new)) => {
                    self.diff_text_field(
                        &tag_path,
                        Category::Tag,
                        "description",
                        Severity::Info,
                        old.description.as_deref(),
                        new.description.as_deref(),
                    );
                    self.diff_extensions(&tag_path, &old.extensions, &new.extensions);
                }
                (None, None) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::change::ChangeKind;
    use crate::diff::rules::{BreakingRules, DiffMode, SeverityPolicy};
    use crate::diff::Change;

    fn tags(json: serde_json::Value) -> Vec<Tag> {
        serde_json::from_value(json).expect("tags should parse")
    }

    fn run(source: &[Tag], target: &[Tag]) -> Vec<Change> {
        let rules = BreakingRules::new();
        let policy = SeverityPolicy::new(DiffMode::Breaking, &rules);
        let mut walker = Walker::new(policy, true, None, None);
        walker.diff_tags("document.tags", source, target);
        walker.finish()
    }

    #[test]
    fn test_tag_changes_are_all_info() {
        let source = tags(serde_json::json!([
            {"name": "pets", "description": "Pet ops"},
            {"name": "stores"}
        ]));
        let target = tags(serde_json::json!([
            {"name": "pets", "description": "Pet operations"},
            {"name": "orders"}
        ]));
        let changes = run(&source, &target);

        assert_eq!(changes.len(), 3);
        assert!(changes.iter().all(|c| c.severity == Severity::Info));
        assert!(changes
            .iter()
            .any(|c| c.path == "document.tags[orders]" && c.kind == ChangeKind::Added));
        assert!(changes
            .iter()
            .any(|c| c.path == "document.tags[stores]" && c.kind == ChangeKind::Removed));
        assert!(changes
            .iter()
            .any(|c| c.path == "document.tags[pets].description"));
    }
}
