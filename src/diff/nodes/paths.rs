//! Path map and path-item comparison.

use crate::diff::change::{Category, Severity};
use crate::diff::walker::{json_value, Walker};
use crate::model::{PathItem, PathItemV2};
use crate::utils::sorted_union;
use indexmap::IndexMap;

impl Walker<'_> {
    /// Compare two 3.x path maps. `bracket_keys` selects the webhook
    /// notation (`document.webhooks[name]`) over the path-template one
    /// (`document.paths./pets`).
    pub(crate) fn diff_paths(
        &mut self,
        base: &str,
        bracket_keys: bool,
        source: &IndexMap<String, PathItem>,
        target: &IndexMap<String, PathItem>,
    ) {
        for template in sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        ) {
            let path = if bracket_keys {
                format!("{base}[{template}]")
            } else {
                format!("{base}.{template}")
            };
            match (source.get(template), target.get(template)) {
                (None, Some(item)) => self.record_added(
                    &path,
                    Category::Endpoint,
                    "",
                    Severity::Info,
                    json_value(item),
                    format!("endpoint '{template}' added"),
                ),
                (Some(item), None) => self.record_removed(
                    &path,
                    Category::Endpoint,
                    "",
                    Severity::Critical,
                    json_value(item),
                    format!("endpoint '{template}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_path_item(&path, old, new),
                (None, None) => {}
            }
        }
    }

    /// Compare one 3.x path item: shared fields, the eight method slots,
    /// item-level parameters and extensions.
    pub(crate) fn diff_path_item(&mut self, path: &str, source: &PathItem, target: &PathItem) {
        self.diff_text_field(
            path,
            Category::Endpoint,
            "summary",
            Severity::Info,
            source.summary.as_deref(),
            target.summary.as_deref(),
        );
        self.diff_text_field(
            path,
            Category::Endpoint,
            "description",
            Severity::Info,
            source.description.as_deref(),
            target.description.as_deref(),
        );

        let old_slots = source.operations();
        let new_slots = target.operations();
        for (index, (method, old_op)) in old_slots.iter().enumerate() {
            let new_op = new_slots[index].1;
            let operation_path = format!("{path}.{method}");
            match (old_op, new_op) {
                (None, None) => {}
                (None, Some(operation)) => self.record_added(
                    &operation_path,
                    Category::Operation,
                    "",
                    Severity::Info,
                    json_value(operation),
                    format!("operation '{method}' added"),
                ),
                (Some(operation), None) => self.record_removed(
                    &operation_path,
                    Category::Operation,
                    "",
                    Severity::Critical,
                    json_value(operation),
                    format!("operation '{method}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_operation(&operation_path, old, new),
            }
        }

        self.diff_parameters(path, &source.parameters, &target.parameters);
        self.diff_extensions(path, &source.extensions, &target.extensions);
    }

    /// Compare two 2.0 path maps.
    pub(crate) fn diff_paths_v2(
        &mut self,
        base: &str,
        source: &IndexMap<String, PathItemV2>,
        target: &IndexMap<String, PathItemV2>,
    ) {
        for template in sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        ) {
            let path = format!("{base}.{template}");
            match (source.get(template), target.get(template)) {
                (None, Some(item)) => self.record_added(
                    &path,
                    Category::Endpoint,
                    "",
                    Severity::Info,
                    json_value(item),
                    format!("endpoint '{template}' added"),
                ),
                (Some(item), None) => self.record_removed(
                    &path,
                    Category::Endpoint,
                    "",
                    Severity::Critical,
                    json_value(item),
                    format!("endpoint '{template}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_path_item_v2(&path, old, new),
                (None, None) => {}
            }
        }
    }

    fn diff_path_item_v2(&mut self, path: &str, source: &PathItemV2, target: &PathItemV2) {
        let old_slots = source.operations();
        let new_slots = target.operations();
        for (index, (method, old_op)) in old_slots.iter().enumerate() {
            let new_op = new_slots[index].1;
            let operation_path = format!("{path}.{method}");
            match (old_op, new_op) {
                (None, None) => {}
                (None, Some(operation)) => self.record_added(
                    &operation_path,
                    Category::Operation,
                    "",
                    Severity::Info,
                    json_value(operation),
                    format!("operation '{method}' added"),
                ),
                (Some(operation), None) => self.record_removed(
                    &operation_path,
                    Category::Operation,
                    "",
                    Severity::Critical,
                    json_value(operation),
                    format!("operation '{method}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_operation_v2(&operation_path, old, new),
            }
        }

        self.diff_parameters_v2(path, &source.parameters, &target.parameters);
        self.diff_extensions(path, &source.extensions, &target.extensions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::change::ChangeKind;
    use crate::diff::rules::{BreakingRules, DiffMode, SeverityPolicy};
    use crate::diff::Change;

    fn paths(json: serde_json::Value) -> IndexMap<String, PathItem> {
        serde_json::from_value(json).expect("paths should parse")
    }

    fn run(
        source: &IndexMap<String, PathItem>,
        target: &IndexMap<String, PathItem>,
    ) -> Vec<Change> {
        let rules = BreakingRules::new();
        let policy = SeverityPolicy::new(DiffMode::Breaking, &rules);
        let mut walker = Walker::new(policy, true, None, None);
        walker.diff_paths("document.paths", false, source, target);
        walker.finish()
    }

    #[test]
    fn test_endpoint_removed_is_critical() {
        let source = paths(serde_json::json!({
            "/pets": {"get": {"responses": {"200": {"description": "OK"}}}},
            "/stores": {"get": {"responses": {"200": {"description": "OK"}}}}
        }));
        let target = paths(serde_json::json!({
            "/pets": {"get": {"responses": {"200": {"description": "OK"}}}}
        }));
        let changes = run(&source, &target);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "document.paths./stores");
        assert_eq!(changes[0].kind, ChangeKind::Removed);
        assert_eq!(changes[0].severity, Severity::Critical);
    }

    #[test]
    fn test_endpoint_added_is_info() {
        let source = paths(serde_json::json!({}));
        let target = paths(serde_json::json!({
            "/pets": {"get": {"responses": {"200": {"description": "OK"}}}}
        }));
        let changes = run(&source, &target);
        assert_eq!(changes[0].severity, Severity::Info);
    }

    #[test]
    fn test_operation_removed_is_critical() {
        let source = paths(serde_json::json!({
            "/pets": {
                "get": {"responses": {"200": {"description": "OK"}}},
                "post": {"responses": {"201": {"description": "Created"}}}
            }
        }));
        let target = paths(serde_json::json!({
            "/pets": {"get": {"responses": {"200": {"description": "OK"}}}}
        }));
        let changes = run(&source, &target);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "document.paths./pets.post");
        assert_eq!(changes[0].severity, Severity::Critical);
    }

    #[test]
    fn test_method_slots_walk_in_fixed_order() {
        let source = paths(serde_json::json!({"/pets": {}}));
        let target = paths(serde_json::json!({
            "/pets": {
                "put": {"responses": {}},
                "delete": {"responses": {}},
                "get": {"responses": {}}
            }
        }));
        let changes = run(&source, &target);
        let methods: Vec<&str> = changes
            .iter()
            .map(|c| c.path.rsplit('.').next().unwrap_or(""))
            .collect();
        assert_eq!(methods, vec!["delete", "get", "put"]);
    }

    #[test]
    fn test_item_level_parameter_diff() {
        let source = paths(serde_json::json!({
            "/pets/{petId}": {
                "parameters": [
                    {"name": "petId", "in": "path", "required": true, "schema": {"type": "string"}}
                ]
            }
        }));
        let target = paths(serde_json::json!({"/pets/{petId}": {}}));
        let changes = run(&source, &target);
        assert_eq!(changes.len(), 1);
        // removing a required parameter is breaking
        assert_eq!(changes[0].severity, Severity::Error);
        assert_eq!(
            changes[0].path,
            "document.paths./pets/{petId}.parameters[petId:path]"
        );
    }
}
