//! Operation comparison.

use crate::diff::change::{Category, Severity};
use crate::diff::walker::{json_value, Walker};
use crate::model::{Operation, OperationV2};
use crate::utils::sorted_union;
use indexmap::IndexMap;
use serde_json::Value;

const CAT: Category = Category::Operation;

impl Walker<'_> {
    /// Compare two 3.x operations.
    pub(crate) fn diff_operation(&mut self, path: &str, source: &Operation, target: &Operation) {
        self.diff_text_field(
            path,
            CAT,
            "operationId",
            Severity::Warning,
            source.operation_id.as_deref(),
            target.operation_id.as_deref(),
        );
        self.diff_text_field(
            path,
            CAT,
            "summary",
            Severity::Info,
            source.summary.as_deref(),
            target.summary.as_deref(),
        );
        self.diff_text_field(
            path,
            CAT,
            "description",
            Severity::Info,
            source.description.as_deref(),
            target.description.as_deref(),
        );
        self.diff_operation_tags(path, &source.tags, &target.tags);
        self.diff_deprecated_flag(path, source.deprecated, target.deprecated);

        self.diff_parameters(path, &source.parameters, &target.parameters);
        self.diff_request_body_slot(path, source.request_body.as_ref(), target.request_body.as_ref());
        self.diff_responses(path, &source.responses, &target.responses);
        self.diff_security_requirements(
            &format!("{path}.security"),
            source.security.as_deref().unwrap_or(&[]),
            target.security.as_deref().unwrap_or(&[]),
        );
        self.diff_callbacks(path, &source.callbacks, &target.callbacks);
        self.diff_extensions(path, &source.extensions, &target.extensions);
    }

    /// Compare two 2.0 operations.
    pub(crate) fn diff_operation_v2(
        &mut self,
        path: &str,
        source: &OperationV2,
        target: &OperationV2,
    ) {
        self.diff_text_field(
            path,
            CAT,
            "operationId",
            Severity::Warning,
            source.operation_id.as_deref(),
            target.operation_id.as_deref(),
        );
        self.diff_text_field(
            path,
            CAT,
            "summary",
            Severity::Info,
            source.summary.as_deref(),
            target.summary.as_deref(),
        );
        self.diff_text_field(
            path,
            CAT,
            "description",
            Severity::Info,
            source.description.as_deref(),
            target.description.as_deref(),
        );
        self.diff_operation_tags(path, &source.tags, &target.tags);
        self.diff_deprecated_flag(path, source.deprecated, target.deprecated);

        // operation-level consumes/produces surface as media-type changes
        self.diff_media_type_names(
            &format!("{path}.consumes"),
            Category::RequestBody,
            &source.consumes,
            &target.consumes,
        );
        self.diff_media_type_names(
            &format!("{path}.produces"),
            Category::Response,
            &source.produces,
            &target.produces,
        );

        self.diff_parameters_v2(path, &source.parameters, &target.parameters);
        self.diff_responses_v2(path, &source.responses, &target.responses);
        self.diff_security_requirements(
            &format!("{path}.security"),
            source.security.as_deref().unwrap_or(&[]),
            target.security.as_deref().unwrap_or(&[]),
        );
        self.diff_extensions(path, &source.extensions, &target.extensions);
    }

    /// Set diff over operation tag lists.
    pub(crate) fn diff_operation_tags(&mut self, path: &str, source: &[String], target: &[String]) {
        for tag in sorted_union(
            source.iter().map(String::as_str),
            target.iter().map(String::as_str),
        ) {
            let in_source = source.iter().any(|t| t == tag);
            let in_target = target.iter().any(|t| t == tag);
            let tag_path = format!("{path}.tags[{tag}]");
            if in_target && !in_source {
                self.record_added(
                    &tag_path,
                    CAT,
                    "tag",
                    Severity::Info,
                    Some(Value::String(tag.to_string())),
                    format!("tag '{tag}' added"),
                );
            } else if in_source && !in_target {
                self.record_removed(
                    &tag_path,
                    CAT,
                    "tag",
                    Severity::Info,
                    Some(Value::String(tag.to_string())),
                    format!("tag '{tag}' removed"),
                );
            }
        }
    }

    /// Deprecation transition: deprecating warns, undeprecating informs.
    pub(crate) fn diff_deprecated_flag(&mut self, path: &str, old: bool, new: bool) {
        if old == new {
            return;
        }
        let severity = if new { Severity::Warning } else { Severity::Info };
        self.record_modified(
            &format!("{path}.deprecated"),
            CAT,
            "deprecated",
            severity,
            json_value(&old),
            json_value(&new),
            "deprecated changed",
        );
    }

    /// Media-type name lists (2.0 `consumes`/`produces`), as add/remove
    /// changes.
    pub(crate) fn diff_media_type_names(
        &mut self,
        path: &str,
        category: Category,
        source: &[String],
        target: &[String],
    ) {
        for media in sorted_union(
            source.iter().map(String::as_str),
            target.iter().map(String::as_str),
        ) {
            let in_source = source.iter().any(|m| m == media);
            let in_target = target.iter().any(|m| m == media);
            let media_path = format!("{path}[{media}]");
            if in_target && !in_source {
                self.record_added(
                    &media_path,
                    category,
                    "mediaType",
                    Severity::Info,
                    Some(Value::String(media.to_string())),
                    format!("media type '{media}' added"),
                );
            } else if in_source && !in_target {
                self.record_removed(
                    &media_path,
                    category,
                    "mediaType",
                    Severity::Warning,
                    Some(Value::String(media.to_string())),
                    format!("media type '{media}' removed"),
                );
            }
        }
    }

    /// Callback maps are compared structurally only.
    fn diff_callbacks(
        &mut self,
        path: &str,
        source: &IndexMap<String, Value>,
        target: &IndexMap<String, Value>,
    ) {
        for name in sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        ) {
            let callback_path = format!("{path}.callbacks[{name}]");
            match (source.get(name), target.get(name)) {
                (None, Some(callback)) => self.record_added(
                    &callback_path,
                    CAT,
                    "callback",
                    Severity::Info,
                    Some(callback.clone()),
                    format!("callback '{name}' added"),
                ),
                (Some(callback), None) => self.record_removed(
                    &callback_path,
                    CAT,
                    "callback",
                    Severity::Warning,
                    Some(callback.clone()),
                    format!("callback '{name}' removed"),
                ),
                (Some(old), Some(new)) => {
                    if old != new {
                        self.record_modified(
                            &callback_path,
                            CAT,
                            "callback",
                            Severity::Warning,
                            Some(old.clone()),
                            Some(new.clone()),
                            format!("callback '{name}' modified"),
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
    use super::*;
    use crate::diff::change::ChangeKind;
    use crate::diff::rules::{BreakingRules, DiffMode, SeverityPolicy};
    use crate::diff::Change;

    fn operation(json: serde_json::Value) -> Operation {
        serde_json::from_value(json).expect("operation should parse")
    }

    fn run_with(source: &Operation, target: &Operation, rules: &BreakingRules) -> Vec<Change> {
        let policy = SeverityPolicy::new(DiffMode::Breaking, rules);
        let mut walker = Walker::new(policy, true, None, None);
        walker.diff_operation("document.paths./users.get", source, target);
        walker.finish()
    }

    fn run(source: &Operation, target: &Operation) -> Vec<Change> {
        run_with(source, target, &BreakingRules::new())
    }

    #[test]
    fn test_operation_id_modified_default_warning() {
        let source = operation(serde_json::json!({"operationId": "getUsers"}));
        let target = operation(serde_json::json!({"operationId": "listUsers"}));
        let changes = run(&source, &target);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "document.paths./users.get.operationId");
        assert_eq!(changes[0].severity, Severity::Warning);
    }

    #[test]
    fn test_operation_id_modified_under_strict_preset() {
        let source = operation(serde_json::json!({"operationId": "getUsers"}));
        let target = operation(serde_json::json!({"operationId": "listUsers"}));
        let changes = run_with(&source, &target, &BreakingRules::strict());
        assert_eq!(changes[0].severity, Severity::Error);
    }

    #[test]
    fn test_operation_id_modified_ignored_by_rule() {
        let source = operation(serde_json::json!({"operationId": "getUsers"}));
        let target = operation(serde_json::json!({"operationId": "listUsers"}));
        let rules = BreakingRules::new().with_ignore("operation.operationIdModified");
        assert!(run_with(&source, &target, &rules).is_empty());
    }

    #[test]
    fn test_tag_set_diff_is_info() {
        let source = operation(serde_json::json!({"tags": ["pets", "legacy"]}));
        let target = operation(serde_json::json!({"tags": ["pets", "store"]}));
        let changes = run(&source, &target);

        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.severity == Severity::Info));
    }

    #[test]
    fn test_deprecation_is_warning() {
        let source = operation(serde_json::json!({}));
        let target = operation(serde_json::json!({"deprecated": true}));
        let changes = run(&source, &target);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].severity, Severity::Warning);

        let undeprecated = run(&target, &source);
        assert_eq!(undeprecated[0].severity, Severity::Info);
    }

    #[test]
    fn test_operation_security_removed_is_error() {
        let source = operation(serde_json::json!({"security": [{"apiKey": []}]}));
        let target = operation(serde_json::json!({"security": []}));
        let changes = run(&source, &target);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Removed);
        assert_eq!(changes[0].severity, Severity::Error);
    }

    #[test]
    fn test_callback_modified_is_warning() {
        let source = operation(serde_json::json!({
            "callbacks": {"onEvent": {"{$request.body#/url}": {"post": {}}}}
        }));
        let target = operation(serde_json::json!({
            "callbacks": {"onEvent": {"{$request.body#/url}": {"put": {}}}}
        }));
        let changes = run(&source, &target);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].severity, Severity::Warning);
    }
}
