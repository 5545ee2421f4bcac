//! Response map comparison, keyed by status code string.

use crate::diff::change::{Category, Severity};
use crate::diff::walker::{json_value, Walker};
use crate::model::{Header, Link, Response, ResponseV2};
use crate::utils::sorted_union;
use indexmap::IndexMap;

const CAT: Category = Category::Response;

/// Whether a status-code key denotes success. Covers literal 2xx codes
/// and the `2XX` wildcard; `default` is not a success code.
pub(crate) fn is_success_code(code: &str) -> bool {
    code.starts_with('2')
}

impl Walker<'_> {
    /// Compare two response maps under `{path}.responses[..]`.
    pub(crate) fn diff_responses(
        &mut self,
        path: &str,
        source: &IndexMap<String, Response>,
        target: &IndexMap<String, Response>,
    ) {
        for code in sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        ) {
            let response_path = format!("{path}.responses[{code}]");
            match (source.get(code), target.get(code)) {
                (None, Some(response)) => self.record_added(
                    &response_path,
                    CAT,
                    "",
                    Severity::Info,
                    json_value(response),
                    format!("response {code} added"),
                ),
                (Some(response), None) => {
                    // losing a success response breaks every caller
                    let severity = if is_success_code(code) {
                        Severity::Error
                    } else {
                        Severity::Warning
                    };
                    self.record_removed(
                        &response_path,
                        CAT,
                        "",
                        severity,
                        json_value(response),
                        format!("response {code} removed"),
                    );
                }
                (Some(old), Some(new)) => self.diff_response(&response_path, old, new),
                (None, None) => {}
            }
        }
    }

    /// Compare two responses.
    pub(crate) fn diff_response(&mut self, path: &str, source: &Response, target: &Response) {
        self.diff_text_field(
            path,
            CAT,
            "description",
            Severity::Info,
            source.description.as_deref(),
            target.description.as_deref(),
        );
        self.diff_headers(path, &source.headers, &target.headers);
        self.diff_media_types(path, CAT, &source.content, &target.content);
        self.diff_links(path, &source.links, &target.links);
        self.diff_extensions(path, &source.extensions, &target.extensions);
    }

    /// Compare two header maps under `{path}.headers[..]`.
    pub(crate) fn diff_headers(
        &mut self,
        path: &str,
        source: &IndexMap<String, Header>,
        target: &IndexMap<String, Header>,
    ) {
        for name in sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        ) {
            let header_path = format!("{path}.headers[{name}]");
            match (source.get(name), target.get(name)) {
                (None, Some(header)) => self.record_added(
                    &header_path,
                    CAT,
                    "header",
                    Severity::Info,
                    json_value(header),
                    format!("header '{name}' added"),
                ),
                (Some(header), None) => self.record_removed(
                    &header_path,
                    CAT,
                    "header",
                    Severity::Warning,
                    json_value(header),
                    format!("header '{name}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_header(&header_path, old, new),
                (None, None) => {}
            }
        }
    }

    /// Compare one header pair: schema and style, plus the 2.0 inline
    /// type fields.
    pub(crate) fn diff_header(&mut self, path: &str, source: &Header, target: &Header) {
        self.diff_text_field(
            path,
            CAT,
            "description",
            Severity::Info,
            source.description.as_deref(),
            target.description.as_deref(),
        );
        self.diff_text_field(
            path,
            CAT,
            "style",
            Severity::Warning,
            source.style.as_deref(),
            target.style.as_deref(),
        );
        if source.required != target.required {
            self.record_modified(
                &format!("{path}.required"),
                CAT,
                "required",
                Severity::Warning,
                json_value(&source.required),
                json_value(&target.required),
                "header required changed",
            );
        }
        self.diff_text_field(
            path,
            CAT,
            "type",
            Severity::Warning,
            source.header_type.as_deref(),
            target.header_type.as_deref(),
        );
        self.diff_text_field(
            path,
            CAT,
            "format",
            Severity::Warning,
            source.format.as_deref(),
            target.format.as_deref(),
        );
        self.diff_optional_schema(
            &format!("{path}.schema"),
            source.schema.as_ref(),
            target.schema.as_ref(),
        );
        self.diff_extensions(path, &source.extensions, &target.extensions);
    }

    /// Compare two 2.0 response maps. The flat shape carries a schema
    /// directly instead of per-media-type content.
    pub(crate) fn diff_responses_v2(
        &mut self,
        path: &str,
        source: &IndexMap<String, ResponseV2>,
        target: &IndexMap<String, ResponseV2>,
    ) {
        for code in sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        ) {
            let response_path = format!("{path}.responses[{code}]");
            match (source.get(code), target.get(code)) {
                (None, Some(response)) => self.record_added(
                    &response_path,
                    CAT,
                    "",
                    Severity::Info,
                    json_value(response),
                    format!("response {code} added"),
                ),
                (Some(response), None) => {
                    let severity = if is_success_code(code) {
                        Severity::Error
                    } else {
                        Severity::Warning
                    };
                    self.record_removed(
                        &response_path,
                        CAT,
                        "",
                        severity,
                        json_value(response),
                        format!("response {code} removed"),
                    );
                }
                (Some(old), Some(new)) => {
                    self.diff_text_field(
                        &response_path,
                        CAT,
                        "description",
                        Severity::Info,
                        old.description.as_deref(),
                        new.description.as_deref(),
                    );
                    self.diff_optional_schema(
                        &format!("{response_path}.schema"),
                        old.schema.as_ref(),
                        new.schema.as_ref(),
                    );
                    self.diff_headers(&response_path, &old.headers, &new.headers);
                    if old.examples != new.examples {
                        self.record_modified(
                            &format!("{response_path}.examples"),
                            CAT,
                            "example",
                            Severity::Info,
                            old.examples.clone(),
                            new.examples.clone(),
                            "examples changed",
                        );
                    }
                    self.diff_extensions(&response_path, &old.extensions, &new.extensions);
                }
                (None, None) => {}
            }
        }
    }

    /// Compare two link maps; common links are compared structurally.
    pub(crate) fn diff_links(
        &mut self,
        path: &str,
        source: &IndexMap<String, Link>,
        target: &IndexMap<String, Link>,
    ) {
        for name in sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        ) {
            let link_path = format!("{path}.links[{name}]");
            match (source.get(name), target.get(name)) {
                (None, Some(link)) => self.record_added(
                    &link_path,
                    CAT,
                    "link",
                    Severity::Info,
                    json_value(link),
                    format!("link '{name}' added"),
                ),
                (Some(link), None) => self.record_removed(
                    &link_path,
                    CAT,
                    "link",
                    Severity::Warning,
                    json_value(link),
                    format!("link '{name}' removed"),
                ),
                (Some(old), Some(new)) => {
                    let fields_changed = old.operation_ref != new.operation_ref
                        || old.operation_id != new.operation_id
                        || old.parameters != new.parameters
                        || old.request_body != new.request_body
                        || old.description != new.description
                        || old.server != new.server;
                    if fields_changed {
                        self.record_modified(
                            &link_path,
                            CAT,
                            "link",
                            Severity::Info,
                            json_value(old),
                            json_value(new),
                            format!("link '{name}' modified"),
                        );
                    }
                    self.diff_extensions(&link_path, &old.extensions, &new.extensions);
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

    fn responses(json: serde_json::Value) -> IndexMap<String, Response> {
        serde_json::from_value(json).expect("responses should parse")
    }

    fn run(
        source: &IndexMap<String, Response>,
        target: &IndexMap<String, Response>,
    ) -> Vec<Change> {
        let rules = BreakingRules::new();
        let policy = SeverityPolicy::new(DiffMode::Breaking, &rules);
        let mut walker = Walker::new(policy, true, None, None);
        walker.diff_responses("document.paths./pets.get", source, target);
        walker.finish()
    }

    #[test]
    fn test_success_code_classification() {
        assert!(is_success_code("200"));
        assert!(is_success_code("201"));
        assert!(is_success_code("2XX"));
        assert!(!is_success_code("default"));
        assert!(!is_success_code("404"));
        assert!(!is_success_code("500"));
    }

    #[test]
    fn test_success_response_removed_is_error() {
        let source = responses(serde_json::json!({
            "200": {"description": "OK"},
            "500": {"description": "err"}
        }));
        let target = responses(serde_json::json!({"500": {"description": "err"}}));
        let changes = run(&source, &target);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "document.paths./pets.get.responses[200]");
        assert_eq!(changes[0].kind, ChangeKind::Removed);
        assert_eq!(changes[0].category, Category::Response);
        assert_eq!(changes[0].severity, Severity::Error);
    }

    #[test]
    fn test_wildcard_success_removal_is_error() {
        let source = responses(serde_json::json!({
            "2XX": {"description": "OK"},
            "default": {"description": "fallback"}
        }));
        let target = responses(serde_json::json!({"default": {"description": "fallback"}}));
        let changes = run(&source, &target);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].severity, Severity::Error);
    }

    #[test]
    fn test_error_response_removed_is_warning() {
        let source = responses(serde_json::json!({
            "200": {"description": "OK"},
            "404": {"description": "missing"}
        }));
        let target = responses(serde_json::json!({"200": {"description": "OK"}}));
        let changes = run(&source, &target);
        assert_eq!(changes[0].severity, Severity::Warning);
    }

    #[test]
    fn test_response_added_is_info() {
        let source = responses(serde_json::json!({"200": {"description": "OK"}}));
        let target = responses(serde_json::json!({
            "200": {"description": "OK"},
            "429": {"description": "slow down"}
        }));
        let changes = run(&source, &target);
        assert_eq!(changes[0].severity, Severity::Info);
    }

    #[test]
    fn test_header_removed_is_warning() {
        let source = responses(serde_json::json!({
            "200": {
                "description": "OK",
                "headers": {"X-Rate-Limit": {"schema": {"type": "integer"}}}
            }
        }));
        let target = responses(serde_json::json!({"200": {"description": "OK"}}));
        let changes = run(&source, &target);

        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].path,
            "document.paths./pets.get.responses[200].headers[X-Rate-Limit]"
        );
        assert_eq!(changes[0].severity, Severity::Warning);
    }

    #[test]
    fn test_link_changes() {
        let source = responses(serde_json::json!({
            "201": {
                "description": "Created",
                "links": {"GetPet": {"operationId": "getPet"}}
            }
        }));
        let target = responses(serde_json::json!({
            "201": {
                "description": "Created",
                "links": {"GetPet": {"operationId": "fetchPet"}}
            }
        }));
        let changes = run(&source, &target);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Modified);
        assert_eq!(changes[0].severity, Severity::Info);
    }
}
