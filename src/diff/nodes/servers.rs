//! Server collection comparison (3.x).

use crate::diff::change::{Category, Severity};
use crate::diff::walker::{json_value, Walker};
use crate::model::Server;
use crate::utils::sorted_union;
use std::collections::BTreeMap;

const CAT: Category = Category::Server;

impl Walker<'_> {
    /// Compare two server collections, keyed by URL.
    pub(crate) fn diff_servers(&mut self, path: &str, source: &[Server], target: &[Server]) {
        let old: BTreeMap<&str, &Server> =
            source.iter().map(|s| (s.url.as_str(), s)).collect();
        let new: BTreeMap<&str, &Server> =
            target.iter().map(|s| (s.url.as_str(), s)).collect();

        for url in sorted_union(old.keys().copied(), new.keys().copied()) {
            let server_path = format!("{path}[{url}]");
            match (old.get(url), new.get(url)) {
                (None, Some(server)) => self.record_added(
                    &server_path,
                    CAT,
                    "",
                    Severity::Info,
                    json_value(server),
                    format!("server '{url}' added"),
                ),
                (Some(server), None) => self.record_removed(
                    &server_path,
                    CAT,
                    "",
                    Severity::Warning,
                    json_value(server),
                    format!("server '{url}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_server(&server_path, old, new),
                (None, None) => {}
            }
        }
    }

    fn diff_server(&mut self, path: &str, source: &Server, target: &Server) {
        self.diff_text_field(
            path,
            CAT,
            "description",
            Severity::Info,
            source.description.as_deref(),
            target.description.as_deref(),
        );

        for name in sorted_union(
            source.variables.keys().map(String::as_str),
            target.variables.keys().map(String::as_str),
        ) {
            let variable_path = format!("{path}.variables[{name}]");
            match (source.variables.get(name), target.variables.get(name)) {
                (None, Some(variable)) => self.record_added(
                    &variable_path,
                    CAT,
                    "variable",
                    Severity::Warning,
                    json_value(variable),
                    format!("server variable '{name}' added"),
                ),
                (Some(variable), None) => self.record_removed(
                    &variable_path,
                    CAT,
                    "variable",
                    Severity::Warning,
                    json_value(variable),
                    format!("server variable '{name}' removed"),
                ),
                (Some(old), Some(new)) => {
                    if old != new {
                        // a description-only edit is cosmetic
                        let severity = if old.default == new.default
                            && old.enum_values == new.enum_values
                            && old.extensions == new.extensions
                        {
                            Severity::Info
                        } else {
                            Severity::Warning
                        };
                        self.record_modified(
                            &variable_path,
                            CAT,
                            "variable",
                            severity,
                            json_value(old),
                            json_value(new),
                            format!("server variable '{name}' modified"),
                        );
                    }
                }
                (None, None) => {}
            }
        }

        self.diff_extensions(path, &source.extensions, &target.extensions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::change::ChangeKind;
    use crate::diff::rules::{BreakingRules, DiffMode, SeverityPolicy};
    use crate::diff::Change;

    fn servers(json: serde_json::Value) -> Vec<Server> {
        serde_json::from_value(json).expect("servers should parse")
    }

    fn run(source: &[Server], target: &[Server]) -> Vec<Change> {
        let rules = BreakingRules::new();
        let policy = SeverityPolicy::new(DiffMode::Breaking, &rules);
        let mut walker = Walker::new(policy, true, None, None);
        walker.diff_servers("document.servers", source, target);
        walker.finish()
    }

    #[test]
    fn test_server_removed_is_warning() {
        let source = servers(serde_json::json!([
            {"url": "https://api.example.com"},
            {"url": "https://staging.example.com"}
        ]));
        let target = servers(serde_json::json!([{"url": "https://api.example.com"}]));
        let changes = run(&source, &target);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Removed);
        assert_eq!(changes[0].severity, Severity::Warning);
        assert_eq!(changes[0].path, "document.servers[https://staging.example.com]");
    }

    #[test]
    fn test_server_added_is_info() {
        let source = servers(serde_json::json!([]));
        let target = servers(serde_json::json!([{"url": "https://api.example.com"}]));
        let changes = run(&source, &target);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].severity, Severity::Info);
    }

    #[test]
    fn test_variable_default_change_is_warning() {
        let source = servers(serde_json::json!([{
            "url": "https://{region}.example.com",
            "variables": {"region": {"default": "us"}}
        }]));
        let target = servers(serde_json::json!([{
            "url": "https://{region}.example.com",
            "variables": {"region": {"default": "eu"}}
        }]));
        let changes = run(&source, &target);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].severity, Severity::Warning);
        assert_eq!(
            changes[0].path,
            "document.servers[https://{region}.example.com].variables[region]"
        );
    }

    #[test]
    fn test_variable_description_change_is_info() {
        let source = servers(serde_json::json!([{
            "url": "https://e.com",
            "variables": {"region": {"default": "us", "description": "old"}}
        }]));
        let target = servers(serde_json::json!([{
            "url": "https://e.com",
            "variables": {"region": {"default": "us", "description": "new"}}
        }]));
        let changes = run(&source, &target);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].severity, Severity::Info);
    }
}
