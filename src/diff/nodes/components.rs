//! Components section comparison (3.x).
//!
//! Each reusable sub-map gets a key-set diff; common entries recurse
//! into the comparator for their node type. New entries are
//! informational, dropped ones warn (a dropped component may still be
//! unreferenced), and security schemes keep their stricter rules.

use crate::diff::change::{Category, Severity};
use crate::diff::walker::{json_value, Walker};
use crate::model::Components;
use crate::utils::sorted_union;
use serde_json::Value;

impl Walker<'_> {
    /// Compare the `components` sections.
    pub(crate) fn diff_components(
        &mut self,
        path: &str,
        source: Option<&Components>,
        target: Option<&Components>,
    ) {
        if source.is_none() && target.is_none() {
            return;
        }
        let empty = Components::default();
        let source = source.unwrap_or(&empty);
        let target = target.unwrap_or(&empty);

        // schemas
        for name in sorted_union(
            source.schemas.keys().map(String::as_str),
            target.schemas.keys().map(String::as_str),
        ) {
            let schema_path = format!("{path}.schemas[{name}]");
            match (source.schemas.get(name), target.schemas.get(name)) {
                (None, Some(schema)) => self.record_added(
                    &schema_path,
                    Category::Schema,
                    "",
                    Severity::Info,
                    json_value(schema),
                    format!("schema '{name}' added"),
                ),
                (Some(schema), None) => self.record_removed(
                    &schema_path,
                    Category::Schema,
                    "",
                    Severity::Warning,
                    json_value(schema),
                    format!("schema '{name}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_schema(&schema_path, old, new),
                (None, None) => {}
            }
        }

        // responses
        for name in sorted_union(
            source.responses.keys().map(String::as_str),
            target.responses.keys().map(String::as_str),
        ) {
            let response_path = format!("{path}.responses[{name}]");
            match (source.responses.get(name), target.responses.get(name)) {
                (None, Some(response)) => self.record_added(
                    &response_path,
                    Category::Response,
                    "",
                    Severity::Info,
                    json_value(response),
                    format!("response '{name}' added"),
                ),
                (Some(response), None) => self.record_removed(
                    &response_path,
                    Category::Response,
                    "",
                    Severity::Warning,
                    json_value(response),
                    format!("response '{name}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_response(&response_path, old, new),
                (None, None) => {}
            }
        }

        // parameters
        for name in sorted_union(
            source.parameters.keys().map(String::as_str),
            target.parameters.keys().map(String::as_str),
        ) {
            let parameter_path = format!("{path}.parameters[{name}]");
            match (source.parameters.get(name), target.parameters.get(name)) {
                (None, Some(parameter)) => self.record_added(
                    &parameter_path,
                    Category::Parameter,
                    "",
                    Severity::Info,
                    json_value(parameter),
                    format!("parameter '{name}' added"),
                ),
                (Some(parameter), None) => self.record_removed(
                    &parameter_path,
                    Category::Parameter,
                    "",
                    Severity::Warning,
                    json_value(parameter),
                    format!("parameter '{name}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_parameter(&parameter_path, old, new),
                (None, None) => {}
            }
        }

        // request bodies
        for name in sorted_union(
            source.request_bodies.keys().map(String::as_str),
            target.request_bodies.keys().map(String::as_str),
        ) {
            let body_path = format!("{path}.requestBodies[{name}]");
            match (
                source.request_bodies.get(name),
                target.request_bodies.get(name),
            ) {
                (None, Some(body)) => self.record_added(
                    &body_path,
                    Category::RequestBody,
                    "",
                    Severity::Info,
                    json_value(body),
                    format!("request body '{name}' added"),
                ),
                (Some(body), None) => self.record_removed(
                    &body_path,
                    Category::RequestBody,
                    "",
                    Severity::Warning,
                    json_value(body),
                    format!("request body '{name}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_request_body(&body_path, old, new),
                (None, None) => {}
            }
        }

        // headers
        for name in sorted_union(
            source.headers.keys().map(String::as_str),
            target.headers.keys().map(String::as_str),
        ) {
            let header_path = format!("{path}.headers[{name}]");
            match (source.headers.get(name), target.headers.get(name)) {
                (None, Some(header)) => self.record_added(
                    &header_path,
                    Category::Response,
                    "header",
                    Severity::Info,
                    json_value(header),
                    format!("header '{name}' added"),
                ),
                (Some(header), None) => self.record_removed(
                    &header_path,
                    Category::Response,
                    "header",
                    Severity::Warning,
                    json_value(header),
                    format!("header '{name}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_header(&header_path, old, new),
                (None, None) => {}
            }
        }

        self.diff_security_schemes(
            &format!("{path}.securitySchemes"),
            &source.security_schemes,
            &target.security_schemes,
        );

        // examples: key-set only
        for name in sorted_union(
            source.examples.keys().map(String::as_str),
            target.examples.keys().map(String::as_str),
        ) {
            let example_path = format!("{path}.examples[{name}]");
            match (source.examples.get(name), target.examples.get(name)) {
                (None, Some(_)) => self.record_added(
                    &example_path,
                    Category::Schema,
                    "example",
                    Severity::Info,
                    None,
                    format!("example '{name}' added"),
                ),
                (Some(_), None) => self.record_removed(
                    &example_path,
                    Category::Schema,
                    "example",
                    Severity::Warning,
                    None,
                    format!("example '{name}' removed"),
                ),
                _ => {}
            }
        }

        self.diff_links(path, &source.links, &target.links);
        self.diff_component_callbacks(path, &source.callbacks, &target.callbacks);
        self.diff_extensions(path, &source.extensions, &target.extensions);
    }

    fn diff_component_callbacks(
        &mut self,
        path: &str,
        source: &indexmap::IndexMap<String, Value>,
        target: &indexmap::IndexMap<String, Value>,
    ) {
        for name in sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        ) {
            let callback_path = format!("{path}.callbacks[{name}]");
            match (source.get(name), target.get(name)) {
                (None, Some(callback)) => self.record_added(
                    &callback_path,
                    Category::Operation,
                    "callback",
                    Severity::Info,
                    Some(callback.clone()),
                    format!("callback '{name}' added"),
                ),
                (Some(callback), None) => self.record_removed(
                    &callback_path,
                    Category::Operation,
                    "callback",
                    Severity::Warning,
                    Some(callback.clone()),
                    format!("callback '{name}' removed"),
                ),
                (Some(old), Some(new)) => {
                    if old != new {
                        self.record_modified(
                            &callback_path,
                            Category::Operation,
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
