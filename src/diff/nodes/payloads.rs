//! Request body and media-type comparison.

use crate::diff::change::{Category, Severity};
use crate::diff::walker::{json_value, Walker};
use crate::model::{Example, MediaType, RequestBody};
use crate::utils::sorted_union;
use indexmap::IndexMap;

impl Walker<'_> {
    /// Compare the request-body slot of an operation.
    pub(crate) fn diff_request_body_slot(
        &mut self,
        operation_path: &str,
        source: Option<&RequestBody>,
        target: Option<&RequestBody>,
    ) {
        let path = format!("{operation_path}.requestBody");
        match (source, target) {
            (None, None) => {}
            (None, Some(body)) => {
                // a required body rejects requests that previously sent none
                let severity = if body.required {
                    Severity::Error
                } else {
                    Severity::Info
                };
                self.record_added(
                    &path,
                    Category::RequestBody,
                    "",
                    severity,
                    json_value(body),
                    "request body added",
                );
            }
            (Some(body), None) => self.record_removed(
                &path,
                Category::RequestBody,
                "",
                Severity::Error,
                json_value(body),
                "request body removed",
            ),
            (Some(old), Some(new)) => self.diff_request_body(&path, old, new),
        }
    }

    /// Compare two request bodies.
    pub(crate) fn diff_request_body(
        &mut self,
        path: &str,
        source: &RequestBody,
        target: &RequestBody,
    ) {
        self.diff_text_field(
            path,
            Category::RequestBody,
            "description",
            Severity::Info,
            source.description.as_deref(),
            target.description.as_deref(),
        );
        self.diff_required_flag(path, Category::RequestBody, source.required, target.required);
        self.diff_media_types(path, Category::RequestBody, &source.content, &target.content);
        self.diff_extensions(path, &source.extensions, &target.extensions);
    }

    /// Compare two media-type maps under `{path}.content[..]`.
    pub(crate) fn diff_media_types(
        &mut self,
        path: &str,
        category: Category,
        source: &IndexMap<String, MediaType>,
        target: &IndexMap<String, MediaType>,
    ) {
        for media in sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        ) {
            let media_path = format!("{path}.content[{media}]");
            match (source.get(media), target.get(media)) {
                (None, Some(media_type)) => self.record_added(
                    &media_path,
                    category,
                    "mediaType",
                    Severity::Info,
                    json_value(media_type),
                    format!("media type '{media}' added"),
                ),
                (Some(media_type), None) => self.record_removed(
                    &media_path,
                    category,
                    "mediaType",
                    Severity::Warning,
                    json_value(media_type),
                    format!("media type '{media}' removed"),
                ),
                (Some(old), Some(new)) => {
                    self.diff_optional_schema(
                        &format!("{media_path}.schema"),
                        old.schema.as_ref(),
                        new.schema.as_ref(),
                    );
                    self.diff_example_keys(&media_path, category, &old.examples, &new.examples);
                    self.diff_extensions(&media_path, &old.extensions, &new.extensions);
                }
                (None, None) => {}
            }
        }
    }

    /// Key-set diff over a named-example map; values are not compared
    /// deeply.
    pub(crate) fn diff_example_keys(
        &mut self,
        path: &str,
        category: Category,
        source: &IndexMap<String, Example>,
        target: &IndexMap<String, Example>,
    ) {
        for name in sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        ) {
            let example_path = format!("{path}.examples[{name}]");
            match (source.get(name), target.get(name)) {
                (None, Some(_)) => self.record_added(
                    &example_path,
                    category,
                    "example",
                    Severity::Info,
                    None,
                    format!("example '{name}' added"),
                ),
                (Some(_), None) => self.record_removed(
                    &example_path,
                    category,
                    "example",
                    Severity::Warning,
                    None,
                    format!("example '{name}' removed"),
                ),
                _ => {}
            }
        }
    }
}
