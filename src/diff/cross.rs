//! Cross-major-version comparison (2.0 against 3.x).
//!
//! Only elements common to both shapes are compared: the info block,
//! tags, document security, extensions, and the path/operation skeleton
//! with shared operation fields. A version-mismatch warning is always
//! emitted at the document root first. Neither document is translated;
//! the walk reads both shapes through a thin common view.

use super::change::{Category, Severity};
use super::walker::{json_value, Walker};
use super::nodes::is_success_code;
use crate::model::{Document, Schema};
use crate::utils::sorted_union;
use std::collections::BTreeMap;

/// Common view of one operation, buildable from either shape.
struct CrossOperation<'a> {
    summary: Option<&'a str>,
    description: Option<&'a str>,
    operation_id: Option<&'a str>,
    tags: &'a [String],
    deprecated: bool,
    parameters: Vec<CrossParameter<'a>>,
    responses: BTreeMap<&'a str, CrossResponse<'a>>,
}

struct CrossParameter<'a> {
    key: String,
    required: bool,
    description: Option<&'a str>,
    schema: Option<&'a Schema>,
}

struct CrossResponse<'a> {
    description: Option<&'a str>,
    headers: Vec<&'a str>,
}

/// template -> method -> operation view, for either document shape.
fn operations_by_path(document: &Document) -> BTreeMap<&str, BTreeMap<&'static str, CrossOperation<'_>>> {
    let mut map: BTreeMap<&str, BTreeMap<&'static str, CrossOperation<'_>>> = BTreeMap::new();
    match document {
        Document::V2(doc) => {
            for (template, item) in &doc.paths {
                let slots = map.entry(template.as_str()).or_default();
                for (method, operation) in item.operations() {
                    if let Some(op) = operation {
                        slots.insert(
                            method,
                            CrossOperation {
                                summary: op.summary.as_deref(),
                                description: op.description.as_deref(),
                                operation_id: op.operation_id.as_deref(),
                                tags: &op.tags,
                                deprecated: op.deprecated,
                                parameters: op
                                    .parameters
                                    .iter()
                                    .map(|p| CrossParameter {
                                        key: p.key(),
                                        required: p.required,
                                        description: p.description.as_deref(),
                                        schema: p.schema.as_ref(),
                                    })
                                    .collect(),
                                responses: op
                                    .responses
                                    .iter()
                                    .map(|(code, response)| {
                                        (
                                            code.as_str(),
                                            CrossResponse {
                                                description: response.description.as_deref(),
                                                headers: response
                                                    .headers
                                                    .keys()
                                                    .map(String::as_str)
                                                    .collect(),
                                            },
                                        )
                                    })
                                    .collect(),
                            },
                        );
                    }
                }
            }
        }
        Document::V3(doc) => {
            for (template, item) in &doc.paths {
                let slots = map.entry(template.as_str()).or_default();
                for (method, operation) in item.operations() {
                    if let Some(op) = operation {
                        slots.insert(
                            method,
                            CrossOperation {
                                summary: op.summary.as_deref(),
                                description: op.description.as_deref(),
                                operation_id: op.operation_id.as_deref(),
                                tags: &op.tags,
                                deprecated: op.deprecated,
                                parameters: op
                                    .parameters
                                    .iter()
                                    .map(|p| CrossParameter {
                                        key: p.key(),
                                        required: p.required,
                                        description: p.description.as_deref(),
                                        schema: p.schema.as_ref(),
                                    })
                                    .collect(),
                                responses: op
                                    .responses
                                    .iter()
                                    .map(|(code, response)| {
                                        (
                                            code.as_str(),
                                            CrossResponse {
                                                description: response.description.as_deref(),
                                                headers: response
                                                    .headers
                                                    .keys()
                                                    .map(String::as_str)
                                                    .collect(),
                                            },
                                        )
                                    })
                                    .collect(),
                            },
                        );
                    }
                }
            }
        }
    }
    map
}

/// Run the cross-version walk.
pub(crate) fn walk_cross(walker: &mut Walker<'_>, source: &Document, target: &Document) {
    walker.record_modified(
        "document",
        Category::Info,
        "versionMismatch",
        Severity::Warning,
        json_value(&source.version_str()),
        json_value(&target.version_str()),
        "OpenAPI major version mismatch; comparing common elements only",
    );

    walker.diff_info("document.info", source.info(), target.info());

    let (source_tags, target_tags) = match (source, target) {
        (Document::V2(s), Document::V3(t)) => (&s.tags, &t.tags),
        (Document::V3(s), Document::V2(t)) => (&s.tags, &t.tags),
        (Document::V2(s), Document::V2(t)) => (&s.tags, &t.tags),
        (Document::V3(s), Document::V3(t)) => (&s.tags, &t.tags),
    };
    walker.diff_tags("document.tags", source_tags, target_tags);

    let source_security = match source {
        Document::V2(doc) => &doc.security,
        Document::V3(doc) => &doc.security,
    };
    let target_security = match target {
        Document::V2(doc) => &doc.security,
        Document::V3(doc) => &doc.security,
    };
    walker.diff_security_requirements("document.security", source_security, target_security);

    walker.diff_extensions("document", source.extensions(), target.extensions());

    diff_cross_paths(walker, source, target);
}

fn diff_cross_paths(walker: &mut Walker<'_>, source: &Document, target: &Document) {
    let old_paths = operations_by_path(source);
    let new_paths = operations_by_path(target);

    for template in sorted_union(old_paths.keys().copied(), new_paths.keys().copied()) {
        let path = format!("document.paths.{template}");
        match (old_paths.get(template), new_paths.get(template)) {
            (None, Some(_)) => walker.record_added(
                &path,
                Category::Endpoint,
                "",
                Severity::Info,
                None,
                format!("endpoint '{template}' added"),
            ),
            (Some(_), None) => walker.record_removed(
                &path,
                Category::Endpoint,
                "",
                Severity::Critical,
                None,
                format!("endpoint '{template}' removed"),
            ),
            (Some(old_methods), Some(new_methods)) => {
                for method in sorted_union(
                    old_methods.keys().copied(),
                    new_methods.keys().copied(),
                ) {
                    let operation_path = format!("{path}.{method}");
                    match (old_methods.get(method), new_methods.get(method)) {
                        (None, Some(_)) => walker.record_added(
                            &operation_path,
                            Category::Operation,
                            "",
                            Severity::Info,
                            None,
                            format!("operation '{method}' added"),
                        ),
                        (Some(_), None) => walker.record_removed(
                            &operation_path,
                            Category::Operation,
                            "",
                            Severity::Critical,
                            None,
                            format!("operation '{method}' removed"),
                        ),
                        (Some(old), Some(new)) => {
                            diff_cross_operation(walker, &operation_path, old, new);
                        }
                        (None, None) => {}
                    }
                }
            }
            (None, None) => {}
        }
    }
}

fn diff_cross_operation(
    walker: &mut Walker<'_>,
    path: &str,
    source: &CrossOperation<'_>,
    target: &CrossOperation<'_>,
) {
    walker.diff_text_field(
        path,
        Category::Operation,
        "operationId",
        Severity::Warning,
        source.operation_id,
        target.operation_id,
    );
    walker.diff_text_field(
        path,
        Category::Operation,
        "summary",
        Severity::Info,
        source.summary,
        target.summary,
    );
    walker.diff_text_field(
        path,
        Category::Operation,
        "description",
        Severity::Info,
        source.description,
        target.description,
    );
    walker.diff_operation_tags(path, source.tags, target.tags);
    walker.diff_deprecated_flag(path, source.deprecated, target.deprecated);

    // parameters: common fields only
    let old_params: BTreeMap<&str, &CrossParameter<'_>> = source
        .parameters
        .iter()
        .map(|p| (p.key.as_str(), p))
        .collect();
    let new_params: BTreeMap<&str, &CrossParameter<'_>> = target
        .parameters
        .iter()
        .map(|p| (p.key.as_str(), p))
        .collect();
    for key in sorted_union(old_params.keys().copied(), new_params.keys().copied()) {
        let param_path = format!("{path}.parameters[{key}]");
        match (old_params.get(key), new_params.get(key)) {
            (None, Some(param)) => {
                let severity = if param.required {
                    Severity::Error
                } else {
                    Severity::Info
                };
                walker.record_added(
                    &param_path,
                    Category::Parameter,
                    "",
                    severity,
                    None,
                    format!("parameter '{key}' added"),
                );
            }
            (Some(param), None) => {
                let severity = if param.required {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                walker.record_removed(
                    &param_path,
                    Category::Parameter,
                    "",
                    severity,
                    None,
                    format!("parameter '{key}' removed"),
                );
            }
            (Some(old), Some(new)) => {
                walker.diff_required_flag(&param_path, Category::Parameter, old.required, new.required);
                walker.diff_text_field(
                    &param_path,
                    Category::Parameter,
                    "description",
                    Severity::Info,
                    old.description,
                    new.description,
                );
                if let (Some(old_schema), Some(new_schema)) = (old.schema, new.schema) {
                    walker.diff_schema(&format!("{param_path}.schema"), old_schema, new_schema);
                }
            }
            (None, None) => {}
        }
    }

    // responses: status codes, descriptions and header names only
    for code in sorted_union(
        source.responses.keys().copied(),
        target.responses.keys().copied(),
    ) {
        let response_path = format!("{path}.responses[{code}]");
        match (source.responses.get(code), target.responses.get(code)) {
            (None, Some(_)) => walker.record_added(
                &response_path,
                Category::Response,
                "",
                Severity::Info,
                None,
                format!("response {code} added"),
            ),
            (Some(_), None) => {
                let severity = if is_success_code(code) {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                walker.record_removed(
                    &response_path,
                    Category::Response,
                    "",
                    severity,
                    None,
                    format!("response {code} removed"),
                );
            }
            (Some(old), Some(new)) => {
                walker.diff_text_field(
                    &response_path,
                    Category::Response,
                    "description",
                    Severity::Info,
                    old.description,
                    new.description,
                );
                for header in sorted_union(
                    old.headers.iter().copied(),
                    new.headers.iter().copied(),
                ) {
                    let header_path = format!("{response_path}.headers[{header}]");
                    let in_old = old.headers.contains(&header);
                    let in_new = new.headers.contains(&header);
                    if in_new && !in_old {
                        walker.record_added(
                            &header_path,
                            Category::Response,
                            "header",
                            Severity::Info,
                            None,
                            format!("header '{header}' added"),
                        );
                    } else if in_old && !in_new {
                        walker.record_removed(
                            &header_path,
                            Category::Response,
                            "header",
                            Severity::Warning,
                            None,
                            format!("header '{header}' removed"),
                        );
                    }
                }
            }
            (None, None) => {}
        }
    }
}
