//! Parameter comparison, keyed by `(name, in)`.

use crate::diff::change::{Category, Severity};
use crate::diff::walker::{json_value, Walker};
use crate::model::{Parameter, ParameterV2};
use crate::utils::sorted_union;
use std::collections::BTreeMap;

const CAT: Category = Category::Parameter;

impl Walker<'_> {
    /// Compare two 3.x parameter lists.
    pub(crate) fn diff_parameters(
        &mut self,
        path: &str,
        source: &[Parameter],
        target: &[Parameter],
    ) {
        let old: BTreeMap<String, &Parameter> =
            source.iter().map(|p| (p.key(), p)).collect();
        let new: BTreeMap<String, &Parameter> =
            target.iter().map(|p| (p.key(), p)).collect();

        for key in sorted_union(
            old.keys().map(String::as_str),
            new.keys().map(String::as_str),
        ) {
            let param_path = format!("{path}.parameters[{key}]");
            match (old.get(key), new.get(key)) {
                (None, Some(param)) => {
                    // a new required parameter rejects existing requests
                    let severity = if param.required {
                        Severity::Error
                    } else {
                        Severity::Info
                    };
                    self.record_added(
                        &param_path,
                        CAT,
                        "",
                        severity,
                        json_value(param),
                        format!("parameter '{key}' added"),
                    );
                }
                (Some(param), None) => {
                    let severity = if param.required {
                        Severity::Error
                    } else {
                        Severity::Warning
                    };
                    self.record_removed(
                        &param_path,
                        CAT,
                        "",
                        severity,
                        json_value(param),
                        format!("parameter '{key}' removed"),
                    );
                }
                (Some(old), Some(new)) => self.diff_parameter(&param_path, old, new),
                (None, None) => {}
            }
        }
    }

    /// Compare one 3.x parameter pair.
    pub(crate) fn diff_parameter(&mut self, path: &str, source: &Parameter, target: &Parameter) {
        self.diff_text_field(
            path,
            CAT,
            "description",
            Severity::Info,
            source.description.as_deref(),
            target.description.as_deref(),
        );
        self.diff_required_flag(path, CAT, source.required, target.required);
        self.diff_text_field(
            path,
            CAT,
            "style",
            Severity::Warning,
            source.style.as_deref(),
            target.style.as_deref(),
        );
        if source.explode != target.explode {
            self.record_modified(
                &format!("{path}.explode"),
                CAT,
                "explode",
                Severity::Warning,
                json_value(&source.explode),
                json_value(&target.explode),
                "explode changed",
            );
        }
        if source.allow_empty_value != target.allow_empty_value {
            self.record_modified(
                &format!("{path}.allowEmptyValue"),
                CAT,
                "allowEmptyValue",
                Severity::Warning,
                json_value(&source.allow_empty_value),
                json_value(&target.allow_empty_value),
                "allowEmptyValue changed",
            );
        }
        if source.deprecated != target.deprecated {
            let severity = if target.deprecated {
                Severity::Warning
            } else {
                Severity::Info
            };
            self.record_modified(
                &format!("{path}.deprecated"),
                CAT,
                "deprecated",
                severity,
                json_value(&source.deprecated),
                json_value(&target.deprecated),
                "deprecated changed",
            );
        }

        self.diff_optional_schema(
            &format!("{path}.schema"),
            source.schema.as_ref(),
            target.schema.as_ref(),
        );
        self.diff_media_types(path, CAT, &source.content, &target.content);
        self.diff_example_keys(path, CAT, &source.examples, &target.examples);
        self.diff_extensions(path, &source.extensions, &target.extensions);
    }

    /// Compare two 2.0 parameter lists.
    pub(crate) fn diff_parameters_v2(
        &mut self,
        path: &str,
        source: &[ParameterV2],
        target: &[ParameterV2],
    ) {
        let old: BTreeMap<String, &ParameterV2> =
            source.iter().map(|p| (p.key(), p)).collect();
        let new: BTreeMap<String, &ParameterV2> =
            target.iter().map(|p| (p.key(), p)).collect();

        for key in sorted_union(
            old.keys().map(String::as_str),
            new.keys().map(String::as_str),
        ) {
            let param_path = format!("{path}.parameters[{key}]");
            match (old.get(key), new.get(key)) {
                (None, Some(param)) => {
                    let severity = if param.required {
                        Severity::Error
                    } else {
                        Severity::Info
                    };
                    self.record_added(
                        &param_path,
                        CAT,
                        "",
                        severity,
                        json_value(param),
                        format!("parameter '{key}' added"),
                    );
                }
                (Some(param), None) => {
                    let severity = if param.required {
                        Severity::Error
                    } else {
                        Severity::Warning
                    };
                    self.record_removed(
                        &param_path,
                        CAT,
                        "",
                        severity,
                        json_value(param),
                        format!("parameter '{key}' removed"),
                    );
                }
                (Some(old), Some(new)) => self.diff_parameter_v2(&param_path, old, new),
                (None, None) => {}
            }
        }
    }

    pub(crate) fn diff_parameter_v2(&mut self, path: &str, source: &ParameterV2, target: &ParameterV2) {
        self.diff_text_field(
            path,
            CAT,
            "description",
            Severity::Info,
            source.description.as_deref(),
            target.description.as_deref(),
        );
        self.diff_required_flag(path, CAT, source.required, target.required);
        self.diff_inline_param_type(
            path,
            source.param_type.as_deref(),
            target.param_type.as_deref(),
        );
        self.diff_text_field(
            path,
            CAT,
            "format",
            Severity::Warning,
            source.format.as_deref(),
            target.format.as_deref(),
        );
        self.diff_text_field(
            path,
            CAT,
            "collectionFormat",
            Severity::Warning,
            source.collection_format.as_deref(),
            target.collection_format.as_deref(),
        );

        self.diff_optional_schema(
            &format!("{path}.schema"),
            source.schema.as_ref(),
            target.schema.as_ref(),
        );
        self.diff_optional_schema(
            &format!("{path}.items"),
            source.items.as_deref(),
            target.items.as_deref(),
        );
        self.diff_extensions(path, &source.extensions, &target.extensions);
    }

    /// Required-flag transition shared by both shapes: making a
    /// parameter required breaks callers that omit it.
    pub(crate) fn diff_required_flag(
        &mut self,
        path: &str,
        category: Category,
        old: bool,
        new: bool,
    ) {
        if old == new {
            return;
        }
        let severity = if new { Severity::Error } else { Severity::Info };
        self.record_modified(
            &format!("{path}.required"),
            category,
            "required",
            severity,
            json_value(&old),
            json_value(&new),
            "required changed",
        );
    }

    /// 2.0 inline `type` field, mirroring the schema type rules.
    pub(crate) fn diff_inline_param_type(
        &mut self,
        path: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) {
        if old == new {
            return;
        }
        let severity = match (old, new) {
            // integer -> number is the compatible widening
            (Some("integer"), Some("number")) => Severity::Warning,
            (Some(_), Some(_)) => Severity::Error,
            _ => Severity::Warning,
        };
        self.record_modified(
            &format!("{path}.type"),
            CAT,
            "type",
            severity,
            old.map(|v| serde_json::Value::String(v.to_string())),
            new.map(|v| serde_json::Value::String(v.to_string())),
            "parameter type changed",
        );
    }
}
