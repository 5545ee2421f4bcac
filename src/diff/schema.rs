//! The schema diff engine.
//!
//! Recursively compares two schemas across the full keyword set:
//! metadata, typing, numeric/string/array/object constraints,
//! composition, conditionals, enumerations, 2020-12 content and
//! unevaluated keywords, and the OAS modifiers. Severity defaults encode
//! whether a change tightens (breaking) or relaxes (informational) the
//! contract; every emission is still subject to rule overrides.
//!
//! A (source, target) pair is processed at most once per root comparison:
//! pairs are keyed by address in the walker's visited set on entry and
//! removed on exit, so aliased or cyclic object graphs terminate.

use super::change::{Category, ChangeKind, Severity};
use super::walker::{json_value, value_label, Walker};
use crate::model::{BoolOrSchema, Exclusive, Schema, TypeSet};
use crate::utils::sorted_union;
use serde::Serialize;
use serde_json::Value;

const CAT: Category = Category::Schema;

/// Classification of a polymorphic (`bool | schema`) operand.
#[derive(Debug, Clone, Copy)]
enum PolyKind<'a> {
    Nil,
    Bool(bool),
    Schema(&'a Schema),
}

fn classify(operand: Option<&BoolOrSchema>) -> PolyKind<'_> {
    match operand {
        None => PolyKind::Nil,
        Some(BoolOrSchema::Bool(b)) => PolyKind::Bool(*b),
        Some(BoolOrSchema::Schema(schema)) => PolyKind::Schema(schema),
    }
}

impl Walker<'_> {
    /// Compare two schemas that may each be absent.
    ///
    /// Presence changes at a node boundary (parameter, media type,
    /// header) are reported at warning severity; the §keyword-level
    /// severities apply once both sides exist.
    pub(crate) fn diff_optional_schema(
        &mut self,
        path: &str,
        source: Option<&Schema>,
        target: Option<&Schema>,
    ) {
        match (source, target) {
            (None, None) => {}
            (None, Some(schema)) => self.record_added(
                path,
                CAT,
                "",
                Severity::Warning,
                json_value(schema),
                "schema added",
            ),
            (Some(schema), None) => self.record_removed(
                path,
                CAT,
                "",
                Severity::Warning,
                json_value(schema),
                "schema removed",
            ),
            (Some(source), Some(target)) => self.diff_schema(path, source, target),
        }
    }

    /// Compare two schemas. Entry point for every schema-shaped field.
    pub(crate) fn diff_schema(&mut self, path: &str, source: &Schema, target: &Schema) {
        if !self.enter_schema_pair(source, target, path) {
            return;
        }

        self.diff_schema_reference(path, source, target);
        self.diff_schema_metadata(path, source, target);
        self.diff_schema_type(path, source, target);
        self.diff_schema_numeric(path, source, target);
        self.diff_schema_string(path, source, target);
        self.diff_schema_array(path, source, target);
        self.diff_schema_object(path, source, target);
        self.diff_schema_composition(path, source, target);
        self.diff_schema_conditionals(path, source, target);
        self.diff_schema_enum(path, source, target);
        self.diff_schema_content(path, source, target);
        self.diff_schema_unevaluated(path, source, target);
        self.diff_schema_modifiers(path, source, target);
        self.diff_extensions(path, &source.extensions, &target.extensions);

        self.exit_schema_pair(source, target);
    }

    fn diff_schema_reference(&mut self, path: &str, source: &Schema, target: &Schema) {
        // References are never resolved; a changed target is opaque.
        if source.reference != target.reference {
            self.record_modified(
                &format!("{path}.$ref"),
                CAT,
                "ref",
                Severity::Warning,
                json_value(&source.reference),
                json_value(&target.reference),
                "schema reference changed",
            );
        }
    }

    fn diff_schema_metadata(&mut self, path: &str, source: &Schema, target: &Schema) {
        self.diff_text_field(
            path,
            CAT,
            "title",
            Severity::Info,
            source.title.as_deref(),
            target.title.as_deref(),
        );
        self.diff_text_field(
            path,
            CAT,
            "description",
            Severity::Info,
            source.description.as_deref(),
            target.description.as_deref(),
        );
        if source.default != target.default {
            self.record_modified(
                &format!("{path}.default"),
                CAT,
                "default",
                Severity::Info,
                source.default.clone(),
                target.default.clone(),
                "default value changed",
            );
        }
        if source.example != target.example || source.examples != target.examples {
            self.record_modified(
                &format!("{path}.example"),
                CAT,
                "example",
                Severity::Info,
                source.example.clone(),
                target.example.clone(),
                "example changed",
            );
        }
        if source.discriminator != target.discriminator {
            self.record_modified(
                &format!("{path}.discriminator"),
                CAT,
                "discriminator",
                Severity::Warning,
                json_value(&source.discriminator),
                json_value(&target.discriminator),
                "discriminator changed",
            );
        }
    }

    fn diff_schema_type(&mut self, path: &str, source: &Schema, target: &Schema) {
        let type_path = format!("{path}.type");
        match (&source.schema_type, &target.schema_type) {
            (None, None) => {}
            (None, Some(new)) => self.record_added(
                &type_path,
                CAT,
                "type",
                Severity::Error,
                json_value(new),
                format!("type constraint '{new}' added"),
            ),
            (Some(old), None) => self.record_removed(
                &type_path,
                CAT,
                "type",
                Severity::Warning,
                json_value(old),
                format!("type constraint '{old}' removed"),
            ),
            (Some(old), Some(new)) => {
                if let Some(severity) = type_change_severity(old, new) {
                    self.record_modified(
                        &type_path,
                        CAT,
                        "type",
                        severity,
                        json_value(old),
                        json_value(new),
                        format!("type changed from '{old}' to '{new}'"),
                    );
                }
            }
        }

        if source.format != target.format {
            let (kind, old, new) = presence_kind(&source.format, &target.format);
            self.record(
                &format!("{path}.format"),
                kind,
                CAT,
                "format",
                Severity::Warning,
                old,
                new,
                "format changed",
            );
        }
    }

    fn diff_schema_numeric(&mut self, path: &str, source: &Schema, target: &Schema) {
        if source.multiple_of != target.multiple_of {
            let (kind, old, new) = presence_kind(&source.multiple_of, &target.multiple_of);
            self.record(
                &format!("{path}.multipleOf"),
                kind,
                CAT,
                "multipleOf",
                Severity::Warning,
                old,
                new,
                "multipleOf changed",
            );
        }
        self.diff_min_bound(path, "minimum", source.minimum, target.minimum);
        self.diff_max_bound(path, "maximum", source.maximum, target.maximum);
        self.diff_exclusive(
            path,
            "exclusiveMinimum",
            source.exclusive_minimum.as_ref(),
            target.exclusive_minimum.as_ref(),
            true,
        );
        self.diff_exclusive(
            path,
            "exclusiveMaximum",
            source.exclusive_maximum.as_ref(),
            target.exclusive_maximum.as_ref(),
            false,
        );
    }

    fn diff_schema_string(&mut self, path: &str, source: &Schema, target: &Schema) {
        self.diff_min_bound(path, "minLength", source.min_length, target.min_length);
        self.diff_max_bound(path, "maxLength", source.max_length, target.max_length);

        let pattern_path = format!("{path}.pattern");
        match (&source.pattern, &target.pattern) {
            (None, None) => {}
            (None, Some(new)) => self.record_added(
                &pattern_path,
                CAT,
                "pattern",
                Severity::Error,
                json_value(new),
                "pattern constraint added",
            ),
            (Some(old), None) => self.record_removed(
                &pattern_path,
                CAT,
                "pattern",
                Severity::Warning,
                json_value(old),
                "pattern constraint removed",
            ),
            (Some(old), Some(new)) if old != new => self.record_modified(
                &pattern_path,
                CAT,
                "pattern",
                Severity::Warning,
                json_value(old),
                json_value(new),
                "pattern changed",
            ),
            _ => {}
        }
    }

    fn diff_schema_array(&mut self, path: &str, source: &Schema, target: &Schema) {
        self.diff_min_bound(path, "minItems", source.min_items, target.min_items);
        self.diff_max_bound(path, "maxItems", source.max_items, target.max_items);

        // uniqueItems defaults to false when absent
        let old_unique = source.unique_items.unwrap_or(false);
        let new_unique = target.unique_items.unwrap_or(false);
        if old_unique != new_unique {
            let severity = if new_unique {
                Severity::Error
            } else {
                Severity::Warning
            };
            self.record_modified(
                &format!("{path}.uniqueItems"),
                CAT,
                "uniqueItems",
                severity,
                json_value(&old_unique),
                json_value(&new_unique),
                "uniqueItems changed",
            );
        }

        self.diff_polymorphic(
            &format!("{path}.items"),
            "items",
            source.items.as_ref(),
            target.items.as_ref(),
        );
        self.diff_polymorphic(
            &format!("{path}.additionalItems"),
            "additionalItems",
            source.additional_items.as_ref(),
            target.additional_items.as_ref(),
        );
        self.diff_schema_list(
            path,
            "prefixItems",
            &source.prefix_items,
            &target.prefix_items,
            Severity::Warning,
            Severity::Warning,
        );
        self.diff_nested_schema(
            &format!("{path}.contains"),
            "contains",
            source.contains.as_deref(),
            target.contains.as_deref(),
        );
    }

    fn diff_schema_object(&mut self, path: &str, source: &Schema, target: &Schema) {
        self.diff_min_bound(
            path,
            "minProperties",
            source.min_properties,
            target.min_properties,
        );
        self.diff_max_bound(
            path,
            "maxProperties",
            source.max_properties,
            target.max_properties,
        );
        self.diff_required(path, source, target);
        self.diff_properties(path, source, target);
        self.diff_polymorphic(
            &format!("{path}.additionalProperties"),
            "additionalProperties",
            source.additional_properties.as_ref(),
            target.additional_properties.as_ref(),
        );
        self.diff_nested_schema(
            &format!("{path}.propertyNames"),
            "propertyNames",
            source.property_names.as_deref(),
            target.property_names.as_deref(),
        );

        // dependentSchemas: a new entry constrains previously free
        // documents, a dropped one relaxes.
        let keys = sorted_union(
            source.dependent_schemas.keys().map(String::as_str),
            target.dependent_schemas.keys().map(String::as_str),
        );
        for key in keys {
            let entry_path = format!("{path}.dependentSchemas[{key}]");
            match (
                source.dependent_schemas.get(key),
                target.dependent_schemas.get(key),
            ) {
                (None, Some(schema)) => self.record_added(
                    &entry_path,
                    CAT,
                    "dependentSchema",
                    Severity::Warning,
                    json_value(schema),
                    format!("dependent schema '{key}' added"),
                ),
                (Some(schema), None) => self.record_removed(
                    &entry_path,
                    CAT,
                    "dependentSchema",
                    Severity::Info,
                    json_value(schema),
                    format!("dependent schema '{key}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_schema(&entry_path, old, new),
                (None, None) => {}
            }
        }
    }

    fn diff_required(&mut self, path: &str, source: &Schema, target: &Schema) {
        for name in sorted_union(
            source.required.iter().map(String::as_str),
            target.required.iter().map(String::as_str),
        ) {
            let in_source = source.required.iter().any(|r| r == name);
            let in_target = target.required.iter().any(|r| r == name);
            let field_path = format!("{path}.required[{name}]");
            if in_target && !in_source {
                self.record_added(
                    &field_path,
                    CAT,
                    "required",
                    Severity::Error,
                    Some(Value::String(name.to_string())),
                    format!("required field '{name}' added"),
                );
            } else if in_source && !in_target {
                self.record_removed(
                    &field_path,
                    CAT,
                    "required",
                    Severity::Info,
                    Some(Value::String(name.to_string())),
                    format!("required field '{name}' removed"),
                );
            }
        }
    }

    fn diff_properties(&mut self, path: &str, source: &Schema, target: &Schema) {
        for name in sorted_union(
            source.properties.keys().map(String::as_str),
            target.properties.keys().map(String::as_str),
        ) {
            let prop_path = format!("{path}.properties[{name}]");
            match (source.properties.get(name), target.properties.get(name)) {
                (Some(old), None) => {
                    let severity = if source.required.iter().any(|r| r == name) {
                        Severity::Error
                    } else {
                        Severity::Warning
                    };
                    self.record_removed(
                        &prop_path,
                        CAT,
                        "property",
                        severity,
                        json_value(old),
                        format!("property '{name}' removed"),
                    );
                }
                (None, Some(new)) => {
                    let severity = if target.required.iter().any(|r| r == name) {
                        Severity::Warning
                    } else {
                        Severity::Info
                    };
                    self.record_added(
                        &prop_path,
                        CAT,
                        "property",
                        severity,
                        json_value(new),
                        format!("property '{name}' added"),
                    );
                }
                (Some(old), Some(new)) => self.diff_schema(&prop_path, old, new),
                (None, None) => {}
            }
        }
    }

    fn diff_schema_composition(&mut self, path: &str, source: &Schema, target: &Schema) {
        // allOf conjuncts tighten: extra entries are new constraints.
        self.diff_schema_list(
            path,
            "allOf",
            &source.all_of,
            &target.all_of,
            Severity::Error,
            Severity::Info,
        );
        // anyOf alternatives widen: extra entries admit more documents.
        self.diff_schema_list(
            path,
            "anyOf",
            &source.any_of,
            &target.any_of,
            Severity::Info,
            Severity::Warning,
        );
        // oneOf is exclusive, so even a new alternative shifts matching.
        self.diff_schema_list(
            path,
            "oneOf",
            &source.one_of,
            &target.one_of,
            Severity::Warning,
            Severity::Warning,
        );
        self.diff_opaque_schema(path, "not", source.not.as_deref(), target.not.as_deref());
    }

    fn diff_schema_conditionals(&mut self, path: &str, source: &Schema, target: &Schema) {
        self.diff_opaque_schema(
            path,
            "if",
            source.if_schema.as_deref(),
            target.if_schema.as_deref(),
        );
        self.diff_opaque_schema(
            path,
            "then",
            source.then_schema.as_deref(),
            target.then_schema.as_deref(),
        );
        self.diff_opaque_schema(
            path,
            "else",
            source.else_schema.as_deref(),
            target.else_schema.as_deref(),
        );
    }

    fn diff_schema_enum(&mut self, path: &str, source: &Schema, target: &Schema) {
        for value in &source.enum_values {
            if !target.enum_values.contains(value) {
                self.record_removed(
                    &format!("{path}.enum[{}]", value_label(value)),
                    CAT,
                    "enum",
                    Severity::Error,
                    Some(value.clone()),
                    format!("enum value {} removed", value_label(value)),
                );
            }
        }
        for value in &target.enum_values {
            if !source.enum_values.contains(value) {
                self.record_added(
                    &format!("{path}.enum[{}]", value_label(value)),
                    CAT,
                    "enum",
                    Severity::Info,
                    Some(value.clone()),
                    format!("enum value {} added", value_label(value)),
                );
            }
        }
    }

    fn diff_schema_content(&mut self, path: &str, source: &Schema, target: &Schema) {
        if source.content_encoding != target.content_encoding {
            let (kind, old, new) =
                presence_kind(&source.content_encoding, &target.content_encoding);
            self.record(
                &format!("{path}.contentEncoding"),
                kind,
                CAT,
                "contentEncoding",
                Severity::Warning,
                old,
                new,
                "contentEncoding changed",
            );
        }
        if source.content_media_type != target.content_media_type {
            let (kind, old, new) =
                presence_kind(&source.content_media_type, &target.content_media_type);
            self.record(
                &format!("{path}.contentMediaType"),
                kind,
                CAT,
                "contentMediaType",
                Severity::Warning,
                old,
                new,
                "contentMediaType changed",
            );
        }
        self.diff_nested_schema(
            &format!("{path}.contentSchema"),
            "contentSchema",
            source.content_schema.as_deref(),
            target.content_schema.as_deref(),
        );
    }

    fn diff_schema_unevaluated(&mut self, path: &str, source: &Schema, target: &Schema) {
        self.diff_polymorphic(
            &format!("{path}.unevaluatedProperties"),
            "unevaluatedProperties",
            source.unevaluated_properties.as_ref(),
            target.unevaluated_properties.as_ref(),
        );
        self.diff_polymorphic(
            &format!("{path}.unevaluatedItems"),
            "unevaluatedItems",
            source.unevaluated_items.as_ref(),
            target.unevaluated_items.as_ref(),
        );
    }

    fn diff_schema_modifiers(&mut self, path: &str, source: &Schema, target: &Schema) {
        // nullable as a capability: taking it away breaks clients that
        // send null.
        let old_nullable = source.nullable.unwrap_or(false);
        let new_nullable = target.nullable.unwrap_or(false);
        if old_nullable != new_nullable {
            let (kind, severity) = if new_nullable {
                (ChangeKind::Added, Severity::Warning)
            } else {
                (ChangeKind::Removed, Severity::Error)
            };
            self.record(
                &format!("{path}.nullable"),
                kind,
                CAT,
                "nullable",
                severity,
                json_value(&old_nullable),
                json_value(&new_nullable),
                "nullable changed",
            );
        }

        for (sub, old, new) in [
            ("readOnly", source.read_only, target.read_only),
            ("writeOnly", source.write_only, target.write_only),
        ] {
            if old.unwrap_or(false) != new.unwrap_or(false) {
                self.record_modified(
                    &format!("{path}.{sub}"),
                    CAT,
                    sub,
                    Severity::Warning,
                    json_value(&old.unwrap_or(false)),
                    json_value(&new.unwrap_or(false)),
                    format!("{sub} changed"),
                );
            }
        }

        let old_deprecated = source.deprecated.unwrap_or(false);
        let new_deprecated = target.deprecated.unwrap_or(false);
        if old_deprecated != new_deprecated {
            let severity = if new_deprecated {
                Severity::Warning
            } else {
                Severity::Info
            };
            self.record_modified(
                &format!("{path}.deprecated"),
                CAT,
                "deprecated",
                severity,
                json_value(&old_deprecated),
                json_value(&new_deprecated),
                "deprecated changed",
            );
        }
    }

    // ------------------------------------------------------------------
    // Keyword helpers
    // ------------------------------------------------------------------

    /// Maximum-family bound: lowering or introducing the cap tightens.
    fn diff_max_bound<T>(&mut self, path: &str, sub: &str, old: Option<T>, new: Option<T>)
    where
        T: PartialOrd + Copy + Serialize + std::fmt::Display,
    {
        let bound_path = format!("{path}.{sub}");
        match (old, new) {
            (None, Some(new)) => self.record_added(
                &bound_path,
                CAT,
                sub,
                Severity::Error,
                json_value(&new),
                format!("{sub} constraint added"),
            ),
            (Some(old), None) => self.record_removed(
                &bound_path,
                CAT,
                sub,
                Severity::Warning,
                json_value(&old),
                format!("{sub} constraint removed"),
            ),
            (Some(old), Some(new)) if old != new => {
                let severity = if new < old {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                self.record_modified(
                    &bound_path,
                    CAT,
                    sub,
                    severity,
                    json_value(&old),
                    json_value(&new),
                    format!("{sub} changed from {old} to {new}"),
                );
            }
            _ => {}
        }
    }

    /// Minimum-family bound: raising or introducing the floor tightens.
    fn diff_min_bound<T>(&mut self, path: &str, sub: &str, old: Option<T>, new: Option<T>)
    where
        T: PartialOrd + Copy + Serialize + std::fmt::Display,
    {
        let bound_path = format!("{path}.{sub}");
        match (old, new) {
            (None, Some(new)) => self.record_added(
                &bound_path,
                CAT,
                sub,
                Severity::Error,
                json_value(&new),
                format!("{sub} constraint added"),
            ),
            (Some(old), None) => self.record_removed(
                &bound_path,
                CAT,
                sub,
                Severity::Warning,
                json_value(&old),
                format!("{sub} constraint removed"),
            ),
            (Some(old), Some(new)) if old != new => {
                let severity = if new > old {
                    Severity::Error
                } else {
                    Severity::Warning
                };
                self.record_modified(
                    &bound_path,
                    CAT,
                    sub,
                    severity,
                    json_value(&old),
                    json_value(&new),
                    format!("{sub} changed from {old} to {new}"),
                );
            }
            _ => {}
        }
    }

    /// `exclusiveMinimum`/`exclusiveMaximum`: numeric bounds follow the
    /// min/max rules; the 3.0 flag form or a form change is a warning.
    fn diff_exclusive(
        &mut self,
        path: &str,
        sub: &str,
        old: Option<&Exclusive>,
        new: Option<&Exclusive>,
        is_minimum: bool,
    ) {
        let as_bound = |e: Option<&Exclusive>| match e {
            Some(Exclusive::Bound(b)) => Some(*b),
            _ => None,
        };
        let flag_involved = matches!(old, Some(Exclusive::Flag(_)))
            || matches!(new, Some(Exclusive::Flag(_)));

        if flag_involved {
            if old != new {
                self.record_modified(
                    &format!("{path}.{sub}"),
                    CAT,
                    sub,
                    Severity::Warning,
                    json_value(&old),
                    json_value(&new),
                    format!("{sub} changed"),
                );
            }
            return;
        }

        if is_minimum {
            self.diff_min_bound(path, sub, as_bound(old), as_bound(new));
        } else {
            self.diff_max_bound(path, sub, as_bound(old), as_bound(new));
        }
    }

    /// Polymorphic `bool | schema` keyword per the four-way
    /// classification.
    fn diff_polymorphic(
        &mut self,
        path: &str,
        sub: &str,
        old: Option<&BoolOrSchema>,
        new: Option<&BoolOrSchema>,
    ) {
        match (classify(old), classify(new)) {
            (PolyKind::Nil, PolyKind::Nil) => {}
            (PolyKind::Nil, present) => {
                let severity = match present {
                    PolyKind::Bool(false) => Severity::Error,
                    _ => Severity::Info,
                };
                self.record_added(
                    path,
                    CAT,
                    sub,
                    severity,
                    json_value(&new),
                    format!("{sub} added"),
                );
            }
            (present, PolyKind::Nil) => {
                let severity = match present {
                    PolyKind::Bool(false) => Severity::Error,
                    _ => Severity::Info,
                };
                self.record_removed(
                    path,
                    CAT,
                    sub,
                    severity,
                    json_value(&old),
                    format!("{sub} removed"),
                );
            }
            (PolyKind::Bool(old_flag), PolyKind::Bool(new_flag)) => {
                if old_flag != new_flag {
                    // true -> false forbids what was allowed
                    let severity = if old_flag && !new_flag {
                        Severity::Error
                    } else {
                        Severity::Info
                    };
                    self.record_modified(
                        path,
                        CAT,
                        sub,
                        severity,
                        json_value(&old_flag),
                        json_value(&new_flag),
                        format!("{sub} changed from {old_flag} to {new_flag}"),
                    );
                }
            }
            (PolyKind::Schema(old_schema), PolyKind::Schema(new_schema)) => {
                self.diff_schema(path, old_schema, new_schema);
            }
            _ => {
                // bool on one side, schema on the other
                self.record_modified(
                    path,
                    CAT,
                    sub,
                    Severity::Warning,
                    json_value(&old),
                    json_value(&new),
                    format!("{sub} changed form"),
                );
            }
        }
    }

    /// Positional subschema list (`allOf`, `anyOf`, `oneOf`,
    /// `prefixItems`): recurse at common indices, report extras.
    fn diff_schema_list(
        &mut self,
        path: &str,
        sub: &str,
        source: &[Schema],
        target: &[Schema],
        added_severity: Severity,
        removed_severity: Severity,
    ) {
        let common = source.len().min(target.len());
        for index in 0..common {
            self.diff_schema(&format!("{path}.{sub}[{index}]"), &source[index], &target[index]);
        }
        for (index, schema) in source.iter().enumerate().skip(common) {
            self.record_removed(
                &format!("{path}.{sub}[{index}]"),
                CAT,
                sub,
                removed_severity,
                json_value(schema),
                format!("{sub} entry removed"),
            );
        }
        for (index, schema) in target.iter().enumerate().skip(common) {
            self.record_added(
                &format!("{path}.{sub}[{index}]"),
                CAT,
                sub,
                added_severity,
                json_value(schema),
                format!("{sub} entry added"),
            );
        }
    }

    /// Nested schema keyword that recurses when both sides are present
    /// (`contains`, `propertyNames`, `contentSchema`).
    fn diff_nested_schema(
        &mut self,
        path: &str,
        sub: &str,
        source: Option<&Schema>,
        target: Option<&Schema>,
    ) {
        match (source, target) {
            (None, None) => {}
            (None, Some(schema)) => self.record_added(
                path,
                CAT,
                sub,
                Severity::Warning,
                json_value(schema),
                format!("{sub} added"),
            ),
            (Some(schema), None) => self.record_removed(
                path,
                CAT,
                sub,
                Severity::Warning,
                json_value(schema),
                format!("{sub} removed"),
            ),
            (Some(old), Some(new)) => self.diff_schema(path, old, new),
        }
    }

    /// Schema keyword whose semantics resist granular classification
    /// (`not`, `if`, `then`, `else`): any change is a single warning.
    fn diff_opaque_schema(
        &mut self,
        path: &str,
        sub: &str,
        source: Option<&Schema>,
        target: Option<&Schema>,
    ) {
        let keyword_path = format!("{path}.{sub}");
        match (source, target) {
            (None, None) => {}
            (None, Some(schema)) => self.record_added(
                &keyword_path,
                CAT,
                sub,
                Severity::Warning,
                json_value(schema),
                format!("{sub} added"),
            ),
            (Some(schema), None) => self.record_removed(
                &keyword_path,
                CAT,
                sub,
                Severity::Warning,
                json_value(schema),
                format!("{sub} removed"),
            ),
            (Some(old), Some(new)) => {
                if old != new {
                    self.record_modified(
                        &keyword_path,
                        CAT,
                        sub,
                        Severity::Warning,
                        json_value(old),
                        json_value(new),
                        format!("{sub} changed"),
                    );
                }
            }
        }
    }
}

/// Severity of a `type` keyword change, or `None` when the declared sets
/// are equal.
fn type_change_severity(old: &TypeSet, new: &TypeSet) -> Option<Severity> {
    let mut old_names = old.names();
    let mut new_names = new.names();
    old_names.sort_unstable();
    new_names.sort_unstable();
    if old_names == new_names {
        return None;
    }

    // integer -> number is the one compatible scalar widening
    if old_names == ["integer"] && new_names == ["number"] {
        return Some(Severity::Warning);
    }

    // pure widening (every old type still accepted) is compatible
    if old_names.iter().all(|name| new_names.contains(name)) {
        return Some(Severity::Warning);
    }

    Some(Severity::Error)
}

/// Derive kind and value slots for an `Option` pair already known to
/// differ.
fn presence_kind<T: Serialize>(
    old: &Option<T>,
    new: &Option<T>,
) -> (ChangeKind, Option<Value>, Option<Value>) {
    match (old, new) {
        (None, Some(new)) => (ChangeKind::Added, None, json_value(new)),
        (Some(old), None) => (ChangeKind::Removed, json_value(old), None),
        _ => (ChangeKind::Modified, json_value(old), json_value(new)),
    }
}
