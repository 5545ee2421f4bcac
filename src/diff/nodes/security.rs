//! Security requirement and security scheme comparison.

use crate::diff::change::{Category, Severity};
use crate::diff::walker::{json_value, Walker};
use crate::model::{OAuthFlow, SecurityRequirement, SecurityScheme};
use crate::utils::sorted_union;
use indexmap::IndexMap;
use std::collections::BTreeMap;

const CAT: Category = Category::Security;

/// Stable key for one requirement: its scheme names, sorted and joined.
fn requirement_key(requirement: &SecurityRequirement) -> String {
    let mut names: Vec<&str> = requirement.keys().map(String::as_str).collect();
    names.sort_unstable();
    names.join("+")
}

impl Walker<'_> {
    /// Compare two security-requirement lists (document or operation
    /// level). Requirements are keyed by their scheme-name set.
    pub(crate) fn diff_security_requirements(
        &mut self,
        path: &str,
        source: &[SecurityRequirement],
        target: &[SecurityRequirement],
    ) {
        let old: BTreeMap<String, &SecurityRequirement> =
            source.iter().map(|r| (requirement_key(r), r)).collect();
        let new: BTreeMap<String, &SecurityRequirement> =
            target.iter().map(|r| (requirement_key(r), r)).collect();

        for key in sorted_union(
            old.keys().map(String::as_str),
            new.keys().map(String::as_str),
        ) {
            let requirement_path = format!("{path}[{key}]");
            match (old.get(key), new.get(key)) {
                (None, Some(requirement)) => self.record_added(
                    &requirement_path,
                    CAT,
                    "",
                    Severity::Warning,
                    json_value(requirement),
                    "security requirement added",
                ),
                (Some(requirement), None) => self.record_removed(
                    &requirement_path,
                    CAT,
                    "",
                    Severity::Error,
                    json_value(requirement),
                    "security requirement removed",
                ),
                (Some(old), Some(new)) => {
                    self.diff_requirement_scopes(&requirement_path, old, new);
                }
                (None, None) => {}
            }
        }
    }

    fn diff_requirement_scopes(
        &mut self,
        path: &str,
        source: &SecurityRequirement,
        target: &SecurityRequirement,
    ) {
        for scheme in sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        ) {
            let old_scopes = source.get(scheme).map(Vec::as_slice).unwrap_or(&[]);
            let new_scopes = target.get(scheme).map(Vec::as_slice).unwrap_or(&[]);

            for scope in old_scopes {
                if !new_scopes.contains(scope) {
                    self.record_removed(
                        &format!("{path}.{scheme}[{scope}]"),
                        CAT,
                        "scope",
                        Severity::Warning,
                        json_value(scope),
                        format!("scope '{scope}' removed"),
                    );
                }
            }
            for scope in new_scopes {
                if !old_scopes.contains(scope) {
                    self.record_added(
                        &format!("{path}.{scheme}[{scope}]"),
                        CAT,
                        "scope",
                        Severity::Info,
                        json_value(scope),
                        format!("scope '{scope}' added"),
                    );
                }
            }
        }
    }

    /// Compare two security-scheme maps (`components.securitySchemes`
    /// or 2.0 `securityDefinitions`).
    pub(crate) fn diff_security_schemes(
        &mut self,
        path: &str,
        source: &IndexMap<String, SecurityScheme>,
        target: &IndexMap<String, SecurityScheme>,
    ) {
        for name in sorted_union(
            source.keys().map(String::as_str),
            target.keys().map(String::as_str),
        ) {
            let scheme_path = format!("{path}[{name}]");
            match (source.get(name), target.get(name)) {
                (None, Some(scheme)) => self.record_added(
                    &scheme_path,
                    CAT,
                    "",
                    Severity::Warning,
                    json_value(scheme),
                    format!("security scheme '{name}' added"),
                ),
                (Some(scheme), None) => self.record_removed(
                    &scheme_path,
                    CAT,
                    "",
                    Severity::Error,
                    json_value(scheme),
                    format!("security scheme '{name}' removed"),
                ),
                (Some(old), Some(new)) => self.diff_security_scheme(&scheme_path, old, new),
                (None, None) => {}
            }
        }
    }

    fn diff_security_scheme(
        &mut self,
        path: &str,
        source: &SecurityScheme,
        target: &SecurityScheme,
    ) {
        if source.scheme_type != target.scheme_type {
            self.record_modified(
                &format!("{path}.type"),
                CAT,
                "type",
                Severity::Error,
                json_value(&source.scheme_type),
                json_value(&target.scheme_type),
                "security scheme type changed",
            );
        }
        self.diff_text_field(
            path,
            CAT,
            "description",
            Severity::Info,
            source.description.as_deref(),
            target.description.as_deref(),
        );
        for (sub, old, new) in [
            ("name", &source.name, &target.name),
            ("in", &source.location, &target.location),
            ("scheme", &source.scheme, &target.scheme),
            ("bearerFormat", &source.bearer_format, &target.bearer_format),
            (
                "openIdConnectUrl",
                &source.open_id_connect_url,
                &target.open_id_connect_url,
            ),
            ("flow", &source.flow, &target.flow),
        ] {
            self.diff_text_field(
                path,
                CAT,
                sub,
                Severity::Warning,
                old.as_deref(),
                new.as_deref(),
            );
        }

        self.diff_flow_urls(path, source, target);
        self.diff_scheme_scopes(path, source, target);
        self.diff_extensions(path, &source.extensions, &target.extensions);
    }

    /// OAuth flow slots: presence or URL changes are warnings. Scopes
    /// are handled separately across both flow shapes.
    fn diff_flow_urls(&mut self, path: &str, source: &SecurityScheme, target: &SecurityScheme) {
        let slots: [(&str, Option<&OAuthFlow>, Option<&OAuthFlow>); 4] = [
            (
                "implicit",
                source.flows.as_ref().and_then(|f| f.implicit.as_ref()),
                target.flows.as_ref().and_then(|f| f.implicit.as_ref()),
            ),
            (
                "password",
                source.flows.as_ref().and_then(|f| f.password.as_ref()),
                target.flows.as_ref().and_then(|f| f.password.as_ref()),
            ),
            (
                "clientCredentials",
                source
                    .flows
                    .as_ref()
                    .and_then(|f| f.client_credentials.as_ref()),
                target
                    .flows
                    .as_ref()
                    .and_then(|f| f.client_credentials.as_ref()),
            ),
            (
                "authorizationCode",
                source
                    .flows
                    .as_ref()
                    .and_then(|f| f.authorization_code.as_ref()),
                target
                    .flows
                    .as_ref()
                    .and_then(|f| f.authorization_code.as_ref()),
            ),
        ];

        for (slot, old, new) in slots {
            let flow_path = format!("{path}.flows.{slot}");
            match (old, new) {
                (None, None) => {}
                (None, Some(flow)) => self.record_added(
                    &flow_path,
                    CAT,
                    "flow",
                    Severity::Warning,
                    json_value(flow),
                    format!("{slot} flow added"),
                ),
                (Some(flow), None) => self.record_removed(
                    &flow_path,
                    CAT,
                    "flow",
                    Severity::Warning,
                    json_value(flow),
                    format!("{slot} flow removed"),
                ),
                (Some(old), Some(new)) => {
                    let urls_changed = old.authorization_url != new.authorization_url
                        || old.token_url != new.token_url
                        || old.refresh_url != new.refresh_url;
                    if urls_changed {
                        self.record_modified(
                            &flow_path,
                            CAT,
                            "flow",
                            Severity::Warning,
                            json_value(old),
                            json_value(new),
                            format!("{slot} flow modified"),
                        );
                    }
                }
            }
        }
    }

    fn diff_scheme_scopes(&mut self, path: &str, source: &SecurityScheme, target: &SecurityScheme) {
        let old_scopes = source.scope_names();
        let new_scopes = target.scope_names();

        for scope in &old_scopes {
            if !new_scopes.contains(scope) {
                self.record_removed(
                    &format!("{path}.scopes[{scope}]"),
                    CAT,
                    "scope",
                    Severity::Warning,
                    json_value(scope),
                    format!("scope '{scope}' removed"),
                );
            }
        }
        for scope in &new_scopes {
            if !old_scopes.contains(scope) {
                self.record_added(
                    &format!("{path}.scopes[{scope}]"),
                    CAT,
                    "scope",
                    Severity::Info,
                    json_value(scope),
                    format!("scope '{scope}' added"),
                );
            }
        }
    }
}
