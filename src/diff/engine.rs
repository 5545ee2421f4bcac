//! The document-level diff engine.
//!
//! Dispatches by version tag: a 3.x walk, a flatter 2.0 walk, or the
//! cross-version walk over common elements. Identical inputs
//! short-circuit before any traversal.

use super::change::{Severity, SourceMap};
use super::cross::walk_cross;
use super::result::DiffResult;
use super::rules::{BreakingRules, DiffMode, SeverityPolicy};
use super::walker::Walker;
use crate::error::{DiffErrorKind, OasDiffError, Result};
use crate::model::{Document, DocumentV2, DocumentV3};
use crate::parsers::ParseResult;
use crate::utils::sorted_union;

/// Semantic diff engine for comparing parsed OpenAPI documents.
pub struct DiffEngine {
    mode: DiffMode,
    include_info: bool,
    rules: BreakingRules,
    source_map: Option<SourceMap>,
    target_map: Option<SourceMap>,
}

impl DiffEngine {
    /// Create a new engine with default settings: breaking mode, info
    /// changes included, no rule overrides.
    pub fn new() -> Self {
        Self {
            mode: DiffMode::Breaking,
            include_info: true,
            rules: BreakingRules::new(),
            source_map: None,
            target_map: None,
        }
    }

    /// Set the operational mode.
    #[must_use]
    pub fn with_mode(mut self, mode: DiffMode) -> Self {
        self.mode = mode;
        self
    }

    /// Keep or strip info-severity changes (and the info-block walk).
    #[must_use]
    pub fn with_include_info(mut self, include: bool) -> Self {
        self.include_info = include;
        self
    }

    /// Set the severity override table.
    #[must_use]
    pub fn with_breaking_rules(mut self, rules: BreakingRules) -> Self {
        self.rules = rules;
        self
    }

    /// Attach a source-side location map for change decoration.
    #[must_use]
    pub fn with_source_map(mut self, map: SourceMap) -> Self {
        self.source_map = Some(map);
        self
    }

    /// Attach a target-side location map for change decoration.
    #[must_use]
    pub fn with_target_map(mut self, map: SourceMap) -> Self {
        self.target_map = Some(map);
        self
    }

    /// Compare two parsed documents and return the diff result.
    ///
    /// Neither input is mutated; the result is owned by the caller.
    pub fn diff(&self, source: &ParseResult, target: &ParseResult) -> Result<DiffResult> {
        let mut result = DiffResult::new(source, target);

        // Identical inputs short-circuit before any traversal.
        if std::ptr::eq(source, target)
            || (source.content_hash != 0 && source.content_hash == target.content_hash)
            || (source.version == target.version && source.document == target.document)
        {
            tracing::debug!("documents are identical, skipping traversal");
            return Ok(result);
        }

        verify_version_tag(source)?;
        verify_version_tag(target)?;

        let policy = SeverityPolicy::new(self.mode, &self.rules);
        let mut walker = Walker::new(
            policy,
            self.include_info,
            self.source_map.as_ref(),
            self.target_map.as_ref(),
        );

        match (&source.document, &target.document) {
            (Document::V3(old), Document::V3(new)) => walk_v3(&mut walker, old, new),
            (Document::V2(old), Document::V2(new)) => walk_v2(&mut walker, old, new),
            (old, new) => walk_cross(&mut walker, old, new),
        }

        result.changes = walker.finish();
        if !self.include_info {
            result
                .changes
                .retain(|change| change.severity != Severity::Info);
        }
        result.calculate_summary();
        tracing::debug!(
            changes = result.changes.len(),
            breaking = result.breaking_count(),
            "diff complete"
        );
        Ok(result)
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// A custom envelope may carry a tag that contradicts its document shape.
fn verify_version_tag(envelope: &ParseResult) -> Result<()> {
    let is_v3_document = matches!(envelope.document, Document::V3(_));
    if envelope.oas_version.is_v3() == is_v3_document {
        return Ok(());
    }
    Err(OasDiffError::diff(
        "version dispatch",
        DiffErrorKind::UnknownVersion(format!(
            "tag {} does not match the document shape",
            envelope.oas_version
        )),
    ))
}

fn walk_v3(walker: &mut Walker<'_>, source: &DocumentV3, target: &DocumentV3) {
    walker.diff_info("document.info", &source.info, &target.info);
    walker.diff_servers("document.servers", &source.servers, &target.servers);
    walker.diff_paths("document.paths", false, &source.paths, &target.paths);
    walker.diff_paths("document.webhooks", true, &source.webhooks, &target.webhooks);
    walker.diff_components(
        "document.components",
        source.components.as_ref(),
        target.components.as_ref(),
    );
    walker.diff_security_requirements("document.security", &source.security, &target.security);
    walker.diff_tags("document.tags", &source.tags, &target.tags);
    walker.diff_extensions("document", &source.extensions, &target.extensions);
}

fn walk_v2(walker: &mut Walker<'_>, source: &DocumentV2, target: &DocumentV2) {
    use super::change::Category;

    walker.diff_info("document.info", &source.info, &target.info);

    // host/basePath/schemes play the role of the 3.x servers collection
    walker.diff_text_field(
        "document",
        Category::Server,
        "host",
        Severity::Warning,
        source.host.as_deref(),
        target.host.as_deref(),
    );
    walker.diff_text_field(
        "document",
        Category::Server,
        "basePath",
        Severity::Warning,
        source.base_path.as_deref(),
        target.base_path.as_deref(),
    );
    for scheme in sorted_union(
        source.schemes.iter().map(String::as_str),
        target.schemes.iter().map(String::as_str),
    ) {
        let in_source = source.schemes.iter().any(|s| s == scheme);
        let in_target = target.schemes.iter().any(|s| s == scheme);
        let scheme_path = format!("document.schemes[{scheme}]");
        if in_target && !in_source {
            walker.record_added(
                &scheme_path,
                Category::Server,
                "scheme",
                Severity::Info,
                Some(serde_json::Value::String(scheme.to_string())),
                format!("scheme '{scheme}' added"),
            );
        } else if in_source && !in_target {
            walker.record_removed(
                &scheme_path,
                Category::Server,
                "scheme",
                Severity::Warning,
                Some(serde_json::Value::String(scheme.to_string())),
                format!("scheme '{scheme}' removed"),
            );
        }
    }

    // document-level consumes/produces surface as media-type changes
    walker.diff_media_type_names(
        "document.consumes",
        Category::RequestBody,
        &source.consumes,
        &target.consumes,
    );
    walker.diff_media_type_names(
        "document.produces",
        Category::Response,
        &source.produces,
        &target.produces,
    );

    walker.diff_paths_v2("document.paths", &source.paths, &target.paths);

    // definitions play the role of components.schemas
    for name in sorted_union(
        source.definitions.keys().map(String::as_str),
        target.definitions.keys().map(String::as_str),
    ) {
        let schema_path = format!("document.definitions[{name}]");
        match (source.definitions.get(name), target.definitions.get(name)) {
            (None, Some(schema)) => walker.record_added(
                &schema_path,
                Category::Schema,
                "",
                Severity::Info,
                serde_json::to_value(schema).ok(),
                format!("schema '{name}' added"),
            ),
            (Some(schema), None) => walker.record_removed(
                &schema_path,
                Category::Schema,
                "",
                Severity::Warning,
                serde_json::to_value(schema).ok(),
                format!("schema '{name}' removed"),
            ),
            (Some(old), Some(new)) => walker.diff_schema(&schema_path, old, new),
            (None, None) => {}
        }
    }

    // reusable parameters
    for name in sorted_union(
        source.parameters.keys().map(String::as_str),
        target.parameters.keys().map(String::as_str),
    ) {
        let parameter_path = format!("document.parameters[{name}]");
        match (source.parameters.get(name), target.parameters.get(name)) {
            (None, Some(parameter)) => walker.record_added(
                &parameter_path,
                Category::Parameter,
                "",
                Severity::Info,
                serde_json::to_value(parameter).ok(),
                format!("parameter '{name}' added"),
            ),
            (Some(parameter), None) => walker.record_removed(
                &parameter_path,
                Category::Parameter,
                "",
                Severity::Warning,
                serde_json::to_value(parameter).ok(),
                format!("parameter '{name}' removed"),
            ),
            (Some(old), Some(new)) => walker.diff_parameter_v2(&parameter_path, old, new),
            (None, None) => {}
        }
    }

    // reusable responses
    walker.diff_responses_v2("document", &source.responses, &target.responses);

    // securityDefinitions correspond to components.securitySchemes
    walker.diff_security_schemes(
        "document.securityDefinitions",
        &source.security_definitions,
        &target.security_definitions,
    );

    walker.diff_security_requirements("document.security", &source.security, &target.security);
    walker.diff_tags("document.tags", &source.tags, &target.tags);
    walker.diff_extensions("document", &source.extensions, &target.extensions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse_document_str;

    const PETS_30: &str = r#"
openapi: 3.0.0
info:
  title: Pets
  version: 1.0.0
paths:
  /pets:
    get:
      responses:
        "200":
          description: OK
"#;

    #[test]
    fn test_identical_documents_fast_path() {
        let source = parse_document_str(PETS_30).expect("parse");
        let target = parse_document_str(PETS_30).expect("parse");
        let result = DiffEngine::new().diff(&source, &target).expect("diff");

        assert!(result.changes.is_empty());
        assert!(!result.has_breaking_changes);
    }

    #[test]
    fn test_same_envelope_pointer_fast_path() {
        let envelope = parse_document_str(PETS_30).expect("parse");
        let result = DiffEngine::new().diff(&envelope, &envelope).expect("diff");
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_v3_walk_reports_endpoint_removal() {
        let source = parse_document_str(PETS_30).expect("parse");
        let target = parse_document_str(
            "openapi: 3.0.0\ninfo:\n  title: Pets\n  version: 1.0.0\npaths: {}\n",
        )
        .expect("parse");
        let result = DiffEngine::new().diff(&source, &target).expect("diff");

        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].path, "document.paths./pets");
        assert!(result.has_breaking_changes);
        assert_eq!(result.critical_count, 1);
    }

    #[test]
    fn test_v2_walk_host_change() {
        let source = parse_document_str(
            "swagger: '2.0'\ninfo:\n  title: T\n  version: '1'\nhost: a.example.com\npaths: {}\n",
        )
        .expect("parse");
        let target = parse_document_str(
            "swagger: '2.0'\ninfo:\n  title: T\n  version: '1'\nhost: b.example.com\npaths: {}\n",
        )
        .expect("parse");
        let result = DiffEngine::new().diff(&source, &target).expect("diff");

        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].path, "document.host");
        assert_eq!(result.changes[0].severity, Severity::Warning);
    }

    #[test]
    fn test_cross_version_walk_warns_and_compares() {
        let source = parse_document_str(
            "swagger: '2.0'\ninfo:\n  title: Test\n  version: '1'\npaths: {}\n",
        )
        .expect("parse");
        let target = parse_document_str(
            "openapi: 3.1.0\ninfo:\n  title: Test\n  version: '1'\npaths: {}\n",
        )
        .expect("parse");
        let result = DiffEngine::new().diff(&source, &target).expect("diff");

        let mismatch = result
            .changes
            .iter()
            .find(|c| c.path == "document")
            .expect("version mismatch warning");
        assert_eq!(mismatch.severity, Severity::Warning);
        assert!(!result.has_breaking_changes);
    }

    #[test]
    fn test_include_info_false_strips_info_changes() {
        let source = parse_document_str(PETS_30).expect("parse");
        let target = parse_document_str(&PETS_30.replace("title: Pets", "title: Cats"))
            .expect("parse");

        let with_info = DiffEngine::new().diff(&source, &target).expect("diff");
        assert_eq!(with_info.changes.len(), 1);

        let without_info = DiffEngine::new()
            .with_include_info(false)
            .diff(&source, &target)
            .expect("diff");
        assert!(without_info.changes.is_empty());
    }

    #[test]
    fn test_simple_mode_reports_without_severity() {
        let source = parse_document_str(PETS_30).expect("parse");
        let target = parse_document_str(
            "openapi: 3.0.0\ninfo:\n  title: Pets\n  version: 1.0.0\npaths: {}\n",
        )
        .expect("parse");
        let result = DiffEngine::new()
            .with_mode(DiffMode::Simple)
            .diff(&source, &target)
            .expect("diff");

        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].severity, Severity::Unset);
        assert!(!result.has_breaking_changes);
        assert_eq!(result.breaking_count(), 0);
    }

    #[test]
    fn test_mismatched_tag_is_rejected() {
        let source = parse_document_str(PETS_30).expect("parse");
        // different content so the fast path does not short-circuit
        let mut bad = parse_document_str(&PETS_30.replace("title: Pets", "title: Cats"))
            .expect("parse");
        bad.oas_version = crate::model::OasVersion::V2_0;
        let err = DiffEngine::new().diff(&source, &bad).unwrap_err();
        assert!(matches!(err, OasDiffError::Diff { .. }));
    }
}
