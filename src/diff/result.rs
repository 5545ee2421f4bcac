//! Diff result structures.

use super::change::{Change, Severity};
use crate::model::{Document, DocumentStats, DocumentV3, OasVersion};
use crate::parsers::ParseResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete result of one diff call.
///
/// Changes appear in deterministic depth-first traversal order; on equal
/// inputs two runs produce extensionally equal sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use]
pub struct DiffResult {
    /// Ordered change sequence.
    pub changes: Vec<Change>,

    /// Declared version strings of both sides.
    pub source_version: String,
    pub target_version: String,
    /// Enumerated version tags of both sides.
    pub source_oas_version: OasVersion,
    pub target_oas_version: OasVersion,
    /// Document statistics of both sides.
    pub source_stats: DocumentStats,
    pub target_stats: DocumentStats,
    /// Document byte sizes of both sides.
    pub source_size: u64,
    pub target_size: u64,
    /// Source paths when the documents came from files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_path: Option<PathBuf>,

    /// Per-severity counts over `changes`.
    pub critical_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    /// True iff any change is error or critical.
    pub has_breaking_changes: bool,
}

impl DiffResult {
    /// Create an empty result carrying both envelopes' metadata.
    pub fn new(source: &ParseResult, target: &ParseResult) -> Self {
        Self {
            changes: Vec::new(),
            source_version: source.version.clone(),
            target_version: target.version.clone(),
            source_oas_version: source.oas_version,
            target_oas_version: target.oas_version,
            source_stats: source.stats,
            target_stats: target.stats,
            source_size: source.size,
            target_size: target.size,
            source_path: source.source_path.clone(),
            target_path: target.source_path.clone(),
            critical_count: 0,
            error_count: 0,
            warning_count: 0,
            info_count: 0,
            has_breaking_changes: false,
        }
    }

    /// Walk the changes once and fill the per-severity counters and the
    /// breaking flag.
    pub fn calculate_summary(&mut self) {
        self.critical_count = 0;
        self.error_count = 0;
        self.warning_count = 0;
        self.info_count = 0;
        for change in &self.changes {
            match change.severity {
                Severity::Critical => self.critical_count += 1,
                Severity::Error => self.error_count += 1,
                Severity::Warning => self.warning_count += 1,
                Severity::Info => self.info_count += 1,
                Severity::Unset => {}
            }
        }
        self.has_breaking_changes = self.critical_count > 0 || self.error_count > 0;
    }

    /// Number of breaking (error or critical) changes.
    #[must_use]
    pub fn breaking_count(&self) -> usize {
        self.critical_count + self.error_count
    }

    /// True when any change was recorded.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Drop all info-severity changes, then refresh the counters.
    pub fn strip_info_changes(&mut self) {
        self.changes
            .retain(|change| change.severity != Severity::Info);
        self.calculate_summary();
    }

    /// Repackage the result as a parse envelope for downstream pipelines.
    ///
    /// The target document is surfaced as-is and each change becomes a
    /// warning string prefixed with its severity tag. When no target
    /// envelope is available, the document is an empty 3.x skeleton and a
    /// warning notes that downstream operations may fail.
    pub fn into_parse_result(self, target: Option<ParseResult>) -> ParseResult {
        let mut warnings: Vec<String> = self
            .changes
            .iter()
            .map(Change::to_warning_string)
            .collect();

        match target {
            Some(mut envelope) => {
                envelope.warnings.append(&mut warnings);
                envelope
            }
            None => {
                warnings.push(
                    "target document is absent; downstream operations may fail".to_string(),
                );
                ParseResult {
                    document: Document::V3(DocumentV3::default()),
                    version: self.target_version.clone(),
                    oas_version: self.target_oas_version,
                    source_path: self.target_path.clone(),
                    size: self.target_size,
                    stats: self.target_stats,
                    content_hash: 0,
                    warnings,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::change::{Category, ChangeKind};
    use crate::parsers::parse_document_str;

    fn sample_result() -> DiffResult {
        let source = parse_document_str(
            "openapi: 3.0.0\ninfo:\n  title: A\n  version: '1'\npaths: {}\n",
        )
        .expect("parse");
        let target = parse_document_str(
            "openapi: 3.0.0\ninfo:\n  title: B\n  version: '1'\npaths: {}\n",
        )
        .expect("parse");
        DiffResult::new(&source, &target)
    }

    fn change_with(severity: Severity, path: &str) -> Change {
        Change {
            path: path.to_string(),
            kind: ChangeKind::Modified,
            category: Category::Info,
            severity,
            old: None,
            new: None,
            message: "test".to_string(),
            source: None,
        }
    }

    #[test]
    fn test_summary_counts_match_changes() {
        let mut result = sample_result();
        result.changes.push(change_with(Severity::Info, "a"));
        result.changes.push(change_with(Severity::Warning, "b"));
        result.changes.push(change_with(Severity::Error, "c"));
        result.changes.push(change_with(Severity::Critical, "d"));
        result.calculate_summary();

        assert_eq!(result.info_count, 1);
        assert_eq!(result.warning_count, 1);
        assert_eq!(result.error_count, 1);
        assert_eq!(result.critical_count, 1);
        assert_eq!(result.breaking_count(), 2);
        assert!(result.has_breaking_changes);
        assert_eq!(
            result.changes.len(),
            result.info_count + result.warning_count + result.breaking_count()
        );
    }

    #[test]
    fn test_strip_info_changes() {
        let mut result = sample_result();
        result.changes.push(change_with(Severity::Info, "a"));
        result.changes.push(change_with(Severity::Warning, "b"));
        result.strip_info_changes();

        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.info_count, 0);
        assert_eq!(result.warning_count, 1);
    }

    #[test]
    fn test_empty_result_is_not_breaking() {
        let mut result = sample_result();
        result.calculate_summary();
        assert!(!result.has_breaking_changes);
        assert!(!result.has_changes());
    }

    #[test]
    fn test_into_parse_result_without_target_warns() {
        let mut result = sample_result();
        result.changes.push(change_with(Severity::Warning, "x"));
        result.calculate_summary();

        let envelope = result.into_parse_result(None);
        assert_eq!(envelope.warnings.len(), 2);
        assert!(envelope.warnings[0].starts_with("[warning]"));
        assert!(envelope.warnings[1].contains("downstream operations may fail"));
    }

    #[test]
    fn test_into_parse_result_reuses_target_envelope() {
        let target = parse_document_str(
            "openapi: 3.0.0\ninfo:\n  title: B\n  version: '1'\npaths: {}\n",
        )
        .expect("parse");
        let mut result = sample_result();
        result.changes.push(change_with(Severity::Info, "x"));
        result.calculate_summary();

        let envelope = result.into_parse_result(Some(target));
        assert_eq!(envelope.warnings.len(), 1);
        assert!(envelope.warnings[0].starts_with("[info]"));
    }
}
