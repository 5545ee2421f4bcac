//! Per-document statistics carried on the parse envelope.

use super::{Document, DocumentV2, DocumentV3};
use serde::{Deserialize, Serialize};

/// Counts surfaced alongside a parsed document and echoed into diff results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Number of path templates (webhooks included for 3.1+).
    pub path_count: usize,
    /// Number of operations across all path items.
    pub operation_count: usize,
    /// Number of named schemas (`components.schemas` or `definitions`).
    pub schema_count: usize,
}

impl DocumentStats {
    /// Compute statistics for a parsed document.
    pub fn for_document(document: &Document) -> Self {
        match document {
            Document::V2(doc) => Self::for_v2(doc),
            Document::V3(doc) => Self::for_v3(doc),
        }
    }

    fn for_v3(doc: &DocumentV3) -> Self {
        let mut stats = Self {
            path_count: doc.paths.len() + doc.webhooks.len(),
            operation_count: 0,
            schema_count: doc
                .components
                .as_ref()
                .map_or(0, |components| components.schemas.len()),
        };
        for item in doc.paths.values().chain(doc.webhooks.values()) {
            stats.operation_count += item
                .operations()
                .iter()
                .filter(|(_, op)| op.is_some())
                .count();
        }
        stats
    }

    fn for_v2(doc: &DocumentV2) -> Self {
        let mut stats = Self {
            path_count: doc.paths.len(),
            operation_count: 0,
            schema_count: doc.definitions.len(),
        };
        for item in doc.paths.values() {
            stats.operation_count += item
                .operations()
                .iter()
                .filter(|(_, op)| op.is_some())
                .count();
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_for_v3() {
        let doc: DocumentV3 = serde_json::from_value(serde_json::json!({
            "openapi": "3.0.0",
            "info": {"title": "Pets", "version": "1.0.0"},
            "paths": {
                "/pets": {
                    "get": {"responses": {"200": {"description": "OK"}}},
                    "post": {"responses": {"201": {"description": "Created"}}}
                },
                "/stores": {
                    "get": {"responses": {"200": {"description": "OK"}}}
                }
            },
            "components": {"schemas": {"Pet": {"type": "object"}}}
        }))
        .expect("document should parse");

        let stats = DocumentStats::for_document(&Document::V3(doc));
        assert_eq!(stats.path_count, 2);
        assert_eq!(stats.operation_count, 3);
        assert_eq!(stats.schema_count, 1);
    }

    #[test]
    fn test_stats_for_empty_document() {
        let stats = DocumentStats::for_document(&Document::V3(DocumentV3::default()));
        assert_eq!(stats, DocumentStats::default());
    }
}
