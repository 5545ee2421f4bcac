//! OpenAPI document ingestion.
//!
//! Accepts YAML or JSON (YAML being a superset, one decode path handles
//! both), detects the declared version from the `swagger`/`openapi`
//! marker, and produces the [`ParseResult`] envelope the diff engine
//! consumes: the typed document, version string and tag, source path,
//! byte size, document statistics and a content hash.
//!
//! `$ref` values are never resolved here or anywhere else in the crate;
//! the differ compares them by value.

use crate::error::{OasDiffError, ParseErrorKind, Result};
use crate::model::{Document, DocumentStats, OasVersion};
use crate::utils::document_hash;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Maximum document file size (256 MB). Anything larger is rejected to
/// prevent OOM on hostile inputs.
const MAX_DOCUMENT_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Parser configuration consumed by the path-based entry points.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Forwarded on outbound requests when a host resolves remote
    /// documents around this crate. This crate itself performs no
    /// network I/O.
    pub user_agent: Option<String>,
    /// Accepted for interface compatibility. External references are
    /// always left unresolved; the differ compares `$ref` by value.
    pub resolve_external_refs: bool,
    /// Emit structural warnings (missing info fields) into the envelope.
    pub validate_structure: bool,
}

/// Envelope produced by the parser and consumed read-only by the differ.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The typed document tree.
    pub document: Document,
    /// Declared version string (`swagger` or `openapi` field).
    pub version: String,
    /// Enumerated version tag.
    pub oas_version: OasVersion,
    /// Where the document was read from, when parsed from a file.
    pub source_path: Option<PathBuf>,
    /// Document byte size.
    pub size: u64,
    /// Path/operation/schema counts.
    pub stats: DocumentStats,
    /// Content hash for quick equality checks; 0 when unavailable.
    pub content_hash: u64,
    /// Non-fatal notes accumulated while parsing.
    pub warnings: Vec<String>,
}

/// Parse an OpenAPI document from a file with default options.
pub fn parse_document(path: &Path) -> Result<ParseResult> {
    parse_document_with(path, &ParseOptions::default())
}

/// Parse an OpenAPI document from a file.
pub fn parse_document_with(path: &Path, options: &ParseOptions) -> Result<ParseResult> {
    let metadata = std::fs::metadata(path).map_err(|e| OasDiffError::io(path, e))?;
    if metadata.len() > MAX_DOCUMENT_FILE_SIZE {
        return Err(OasDiffError::validation(format!(
            "document file is {} MB, exceeding the {} MB limit",
            metadata.len() / (1024 * 1024),
            MAX_DOCUMENT_FILE_SIZE / (1024 * 1024),
        )));
    }
    let content = std::fs::read_to_string(path).map_err(|e| OasDiffError::io(path, e))?;

    let mut result = parse_document_str_with(&content, options)
        .map_err(|e| annotate_path(e, path))?;
    result.source_path = Some(path.to_path_buf());
    Ok(result)
}

/// Parse an OpenAPI document from string content with default options.
pub fn parse_document_str(content: &str) -> Result<ParseResult> {
    parse_document_str_with(content, &ParseOptions::default())
}

/// Parse an OpenAPI document from string content.
pub fn parse_document_str_with(content: &str, options: &ParseOptions) -> Result<ParseResult> {
    let value: Value = serde_yaml::from_str(content)?;
    let mut result = parse_document_value_with(value, options)?;
    result.size = content.len() as u64;
    Ok(result)
}

/// Parse an OpenAPI document from an in-memory JSON value with default options.
pub fn parse_document_value(value: Value) -> Result<ParseResult> {
    parse_document_value_with(value, &ParseOptions::default())
}

/// Parse an OpenAPI document from an in-memory JSON value.
pub fn parse_document_value_with(value: Value, options: &ParseOptions) -> Result<ParseResult> {
    let (version, oas_version) = detect_version(&value)?;

    // An unquoted `swagger: 2.0` decodes as a number; the typed model
    // wants the canonical string.
    let mut value = value;
    if let Some(marker) = value.get_mut("swagger") {
        if !marker.is_string() {
            *marker = Value::String(version.clone());
        }
    }

    let document: Document = match oas_version {
        OasVersion::V2_0 => serde_json::from_value(value).map(Document::V2)?,
        _ => serde_json::from_value(value).map(Document::V3)?,
    };

    let mut warnings = Vec::new();
    if options.validate_structure {
        let info = document.info();
        if info.title.is_empty() {
            warnings.push("info.title is missing or empty".to_string());
        }
        if info.version.is_empty() {
            warnings.push("info.version is missing or empty".to_string());
        }
    }

    let stats = DocumentStats::for_document(&document);
    let content_hash = document_hash(&document);
    tracing::debug!(
        version = %oas_version,
        paths = stats.path_count,
        operations = stats.operation_count,
        schemas = stats.schema_count,
        "parsed OpenAPI document"
    );

    Ok(ParseResult {
        document,
        version,
        oas_version,
        source_path: None,
        size: 0,
        stats,
        content_hash,
        warnings,
    })
}

/// Detect the declared and enumerated version from the raw value.
///
/// A `swagger` field must declare exactly `2.0`; an `openapi` field is
/// matched against the supported 3.x lines. Documents with neither
/// marker are rejected as an unknown format.
pub fn detect_version(value: &Value) -> Result<(String, OasVersion)> {
    if let Some(swagger) = value.get("swagger") {
        // YAML writers sometimes leave the version unquoted, which
        // decodes as a number.
        let declared = match swagger {
            Value::String(s) => s.clone(),
            Value::Number(n) => n
                .as_f64()
                .map(|f| format!("{f:.1}"))
                .unwrap_or_else(|| n.to_string()),
            _ => String::new(),
        };
        if declared == "2.0" {
            return Ok((declared, OasVersion::V2_0));
        }
        return Err(OasDiffError::unsupported_version(declared));
    }

    if let Some(openapi) = value.get("openapi") {
        let declared = openapi.as_str().unwrap_or_default().to_string();
        return match OasVersion::from_version_str(&declared) {
            Some(tag) if tag.is_v3() => Ok((declared, tag)),
            _ => Err(OasDiffError::unsupported_version(declared)),
        };
    }

    Err(OasDiffError::parse(
        "version detection",
        ParseErrorKind::UnknownFormat,
    ))
}

fn annotate_path(err: OasDiffError, path: &Path) -> OasDiffError {
    match err {
        OasDiffError::Parse { context, source } => OasDiffError::Parse {
            context: format!("{context} (at {})", path.display()),
            source,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PETSTORE_30: &str = r#"
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
    fn test_parse_yaml_30() {
        let result = parse_document_str(PETSTORE_30).expect("document should parse");
        assert_eq!(result.version, "3.0.0");
        assert_eq!(result.oas_version, OasVersion::V3_0);
        assert_eq!(result.stats.path_count, 1);
        assert_eq!(result.stats.operation_count, 1);
        assert_ne!(result.content_hash, 0);
        assert_eq!(result.size, PETSTORE_30.len() as u64);
    }

    #[test]
    fn test_parse_json_is_accepted() {
        let content = r#"{"swagger": "2.0", "info": {"title": "T", "version": "1"}, "paths": {}}"#;
        let result = parse_document_str(content).expect("document should parse");
        assert_eq!(result.oas_version, OasVersion::V2_0);
        assert!(matches!(result.document, Document::V2(_)));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = parse_document_str(r#"{"some": "json"}"#).unwrap_err();
        assert!(matches!(err, OasDiffError::Parse { .. }));
    }

    #[test]
    fn test_unsupported_version_is_rejected() {
        let err = parse_document_str("openapi: 4.0.0\ninfo:\n  title: T\n  version: '1'\n")
            .unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn test_unquoted_swagger_version() {
        let result = parse_document_str("swagger: 2.0\ninfo:\n  title: T\n  version: '1'\n")
            .expect("document should parse");
        assert_eq!(result.version, "2.0");
    }

    #[test]
    fn test_identical_content_hashes_match() {
        let a = parse_document_str(PETSTORE_30).expect("parse");
        let b = parse_document_str(PETSTORE_30).expect("parse");
        assert_eq!(a.content_hash, b.content_hash);
    }

    #[test]
    fn test_validate_structure_warns() {
        let options = ParseOptions {
            validate_structure: true,
            ..ParseOptions::default()
        };
        let result = parse_document_str_with(
            "openapi: 3.0.0\ninfo:\n  title: ''\n  version: ''\npaths: {}\n",
            &options,
        )
        .expect("document should parse");
        assert_eq!(result.warnings.len(), 2);
    }
}
