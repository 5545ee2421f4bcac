//! Typed OpenAPI object model.
//!
//! The model is a tagged union of the two major document shapes: OAS 2.0
//! (swagger) and OAS 3.x. Both shapes share the [`Schema`] type and the
//! info/tag blocks; the 3.x shape adds servers, components and webhooks
//! while 2.0 keeps the flatter host/basePath/definitions layout.
//!
//! Fields the model does not type explicitly (including every `x-`
//! extension) are captured verbatim in flattened [`Extensions`] maps, so
//! no document content is lost between parse and diff. `$ref` values are
//! never resolved; they are carried as plain strings and compared by
//! value downstream.

mod schema;
mod shared;
mod stats;
mod v2;
mod v3;

pub use schema::{BoolOrSchema, Discriminator, Exclusive, Schema, TypeSet};
pub use shared::{Contact, ExternalDocs, Extensions, Info, License, SecurityRequirement, Tag};
pub use stats::DocumentStats;
pub use v2::{DocumentV2, OperationV2, ParameterV2, PathItemV2, ResponseV2};
pub use v3::{
    Components, DocumentV3, Example, Header, Link, MediaType, OAuthFlow, OAuthFlows, Operation,
    Parameter, PathItem, RequestBody, Response, SecurityScheme, Server, ServerVariable,
};

use serde::{Deserialize, Serialize};

/// Enumerated OpenAPI version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OasVersion {
    /// Swagger 2.0
    #[serde(rename = "2.0")]
    V2_0,
    /// OpenAPI 3.0.x
    #[serde(rename = "3.0")]
    V3_0,
    /// OpenAPI 3.1.x
    #[serde(rename = "3.1")]
    V3_1,
    /// OpenAPI 3.2.x
    #[serde(rename = "3.2")]
    V3_2,
}

impl OasVersion {
    /// Derive the enumerated tag from a declared version string.
    pub fn from_version_str(version: &str) -> Option<Self> {
        if version == "2.0" {
            return Some(Self::V2_0);
        }
        if version.starts_with("3.0") {
            return Some(Self::V3_0);
        }
        if version.starts_with("3.1") {
            return Some(Self::V3_1);
        }
        if version.starts_with("3.2") {
            return Some(Self::V3_2);
        }
        None
    }

    /// Short display form of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V2_0 => "2.0",
            Self::V3_0 => "3.0",
            Self::V3_1 => "3.1",
            Self::V3_2 => "3.2",
        }
    }

    /// True for any 3.x tag.
    pub fn is_v3(&self) -> bool {
        !matches!(self, Self::V2_0)
    }
}

impl std::fmt::Display for OasVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed OpenAPI document, tagged by major shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    /// OAS 3.x document
    V3(DocumentV3),
    /// OAS 2.0 document
    V2(DocumentV2),
}

// Both shapes default every field, so untagged deserialization would let a
// 2.0 document parse as an empty 3.x one. Dispatch on the version marker
// instead.
impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("swagger").is_some() {
            serde_json::from_value(value)
                .map(Document::V2)
                .map_err(serde::de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(Document::V3)
                .map_err(serde::de::Error::custom)
        }
    }
}

impl Document {
    /// The declared version string (`swagger` or `openapi` field).
    pub fn version_str(&self) -> &str {
        match self {
            Self::V2(doc) => &doc.swagger,
            Self::V3(doc) => &doc.openapi,
        }
    }

    /// The info block shared by both shapes.
    pub fn info(&self) -> &Info {
        match self {
            Self::V2(doc) => &doc.info,
            Self::V3(doc) => &doc.info,
        }
    }

    /// Document-level extension map.
    pub fn extensions(&self) -> &Extensions {
        match self {
            Self::V2(doc) => &doc.extensions,
            Self::V3(doc) => &doc.extensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_tag_detection() {
        assert_eq!(OasVersion::from_version_str("2.0"), Some(OasVersion::V2_0));
        assert_eq!(
            OasVersion::from_version_str("3.0.3"),
            Some(OasVersion::V3_0)
        );
        assert_eq!(
            OasVersion::from_version_str("3.1.0"),
            Some(OasVersion::V3_1)
        );
        assert_eq!(
            OasVersion::from_version_str("3.2.0"),
            Some(OasVersion::V3_2)
        );
        assert_eq!(OasVersion::from_version_str("4.0.0"), None);
        assert_eq!(OasVersion::from_version_str("2.0.1"), None);
    }

    #[test]
    fn test_version_tag_display() {
        assert_eq!(OasVersion::V3_1.to_string(), "3.1");
        assert!(OasVersion::V3_1.is_v3());
        assert!(!OasVersion::V2_0.is_v3());
    }

    #[test]
    fn test_document_deserialize_dispatches_on_marker() {
        let v2: Document = serde_json::from_value(serde_json::json!({
            "swagger": "2.0",
            "info": {"title": "Pets", "version": "1.0.0"}
        }))
        .expect("2.0 document should parse");
        assert!(matches!(v2, Document::V2(_)));
        assert_eq!(v2.version_str(), "2.0");

        let v3: Document = serde_json::from_value(serde_json::json!({
            "openapi": "3.1.0",
            "info": {"title": "Pets", "version": "1.0.0"}
        }))
        .expect("3.x document should parse");
        assert!(matches!(v3, Document::V3(_)));
        assert_eq!(v3.version_str(), "3.1.0");
    }
}
