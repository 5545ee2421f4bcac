//! The OAS 2.0 (swagger) document shape.
//!
//! Flatter than 3.x: `host`/`basePath`/`schemes` instead of servers,
//! `definitions` instead of `components.schemas`, `securityDefinitions`
//! instead of `components.securitySchemes`, and responses carry a schema
//! directly instead of per-media-type content.

use super::schema::Schema;
use super::shared::{Extensions, ExternalDocs, Info, SecurityRequirement, Tag};
use super::v3::{Header, SecurityScheme};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A swagger 2.0 document root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentV2 {
    pub swagger: String,
    pub info: Info,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItemV2>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub definitions: IndexMap<String, Schema>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterV2>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseV2>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub security_definitions: IndexMap<String, SecurityScheme>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security: Vec<SecurityRequirement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A 2.0 path item. No `trace` slot and no per-path servers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathItemV2 {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<OperationV2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<OperationV2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<OperationV2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<OperationV2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OperationV2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<OperationV2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<OperationV2>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterV2>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl PathItemV2 {
    /// The method slots in fixed traversal order.
    pub fn operations(&self) -> [(&'static str, Option<&OperationV2>); 7] {
        [
            ("delete", self.delete.as_ref()),
            ("get", self.get.as_ref()),
            ("head", self.head.as_ref()),
            ("options", self.options.as_ref()),
            ("patch", self.patch.as_ref()),
            ("post", self.post.as_ref()),
            ("put", self.put.as_ref()),
        ]
    }
}

/// A 2.0 operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperationV2 {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterV2>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseV2>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<String>,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A 2.0 parameter. Body parameters nest a schema; the rest declare
/// `type`/`format` inline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParameterV2 {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl ParameterV2 {
    /// Composite key used to correlate parameters across documents.
    pub fn key(&self) -> String {
        format!("{}:{}", self.name, self.location)
    }
}

/// A 2.0 response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseV2 {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Header>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Value>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_swagger_parses() {
        let json = serde_json::json!({
            "swagger": "2.0",
            "info": {"title": "Pets", "version": "1.0.0"},
            "host": "api.example.com",
            "basePath": "/v1",
            "schemes": ["https"],
            "paths": {
                "/pets": {
                    "get": {
                        "responses": {
                            "200": {
                                "description": "OK",
                                "schema": {"type": "array", "items": {"type": "string"}}
                            }
                        }
                    }
                }
            },
            "definitions": {
                "Pet": {"type": "object", "required": ["name"]}
            }
        });
        let doc: DocumentV2 = serde_json::from_value(json).expect("document should parse");
        assert_eq!(doc.swagger, "2.0");
        assert_eq!(doc.host.as_deref(), Some("api.example.com"));
        assert!(doc.definitions.contains_key("Pet"));
        let get = doc
            .paths
            .get("/pets")
            .and_then(|item| item.get.as_ref())
            .expect("get operation");
        assert!(get.responses.get("200").and_then(|r| r.schema.as_ref()).is_some());
    }

    #[test]
    fn test_body_parameter_nests_schema() {
        let param: ParameterV2 = serde_json::from_value(serde_json::json!({
            "name": "pet",
            "in": "body",
            "required": true,
            "schema": {"type": "object"}
        }))
        .expect("parameter should parse");
        assert_eq!(param.key(), "pet:body");
        assert!(param.schema.is_some());
    }
}
