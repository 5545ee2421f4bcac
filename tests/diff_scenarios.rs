//! End-to-end diff scenarios over complete documents.

use oas_tools::diff::{
    diff_parsed, BreakingRules, Category, ChangeKind, DiffEngine, DiffOptions, Severity,
};
use oas_tools::parsers::parse_document_str;
use pretty_assertions::assert_eq;

fn parse(content: &str) -> oas_tools::ParseResult {
    parse_document_str(content).expect("document should parse")
}

#[test]
fn identical_documents_yield_empty_result() {
    let doc = r#"
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
    let source = parse(doc);
    let target = parse(doc);
    let result = diff_parsed(&source, &target).expect("diff");

    assert_eq!(result.changes.len(), 0);
    assert!(!result.has_breaking_changes);
    assert_eq!(result.source_stats.path_count, 1);
    assert_eq!(result.target_stats.operation_count, 1);
}

#[test]
fn required_property_added_to_schema() {
    let source = parse(
        r#"
openapi: 3.0.0
info:
  title: Users
  version: 1.0.0
paths: {}
components:
  schemas:
    User:
      type: object
      properties:
        name:
          type: string
      required: [name]
"#,
    );
    let target = parse(
        r#"
openapi: 3.0.0
info:
  title: Users
  version: 1.0.0
paths: {}
components:
  schemas:
    User:
      type: object
      properties:
        name:
          type: string
        email:
          type: string
      required: [name, email]
"#,
    );
    let result = diff_parsed(&source, &target).expect("diff");

    assert_eq!(result.changes.len(), 2);

    let property = result
        .changes
        .iter()
        .find(|c| c.path == "document.components.schemas[User].properties[email]")
        .expect("property change");
    assert_eq!(property.kind, ChangeKind::Added);
    assert_eq!(property.severity, Severity::Warning);

    let required = result
        .changes
        .iter()
        .find(|c| c.path == "document.components.schemas[User].required[email]")
        .expect("required change");
    assert_eq!(required.kind, ChangeKind::Added);
    assert_eq!(required.severity, Severity::Error);

    assert!(result.has_breaking_changes);
}

#[test]
fn success_code_removed() {
    let source = parse(
        r#"
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
        "500":
          description: err
"#,
    );
    let target = parse(
        r#"
openapi: 3.0.0
info:
  title: Pets
  version: 1.0.0
paths:
  /pets:
    get:
      responses:
        "500":
          description: err
"#,
    );
    let result = diff_parsed(&source, &target).expect("diff");

    assert_eq!(result.changes.len(), 1);
    let change = &result.changes[0];
    assert_eq!(change.path, "document.paths./pets.get.responses[200]");
    assert_eq!(change.kind, ChangeKind::Removed);
    assert_eq!(change.category, Category::Response);
    assert_eq!(change.severity, Severity::Error);
    assert!(result.has_breaking_changes);
}

#[test]
fn operation_id_modified_under_three_rule_sets() {
    let source_doc = r#"
openapi: 3.0.0
info:
  title: Users
  version: 1.0.0
paths:
  /users:
    get:
      operationId: getUsers
      responses:
        "200":
          description: OK
"#;
    let target_doc = r#"
openapi: 3.0.0
info:
  title: Users
  version: 1.0.0
paths:
  /users:
    get:
      operationId: listUsers
      responses:
        "200":
          description: OK
"#;

    // default rules: one warning
    let result = diff_parsed(&parse(source_doc), &parse(target_doc)).expect("diff");
    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].severity, Severity::Warning);
    assert!(!result.has_breaking_changes);

    // strict preset: upgraded to error
    let result = DiffEngine::new()
        .with_breaking_rules(BreakingRules::strict())
        .diff(&parse(source_doc), &parse(target_doc))
        .expect("diff");
    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].severity, Severity::Error);
    assert!(result.has_breaking_changes);

    // explicit ignore rule: dropped
    let rules = BreakingRules::new().with_ignore("operation.operationIdModified");
    let result = DiffEngine::new()
        .with_breaking_rules(rules)
        .diff(&parse(source_doc), &parse(target_doc))
        .expect("diff");
    assert_eq!(result.changes.len(), 0);
}

#[test]
fn document_extension_modified() {
    let source = parse(
        r#"
openapi: 3.0.0
info:
  title: T
  version: '1'
paths: {}
x-api-id: test-123
"#,
    );
    let target = parse(
        r#"
openapi: 3.0.0
info:
  title: T
  version: '1'
paths: {}
x-api-id: test-456
"#,
    );
    let result = diff_parsed(&source, &target).expect("diff");

    assert_eq!(result.changes.len(), 1);
    let change = &result.changes[0];
    assert_eq!(change.path, "document.x-api-id");
    assert_eq!(change.kind, ChangeKind::Modified);
    assert_eq!(change.category, Category::Extension);
    assert_eq!(change.severity, Severity::Info);
    assert!(!result.has_breaking_changes);
}

#[test]
fn cross_version_comparison_does_not_error() {
    let source = parse(
        r#"
swagger: '2.0'
info:
  title: Test
  version: '1'
paths:
  /pets:
    get:
      responses:
        "200":
          description: OK
"#,
    );
    let target = parse(
        r#"
openapi: 3.1.0
info:
  title: Test
  version: '1'
paths:
  /pets:
    get:
      responses:
        "200":
          description: OK
"#,
    );
    let result = diff_parsed(&source, &target).expect("cross-version diff must not error");

    let mismatch = result
        .changes
        .iter()
        .find(|c| c.path == "document")
        .expect("root version-mismatch warning");
    assert_eq!(mismatch.severity, Severity::Warning);
    assert_eq!(mismatch.kind, ChangeKind::Modified);

    // the common subset is otherwise identical
    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.source_oas_version, oas_tools::OasVersion::V2_0);
    assert_eq!(result.target_oas_version, oas_tools::OasVersion::V3_1);
}

#[test]
fn empty_paths_leave_only_info_and_server_changes() {
    let source = parse(
        r#"
openapi: 3.0.0
info:
  title: Old
  version: 1.0.0
servers:
  - url: https://old.example.com
paths: {}
"#,
    );
    let target = parse(
        r#"
openapi: 3.0.0
info:
  title: New
  version: 1.0.0
servers:
  - url: https://new.example.com
paths: {}
"#,
    );
    let result = diff_parsed(&source, &target).expect("diff");

    assert!(!result.changes.is_empty());
    assert!(result
        .changes
        .iter()
        .all(|c| matches!(c.category, Category::Info | Category::Server)));
}

#[test]
fn webhook_removed_is_critical() {
    let source = parse(
        r#"
openapi: 3.1.0
info:
  title: Hooks
  version: 1.0.0
paths: {}
webhooks:
  newPet:
    post:
      responses:
        "200":
          description: OK
"#,
    );
    let target = parse(
        r#"
openapi: 3.1.0
info:
  title: Hooks
  version: 1.0.0
paths: {}
"#,
    );
    let result = diff_parsed(&source, &target).expect("diff");

    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].path, "document.webhooks[newPet]");
    assert_eq!(result.changes[0].severity, Severity::Critical);
}

#[test]
fn swagger_20_definitions_diff() {
    let source = parse(
        r#"
swagger: '2.0'
info:
  title: T
  version: '1'
paths: {}
definitions:
  Pet:
    type: object
    properties:
      name:
        type: string
    required: [name]
"#,
    );
    let target = parse(
        r#"
swagger: '2.0'
info:
  title: T
  version: '1'
paths: {}
definitions:
  Pet:
    type: object
    properties:
      name:
        type: string
      tag:
        type: string
    required: [name]
"#,
    );
    let result = diff_parsed(&source, &target).expect("diff");

    assert_eq!(result.changes.len(), 1);
    assert_eq!(
        result.changes[0].path,
        "document.definitions[Pet].properties[tag]"
    );
    assert_eq!(result.changes[0].severity, Severity::Info);
}

#[test]
fn file_based_entry_point() {
    use std::io::Write;

    let dir = tempfile::tempdir().expect("tempdir");
    let source_path = dir.path().join("old.yaml");
    let target_path = dir.path().join("new.yaml");

    let mut source = std::fs::File::create(&source_path).expect("create");
    source
        .write_all(b"openapi: 3.0.0\ninfo:\n  title: T\n  version: '1'\npaths:\n  /pets:\n    get:\n      responses:\n        \"200\":\n          description: OK\n")
        .expect("write");
    let mut target = std::fs::File::create(&target_path).expect("create");
    target
        .write_all(b"openapi: 3.0.0\ninfo:\n  title: T\n  version: '1'\npaths: {}\n")
        .expect("write");

    let result = oas_tools::diff::diff(&source_path, &target_path).expect("diff");
    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].severity, Severity::Critical);
    assert_eq!(result.source_path.as_deref(), Some(source_path.as_path()));
    assert!(result.source_size > 0);
}

#[test]
fn options_surface_round_trip() {
    let source = parse("openapi: 3.0.0\ninfo:\n  title: T\n  version: '1'\npaths: {}\n");
    let target =
        parse("openapi: 3.0.0\ninfo:\n  title: T\n  version: '2'\npaths: {}\nx-new: true\n");

    let result = DiffOptions::new()
        .with_source_parsed(source)
        .with_target_parsed(target)
        .with_include_info(false)
        .with_user_agent("oas-tools-test/1.0")
        .run()
        .expect("diff");

    // both the version bump (info) and the extension addition (info) are
    // stripped by the include-info post-filter
    assert_eq!(result.changes.len(), 0);
    assert_eq!(result.info_count, 0);
}
