//! **Semantic diffing for OpenAPI documents.**
//!
//! `oas-tools` compares two OpenAPI Specification documents and reports
//! every semantic difference as an ordered, classified change list. It is
//! designed as the contract gate in API tooling pipelines: CI jobs that
//! refuse merges on breaking changes, changelog generators, and migration
//! assistants.
//!
//! Both major document shapes are supported — swagger 2.0 and OpenAPI
//! 3.0.x/3.1.x/3.2.x — including cross-major comparison over the common
//! subset. It powers both a command-line interface and a Rust library for
//! programmatic integration.
//!
//! ## Key Features
//!
//! - **YAML and JSON ingestion** with version auto-detection.
//! - **Full schema comparison**: typing, constraints, composition,
//!   conditionals, 2020-12 content/unevaluated keywords, OAS modifiers,
//!   with cycle-safe recursion. `$ref` is never resolved; references are
//!   compared by value.
//! - **Breaking-change classification**: every change carries a severity
//!   (info, warning, error, critical) derived from whether it tightens or
//!   relaxes the contract, with configurable overrides and the
//!   `default`/`strict`/`lenient` presets.
//! - **Deterministic output**: the change sequence is identical run to
//!   run on equal inputs, so results diff cleanly themselves.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the typed OAS object model, a tagged union of the 2.0
//!   and 3.x shapes sharing one [`model::Schema`] type.
//! - **[`parsers`]**: ingestion into the [`parsers::ParseResult`]
//!   envelope the diff engine consumes.
//! - **[`diff`]**: the diff engine itself — [`DiffEngine`],
//!   [`DiffOptions`], the change model and the severity policy.
//!
//! ## Getting Started: Diffing Two Documents
//!
//! ```no_run
//! use oas_tools::diff::diff;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = diff("old/openapi.yaml", "new/openapi.yaml")?;
//!
//!     if result.has_breaking_changes {
//!         eprintln!("{} breaking changes detected", result.breaking_count());
//!         for change in result.changes.iter().filter(|c| c.severity.is_breaking()) {
//!             eprintln!("  {}", change.to_warning_string());
//!         }
//!         std::process::exit(1);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configured Comparison
//!
//! ```no_run
//! use oas_tools::diff::{BreakingRules, DiffMode, DiffOptions, Severity};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // strict preset, with one local exception
//!     let rules = BreakingRules::strict()
//!         .with_ignore("operation.operationIdModified");
//!
//!     let result = DiffOptions::new()
//!         .with_source_file_path("old/openapi.yaml")
//!         .with_target_file_path("new/openapi.yaml")
//!         .with_mode(DiffMode::Breaking)
//!         .with_include_info(false)
//!         .with_breaking_rules(rules)
//!         .run()?;
//!
//!     for change in &result.changes {
//!         assert_ne!(change.severity, Severity::Info);
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // old/new, min/max pairs are clear in context
    clippy::similar_names
)]

pub mod diff;
pub mod error;
pub mod model;
pub mod parsers;
pub mod utils;

// Re-export main types for convenience
pub use diff::{
    diff_parsed, BreakingRule, BreakingRules, Category, Change, ChangeKind, DiffEngine, DiffMode,
    DiffOptions, DiffResult, Severity, SourceLocation, SourceMap,
};
pub use error::{OasDiffError, Result};
pub use model::{Document, DocumentStats, OasVersion};
pub use parsers::{
    parse_document, parse_document_str, parse_document_value, ParseOptions, ParseResult,
};
