//! Semantic diff engine for OpenAPI documents.
//!
//! Compares two parsed documents and produces an ordered list of
//! [`Change`] records, each classified breaking or non-breaking.
//!
//! # Architecture
//!
//! A single depth-first traversal walks both documents in lockstep:
//!
//! - the document-level engine ([`DiffEngine`]) dispatches by version
//!   tag and owns the identical-inputs fast path;
//! - per-node comparators (the `nodes` module) compare each node type
//!   and hand schema-shaped fields to the schema engine;
//! - the schema engine (the `schema` module) covers the full keyword set
//!   with address-keyed cycle detection;
//! - every detected difference is submitted to the severity policy
//!   ([`SeverityPolicy`]), which applies rule overrides or drops the
//!   change, then lands in the result buffer.
//!
//! There is no separate traversal per mode: simple mode reuses the same
//! walk and the policy resolves every severity to unset.
//!
//! # Example
//!
//! ```no_run
//! use oas_tools::diff::diff;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = diff("old/openapi.yaml", "new/openapi.yaml")?;
//!
//!     println!("{} changes, {} breaking", result.changes.len(), result.breaking_count());
//!     for change in &result.changes {
//!         println!("{}", change.to_warning_string());
//!     }
//!     Ok(())
//! }
//! ```

mod change;
mod cross;
mod engine;
mod nodes;
mod options;
mod pool;
mod result;
mod rules;
mod schema;
mod walker;

pub use change::{Category, Change, ChangeKind, Severity, SourceLocation, SourceMap};
pub use engine::DiffEngine;
pub use options::{diff, diff_parsed, DiffOptions};
pub use result::DiffResult;
pub use rules::{rule_key, BreakingRule, BreakingRules, DiffMode, SeverityPolicy};
