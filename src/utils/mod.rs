//! Shared utilities.

mod hash;
mod keys;

pub use hash::{content_hash, document_hash};
pub use keys::{merged_capacity, sorted_keys, sorted_union};
