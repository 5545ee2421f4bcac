//! Content hashing utilities.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

/// Compute a content hash for arbitrary bytes
pub fn content_hash(data: &[u8]) -> u64 {
    xxh3_64(data)
}

/// Compute a content hash for a serializable document.
///
/// Returns 0 when the value cannot be serialized; callers treat 0 as
/// "no hash available" and fall back to structural comparison.
pub fn document_hash<T: Serialize>(value: &T) -> u64 {
    match serde_json::to_vec(value) {
        Ok(bytes) => content_hash(&bytes),
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash() {
        let data = b"openapi: 3.0.0";
        let hash = content_hash(data);
        assert_ne!(hash, 0);

        // Same input should produce same hash
        assert_eq!(hash, content_hash(data));

        // Different input should produce different hash
        assert_ne!(hash, content_hash(b"swagger: 2.0"));
    }

    #[test]
    fn test_document_hash_stable() {
        let value = serde_json::json!({"openapi": "3.0.0", "info": {"title": "Pets"}});
        assert_eq!(document_hash(&value), document_hash(&value));

        let other = serde_json::json!({"openapi": "3.0.0", "info": {"title": "Stores"}});
        assert_ne!(document_hash(&value), document_hash(&other));
    }
}
