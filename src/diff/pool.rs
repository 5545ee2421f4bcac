//! Process-wide pool of change buffers.
//!
//! High-rate pipelines diff many document pairs back to back; reusing the
//! change buffer avoids re-growing a fresh `Vec` on every call. The pool
//! is initialized lazily, shared across threads, and bounds the capacity
//! it retains: a released buffer that grew past
//! [`MAX_RETAINED_CAPACITY`] is dropped instead of pooled. Correctness
//! never depends on pooling; a buffer from here behaves exactly like a
//! fresh `Vec`.

use super::change::Change;
use std::sync::{Mutex, OnceLock, PoisonError};

/// Starting capacity for fresh buffers.
pub(crate) const DEFAULT_BUFFER_CAPACITY: usize = 16;

/// Released buffers above this capacity are discarded.
pub(crate) const MAX_RETAINED_CAPACITY: usize = 128;

static POOL: OnceLock<Mutex<Vec<Vec<Change>>>> = OnceLock::new();

fn pool() -> &'static Mutex<Vec<Vec<Change>>> {
    POOL.get_or_init(|| Mutex::new(Vec::new()))
}

/// Take a cleared buffer from the pool, or allocate one.
pub(crate) fn acquire_buffer() -> Vec<Change> {
    let mut guard = pool().lock().unwrap_or_else(PoisonError::into_inner);
    match guard.pop() {
        Some(mut buffer) => {
            buffer.clear();
            buffer
        }
        None => Vec::with_capacity(DEFAULT_BUFFER_CAPACITY),
    }
}

/// Return a buffer to the pool unless it grew past the retention bound.
pub(crate) fn release_buffer(mut buffer: Vec<Change>) {
    if buffer.capacity() > MAX_RETAINED_CAPACITY {
        return;
    }
    buffer.clear();
    let mut guard = pool().lock().unwrap_or_else(PoisonError::into_inner);
    guard.push(buffer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_returns_empty_buffer() {
        let buffer = acquire_buffer();
        assert!(buffer.is_empty());
        release_buffer(buffer);
    }

    #[test]
    fn test_release_clears_contents() {
        let mut buffer = acquire_buffer();
        buffer.push(crate::diff::Change {
            path: "document".to_string(),
            kind: crate::diff::ChangeKind::Added,
            category: crate::diff::Category::Info,
            severity: crate::diff::Severity::Info,
            old: None,
            new: None,
            message: String::new(),
            source: None,
        });
        release_buffer(buffer);

        // Whatever buffer we get next must come back empty. Other tests
        // share the pool, so drain a few to be sure we see ours.
        for _ in 0..4 {
            let buffer = acquire_buffer();
            assert!(buffer.is_empty());
            release_buffer(buffer);
        }
    }

    #[test]
    fn test_pool_never_retains_oversized_buffers() {
        release_buffer(Vec::with_capacity(MAX_RETAINED_CAPACITY * 8));
        // Only buffers at or below the bound may ever be pooled.
        for _ in 0..16 {
            let buffer = acquire_buffer();
            assert!(buffer.capacity() <= MAX_RETAINED_CAPACITY);
            release_buffer(buffer);
        }
    }
}
