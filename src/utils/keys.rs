//! Key-set helpers for deterministic map traversal.
//!
//! Emitted change paths must be stable run-to-run, so every walk over an
//! unordered (or insertion-ordered) map goes through [`sorted_union`] or
//! [`sorted_keys`], which iterate lexicographically.

/// Compute a merge capacity for two externally supplied lengths.
///
/// The sum is widened to `u128` and clamped to the addressable range before
/// narrowing, so hostile inputs cannot wrap the allocation size.
pub fn merged_capacity(a: usize, b: usize) -> usize {
    let total = a as u128 + b as u128;
    let max = isize::MAX as u128;
    usize::try_from(total.min(max)).unwrap_or(usize::MAX)
}

/// Lexicographically sorted union of two key iterators.
///
/// Keys present in both inputs appear once.
pub fn sorted_union<'a, A, B>(a: A, b: B) -> Vec<&'a str>
where
    A: IntoIterator<Item = &'a str>,
    B: IntoIterator<Item = &'a str>,
{
    let a_iter = a.into_iter();
    let b_iter = b.into_iter();
    let (a_low, _) = a_iter.size_hint();
    let (b_low, _) = b_iter.size_hint();

    let mut keys: Vec<&str> = Vec::with_capacity(merged_capacity(a_low, b_low));
    keys.extend(a_iter);
    keys.extend(b_iter);
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// Lexicographically sorted copy of a single key iterator.
pub fn sorted_keys<'a, I>(keys: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut keys: Vec<&str> = keys.into_iter().collect();
    keys.sort_unstable();
    keys
}
