use std::ops::{Bound, Range, RangeBounds};

use itertools::Itertools;

/// Binary search for `key` in a sorted, duplicate-free slice of keys.
///
/// Returns the smallest index `i` such that `keys[i] >= key` (or
/// `keys.len()` if every key is smaller), along with whether `keys[i]`
/// equals `key` exactly. Keys compare as unsigned bytes; a strict prefix
/// sorts before any key it prefixes.
#[inline]
pub fn locate<K: AsRef<[u8]>>(keys: &[K], key: &[u8]) -> (usize, bool) {
    let idx = keys.partition_point(|k| k.as_ref() < key);
    let found = keys.get(idx).is_some_and(|k| k.as_ref() == key);
    (idx, found)
}

/// Resolves a range of keys into the index range it covers in `keys`.
pub(crate) fn range_indices<K, R>(keys: &[K], range: &R) -> Range<usize>
where
    K: AsRef<[u8]>,
    R: RangeBounds<[u8]> + ?Sized,
{
    let start = match range.start_bound() {
        Bound::Included(k) => locate(keys, k).0,
        Bound::Excluded(k) => upper(keys, k),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(k) => upper(keys, k),
        Bound::Excluded(k) => locate(keys, k).0,
        Bound::Unbounded => keys.len(),
    };
    start..end.max(start)
}

/// index of the first key strictly greater than `key`
#[inline]
fn upper<K: AsRef<[u8]>>(keys: &[K], key: &[u8]) -> usize {
    let (idx, found) = locate(keys, key);
    idx + usize::from(found)
}

/// Returns true if every key is strictly greater than the one before it.
pub(crate) fn is_strictly_ascending<'a>(keys: impl Iterator<Item = &'a [u8]>) -> bool {
    keys.tuple_windows().all(|(a, b)| a < b)
}
