use std::{fmt::Debug, ops::RangeBounds};

use bytes::{BufMut, Bytes};
use itertools::Itertools;

use crate::{
    FixedKeySet,
    codec::{DecodeErr, Encodable, LENGTH_PREFIX_SIZE, decode_var, encoder::Encoder},
    search::{locate, range_indices},
    traits::{KeySetRead, KeySetWrite},
};

/// A sorted, duplicate-free set of variable length byte keys.
///
/// Keys compare as unsigned bytes, so a key sorts before every key it is a
/// prefix of and the empty key sorts first. Lookups binary search a flat
/// array; inserts and removes shift the keys after the touched position.
///
/// Keys passed to [`KeySetWrite::insert`] are copied into the set. Use
/// [`KeySet::insert_shared`] or [`KeySet::decode`] to hold slices of an
/// existing [`Bytes`] buffer instead.
///
/// # Panics
///
/// Encoding panics if the set holds a key longer than `u32::MAX` bytes,
/// since its length cannot be written to the `u32` prefix. Such keys are
/// accepted by `insert`; the panic surfaces at encode time.
///
/// # Examples
///
/// ```
/// use keyset_rs::{Encodable, KeySet, KeySetRead, KeySetWrite};
///
/// let mut set = KeySet::default();
/// assert!(set.insert(b"banana"));
/// assert!(set.insert(b"apple"));
/// assert!(!set.insert(b"apple"));
/// assert!(set.insert_u64(42));
///
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.first(), Some(&[0, 0, 0, 0, 0, 0, 0, 42][..]));
/// assert!(set.contains(b"apple"));
///
/// let decoded = KeySet::decode(set.encode_to_bytes()).unwrap();
/// assert_eq!(decoded, set);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct KeySet {
    keys: Vec<Bytes>,
}

impl Debug for KeySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.len();
        write!(f, "KeySet({len})")
    }
}

impl KeySet {
    /// An empty `KeySet`, suitable for usage in a const context.
    pub const EMPTY: Self = KeySet { keys: Vec::new() };

    pub fn with_capacity(capacity: usize) -> Self {
        KeySet {
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Construct a `KeySet` from a sorted iter of unique keys.
    /// The resulting set is unusable if the iter is not sorted or contains
    /// duplicates.
    pub fn from_sorted_unique_unchecked(keys: impl Iterator<Item = Bytes>) -> Self {
        KeySet {
            keys: keys.collect(),
        }
    }

    /// Decodes a set written by [`Encodable::encode`]. The returned keys are
    /// slices of `data`; no key bytes are copied.
    pub fn decode(data: Bytes) -> Result<Self, DecodeErr> {
        decode_var(&data).map(|keys| KeySet { keys })
    }

    /// Like [`KeySetWrite::insert`] but keeps a reference to `key` rather
    /// than copying it.
    pub fn insert_shared(&mut self, key: Bytes) -> bool {
        match locate(&self.keys, &key) {
            (_, true) => false,
            (idx, false) => {
                self.keys.insert(idx, key);
                true
            }
        }
    }

    /// Retains only the keys for which `f` returns true.
    pub fn retain(&mut self, mut f: impl FnMut(&[u8]) -> bool) {
        self.keys.retain(|k| f(&k[..]));
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

impl<K: AsRef<[u8]>> FromIterator<K> for KeySet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let keys = iter
            .into_iter()
            .map(|k| Bytes::copy_from_slice(k.as_ref()))
            .sorted()
            .dedup();
        Self::from_sorted_unique_unchecked(keys)
    }
}

impl<K: AsRef<[u8]>> Extend<K> for KeySet {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key.as_ref());
        }
    }
}

impl<const W: usize> From<FixedKeySet<W>> for KeySet {
    fn from(set: FixedKeySet<W>) -> Self {
        Self::from_sorted_unique_unchecked(set.iter().map(Bytes::copy_from_slice))
    }
}

impl Encodable for KeySet {
    fn encoded_size(&self) -> usize {
        self.keys.iter().map(|k| LENGTH_PREFIX_SIZE + k.len()).sum()
    }

    fn encode<B: BufMut>(&self, encoder: &mut Encoder<B>) {
        for key in &self.keys {
            encoder.put_var_key(key);
        }
    }
}

impl KeySetRead for KeySet {
    #[inline]
    fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    fn locate(&self, key: &[u8]) -> (usize, bool) {
        locate(&self.keys, key)
    }

    fn select(&self, idx: usize) -> Option<&[u8]> {
        self.keys.get(idx).map(|k| &k[..])
    }

    fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.keys.iter().map(|k| &k[..])
    }

    fn range<R: RangeBounds<[u8]>>(&self, range: R) -> impl Iterator<Item = &[u8]> {
        self.keys[range_indices(&self.keys, &range)]
            .iter()
            .map(|k| &k[..])
    }
}

impl KeySetWrite for KeySet {
    type Key = [u8];

    fn insert(&mut self, key: &[u8]) -> bool {
        match locate(&self.keys, key) {
            // key already exists
            (_, true) => false,
            // key doesn't exist, insert it
            (idx, false) => {
                self.keys.insert(idx, Bytes::copy_from_slice(key));
                true
            }
        }
    }

    fn remove(&mut self, key: &[u8]) -> bool {
        match locate(&self.keys, key) {
            // key exists, remove it
            (idx, true) => {
                self.keys.remove(idx);
                true
            }
            // key doesn't exist
            (_, false) => false,
        }
    }
}
