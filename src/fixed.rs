use std::{fmt::Debug, ops::RangeBounds};

use bytes::{BufMut, Bytes};
use itertools::Itertools;

use crate::{
    FixedKeySetRef, KeySet,
    codec::{DecodeErr, Encodable, decode_fixed, encoder::Encoder},
    key::{ID_WIDTH, Uint64Key},
    search::{locate, range_indices},
    traits::{KeySetRead, KeySetWrite},
};

/// A sorted, duplicate-free set of keys which are all exactly `W` bytes wide.
///
/// `FixedKeySet` encodes to the canonical record format: every key written
/// back to back in ascending order, `W` bytes each, with no header. The
/// number of keys is implied by the buffer length.
///
/// [`IdSet`] is the 8 byte specialization used for big-endian `u64` ids.
///
/// # Examples
///
/// ```
/// use keyset_rs::{Encodable, IdSet, KeySetRead, KeySetWrite};
///
/// let mut ids = IdSet::default();
/// ids.insert_u64(7);
/// ids.insert_u64(3);
/// ids.insert(&[0, 0, 0, 0, 0, 0, 0, 5]);
///
/// assert!(ids.contains_u64(5));
/// assert_eq!(ids.iter_u64().collect::<Vec<_>>(), [3, 5, 7]);
///
/// let buf = ids.encode_to_bytes();
/// assert_eq!(buf.len(), 24);
/// assert_eq!(IdSet::decode(&buf).unwrap(), ids);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FixedKeySet<const W: usize> {
    keys: Vec<[u8; W]>,
}

/// A set of `u64` ids stored as 8 byte big-endian keys.
pub type IdSet = FixedKeySet<ID_WIDTH>;

impl<const W: usize> Default for FixedKeySet<W> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<const W: usize> Debug for FixedKeySet<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.len();
        write!(f, "FixedKeySet<{W}>({len})")
    }
}

impl<const W: usize> FixedKeySet<W> {
    /// An empty `FixedKeySet`, suitable for usage in a const context.
    pub const EMPTY: Self = {
        assert!(W > 0, "fixed width keys must be at least one byte wide");
        FixedKeySet { keys: Vec::new() }
    };

    /// The number of bytes each key occupies in the encoded format.
    pub const RECORD_WIDTH: usize = W;

    pub fn with_capacity(capacity: usize) -> Self {
        FixedKeySet {
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Construct a `FixedKeySet` from a sorted iter of unique keys.
    /// The resulting set is unusable if the iter is not sorted or contains
    /// duplicates.
    pub fn from_sorted_unique_unchecked(keys: impl Iterator<Item = [u8; W]>) -> Self {
        FixedKeySet {
            keys: keys.collect(),
        }
    }

    /// Decodes a buffer of back to back `W` byte records.
    ///
    /// Fails with [`DecodeErr::Length`] if the buffer length is not a
    /// multiple of `W`, and with [`DecodeErr::Order`] if the records are not
    /// strictly ascending.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeErr> {
        let keys = decode_fixed::<W>(data)?;
        Ok(FixedKeySet {
            keys: keys.to_vec(),
        })
    }

    /// Encodes this set into a [`FixedKeySetRef`] for zero-copy querying.
    pub fn encode_to_set_ref(&self) -> FixedKeySetRef<Bytes, W> {
        FixedKeySetRef {
            data: self.encode_to_bytes(),
        }
    }

    /// The keys in ascending order.
    #[inline]
    pub fn as_slice(&self) -> &[[u8; W]] {
        &self.keys
    }

    /// Retains only the keys for which `f` returns true.
    pub fn retain(&mut self, mut f: impl FnMut(&[u8; W]) -> bool) {
        self.keys.retain(|k| f(k));
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

impl IdSet {
    /// returns an iterator over the ids in this set in ascending order
    pub fn iter_u64(&self) -> impl Iterator<Item = u64> {
        self.keys.iter().map(|&k| Uint64Key::from(k).get())
    }
}

impl<const W: usize> FromIterator<[u8; W]> for FixedKeySet<W> {
    fn from_iter<I: IntoIterator<Item = [u8; W]>>(iter: I) -> Self {
        let keys = iter.into_iter().sorted().dedup();
        Self::from_sorted_unique_unchecked(keys)
    }
}

impl FromIterator<u64> for IdSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        iter.into_iter()
            .map(|id| Uint64Key::new(id).into_bytes())
            .collect()
    }
}

impl<const W: usize> Extend<[u8; W]> for FixedKeySet<W> {
    fn extend<I: IntoIterator<Item = [u8; W]>>(&mut self, iter: I) {
        for key in iter {
            self.insert(&key);
        }
    }
}

impl Extend<u64> for IdSet {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        for id in iter {
            self.insert_u64(id);
        }
    }
}

impl<const W: usize> TryFrom<&KeySet> for FixedKeySet<W> {
    type Error = DecodeErr;

    fn try_from(set: &KeySet) -> Result<Self, Self::Error> {
        let keys = set
            .iter()
            .map(|k| <[u8; W]>::try_from(k).map_err(|_| DecodeErr::Width))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FixedKeySet { keys })
    }
}

impl<const W: usize> Encodable for FixedKeySet<W> {
    #[inline]
    fn encoded_size(&self) -> usize {
        self.keys.len() * W
    }

    fn encode<B: BufMut>(&self, encoder: &mut Encoder<B>) {
        encoder.put_fixed_keys(&self.keys);
    }
}

impl<const W: usize> KeySetRead for FixedKeySet<W> {
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
        self.keys.get(idx).map(|k| k.as_slice())
    }

    fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.keys.iter().map(|k| k.as_slice())
    }

    fn range<R: RangeBounds<[u8]>>(&self, range: R) -> impl Iterator<Item = &[u8]> {
        self.keys[range_indices(&self.keys, &range)]
            .iter()
            .map(|k| k.as_slice())
    }
}

impl<const W: usize> KeySetWrite for FixedKeySet<W> {
    type Key = [u8; W];

    fn insert(&mut self, key: &[u8; W]) -> bool {
        match locate(&self.keys, key) {
            // key already exists
            (_, true) => false,
            // key doesn't exist, insert it
            (idx, false) => {
                self.keys.insert(idx, *key);
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

impl<const W: usize, B: std::ops::Deref<Target = [u8]>> PartialEq<FixedKeySetRef<B, W>>
    for FixedKeySet<W>
{
    fn eq(&self, other: &FixedKeySetRef<B, W>) -> bool {
        self.as_slice() == other.as_slice()
    }
}
