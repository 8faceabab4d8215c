use std::{borrow::Borrow, ops::RangeBounds};

use crate::key::{ID_WIDTH, Uint64Key};

pub trait KeySetRead {
    /// the number of keys in this set.
    fn len(&self) -> usize;

    /// returns true if this set has no keys
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// returns the insertion point of `key` along with whether the key at
    /// that position equals `key`.
    fn locate(&self, key: &[u8]) -> (usize, bool);

    /// returns true if this set contains the given key
    fn contains(&self, key: &[u8]) -> bool {
        self.locate(key).1
    }

    /// returns true if this set contains the big-endian encoding of `id`
    fn contains_u64(&self, id: u64) -> bool {
        self.contains(Uint64Key::new(id).as_ref())
    }

    /// returns the 0-based position of the key in the set if it exists,
    /// otherwise returns None.
    fn position(&self, key: &[u8]) -> Option<usize> {
        match self.locate(key) {
            (idx, true) => Some(idx),
            (_, false) => None,
        }
    }

    /// returns the number of keys contained in this set up to and including
    /// the key.
    fn rank(&self, key: &[u8]) -> usize {
        let (idx, found) = self.locate(key);
        idx + usize::from(found)
    }

    /// returns the key at position `idx`.
    fn select(&self, idx: usize) -> Option<&[u8]>;

    /// returns the smallest key in the set
    fn first(&self) -> Option<&[u8]> {
        self.select(0)
    }

    /// returns the largest key in the set
    fn last(&self) -> Option<&[u8]> {
        self.len().checked_sub(1).and_then(|idx| self.select(idx))
    }

    /// returns an iterator over all keys in ascending order
    fn iter(&self) -> impl Iterator<Item = &[u8]>;

    /// returns an iterator over the keys within `range` in ascending order
    fn range<R: RangeBounds<[u8]>>(&self, range: R) -> impl Iterator<Item = &[u8]>;
}

pub trait KeySetWrite {
    /// The borrowed form of a key accepted by [`KeySetWrite::insert`].
    type Key: ?Sized;

    /// Inserts the key into the set unless it already exists.
    /// Returns `true` if the insertion occurred, `false` otherwise.
    fn insert(&mut self, key: &Self::Key) -> bool;

    /// Removes the key from the set if it exists.
    /// Returns `true` if the removal occurred, `false` otherwise.
    fn remove(&mut self, key: &[u8]) -> bool;

    /// Inserts the big-endian encoding of `id`.
    fn insert_u64(&mut self, id: u64) -> bool
    where
        [u8; ID_WIDTH]: Borrow<Self::Key>,
    {
        self.insert(Uint64Key::new(id).into_bytes().borrow())
    }

    /// Removes the big-endian encoding of `id`.
    fn remove_u64(&mut self, id: u64) -> bool {
        self.remove(Uint64Key::new(id).as_ref())
    }
}
