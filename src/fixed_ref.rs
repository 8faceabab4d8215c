use std::{
    fmt::Debug,
    ops::{Deref, RangeBounds},
};

use bytes::{BufMut, Bytes};
use zerocopy::FromBytes;

use crate::{
    FixedKeySet,
    codec::{DecodeErr, Encodable, decode_fixed, encoder::Encoder},
    key::{ID_WIDTH, Uint64Key},
    search::{locate, range_indices},
    traits::KeySetRead,
};

/// A read-only view over an encoded [`FixedKeySet`].
///
/// The buffer is validated once by [`FixedKeySetRef::from_bytes`]; lookups
/// then binary search the encoded records in place without decoding them.
#[derive(Clone)]
pub struct FixedKeySetRef<B, const W: usize> {
    pub(crate) data: B,
}

/// A zero-copy view over an encoded [`crate::IdSet`].
pub type IdSetRef<B> = FixedKeySetRef<B, ID_WIDTH>;

impl<B: Deref<Target = [u8]>, const W: usize> Debug for FixedKeySetRef<B, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.len();
        write!(f, "FixedKeySetRef<{W}>({len})")
    }
}

impl<B, const W: usize> FixedKeySetRef<B, W> {
    #[inline]
    pub fn inner(&self) -> &B {
        &self.data
    }

    #[inline]
    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<const W: usize> FixedKeySetRef<Bytes, W> {
    #[inline]
    pub fn encode_to_bytes(&self) -> Bytes {
        self.data.clone()
    }
}

impl<B: Deref<Target = [u8]>, const W: usize> FixedKeySetRef<B, W> {
    pub fn from_bytes(data: B) -> Result<Self, DecodeErr> {
        decode_fixed::<W>(&data)?;
        Ok(Self { data })
    }

    pub fn decode_to_set(&self) -> FixedKeySet<W> {
        FixedKeySet::from_sorted_unique_unchecked(self.as_slice().iter().copied())
    }

    /// The encoded records in ascending order.
    pub fn as_slice(&self) -> &[[u8; W]] {
        <[[u8; W]]>::ref_from_bytes(&self.data).expect("buffer validated by from_bytes")
    }
}

impl<B: Deref<Target = [u8]>> FixedKeySetRef<B, ID_WIDTH> {
    /// returns an iterator over the ids in this set in ascending order
    pub fn iter_u64(&self) -> impl Iterator<Item = u64> {
        self.as_slice().iter().map(|&k| Uint64Key::from(k).get())
    }
}

impl<B: Deref<Target = [u8]>, const W: usize> Encodable for FixedKeySetRef<B, W> {
    #[inline]
    fn encoded_size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn encode<T: BufMut>(&self, encoder: &mut Encoder<T>) {
        encoder.write_encoded(&self.data);
    }
}

impl<B: Deref<Target = [u8]>, const W: usize> KeySetRead for FixedKeySetRef<B, W> {
    #[inline]
    fn len(&self) -> usize {
        self.data.len() / W
    }

    #[inline]
    fn locate(&self, key: &[u8]) -> (usize, bool) {
        locate(self.as_slice(), key)
    }

    fn select(&self, idx: usize) -> Option<&[u8]> {
        self.as_slice().get(idx).map(|k| k.as_slice())
    }

    fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.as_slice().iter().map(|k| k.as_slice())
    }

    fn range<R: RangeBounds<[u8]>>(&self, range: R) -> impl Iterator<Item = &[u8]> {
        let keys = self.as_slice();
        keys[range_indices(keys, &range)]
            .iter()
            .map(|k| k.as_slice())
    }
}

impl<B: Deref<Target = [u8]>, const W: usize> PartialEq<FixedKeySet<W>> for FixedKeySetRef<B, W> {
    #[inline]
    fn eq(&self, other: &FixedKeySet<W>) -> bool {
        other == self
    }
}

impl<B: Deref<Target = [u8]>, B2: Deref<Target = [u8]>, const W: usize>
    PartialEq<FixedKeySetRef<B2, W>> for FixedKeySetRef<B, W>
{
    fn eq(&self, other: &FixedKeySetRef<B2, W>) -> bool {
        *self.data == *other.data
    }
}

impl<const W: usize> From<FixedKeySetRef<Bytes, W>> for FixedKeySet<W> {
    fn from(set_ref: FixedKeySetRef<Bytes, W>) -> Self {
        set_ref.decode_to_set()
    }
}
