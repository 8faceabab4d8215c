use std::fmt::Debug;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::codec::DecodeErr;

/// The width of a key produced by [`Uint64Key`].
pub const ID_WIDTH: usize = 8;

/// A `u64` identifier in its big-endian key form.
///
/// Big-endian encoding makes lexicographic byte order agree with numeric
/// order, so ids can be stored in any key set alongside raw byte keys.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    FromBytes,
    IntoBytes,
    Immutable,
    KnownLayout,
    Unaligned,
)]
#[repr(transparent)]
pub struct Uint64Key([u8; ID_WIDTH]);

impl Uint64Key {
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id.to_be_bytes())
    }

    #[inline]
    pub const fn get(self) -> u64 {
        u64::from_be_bytes(self.0)
    }

    #[inline]
    pub const fn into_bytes(self) -> [u8; ID_WIDTH] {
        self.0
    }
}

impl Debug for Uint64Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Uint64Key({:#018x})", self.get())
    }
}

impl From<u64> for Uint64Key {
    #[inline]
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<Uint64Key> for u64 {
    #[inline]
    fn from(key: Uint64Key) -> Self {
        key.get()
    }
}

impl From<[u8; ID_WIDTH]> for Uint64Key {
    #[inline]
    fn from(bytes: [u8; ID_WIDTH]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Uint64Key {
    type Error = DecodeErr;

    fn try_from(key: &[u8]) -> Result<Self, Self::Error> {
        Self::read_from_bytes(key).map_err(|_| DecodeErr::Width)
    }
}

impl AsRef<[u8]> for Uint64Key {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
