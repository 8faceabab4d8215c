//! Sorted, duplicate-free sets of binary keys, suitable for the lookup and
//! posting-list layers of a storage engine.
//!
//! ## Key Features:
//!
//! - **Flat sorted storage**: keys live in a single sorted array. Lookups are
//!   a binary search; inserts and removes shift the tail of the array, which
//!   suits read-heavy, append-light workloads.
//!
//! - **Fixed width records**: [`IdSet`] stores `u64` ids as 8 byte big-endian
//!   keys and encodes to back to back records with no header. The key count
//!   is implied by the buffer length.
//!
//! - **Variable width keys**: [`KeySet`] holds keys of any length, encoded
//!   with a big-endian `u32` length prefix per key.
//!
//! - **Zero-copy access**: [`FixedKeySetRef`] validates an encoded buffer once
//!   and answers queries directly from any type implementing
//!   `Deref<Target = [u8]>`.
//!
//! Decoding never trusts its input: a buffer with a partial record or keys
//! out of order is rejected with a [`DecodeErr`].

mod codec;
mod fixed;
mod fixed_ref;
mod key;
mod keyset;
mod search;
mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use codec::{DecodeErr, Encodable, encoder::Encoder};
pub use fixed::{FixedKeySet, IdSet};
pub use fixed_ref::{FixedKeySetRef, IdSetRef};
pub use key::{ID_WIDTH, Uint64Key};
pub use keyset::KeySet;
pub use search::locate;
pub use traits::{KeySetRead, KeySetWrite};
