use std::convert::Infallible;

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;
use tracing::debug;
use zerocopy::{BigEndian, ConvertError, FromBytes, SizeError, U32};

use crate::{codec::encoder::Encoder, search::is_strictly_ascending};

pub mod encoder;

/// Length prefix written ahead of each key in the variable width format.
pub(crate) type LengthPrefix = U32<BigEndian>;

pub(crate) const LENGTH_PREFIX_SIZE: usize = size_of::<LengthPrefix>();

static_assertions::const_assert_eq!(LENGTH_PREFIX_SIZE, 4);

pub trait Encodable {
    fn encoded_size(&self) -> usize;

    /// Writes this value to `encoder`.
    ///
    /// # Panics
    ///
    /// Panics if a variable width key is longer than `u32::MAX` bytes.
    fn encode<B: BufMut>(&self, encoder: &mut Encoder<B>);

    /// Encodes this value into a new buffer. Panics under the same
    /// conditions as [`Encodable::encode`].
    fn encode_to_bytes(&self) -> Bytes {
        let size = self.encoded_size();
        let mut encoder = Encoder::new(BytesMut::with_capacity(size));
        self.encode(&mut encoder);
        encoder.into_inner().freeze()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeErr {
    #[error("buffer length does not match the record layout")]
    Length,

    #[error("keys are not in strictly ascending order")]
    Order,

    #[error("key does not have the expected width")]
    Width,
}

impl DecodeErr {
    #[inline]
    fn ensure_bytes_available(data: &[u8], len: usize) -> Result<(), DecodeErr> {
        if data.len() < len {
            Err(Self::Length)
        } else {
            Ok(())
        }
    }
}

impl<S, D> From<SizeError<S, D>> for DecodeErr {
    fn from(_: SizeError<S, D>) -> Self {
        DecodeErr::Length
    }
}

impl<A, S> From<ConvertError<A, S, Infallible>> for DecodeErr {
    fn from(err: ConvertError<A, S, Infallible>) -> Self {
        match err {
            ConvertError::Alignment(_) => panic!("All zerocopy transmutations must be unaligned"),
            ConvertError::Size(_) => DecodeErr::Length,
            ConvertError::Validity(never) => match never {},
        }
    }
}

/// Views `data` as a sequence of `W` byte records, checking that the buffer
/// holds a whole number of records in strictly ascending order.
pub(crate) fn decode_fixed<const W: usize>(data: &[u8]) -> Result<&[[u8; W]], DecodeErr> {
    let keys = <[[u8; W]]>::ref_from_bytes(data).inspect_err(|_| {
        debug!(
            len = data.len(),
            width = W,
            "rejecting key set: length is not a multiple of the record width"
        )
    })?;
    ensure_ascending(keys.iter().map(|k| k.as_slice()))?;
    Ok(keys)
}

/// Splits a variable width buffer into its keys. Keys are slices of `data`
/// and share its allocation.
pub(crate) fn decode_var(data: &Bytes) -> Result<Vec<Bytes>, DecodeErr> {
    let mut keys = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let (len, _) = LengthPrefix::read_from_prefix(&data[offset..])
            .inspect_err(|_| debug!(offset, "rejecting key set: truncated length prefix"))?;
        let start = offset + LENGTH_PREFIX_SIZE;
        let end = start
            .checked_add(len.get() as usize)
            .ok_or(DecodeErr::Length)?;
        if let Err(err) = DecodeErr::ensure_bytes_available(data, end) {
            debug!(offset, key_len = len.get(), "rejecting key set: truncated key");
            return Err(err);
        }
        keys.push(data.slice(start..end));
        offset = end;
    }
    ensure_ascending(keys.iter().map(|k| k.as_ref()))?;
    Ok(keys)
}

fn ensure_ascending<'a>(keys: impl Iterator<Item = &'a [u8]>) -> Result<(), DecodeErr> {
    if is_strictly_ascending(keys) {
        Ok(())
    } else {
        debug!("rejecting key set: keys are out of order or duplicated");
        Err(DecodeErr::Order)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bytes::{Bytes, BytesMut};
    use itertools::Itertools;
    use proptest::proptest;

    use crate::{
        Encodable, FixedKeySet, IdSet, IdSetRef, KeySet, KeySetRead, KeySetWrite,
        codec::{DecodeErr, decode_fixed, decode_var, encoder::Encoder},
    };

    #[test]
    fn test_encoder_appends() {
        let mut encoder = Encoder::new(BytesMut::new());
        IdSet::from_iter([1u64, 2]).encode(&mut encoder);
        KeySet::from_iter([b"ab"]).encode(&mut encoder);
        assert_eq!(encoder.bytes_written(), 16 + 6);
        assert_eq!(encoder.into_inner().len(), 22);
    }

    #[test]
    fn test_fixed_byteorder() {
        let set = IdSet::from_iter([0x0200u64, 0x0100]);
        assert_eq!(
            set.encode_to_bytes().as_ref(),
            &[
                0, 0, 0, 0, 0, 0, 0x01, 0x00, // first id
                0, 0, 0, 0, 0, 0, 0x02, 0x00, // second id
            ]
        );
    }

    #[test]
    fn test_var_byteorder() {
        let set = KeySet::from_iter([&b"bc"[..], b"", b"a"]);
        assert_eq!(
            set.encode_to_bytes().as_ref(),
            &[
                0, 0, 0, 0, // empty key
                0, 0, 0, 1, b'a', // "a"
                0, 0, 0, 2, b'b', b'c', // "bc"
            ]
        );
    }

    #[test]
    fn test_encoded_size() {
        let set = KeySet::from_iter([&b"bc"[..], b"", b"a"]);
        assert_eq!(set.encoded_size(), 15);
        assert_eq!(set.encode_to_bytes().len(), set.encoded_size());

        let set = IdSet::from_iter([1u64, 2, 3]);
        assert_eq!(set.encoded_size(), 24);
        assert_eq!(set.encode_to_bytes().len(), set.encoded_size());
    }

    #[test]
    fn test_fixed_length_corruption() {
        for len in [1, 7, 9, 15, 17] {
            let buf = vec![0u8; len];
            assert_matches!(
                decode_fixed::<8>(&buf),
                Err(DecodeErr::Length),
                "Failed for buffer of size {}",
                len
            );
            assert_matches!(IdSetRef::from_bytes(buf.as_slice()), Err(DecodeErr::Length));
            assert_matches!(IdSet::decode(&buf), Err(DecodeErr::Length));
        }
    }

    #[test]
    fn test_fixed_out_of_order() {
        // 5 then 3: rejected instead of trusted
        let buf = [0, 0, 0, 0, 0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 0, 3];
        assert_matches!(decode_fixed::<8>(&buf), Err(DecodeErr::Order));
        assert_matches!(IdSet::decode(&buf), Err(DecodeErr::Order));

        // duplicates are rejected as well
        let buf = [0, 0, 0, 0, 0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 0, 5];
        assert_matches!(IdSet::decode(&buf), Err(DecodeErr::Order));
    }

    #[test]
    fn test_fixed_empty() {
        assert_eq!(decode_fixed::<8>(&[]).unwrap().len(), 0);
        let set = IdSet::decode(&[]).unwrap();
        assert!(set.is_empty());
        assert!(set.encode_to_bytes().is_empty());
    }

    #[test]
    fn test_var_truncated_prefix() {
        let buf = set_bytes(&[b"a"]);
        for len in 1..4 {
            let mut truncated = buf.to_vec();
            truncated.extend_from_slice(&[0].repeat(len));
            assert_matches!(
                decode_var(&Bytes::from(truncated)),
                Err(DecodeErr::Length),
                "Failed for trailing prefix of size {}",
                len
            );
        }
    }

    #[test]
    fn test_var_truncated_key() {
        let mut buf = set_bytes(&[b"abc"]).to_vec();
        buf.pop();
        assert_matches!(decode_var(&Bytes::from(buf)), Err(DecodeErr::Length));

        // a length prefix pointing far past the end of the buffer
        let buf = Bytes::from_static(&[0xff, 0xff, 0xff, 0xff, b'a']);
        assert_matches!(decode_var(&buf), Err(DecodeErr::Length));
    }

    #[test]
    fn test_var_out_of_order() {
        let buf = Bytes::from_static(&[0, 0, 0, 1, b'b', 0, 0, 0, 1, b'a']);
        assert_matches!(decode_var(&buf), Err(DecodeErr::Order));
        assert_matches!(KeySet::decode(buf), Err(DecodeErr::Order));

        // "" twice
        let buf = Bytes::from_static(&[0, 0, 0, 0, 0, 0, 0, 0]);
        assert_matches!(KeySet::decode(buf), Err(DecodeErr::Order));
    }

    #[test]
    fn test_var_shares_buffer() {
        let buf = set_bytes(&[b"abc", b"def"]);
        let keys = decode_var(&buf).unwrap();
        assert_eq!(keys, [&b"abc"[..], b"def"]);
        assert_eq!(keys[0].as_ptr(), buf[4..].as_ptr());
    }

    #[test]
    fn test_width_conversion() {
        let set = KeySet::from_iter([&b"12345678"[..], b"1234567"]);
        assert_matches!(FixedKeySet::<8>::try_from(&set), Err(DecodeErr::Width));
    }

    /// The walkthrough from the index docs: adds with a duplicate, then a
    /// removal, checking the encoded layout at each step.
    #[test]
    fn test_add_remove_scenario() {
        let k0 = [0x00; 8];
        let k1 = [0x01; 8];
        let k2 = [0x02; 8];

        let mut set = IdSet::default();
        assert!(set.insert(&k1));
        assert!(set.insert(&k2));
        assert!(!set.insert(&k2));
        assert_eq!(set.len(), 2);
        assert!(set.insert(&k0));

        let buf = set.encode_to_bytes();
        assert_eq!(buf.len(), 24);
        assert_eq!(buf.as_ref(), [k0, k1, k2].concat());

        assert!(set.remove(&k1));
        assert!(!set.contains(&k1));
        assert_eq!(set.encode_to_bytes().as_ref(), [k0, k2].concat());
    }

    fn set_bytes(keys: &[&[u8]]) -> Bytes {
        KeySet::from_iter(keys.iter().copied()).encode_to_bytes()
    }

    proptest! {
        #[test]
        fn test_fixed_roundtrip_proptest(ids: Vec<u64>) {
            let set = IdSet::from_iter(ids.iter().copied());
            let buf = set.encode_to_bytes();
            assert_eq!(buf.len(), set.len() * 8);

            let decoded = IdSet::decode(&buf).unwrap();
            assert_eq!(decoded, set);
            assert_eq!(decoded.encode_to_bytes(), buf);

            let set_ref = IdSetRef::from_bytes(buf.clone()).unwrap();
            assert_eq!(set_ref, set);
            assert_eq!(set_ref.encode_to_bytes(), buf);
        }

        #[test]
        fn test_var_roundtrip_proptest(keys: Vec<Vec<u8>>) {
            let expected = keys.iter().sorted().dedup().collect_vec();
            let set = KeySet::from_iter(&keys);
            let buf = set.encode_to_bytes();
            assert_eq!(buf.len(), set.encoded_size());

            let decoded = KeySet::decode(buf.clone()).unwrap();
            assert_eq!(decoded, set);
            assert!(itertools::equal(decoded.iter(), expected.iter().map(|k| k.as_slice())));
            assert_eq!(decoded.encode_to_bytes(), buf);
        }
    }
}
