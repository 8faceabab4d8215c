use bytes::BufMut;
use zerocopy::{BigEndian, IntoBytes, U32};

use crate::codec::LengthPrefix;

pub struct Encoder<B: BufMut> {
    buf: B,
    bytes_written: usize,
}

impl<B: BufMut> Encoder<B> {
    pub fn new(buf: B) -> Self {
        Self {
            buf,
            bytes_written: 0,
        }
    }

    /// Retrieve the wrapped buffer from the `Encoder`
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// The total number of bytes written to the buffer since this Encoder was
    /// initialized.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Write an already encoded key set to the buffer
    pub(crate) fn write_encoded(&mut self, data: &[u8]) {
        self.put_slice(data);
    }

    /// Encode a run of fixed width keys as back to back records.
    pub(crate) fn put_fixed_keys<const W: usize>(&mut self, keys: &[[u8; W]]) {
        self.put_slice(keys.as_bytes());
    }

    /// Encode a single variable width key as `[len][key]`.
    pub(crate) fn put_var_key(&mut self, key: &[u8]) {
        let Ok(len) = u32::try_from(key.len()) else {
            panic!("key length {} exceeds u32::MAX", key.len());
        };
        let prefix: LengthPrefix = U32::<BigEndian>::new(len);
        self.put_slice(prefix.as_bytes());
        self.put_slice(key);
    }

    fn put_slice(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
        self.bytes_written += data.len();
    }
}
