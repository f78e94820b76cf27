//! Bounded catbuffer reader and writer.
//!
//! The reader never panics on short input: every read checks the remaining
//! length first and reports `Truncated` with the exact shortfall. The writer
//! is a thin layer over [`BytesMut`] that routes integers through
//! [`StdInt`] so byte order lives in one place.

use bytes::{Buf, BufMut, BytesMut};

use super::stdint::StdInt;
use super::{CatbufferCodec, CodecError};
use crate::model::network::NetworkType;

/// Append-only catbuffer output.
#[derive(Debug, Default)]
pub struct CatbufferWriter {
    buf: BytesMut,
}

impl CatbufferWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Write a fixed-width integer.
    pub fn write<T: StdInt>(&mut self, value: T) {
        value.put_catbuffer(&mut self.buf);
    }

    /// Write a length or count prefix of width `T`, failing if `len` does
    /// not fit.
    pub fn write_len<T: StdInt>(&mut self, len: usize) -> Result<(), CodecError> {
        let value = T::from_native(len as i128)?;
        self.write(value);
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    pub fn write_item<C: CatbufferCodec>(&mut self, item: &C) -> Result<(), CodecError> {
        item.write_catbuffer(self)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

/// Forward-only catbuffer input over a borrowed slice.
///
/// Carries the network type so that decoders which rebuild addresses from
/// bare public keys know which network prefix to use.
#[derive(Debug, Clone)]
pub struct CatbufferReader<'a> {
    buf: &'a [u8],
    network_type: NetworkType,
}

impl<'a> CatbufferReader<'a> {
    pub fn new(data: &'a [u8], network_type: NetworkType) -> Self {
        Self {
            buf: data,
            network_type,
        }
    }

    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// The unread tail, without consuming it.
    pub fn rest(&self) -> &'a [u8] {
        self.buf
    }

    fn ensure(&self, needed: usize) -> Result<(), CodecError> {
        if self.buf.remaining() < needed {
            return Err(CodecError::Truncated {
                needed,
                available: self.buf.remaining(),
            });
        }
        Ok(())
    }

    /// Consume exactly `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        self.ensure(len)?;
        let data: &'a [u8] = self.buf;
        let head = &data[..len];
        self.buf.advance(len);
        Ok(head)
    }

    pub fn read<T: StdInt>(&mut self) -> Result<T, CodecError> {
        let chunk = self.take(T::BYTES)?;
        T::from_catbuffer(chunk)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_item<C: CatbufferCodec>(&mut self) -> Result<C, CodecError> {
        C::read_catbuffer(self)
    }

    /// Read `count` consecutive items.
    pub fn read_items<C: CatbufferCodec>(&mut self, count: usize) -> Result<Vec<C>, CodecError> {
        (0..count).map(|_| self.read_item()).collect()
    }

    /// Split off the next `len` bytes as an independent reader.
    pub fn sub_reader(&mut self, len: usize) -> Result<CatbufferReader<'a>, CodecError> {
        let data = self.take(len)?;
        Ok(CatbufferReader::new(data, self.network_type))
    }

    /// Assert the reader has been fully consumed.
    pub fn finish(self) -> Result<(), CodecError> {
        match self.buf.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_emits_little_endian_fields() {
        let mut w = CatbufferWriter::new();
        w.write(0x4154u16);
        w.write(7u8);
        w.write_bytes(b"ok");
        assert_eq!(w.into_vec(), vec![0x54, 0x41, 7, b'o', b'k']);
    }

    #[test]
    fn write_len_refuses_to_truncate() {
        let mut w = CatbufferWriter::new();
        assert!(w.write_len::<u8>(255).is_ok());
        assert!(matches!(
            w.write_len::<u8>(256),
            Err(CodecError::Overflow { width: "u8", .. })
        ));
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn reader_reports_shortfall() {
        let data = [1u8, 2, 3];
        let mut r = CatbufferReader::new(&data, NetworkType::MijinTest);
        assert_eq!(r.read::<u16>().unwrap(), 0x0201);
        assert_eq!(
            r.read::<u32>(),
            Err(CodecError::Truncated {
                needed: 4,
                available: 1
            })
        );
    }

    #[test]
    fn finish_detects_trailing_bytes() {
        let data = [1u8, 2, 3];
        let mut r = CatbufferReader::new(&data, NetworkType::MijinTest);
        r.read::<u8>().unwrap();
        assert_eq!(r.finish(), Err(CodecError::TrailingBytes(2)));
    }

    #[test]
    fn sub_reader_is_bounded() {
        let data = [1u8, 0, 2, 0, 3];
        let mut r = CatbufferReader::new(&data, NetworkType::MijinTest);
        let mut sub = r.sub_reader(4).unwrap();
        assert_eq!(sub.read::<u16>().unwrap(), 1);
        assert_eq!(sub.read::<u16>().unwrap(), 2);
        assert!(sub.read::<u8>().is_err());
        assert_eq!(r.read::<u8>().unwrap(), 3);
        assert!(r.finish().is_ok());
    }
}
