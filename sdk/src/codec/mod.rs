//! # Wire Codecs
//!
//! Two parallel encodings of the same model live here:
//!
//! - **catbuffer**: the network's canonical fixed binary layout. Every
//!   multi-byte integer is little-endian, every variable-length field is
//!   preceded by a fixed-width count or size.
//! - **DTO**: the JSON shape spoken by the REST gateway. 64-bit integers do
//!   not survive a round-trip through a JSON number, so they travel as
//!   `[low32, high32]` pairs.
//!
//! Both encodings are driven by traits ([`CatbufferCodec`], [`DtoCodec`])
//! rather than by reflection, so each model type spells out its own layout
//! and the compiler checks that nothing was forgotten.

pub mod buffer;
pub mod stdint;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::model::network::NetworkType;

pub use buffer::{CatbufferReader, CatbufferWriter};
pub use stdint::{HalfWidth, StdInt, Uint128Dto, Uint64Dto};

/// Errors raised while encoding or decoding either wire format.
///
/// Range errors (`Overflow`) and shape errors (`MalformedDto`) are kept
/// apart: the first means the value is wrong, the second means the document
/// is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A value does not fit the fixed width it must be encoded in.
    #[error("value {value} does not fit in {width}")]
    Overflow { value: String, width: &'static str },

    /// A DTO has the wrong JSON shape (e.g. a 3-element array for a u64).
    #[error("malformed DTO: {0}")]
    MalformedDto(String),

    /// The buffer ended before a field could be read.
    #[error("truncated catbuffer: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// A fixed-width field was handed more bytes than its width.
    #[error("catbuffer too long for {width}: got {actual} bytes, at most {expected}")]
    TooLong {
        width: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Bytes were left over after a complete entity was decoded.
    #[error("{0} unexpected trailing bytes")]
    TrailingBytes(usize),

    /// An enum discriminant that no variant claims.
    #[error("unknown {kind} code {code:#x}")]
    UnknownCode { kind: &'static str, code: u64 },

    /// A hex string that does not decode, or decodes to the wrong length.
    #[error("invalid hex in {field}: {reason}")]
    InvalidHex { field: &'static str, reason: String },

    /// A field that decoded but violates a model rule.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// A type with an exact catbuffer layout.
///
/// `write_catbuffer` is fallible because length prefixes are narrow
/// (a message size is a u16, a mosaic count a u8) and an oversized
/// collection must fail instead of being silently truncated.
pub trait CatbufferCodec: Sized {
    /// Exact number of bytes [`write_catbuffer`](Self::write_catbuffer) emits.
    fn catbuffer_size(&self) -> usize;

    /// Append the encoding of `self` to `writer`.
    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError>;

    /// Decode one value from the front of `reader`.
    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError>;

    /// Encode into a fresh buffer.
    fn to_catbuffer(&self) -> Result<Vec<u8>, CodecError> {
        let mut writer = CatbufferWriter::with_capacity(self.catbuffer_size());
        self.write_catbuffer(&mut writer)?;
        Ok(writer.into_vec())
    }

    /// Decode a value that must span the whole of `data`.
    fn from_catbuffer(data: &[u8], network_type: NetworkType) -> Result<Self, CodecError> {
        let mut reader = CatbufferReader::new(data, network_type);
        let value = Self::read_catbuffer(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}

/// A type with a JSON (DTO) representation.
///
/// Decoding takes the network type because some DTOs carry bare public keys
/// and the address derived from them depends on the network.
pub trait DtoCodec: Sized {
    type Dto: Serialize + DeserializeOwned;

    fn to_dto(&self) -> Self::Dto;

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError>;
}

/// Upper-case hex, the network's display convention.
pub fn hex_upper(bytes: impl AsRef<[u8]>) -> String {
    hex::encode_upper(bytes)
}

/// Decode a hex string of exactly `N` bytes.
pub fn decode_hex_array<const N: usize>(
    field: &'static str,
    value: &str,
) -> Result<[u8; N], CodecError> {
    let bytes = hex::decode(value).map_err(|e| CodecError::InvalidHex {
        field,
        reason: e.to_string(),
    })?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| CodecError::InvalidHex {
        field,
        reason: format!("expected {} bytes, got {}", N, bytes.len()),
    })
}

/// Decode a hex string of any length.
pub fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, CodecError> {
    hex::decode(value).map_err(|e| CodecError::InvalidHex {
        field,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_output_is_upper_case() {
        assert_eq!(hex_upper([0xab, 0x01]), "AB01");
    }

    #[test]
    fn decode_hex_array_accepts_either_case() {
        let a: [u8; 2] = decode_hex_array("field", "abCD").unwrap();
        assert_eq!(a, [0xab, 0xcd]);
    }

    #[test]
    fn decode_hex_array_rejects_wrong_length() {
        let err = decode_hex_array::<4>("secret", "abcd").unwrap_err();
        assert!(matches!(err, CodecError::InvalidHex { field: "secret", .. }));
    }

    #[test]
    fn decode_hex_rejects_non_hex() {
        assert!(decode_hex("payload", "zz").is_err());
    }
}
