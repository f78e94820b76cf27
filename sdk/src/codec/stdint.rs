//! Fixed-width integer codec.
//!
//! Every integer that crosses the wire has three faces:
//!
//! - **native**: an ordinary Rust integer. Wider inputs (`i128`) are
//!   range-checked on the way in through [`StdInt::from_native`].
//! - **catbuffer**: exactly `BYTES` little-endian bytes.
//! - **DTO**: the JSON form. Widths up to 32 bits are plain numbers; a
//!   `u64` is `[low32, high32]` and a `u128` is `[low64_dto, high64_dto]`.
//!
//! One trait covers all widths, so identifiers and enum codes delegate to it
//! explicitly instead of each re-implementing byte order and range checks.

use std::fmt;

use bytes::BufMut;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CodecError;

/// A fixed-width integer with catbuffer and DTO representations.
pub trait StdInt: Copy + fmt::Debug + PartialEq + Sized {
    /// Human-readable width, used in error messages.
    const WIDTH: &'static str;

    /// Encoded size in bytes.
    const BYTES: usize;

    /// The JSON shape of this width.
    type Dto: Serialize + DeserializeOwned + Clone + fmt::Debug + PartialEq;

    /// Range-checked conversion from a wider integer.
    fn from_native(value: i128) -> Result<Self, CodecError>;

    /// Append the little-endian encoding to `buf`.
    fn put_catbuffer<B: BufMut>(self, buf: &mut B);

    /// Decode from at most `BYTES` little-endian bytes.
    ///
    /// A shorter slice is zero-extended (a caller streaming a bounded field
    /// may hand over fewer bytes); a longer one is an error.
    fn from_catbuffer(data: &[u8]) -> Result<Self, CodecError>;

    fn to_dto(self) -> Self::Dto;

    fn from_dto(dto: Self::Dto) -> Self;

    /// Decode from an untyped JSON value, checking both shape and range.
    fn from_dto_value(value: &Value) -> Result<Self, CodecError>;

    fn to_catbuffer(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::BYTES);
        self.put_catbuffer(&mut out);
        out
    }
}

/// Integers that split into a high and a low half of half the width.
///
/// Used to build DTOs by hand and to pack small fields into larger words
/// (the network type lives in the high byte of the version word).
pub trait HalfWidth: StdInt {
    type Half: StdInt;

    fn high(self) -> Self::Half;

    fn low(self) -> Self::Half;

    fn from_halves(low: Self::Half, high: Self::Half) -> Self;
}

/// JSON form of a `u64`: `[low32, high32]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uint64Dto(pub [u32; 2]);

/// JSON form of a `u128`: `[low64, high64]`, each half itself a [`Uint64Dto`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uint128Dto(pub [Uint64Dto; 2]);

impl From<u64> for Uint64Dto {
    fn from(value: u64) -> Self {
        value.to_dto()
    }
}

impl From<Uint64Dto> for u64 {
    fn from(dto: Uint64Dto) -> Self {
        u64::from_dto(dto)
    }
}

fn le_padded<const N: usize>(width: &'static str, data: &[u8]) -> Result<[u8; N], CodecError> {
    if data.len() > N {
        return Err(CodecError::TooLong {
            width,
            expected: N,
            actual: data.len(),
        });
    }
    let mut out = [0u8; N];
    out[..data.len()].copy_from_slice(data);
    Ok(out)
}

fn overflow(value: impl fmt::Display, width: &'static str) -> CodecError {
    CodecError::Overflow {
        value: value.to_string(),
        width,
    }
}

/// Read a JSON integer without losing sign or magnitude.
fn json_integer(value: &Value) -> Result<i128, CodecError> {
    if let Some(n) = value.as_i64() {
        Ok(n as i128)
    } else if let Some(n) = value.as_u64() {
        Ok(n as i128)
    } else {
        Err(CodecError::MalformedDto(format!(
            "expected an integer, got {}",
            value
        )))
    }
}

/// Read a two-element JSON array.
fn json_pair(value: &Value) -> Result<(&Value, &Value), CodecError> {
    match value.as_array().map(Vec::as_slice) {
        Some([low, high]) => Ok((low, high)),
        _ => Err(CodecError::MalformedDto(format!(
            "expected a [low, high] pair, got {}",
            value
        ))),
    }
}

macro_rules! impl_small_stdint {
    ($ty:ty, $width:literal, $put:ident) => {
        impl StdInt for $ty {
            const WIDTH: &'static str = $width;
            const BYTES: usize = std::mem::size_of::<$ty>();
            type Dto = $ty;

            fn from_native(value: i128) -> Result<Self, CodecError> {
                <$ty>::try_from(value).map_err(|_| overflow(value, $width))
            }

            fn put_catbuffer<B: BufMut>(self, buf: &mut B) {
                buf.$put(self);
            }

            fn from_catbuffer(data: &[u8]) -> Result<Self, CodecError> {
                Ok(<$ty>::from_le_bytes(le_padded($width, data)?))
            }

            fn to_dto(self) -> Self::Dto {
                self
            }

            fn from_dto(dto: Self::Dto) -> Self {
                dto
            }

            fn from_dto_value(value: &Value) -> Result<Self, CodecError> {
                Self::from_native(json_integer(value)?)
            }
        }
    };
}

impl_small_stdint!(u8, "u8", put_u8);
impl_small_stdint!(i8, "i8", put_i8);
impl_small_stdint!(u16, "u16", put_u16_le);
impl_small_stdint!(u32, "u32", put_u32_le);

impl StdInt for u64 {
    const WIDTH: &'static str = "u64";
    const BYTES: usize = 8;
    type Dto = Uint64Dto;

    fn from_native(value: i128) -> Result<Self, CodecError> {
        u64::try_from(value).map_err(|_| overflow(value, Self::WIDTH))
    }

    fn put_catbuffer<B: BufMut>(self, buf: &mut B) {
        buf.put_u64_le(self);
    }

    fn from_catbuffer(data: &[u8]) -> Result<Self, CodecError> {
        Ok(u64::from_le_bytes(le_padded(Self::WIDTH, data)?))
    }

    fn to_dto(self) -> Self::Dto {
        Uint64Dto([self.low(), self.high()])
    }

    fn from_dto(dto: Self::Dto) -> Self {
        let [low, high] = dto.0;
        u64::from_halves(low, high)
    }

    fn from_dto_value(value: &Value) -> Result<Self, CodecError> {
        let (low, high) = json_pair(value)?;
        Ok(u64::from_halves(
            u32::from_dto_value(low)?,
            u32::from_dto_value(high)?,
        ))
    }
}

impl StdInt for u128 {
    const WIDTH: &'static str = "u128";
    const BYTES: usize = 16;
    type Dto = Uint128Dto;

    fn from_native(value: i128) -> Result<Self, CodecError> {
        u128::try_from(value).map_err(|_| overflow(value, Self::WIDTH))
    }

    fn put_catbuffer<B: BufMut>(self, buf: &mut B) {
        buf.put_u128_le(self);
    }

    fn from_catbuffer(data: &[u8]) -> Result<Self, CodecError> {
        Ok(u128::from_le_bytes(le_padded(Self::WIDTH, data)?))
    }

    fn to_dto(self) -> Self::Dto {
        Uint128Dto([self.low().to_dto(), self.high().to_dto()])
    }

    fn from_dto(dto: Self::Dto) -> Self {
        let [low, high] = dto.0;
        u128::from_halves(u64::from_dto(low), u64::from_dto(high))
    }

    fn from_dto_value(value: &Value) -> Result<Self, CodecError> {
        let (low, high) = json_pair(value)?;
        Ok(u128::from_halves(
            u64::from_dto_value(low)?,
            u64::from_dto_value(high)?,
        ))
    }
}

macro_rules! impl_half_width {
    ($ty:ty, $half:ty) => {
        impl HalfWidth for $ty {
            type Half = $half;

            fn high(self) -> $half {
                (self >> <$half>::BITS) as $half
            }

            fn low(self) -> $half {
                self as $half
            }

            fn from_halves(low: $half, high: $half) -> Self {
                ((high as $ty) << <$half>::BITS) | low as $ty
            }
        }
    };
}

impl_half_width!(u16, u8);
impl_half_width!(u32, u16);
impl_half_width!(u64, u32);
impl_half_width!(u128, u64);

/// Lazily decode consecutive fixed-width values from a flat buffer.
///
/// Each element is decoded independently. A trailing partial element yields
/// a `Truncated` error instead of being zero-extended.
pub fn iter_from_catbuffer<T: StdInt>(
    data: &[u8],
) -> impl Iterator<Item = Result<T, CodecError>> + '_ {
    data.chunks(T::BYTES).map(|chunk| {
        if chunk.len() < T::BYTES {
            Err(CodecError::Truncated {
                needed: T::BYTES,
                available: chunk.len(),
            })
        } else {
            T::from_catbuffer(chunk)
        }
    })
}

/// Lazily encode values into their catbuffer chunks.
pub fn iter_to_catbuffer<T, I>(values: I) -> impl Iterator<Item = Vec<u8>>
where
    T: StdInt,
    I: IntoIterator<Item = T>,
{
    values.into_iter().map(T::to_catbuffer)
}

/// Lazily decode a sequence of untyped DTO values.
pub fn iter_from_dto<'a, T: StdInt + 'a>(
    values: &'a [Value],
) -> impl Iterator<Item = Result<T, CodecError>> + 'a {
    values.iter().map(T::from_dto_value)
}

/// Lazily encode values into their DTO forms.
pub fn iter_to_dto<T, I>(values: I) -> impl Iterator<Item = T::Dto>
where
    T: StdInt,
    I: IntoIterator<Item = T>,
{
    values.into_iter().map(T::to_dto)
}
