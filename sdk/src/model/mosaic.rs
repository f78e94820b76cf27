//! Mosaics: ids, nonces, amounts and definition properties.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::identifier::generate_mosaic_id;
use super::namespace::NamespaceId;
use super::network::NetworkType;
use super::ModelError;
use crate::codec::{
    CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError, DtoCodec, StdInt, Uint64Dto,
};

/// A 64-bit mosaic id.
///
/// Inside transactions the same slot may carry a namespace id aliasing a
/// mosaic; the top bit tells them apart (see [`is_alias`](Self::is_alias)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MosaicId(pub u64);

impl MosaicId {
    pub fn from_nonce(nonce: MosaicNonce, owner: &[u8; 32]) -> Self {
        generate_mosaic_id(nonce, owner)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// True if this id is really a namespace id standing in for a mosaic.
    pub fn is_alias(self) -> bool {
        self.0 >> 63 == 1
    }

    pub fn to_hex(self) -> String {
        format!("{:016X}", self.0)
    }
}

impl From<u64> for MosaicId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<NamespaceId> for MosaicId {
    fn from(alias: NamespaceId) -> Self {
        Self(alias.0)
    }
}

impl fmt::Display for MosaicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl CatbufferCodec for MosaicId {
    fn catbuffer_size(&self) -> usize {
        u64::BYTES
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write(self.0);
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        reader.read::<u64>().map(Self)
    }
}

impl DtoCodec for MosaicId {
    type Dto = Uint64Dto;

    fn to_dto(&self) -> Self::Dto {
        self.0.to_dto()
    }

    fn from_dto(dto: Self::Dto, _network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self(u64::from_dto(dto)))
    }
}

/// The 4 bytes an owner picks to make each of their mosaic ids distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MosaicNonce(pub [u8; 4]);

impl MosaicNonce {
    pub fn random() -> Self {
        let mut bytes = [0u8; 4];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// The nonce as the little-endian integer the DTO carries.
    pub fn to_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    pub fn from_u32(value: u32) -> Self {
        Self(value.to_le_bytes())
    }

    pub fn to_hex(self) -> String {
        hex::encode_upper(self.0)
    }
}

impl FromStr for MosaicNonce {
    type Err = ModelError;

    /// Parse 8 hex characters (the raw bytes, in order).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| ModelError::InvalidNonce(e.to_string()))?;
        <[u8; 4]>::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_| ModelError::InvalidNonce(format!("expected 4 bytes, got {}", bytes.len())))
    }
}

impl CatbufferCodec for MosaicNonce {
    fn catbuffer_size(&self) -> usize {
        4
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_bytes(&self.0);
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        reader.read_array().map(Self)
    }
}

/// An amount of one mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mosaic {
    pub id: MosaicId,
    pub amount: u64,
}

impl Mosaic {
    pub fn new(id: impl Into<MosaicId>, amount: u64) -> Self {
        Self {
            id: id.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicDto {
    pub id: Uint64Dto,
    pub amount: Uint64Dto,
}

impl CatbufferCodec for Mosaic {
    fn catbuffer_size(&self) -> usize {
        16
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_item(&self.id)?;
        writer.write(self.amount);
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            id: reader.read_item()?,
            amount: reader.read()?,
        })
    }
}

impl DtoCodec for Mosaic {
    type Dto = MosaicDto;

    fn to_dto(&self) -> Self::Dto {
        MosaicDto {
            id: self.id.to_dto(),
            amount: self.amount.to_dto(),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            id: MosaicId::from_dto(dto.id, network_type)?,
            amount: u64::from_dto(dto.amount),
        })
    }
}

/// Flag bit: the owner may change the supply after creation.
pub const FLAG_SUPPLY_MUTABLE: u8 = 0x01;
/// Flag bit: holders may transfer the mosaic to third parties.
pub const FLAG_TRANSFERABLE: u8 = 0x02;

const KNOWN_FLAGS: u8 = FLAG_SUPPLY_MUTABLE | FLAG_TRANSFERABLE;

const PROPERTY_FLAGS: u8 = 0;
const PROPERTY_DIVISIBILITY: u8 = 1;
const PROPERTY_DURATION: u8 = 2;

/// Properties fixed when a mosaic is defined.
///
/// `duration == None` means the mosaic never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MosaicProperties {
    pub supply_mutable: bool,
    pub transferable: bool,
    pub divisibility: u8,
    pub duration: Option<u64>,
}

impl MosaicProperties {
    pub fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.supply_mutable {
            flags |= FLAG_SUPPLY_MUTABLE;
        }
        if self.transferable {
            flags |= FLAG_TRANSFERABLE;
        }
        flags
    }

    pub fn from_flags(flags: u8, divisibility: u8, duration: Option<u64>) -> Self {
        Self {
            supply_mutable: flags & FLAG_SUPPLY_MUTABLE != 0,
            transferable: flags & FLAG_TRANSFERABLE != 0,
            divisibility,
            duration,
        }
    }

    /// Like [`from_flags`](Self::from_flags), but fails on flag bits that
    /// would not survive re-encoding.
    pub fn try_from_flags(
        flags: u8,
        divisibility: u8,
        duration: Option<u64>,
    ) -> Result<Self, CodecError> {
        if flags & !KNOWN_FLAGS != 0 {
            return Err(CodecError::InvalidField {
                field: "mosaic flags",
                reason: format!("unknown bits {:#04x}", flags & !KNOWN_FLAGS),
            });
        }
        Ok(Self::from_flags(flags, divisibility, duration))
    }
}

/// One `{id, value}` entry of the DTO property list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicPropertyDto {
    pub id: u8,
    pub value: Uint64Dto,
}

/// Catbuffer: `optional count u8 ‖ flags u8 ‖ divisibility u8 ‖ (id u8 ‖ value u64)*`.
impl CatbufferCodec for MosaicProperties {
    fn catbuffer_size(&self) -> usize {
        3 + if self.duration.is_some() { 9 } else { 0 }
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write(u8::from(self.duration.is_some()));
        writer.write(self.flags());
        writer.write(self.divisibility);
        if let Some(duration) = self.duration {
            writer.write(PROPERTY_DURATION);
            writer.write(duration);
        }
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        let count: u8 = reader.read()?;
        let flags: u8 = reader.read()?;
        let divisibility: u8 = reader.read()?;
        let mut duration = None;
        for _ in 0..count {
            let id: u8 = reader.read()?;
            let value: u64 = reader.read()?;
            match id {
                PROPERTY_DURATION => duration = Some(value),
                other => {
                    return Err(CodecError::UnknownCode {
                        kind: "optional mosaic property",
                        code: other.into(),
                    })
                }
            }
        }
        Self::try_from_flags(flags, divisibility, duration)
    }
}

impl DtoCodec for MosaicProperties {
    type Dto = Vec<MosaicPropertyDto>;

    fn to_dto(&self) -> Self::Dto {
        let mut dto = vec![
            MosaicPropertyDto {
                id: PROPERTY_FLAGS,
                value: u64::from(self.flags()).to_dto(),
            },
            MosaicPropertyDto {
                id: PROPERTY_DIVISIBILITY,
                value: u64::from(self.divisibility).to_dto(),
            },
        ];
        if let Some(duration) = self.duration {
            dto.push(MosaicPropertyDto {
                id: PROPERTY_DURATION,
                value: duration.to_dto(),
            });
        }
        dto
    }

    fn from_dto(dto: Self::Dto, _network_type: NetworkType) -> Result<Self, CodecError> {
        let mut flags = None;
        let mut divisibility = None;
        let mut duration = None;
        for property in dto {
            let value = u64::from_dto(property.value);
            match property.id {
                PROPERTY_FLAGS => flags = Some(u8::from_native(value.into())?),
                PROPERTY_DIVISIBILITY => divisibility = Some(u8::from_native(value.into())?),
                PROPERTY_DURATION => duration = Some(value),
                other => {
                    return Err(CodecError::UnknownCode {
                        kind: "mosaic property",
                        code: other.into(),
                    })
                }
            }
        }
        let missing = |what: &str| CodecError::MalformedDto(format!("mosaic properties lack {what}"));
        Self::try_from_flags(
            flags.ok_or_else(|| missing("flags"))?,
            divisibility.ok_or_else(|| missing("divisibility"))?,
            duration,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_integer_form_is_little_endian() {
        let nonce = MosaicNonce([0x01, 0x02, 0x03, 0x04]);
        assert_eq!(nonce.to_u32(), 0x0403_0201);
        assert_eq!(MosaicNonce::from_u32(0x0403_0201), nonce);
        assert_eq!("01020304".parse::<MosaicNonce>().unwrap(), nonce);
        assert!("0102".parse::<MosaicNonce>().is_err());
    }

    #[test]
    fn mosaic_catbuffer_layout() {
        let mosaic = Mosaic::new(5u64, 1000);
        assert_eq!(
            hex::encode(mosaic.to_catbuffer().unwrap()),
            "0500000000000000e803000000000000"
        );
    }

    #[test]
    fn alias_bit() {
        assert!(MosaicId::from(NamespaceId(0x8BC7_011B_0B34_4C54)).is_alias());
        assert!(!MosaicId(0x2FF7_D64F_483B_C0A6).is_alias());
    }

    #[test]
    fn properties_without_duration() {
        let props = MosaicProperties {
            supply_mutable: true,
            transferable: false,
            divisibility: 3,
            duration: None,
        };
        let bytes = props.to_catbuffer().unwrap();
        assert_eq!(bytes, vec![0, 1, 3]);
        assert_eq!(
            MosaicProperties::from_catbuffer(&bytes, NetworkType::MijinTest).unwrap(),
            props
        );
    }

    #[test]
    fn properties_with_duration() {
        let props = MosaicProperties {
            supply_mutable: true,
            transferable: true,
            divisibility: 6,
            duration: Some(1000),
        };
        assert_eq!(
            hex::encode(props.to_catbuffer().unwrap()),
            "01030602e803000000000000"
        );
        let dto = props.to_dto();
        assert_eq!(dto.len(), 3);
        assert_eq!(
            MosaicProperties::from_dto(dto, NetworkType::MijinTest).unwrap(),
            props
        );
    }

    #[test]
    fn unknown_optional_property_is_rejected() {
        let bytes = [1u8, 0, 0, 9, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            MosaicProperties::from_catbuffer(&bytes, NetworkType::MijinTest),
            Err(CodecError::UnknownCode { code: 9, .. })
        ));
    }

    #[test]
    fn unknown_flag_bits_are_rejected() {
        assert!(matches!(
            MosaicProperties::from_catbuffer(&[0, 0x07, 0], NetworkType::MijinTest),
            Err(CodecError::InvalidField { field: "mosaic flags", .. })
        ));
        let dto = vec![
            MosaicPropertyDto {
                id: PROPERTY_FLAGS,
                value: 0x07u64.to_dto(),
            },
            MosaicPropertyDto {
                id: PROPERTY_DIVISIBILITY,
                value: 0u64.to_dto(),
            },
        ];
        assert!(MosaicProperties::from_dto(dto, NetworkType::MijinTest).is_err());
        assert_eq!(
            MosaicProperties::from_catbuffer(&[0, 0x03, 0], NetworkType::MijinTest)
                .unwrap()
                .flags(),
            0x03
        );
    }

    #[test]
    fn dto_requires_flags_and_divisibility() {
        let dto = vec![MosaicPropertyDto {
            id: 0,
            value: 3u64.to_dto(),
        }];
        assert!(MosaicProperties::from_dto(dto, NetworkType::MijinTest).is_err());
    }
}
