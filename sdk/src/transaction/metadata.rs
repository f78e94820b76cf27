//! Key/value metadata attached to an address, mosaic or namespace.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::builder::{Transaction, TransactionBody};
use super::types::{MetadataModificationType, MetadataType};
use crate::codec::{CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError, DtoCodec};
use crate::model::account::Address;
use crate::model::deadline::Deadline;
use crate::model::mosaic::MosaicId;
use crate::model::namespace::NamespaceId;
use crate::model::network::NetworkType;

/// Something metadata can hang off.
pub trait MetadataTarget: CatbufferCodec + DtoCodec + Clone + PartialEq + Debug {
    const METADATA_TYPE: MetadataType;

    fn into_body(body: ModifyMetadataTransaction<Self>) -> TransactionBody;
}

impl MetadataTarget for Address {
    const METADATA_TYPE: MetadataType = MetadataType::Address;

    fn into_body(body: ModifyMetadataTransaction<Self>) -> TransactionBody {
        TransactionBody::ModifyAddressMetadata(body)
    }
}

impl MetadataTarget for MosaicId {
    const METADATA_TYPE: MetadataType = MetadataType::Mosaic;

    fn into_body(body: ModifyMetadataTransaction<Self>) -> TransactionBody {
        TransactionBody::ModifyMosaicMetadata(body)
    }
}

impl MetadataTarget for NamespaceId {
    const METADATA_TYPE: MetadataType = MetadataType::Namespace;

    fn into_body(body: ModifyMetadataTransaction<Self>) -> TransactionBody {
        TransactionBody::ModifyNamespaceMetadata(body)
    }
}

fn check_metadata_type<I: MetadataTarget>(metadata_type: MetadataType) -> Result<(), CodecError> {
    if metadata_type != I::METADATA_TYPE {
        return Err(CodecError::InvalidField {
            field: "metadata type",
            reason: format!("expected {:?}, got {metadata_type:?}", I::METADATA_TYPE),
        });
    }
    Ok(())
}

const MODIFICATION_HEADER_SIZE: usize = 4 + 1 + 1 + 2;

/// One key/value change. Removals carry an empty value.
///
/// Wire layout:
///
/// ```text
/// size u32 ‖ type u8 ‖ key size u8 ‖ value size u16 ‖ key ‖ value
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataModification {
    pub kind: MetadataModificationType,
    pub key: String,
    pub value: String,
}

impl MetadataModification {
    pub fn add(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: MetadataModificationType::Add,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self {
            kind: MetadataModificationType::Remove,
            key: key.into(),
            value: String::new(),
        }
    }
}

fn utf8(field: &'static str, bytes: &[u8]) -> Result<String, CodecError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::InvalidField {
        field,
        reason: e.to_string(),
    })
}

impl CatbufferCodec for MetadataModification {
    fn catbuffer_size(&self) -> usize {
        MODIFICATION_HEADER_SIZE + self.key.len() + self.value.len()
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_len::<u32>(self.catbuffer_size())?;
        writer.write_item(&self.kind)?;
        writer.write_len::<u8>(self.key.len())?;
        writer.write_len::<u16>(self.value.len())?;
        writer.write_bytes(self.key.as_bytes());
        writer.write_bytes(self.value.as_bytes());
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        let size: u32 = reader.read()?;
        let kind = reader.read_item()?;
        let key_size: u8 = reader.read()?;
        let value_size: u16 = reader.read()?;
        let expected = MODIFICATION_HEADER_SIZE + usize::from(key_size) + usize::from(value_size);
        if size as usize != expected {
            return Err(CodecError::InvalidField {
                field: "metadata modification size",
                reason: format!("declared {size}, fields add up to {expected}"),
            });
        }
        Ok(Self {
            kind,
            key: utf8("metadata key", reader.take(key_size.into())?)?,
            value: utf8("metadata value", reader.take(value_size.into())?)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataModificationDto {
    pub modification_type: MetadataModificationType,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl DtoCodec for MetadataModification {
    type Dto = MetadataModificationDto;

    fn to_dto(&self) -> Self::Dto {
        let value = match self.kind {
            MetadataModificationType::Remove if self.value.is_empty() => None,
            _ => Some(self.value.clone()),
        };
        MetadataModificationDto {
            modification_type: self.kind,
            key: self.key.clone(),
            value,
        }
    }

    fn from_dto(dto: Self::Dto, _network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            kind: dto.modification_type,
            key: dto.key,
            value: dto.value.unwrap_or_default(),
        })
    }
}

/// Body layout: `metadata type u8 ‖ id ‖ modification*`.
///
/// There is no modification count; the list runs to the end of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyMetadataTransaction<I> {
    pub metadata_id: I,
    pub modifications: Vec<MetadataModification>,
}

impl<I: MetadataTarget> ModifyMetadataTransaction<I> {
    pub fn create(
        deadline: Deadline,
        metadata_id: I,
        modifications: Vec<MetadataModification>,
        network_type: NetworkType,
    ) -> Transaction {
        let body = Self {
            metadata_id,
            modifications,
        };
        Transaction::new(network_type, deadline, I::into_body(body))
    }
}

impl<I: MetadataTarget> CatbufferCodec for ModifyMetadataTransaction<I> {
    fn catbuffer_size(&self) -> usize {
        1 + self.metadata_id.catbuffer_size()
            + self
                .modifications
                .iter()
                .map(CatbufferCodec::catbuffer_size)
                .sum::<usize>()
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_item(&I::METADATA_TYPE)?;
        writer.write_item(&self.metadata_id)?;
        for modification in &self.modifications {
            writer.write_item(modification)?;
        }
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        check_metadata_type::<I>(reader.read_item()?)?;
        let metadata_id = reader.read_item()?;
        let mut modifications = Vec::new();
        while reader.remaining() > 0 {
            modifications.push(reader.read_item()?);
        }
        Ok(Self {
            metadata_id,
            modifications,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyMetadataTransactionDto<D> {
    pub metadata_type: MetadataType,
    pub metadata_id: D,
    pub modifications: Vec<MetadataModificationDto>,
}

impl<I: MetadataTarget> DtoCodec for ModifyMetadataTransaction<I> {
    type Dto = ModifyMetadataTransactionDto<I::Dto>;

    fn to_dto(&self) -> Self::Dto {
        ModifyMetadataTransactionDto {
            metadata_type: I::METADATA_TYPE,
            metadata_id: self.metadata_id.to_dto(),
            modifications: self.modifications.iter().map(DtoCodec::to_dto).collect(),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        check_metadata_type::<I>(dto.metadata_type)?;
        Ok(Self {
            metadata_id: I::from_dto(dto.metadata_id, network_type)?,
            modifications: dto
                .modifications
                .into_iter()
                .map(|m| MetadataModification::from_dto(m, network_type))
                .collect::<Result<_, _>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modification_layout() {
        let bytes = MetadataModification::add("k", "vv").to_catbuffer().unwrap();
        assert_eq!(hex::encode(bytes), "0b000000000102006b7676");
    }

    #[test]
    fn mosaic_metadata_roundtrip() {
        let body = ModifyMetadataTransaction {
            metadata_id: MosaicId(0x2FF7_D64F_483B_C0A6),
            modifications: vec![
                MetadataModification::add("name", "gold"),
                MetadataModification::remove("old"),
            ],
        };
        let bytes = body.to_catbuffer().unwrap();
        assert_eq!(bytes[0], 2);
        assert_eq!(bytes.len(), body.catbuffer_size());
        assert_eq!(
            ModifyMetadataTransaction::<MosaicId>::from_catbuffer(&bytes, NetworkType::MijinTest)
                .unwrap(),
            body
        );
        assert!(
            ModifyMetadataTransaction::<NamespaceId>::from_catbuffer(
                &bytes,
                NetworkType::MijinTest
            )
            .is_err()
        );
    }

    #[test]
    fn inconsistent_modification_size_is_rejected() {
        let mut bytes = MetadataModification::add("k", "v").to_catbuffer().unwrap();
        bytes[0] += 1;
        assert!(matches!(
            MetadataModification::from_catbuffer(&bytes, NetworkType::MijinTest),
            Err(CodecError::InvalidField { .. })
        ));
    }

    #[test]
    fn removal_dto_omits_the_value() {
        let body = ModifyMetadataTransaction {
            metadata_id: NamespaceId(0x8BC7_011B_0B34_4C54),
            modifications: vec![MetadataModification::remove("k")],
        };
        let json = serde_json::to_value(body.to_dto()).unwrap();
        assert_eq!(json["metadataType"], 3);
        assert!(json["modifications"][0].get("value").is_none());
        let dto = serde_json::from_value(json).unwrap();
        assert_eq!(
            ModifyMetadataTransaction::<NamespaceId>::from_dto(dto, NetworkType::MijinTest)
                .unwrap(),
            body
        );
    }
}
