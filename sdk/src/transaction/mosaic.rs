//! Mosaic definition and supply change.

use serde::{Deserialize, Serialize};

use super::builder::{Transaction, TransactionBody};
use super::types::MosaicSupplyType;
use crate::codec::{
    CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError, DtoCodec, StdInt, Uint64Dto,
};
use crate::model::account::PublicAccount;
use crate::model::deadline::Deadline;
use crate::model::mosaic::{MosaicId, MosaicNonce, MosaicProperties, MosaicPropertyDto};
use crate::model::network::NetworkType;

/// Body layout: `nonce u32 ‖ mosaic id u64 ‖ properties`.
///
/// The id is derived from the nonce and the owner's public key, so a
/// definition signed by anyone other than `owner` is rejected on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicDefinitionTransaction {
    pub nonce: MosaicNonce,
    pub mosaic_id: MosaicId,
    pub properties: MosaicProperties,
}

impl MosaicDefinitionTransaction {
    pub fn create(
        deadline: Deadline,
        nonce: MosaicNonce,
        owner: &PublicAccount,
        properties: MosaicProperties,
        network_type: NetworkType,
    ) -> Transaction {
        let body = Self {
            nonce,
            mosaic_id: MosaicId::from_nonce(nonce, owner.public_key_bytes()),
            properties,
        };
        Transaction::new(network_type, deadline, TransactionBody::MosaicDefinition(body))
    }
}

impl CatbufferCodec for MosaicDefinitionTransaction {
    fn catbuffer_size(&self) -> usize {
        4 + 8 + self.properties.catbuffer_size()
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_item(&self.nonce)?;
        writer.write_item(&self.mosaic_id)?;
        writer.write_item(&self.properties)
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            nonce: reader.read_item()?,
            mosaic_id: reader.read_item()?,
            properties: reader.read_item()?,
        })
    }
}

/// The nonce travels as a plain u32 in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicDefinitionTransactionDto {
    pub mosaic_nonce: u32,
    pub mosaic_id: Uint64Dto,
    pub properties: Vec<MosaicPropertyDto>,
}

impl DtoCodec for MosaicDefinitionTransaction {
    type Dto = MosaicDefinitionTransactionDto;

    fn to_dto(&self) -> Self::Dto {
        MosaicDefinitionTransactionDto {
            mosaic_nonce: self.nonce.to_u32(),
            mosaic_id: self.mosaic_id.to_dto(),
            properties: self.properties.to_dto(),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            nonce: MosaicNonce::from_u32(dto.mosaic_nonce),
            mosaic_id: MosaicId::from_dto(dto.mosaic_id, network_type)?,
            properties: MosaicProperties::from_dto(dto.properties, network_type)?,
        })
    }
}

/// Body layout: `mosaic id u64 ‖ direction u8 ‖ delta u64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicSupplyChangeTransaction {
    pub mosaic_id: MosaicId,
    pub direction: MosaicSupplyType,
    pub delta: u64,
}

impl MosaicSupplyChangeTransaction {
    pub fn create(
        deadline: Deadline,
        mosaic_id: MosaicId,
        direction: MosaicSupplyType,
        delta: u64,
        network_type: NetworkType,
    ) -> Transaction {
        Transaction::new(
            network_type,
            deadline,
            TransactionBody::MosaicSupplyChange(Self {
                mosaic_id,
                direction,
                delta,
            }),
        )
    }
}

impl CatbufferCodec for MosaicSupplyChangeTransaction {
    fn catbuffer_size(&self) -> usize {
        8 + 1 + 8
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_item(&self.mosaic_id)?;
        writer.write_item(&self.direction)?;
        writer.write(self.delta);
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            mosaic_id: reader.read_item()?,
            direction: reader.read_item()?,
            delta: reader.read()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicSupplyChangeTransactionDto {
    pub mosaic_id: Uint64Dto,
    pub direction: MosaicSupplyType,
    pub delta: Uint64Dto,
}

impl DtoCodec for MosaicSupplyChangeTransaction {
    type Dto = MosaicSupplyChangeTransactionDto;

    fn to_dto(&self) -> Self::Dto {
        MosaicSupplyChangeTransactionDto {
            mosaic_id: self.mosaic_id.to_dto(),
            direction: self.direction,
            delta: self.delta.to_dto(),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            mosaic_id: MosaicId::from_dto(dto.mosaic_id, network_type)?,
            direction: dto.direction,
            delta: u64::from_dto(dto.delta),
        })
    }
}
