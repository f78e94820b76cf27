//! Multisig account modification.

use serde::{Deserialize, Serialize};

use super::builder::{Transaction, TransactionBody};
use super::types::MultisigModificationType;
use crate::codec::{
    decode_hex_array, CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError, DtoCodec,
};
use crate::model::account::PublicAccount;
use crate::model::deadline::Deadline;
use crate::model::network::NetworkType;

/// Add or remove one cosignatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultisigCosignatoryModification {
    pub kind: MultisigModificationType,
    pub cosignatory: PublicAccount,
}

impl MultisigCosignatoryModification {
    pub fn new(kind: MultisigModificationType, cosignatory: PublicAccount) -> Self {
        Self { kind, cosignatory }
    }
}

impl CatbufferCodec for MultisigCosignatoryModification {
    fn catbuffer_size(&self) -> usize {
        1 + 32
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_item(&self.kind)?;
        writer.write_bytes(self.cosignatory.public_key_bytes());
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        let kind = reader.read_item()?;
        let key = reader.read_array::<32>()?;
        Ok(Self {
            kind,
            cosignatory: PublicAccount::from_public_key(key, reader.network_type()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultisigCosignatoryModificationDto {
    #[serde(rename = "type")]
    pub kind: MultisigModificationType,
    pub cosignatory_public_key: String,
}

impl DtoCodec for MultisigCosignatoryModification {
    type Dto = MultisigCosignatoryModificationDto;

    fn to_dto(&self) -> Self::Dto {
        MultisigCosignatoryModificationDto {
            kind: self.kind,
            cosignatory_public_key: self.cosignatory.public_key_hex(),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        let key = decode_hex_array("cosignatoryPublicKey", &dto.cosignatory_public_key)?;
        Ok(Self {
            kind: dto.kind,
            cosignatory: PublicAccount::from_public_key(key, network_type),
        })
    }
}

/// Body layout:
///
/// ```text
/// min removal delta i8 ‖ min approval delta i8 ‖ count u8 ‖ (type u8 ‖ public key 32)*
/// ```
///
/// The deltas are relative: `-1` lowers the threshold by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyMultisigAccountTransaction {
    pub min_removal_delta: i8,
    pub min_approval_delta: i8,
    pub modifications: Vec<MultisigCosignatoryModification>,
}

impl ModifyMultisigAccountTransaction {
    pub fn create(
        deadline: Deadline,
        min_approval_delta: i8,
        min_removal_delta: i8,
        modifications: Vec<MultisigCosignatoryModification>,
        network_type: NetworkType,
    ) -> Transaction {
        Transaction::new(
            network_type,
            deadline,
            TransactionBody::ModifyMultisigAccount(Self {
                min_removal_delta,
                min_approval_delta,
                modifications,
            }),
        )
    }
}

impl CatbufferCodec for ModifyMultisigAccountTransaction {
    fn catbuffer_size(&self) -> usize {
        1 + 1 + 1 + 33 * self.modifications.len()
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write(self.min_removal_delta);
        writer.write(self.min_approval_delta);
        writer.write_len::<u8>(self.modifications.len())?;
        for modification in &self.modifications {
            writer.write_item(modification)?;
        }
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        let min_removal_delta = reader.read()?;
        let min_approval_delta = reader.read()?;
        let count: u8 = reader.read()?;
        Ok(Self {
            min_removal_delta,
            min_approval_delta,
            modifications: reader.read_items(count.into())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyMultisigAccountTransactionDto {
    pub min_removal_delta: i8,
    pub min_approval_delta: i8,
    pub modifications: Vec<MultisigCosignatoryModificationDto>,
}

impl DtoCodec for ModifyMultisigAccountTransaction {
    type Dto = ModifyMultisigAccountTransactionDto;

    fn to_dto(&self) -> Self::Dto {
        ModifyMultisigAccountTransactionDto {
            min_removal_delta: self.min_removal_delta,
            min_approval_delta: self.min_approval_delta,
            modifications: self.modifications.iter().map(DtoCodec::to_dto).collect(),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            min_removal_delta: dto.min_removal_delta,
            min_approval_delta: dto.min_approval_delta,
            modifications: dto
                .modifications
                .into_iter()
                .map(|m| MultisigCosignatoryModification::from_dto(m, network_type))
                .collect::<Result<_, _>>()?,
        })
    }
}
