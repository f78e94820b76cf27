//! Namespace registration and aliases.

use serde::{Deserialize, Serialize};

use super::builder::{Transaction, TransactionBody};
use super::types::{AliasAction, NamespaceType};
use crate::codec::{
    CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError, DtoCodec, StdInt, Uint64Dto,
};
use crate::model::account::Address;
use crate::model::deadline::Deadline;
use crate::model::identifier::{generate_sub_namespace_id, validate_namespace_name};
use crate::model::mosaic::MosaicId;
use crate::model::namespace::NamespaceId;
use crate::model::network::NetworkType;
use crate::model::ModelError;

/// Whether a registration creates a root (rented for a number of blocks) or
/// a child of an existing namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceRegistration {
    Root { duration: u64 },
    Sub { parent_id: NamespaceId },
}

/// Body layout:
///
/// ```text
/// type u8 ‖ duration-or-parent u64 ‖ id u64 ‖ name size u8 ‖ name
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterNamespaceTransaction {
    pub registration: NamespaceRegistration,
    pub namespace_id: NamespaceId,
    pub name: String,
}

impl RegisterNamespaceTransaction {
    pub fn create_root(
        deadline: Deadline,
        name: &str,
        duration: u64,
        network_type: NetworkType,
    ) -> Result<Transaction, ModelError> {
        let body = Self {
            registration: NamespaceRegistration::Root { duration },
            namespace_id: generate_sub_namespace_id(NamespaceId(0), name)?,
            name: name.to_string(),
        };
        Ok(Transaction::new(
            network_type,
            deadline,
            TransactionBody::RegisterNamespace(body),
        ))
    }

    pub fn create_sub(
        deadline: Deadline,
        name: &str,
        parent_id: NamespaceId,
        network_type: NetworkType,
    ) -> Result<Transaction, ModelError> {
        let body = Self {
            registration: NamespaceRegistration::Sub { parent_id },
            namespace_id: generate_sub_namespace_id(parent_id, name)?,
            name: name.to_string(),
        };
        Ok(Transaction::new(
            network_type,
            deadline,
            TransactionBody::RegisterNamespace(body),
        ))
    }

    pub fn namespace_type(&self) -> NamespaceType {
        match self.registration {
            NamespaceRegistration::Root { .. } => NamespaceType::Root,
            NamespaceRegistration::Sub { .. } => NamespaceType::Sub,
        }
    }
}

impl CatbufferCodec for RegisterNamespaceTransaction {
    fn catbuffer_size(&self) -> usize {
        1 + 8 + 8 + 1 + self.name.len()
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_item(&self.namespace_type())?;
        match self.registration {
            NamespaceRegistration::Root { duration } => writer.write(duration),
            NamespaceRegistration::Sub { parent_id } => writer.write_item(&parent_id)?,
        }
        writer.write_item(&self.namespace_id)?;
        writer.write_len::<u8>(self.name.len())?;
        writer.write_bytes(self.name.as_bytes());
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        let namespace_type: NamespaceType = reader.read_item()?;
        let duration_or_parent: u64 = reader.read()?;
        let namespace_id = reader.read_item()?;
        let name_size: u8 = reader.read()?;
        let name = decode_name(reader.take(name_size.into())?)?;
        Ok(Self {
            registration: registration(namespace_type, duration_or_parent),
            namespace_id,
            name,
        })
    }
}

fn registration(namespace_type: NamespaceType, duration_or_parent: u64) -> NamespaceRegistration {
    match namespace_type {
        NamespaceType::Root => NamespaceRegistration::Root {
            duration: duration_or_parent,
        },
        NamespaceType::Sub => NamespaceRegistration::Sub {
            parent_id: NamespaceId(duration_or_parent),
        },
    }
}

fn decode_name(bytes: &[u8]) -> Result<String, CodecError> {
    let name = std::str::from_utf8(bytes).map_err(|e| CodecError::InvalidField {
        field: "namespace name",
        reason: e.to_string(),
    })?;
    validate_namespace_name(name).map_err(|e| CodecError::InvalidField {
        field: "namespace name",
        reason: e.to_string(),
    })?;
    Ok(name.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterNamespaceTransactionDto {
    pub namespace_type: NamespaceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Uint64Dto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uint64Dto>,
    pub namespace_id: Uint64Dto,
    pub name: String,
}

impl DtoCodec for RegisterNamespaceTransaction {
    type Dto = RegisterNamespaceTransactionDto;

    fn to_dto(&self) -> Self::Dto {
        let (duration, parent_id) = match self.registration {
            NamespaceRegistration::Root { duration } => (Some(duration.to_dto()), None),
            NamespaceRegistration::Sub { parent_id } => (None, Some(parent_id.to_dto())),
        };
        RegisterNamespaceTransactionDto {
            namespace_type: self.namespace_type(),
            duration,
            parent_id,
            namespace_id: self.namespace_id.to_dto(),
            name: self.name.clone(),
        }
    }

    fn from_dto(dto: Self::Dto, _network_type: NetworkType) -> Result<Self, CodecError> {
        let missing = |field: &str| {
            CodecError::MalformedDto(format!("namespace registration lacks {field}"))
        };
        let duration_or_parent = match dto.namespace_type {
            NamespaceType::Root => dto.duration.ok_or_else(|| missing("duration"))?,
            NamespaceType::Sub => dto.parent_id.ok_or_else(|| missing("parentId"))?,
        };
        Ok(Self {
            registration: registration(dto.namespace_type, u64::from_dto(duration_or_parent)),
            namespace_id: NamespaceId(u64::from_dto(dto.namespace_id)),
            name: decode_name(dto.name.as_bytes())?,
        })
    }
}

// ---------------------------------------------------------------------------
// Aliases
// ---------------------------------------------------------------------------

/// Link or unlink a namespace to an address: `action u8 ‖ namespace u64 ‖ address 25`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressAliasTransaction {
    pub action: AliasAction,
    pub namespace_id: NamespaceId,
    pub address: Address,
}

impl AddressAliasTransaction {
    pub fn create(
        deadline: Deadline,
        action: AliasAction,
        namespace_id: NamespaceId,
        address: Address,
        network_type: NetworkType,
    ) -> Transaction {
        Transaction::new(
            network_type,
            deadline,
            TransactionBody::AddressAlias(Self {
                action,
                namespace_id,
                address,
            }),
        )
    }
}

impl CatbufferCodec for AddressAliasTransaction {
    fn catbuffer_size(&self) -> usize {
        1 + 8 + 25
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_item(&self.action)?;
        writer.write_item(&self.namespace_id)?;
        writer.write_item(&self.address)
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            action: reader.read_item()?,
            namespace_id: reader.read_item()?,
            address: reader.read_item()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressAliasTransactionDto {
    pub alias_action: AliasAction,
    pub namespace_id: Uint64Dto,
    pub address: String,
}

impl DtoCodec for AddressAliasTransaction {
    type Dto = AddressAliasTransactionDto;

    fn to_dto(&self) -> Self::Dto {
        AddressAliasTransactionDto {
            alias_action: self.action,
            namespace_id: self.namespace_id.to_dto(),
            address: self.address.to_dto(),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            action: dto.alias_action,
            namespace_id: NamespaceId::from_dto(dto.namespace_id, network_type)?,
            address: Address::from_dto(dto.address, network_type)?,
        })
    }
}

/// Link or unlink a namespace to a mosaic: `action u8 ‖ namespace u64 ‖ mosaic u64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicAliasTransaction {
    pub action: AliasAction,
    pub namespace_id: NamespaceId,
    pub mosaic_id: MosaicId,
}

impl MosaicAliasTransaction {
    pub fn create(
        deadline: Deadline,
        action: AliasAction,
        namespace_id: NamespaceId,
        mosaic_id: MosaicId,
        network_type: NetworkType,
    ) -> Transaction {
        Transaction::new(
            network_type,
            deadline,
            TransactionBody::MosaicAlias(Self {
                action,
                namespace_id,
                mosaic_id,
            }),
        )
    }
}

impl CatbufferCodec for MosaicAliasTransaction {
    fn catbuffer_size(&self) -> usize {
        1 + 8 + 8
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_item(&self.action)?;
        writer.write_item(&self.namespace_id)?;
        writer.write_item(&self.mosaic_id)
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            action: reader.read_item()?,
            namespace_id: reader.read_item()?,
            mosaic_id: reader.read_item()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MosaicAliasTransactionDto {
    pub alias_action: AliasAction,
    pub namespace_id: Uint64Dto,
    pub mosaic_id: Uint64Dto,
}

impl DtoCodec for MosaicAliasTransaction {
    type Dto = MosaicAliasTransactionDto;

    fn to_dto(&self) -> Self::Dto {
        MosaicAliasTransactionDto {
            alias_action: self.action,
            namespace_id: self.namespace_id.to_dto(),
            mosaic_id: self.mosaic_id.to_dto(),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            action: dto.alias_action,
            namespace_id: NamespaceId::from_dto(dto.namespace_id, network_type)?,
            mosaic_id: MosaicId::from_dto(dto.mosaic_id, network_type)?,
        })
    }
}
