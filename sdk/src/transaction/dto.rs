//! JSON documents for whole transactions.
//!
//! A REST transaction document nests the header and the body fields in one
//! flat `transaction` object, with chain metadata beside it:
//!
//! ```json
//! {
//!   "transaction": { "signer": "…", "version": 2415919107, "type": 16724, "maxFee": [0, 0], "deadline": [..], "recipient": "…", … },
//!   "meta": { "height": [1, 0], "index": 0, "id": "…", "hash": "…" }
//! }
//! ```
//!
//! The body shape depends on `type`, so decoding reads the header first and
//! then parses the same object again as that kind's body.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::account_link::AccountLinkTransactionDto;
use super::account_property::AccountPropertiesTransactionDto;
use super::aggregate::{AggregateCosignature, AggregateTransaction, EmbeddedTransaction};
use super::builder::{Transaction, TransactionBody};
use super::info::{TransactionInfo, TransactionInfoDto};
use super::lock::{LockFundsTransactionDto, SecretLockTransactionDto, SecretProofTransactionDto};
use super::metadata::ModifyMetadataTransactionDto;
use super::mosaic::{MosaicDefinitionTransactionDto, MosaicSupplyChangeTransactionDto};
use super::multisig::ModifyMultisigAccountTransactionDto;
use super::namespace::{
    AddressAliasTransactionDto, MosaicAliasTransactionDto, RegisterNamespaceTransactionDto,
};
use super::transfer::TransferTransactionDto;
use super::types::{pack_version, unpack_version, TransactionType};
use super::TransactionError;
use crate::codec::{CodecError, DtoCodec, StdInt, Uint64Dto};
use crate::crypto::Signature;
use crate::model::account::PublicAccount;
use crate::model::deadline::Deadline;
use crate::model::network::NetworkType;

// ---------------------------------------------------------------------------
// Document types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDto {
    pub transaction: TransactionEntryDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<TransactionInfoDto>,
}

/// Header fields. Embedded transactions carry no signature, max fee or
/// deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHeaderDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer: Option<String>,
    /// Packed `network << 24 | version`.
    pub version: u32,
    #[serde(rename = "type")]
    pub transaction_type: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee: Option<Uint64Dto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Uint64Dto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionEntryDto {
    #[serde(flatten)]
    pub header: TransactionHeaderDto,
    #[serde(flatten)]
    pub body: TransactionBodyDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCosignatureDto {
    pub signer: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateTransactionDto {
    pub transactions: Vec<TransactionDto>,
    #[serde(default)]
    pub cosignatures: Vec<AggregateCosignatureDto>,
}

/// Body fields of every kind. `Unknown` keeps the raw object of a type
/// this codec does not know so the header can still be inspected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TransactionBodyDto {
    Transfer(TransferTransactionDto),
    RegisterNamespace(RegisterNamespaceTransactionDto),
    AddressAlias(AddressAliasTransactionDto),
    MosaicAlias(MosaicAliasTransactionDto),
    MosaicDefinition(MosaicDefinitionTransactionDto),
    MosaicSupplyChange(MosaicSupplyChangeTransactionDto),
    ModifyMultisigAccount(ModifyMultisigAccountTransactionDto),
    Aggregate(AggregateTransactionDto),
    LockFunds(LockFundsTransactionDto),
    SecretLock(SecretLockTransactionDto),
    SecretProof(SecretProofTransactionDto),
    AccountPropertiesAddress(AccountPropertiesTransactionDto<String>),
    AccountPropertiesMosaic(AccountPropertiesTransactionDto<Uint64Dto>),
    AccountPropertiesEntityType(AccountPropertiesTransactionDto<u16>),
    LinkAccount(AccountLinkTransactionDto),
    ModifyAddressMetadata(ModifyMetadataTransactionDto<String>),
    ModifyMosaicMetadata(ModifyMetadataTransactionDto<Uint64Dto>),
    ModifyNamespaceMetadata(ModifyMetadataTransactionDto<Uint64Dto>),
    Unknown(Value),
}

impl TransactionBodyDto {
    /// Parse the body of a `code` transaction out of its `transaction` object.
    fn from_value(code: u16, value: Value) -> Result<Self, serde_json::Error> {
        use serde_json::from_value;
        let Some(transaction_type) = TransactionType::from_code(code) else {
            return Ok(TransactionBodyDto::Unknown(value));
        };
        Ok(match transaction_type {
            TransactionType::Transfer => TransactionBodyDto::Transfer(from_value(value)?),
            TransactionType::RegisterNamespace => {
                TransactionBodyDto::RegisterNamespace(from_value(value)?)
            }
            TransactionType::AddressAlias => TransactionBodyDto::AddressAlias(from_value(value)?),
            TransactionType::MosaicAlias => TransactionBodyDto::MosaicAlias(from_value(value)?),
            TransactionType::MosaicDefinition => {
                TransactionBodyDto::MosaicDefinition(from_value(value)?)
            }
            TransactionType::MosaicSupplyChange => {
                TransactionBodyDto::MosaicSupplyChange(from_value(value)?)
            }
            TransactionType::ModifyMultisigAccount => {
                TransactionBodyDto::ModifyMultisigAccount(from_value(value)?)
            }
            TransactionType::AggregateComplete | TransactionType::AggregateBonded => {
                TransactionBodyDto::Aggregate(from_value(value)?)
            }
            TransactionType::LockFunds => TransactionBodyDto::LockFunds(from_value(value)?),
            TransactionType::SecretLock => TransactionBodyDto::SecretLock(from_value(value)?),
            TransactionType::SecretProof => TransactionBodyDto::SecretProof(from_value(value)?),
            TransactionType::AccountPropertiesAddress => {
                TransactionBodyDto::AccountPropertiesAddress(from_value(value)?)
            }
            TransactionType::AccountPropertiesMosaic => {
                TransactionBodyDto::AccountPropertiesMosaic(from_value(value)?)
            }
            TransactionType::AccountPropertiesEntityType => {
                TransactionBodyDto::AccountPropertiesEntityType(from_value(value)?)
            }
            TransactionType::LinkAccount => TransactionBodyDto::LinkAccount(from_value(value)?),
            TransactionType::ModifyAddressMetadata => {
                TransactionBodyDto::ModifyAddressMetadata(from_value(value)?)
            }
            TransactionType::ModifyMosaicMetadata => {
                TransactionBodyDto::ModifyMosaicMetadata(from_value(value)?)
            }
            TransactionType::ModifyNamespaceMetadata => {
                TransactionBodyDto::ModifyNamespaceMetadata(from_value(value)?)
            }
        })
    }
}

impl<'de> Deserialize<'de> for TransactionEntryDto {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let header: TransactionHeaderDto =
            serde_json::from_value(value.clone()).map_err(de::Error::custom)?;
        let body = TransactionBodyDto::from_value(header.transaction_type, value)
            .map_err(de::Error::custom)?;
        Ok(Self { header, body })
    }
}

// ---------------------------------------------------------------------------
// Body conversion
// ---------------------------------------------------------------------------

fn body_to_dto(body: &TransactionBody) -> Result<TransactionBodyDto, TransactionError> {
    Ok(match body {
        TransactionBody::Transfer(b) => TransactionBodyDto::Transfer(b.to_dto()),
        TransactionBody::RegisterNamespace(b) => TransactionBodyDto::RegisterNamespace(b.to_dto()),
        TransactionBody::AddressAlias(b) => TransactionBodyDto::AddressAlias(b.to_dto()),
        TransactionBody::MosaicAlias(b) => TransactionBodyDto::MosaicAlias(b.to_dto()),
        TransactionBody::MosaicDefinition(b) => TransactionBodyDto::MosaicDefinition(b.to_dto()),
        TransactionBody::MosaicSupplyChange(b) => {
            TransactionBodyDto::MosaicSupplyChange(b.to_dto())
        }
        TransactionBody::ModifyMultisigAccount(b) => {
            TransactionBodyDto::ModifyMultisigAccount(b.to_dto())
        }
        TransactionBody::AggregateComplete(b) | TransactionBody::AggregateBonded(b) => {
            TransactionBodyDto::Aggregate(aggregate_to_dto(b)?)
        }
        TransactionBody::LockFunds(b) => TransactionBodyDto::LockFunds(b.to_dto()),
        TransactionBody::SecretLock(b) => TransactionBodyDto::SecretLock(b.to_dto()),
        TransactionBody::SecretProof(b) => TransactionBodyDto::SecretProof(b.to_dto()),
        TransactionBody::AccountPropertiesAddress(b) => {
            TransactionBodyDto::AccountPropertiesAddress(b.to_dto())
        }
        TransactionBody::AccountPropertiesMosaic(b) => {
            TransactionBodyDto::AccountPropertiesMosaic(b.to_dto())
        }
        TransactionBody::AccountPropertiesEntityType(b) => {
            TransactionBodyDto::AccountPropertiesEntityType(b.to_dto())
        }
        TransactionBody::LinkAccount(b) => TransactionBodyDto::LinkAccount(b.to_dto()),
        TransactionBody::ModifyAddressMetadata(b) => {
            TransactionBodyDto::ModifyAddressMetadata(b.to_dto())
        }
        TransactionBody::ModifyMosaicMetadata(b) => {
            TransactionBodyDto::ModifyMosaicMetadata(b.to_dto())
        }
        TransactionBody::ModifyNamespaceMetadata(b) => {
            TransactionBodyDto::ModifyNamespaceMetadata(b.to_dto())
        }
    })
}

fn body_from_dto(
    transaction_type: TransactionType,
    dto: TransactionBodyDto,
    network_type: NetworkType,
) -> Result<TransactionBody, TransactionError> {
    use TransactionBodyDto as Dto;
    use TransactionType as Type;

    let n = network_type;
    Ok(match (transaction_type, dto) {
        (Type::Transfer, Dto::Transfer(d)) => TransactionBody::Transfer(DtoCodec::from_dto(d, n)?),
        (Type::RegisterNamespace, Dto::RegisterNamespace(d)) => {
            TransactionBody::RegisterNamespace(DtoCodec::from_dto(d, n)?)
        }
        (Type::AddressAlias, Dto::AddressAlias(d)) => {
            TransactionBody::AddressAlias(DtoCodec::from_dto(d, n)?)
        }
        (Type::MosaicAlias, Dto::MosaicAlias(d)) => {
            TransactionBody::MosaicAlias(DtoCodec::from_dto(d, n)?)
        }
        (Type::MosaicDefinition, Dto::MosaicDefinition(d)) => {
            TransactionBody::MosaicDefinition(DtoCodec::from_dto(d, n)?)
        }
        (Type::MosaicSupplyChange, Dto::MosaicSupplyChange(d)) => {
            TransactionBody::MosaicSupplyChange(DtoCodec::from_dto(d, n)?)
        }
        (Type::ModifyMultisigAccount, Dto::ModifyMultisigAccount(d)) => {
            TransactionBody::ModifyMultisigAccount(DtoCodec::from_dto(d, n)?)
        }
        (Type::AggregateComplete, Dto::Aggregate(d)) => {
            TransactionBody::AggregateComplete(aggregate_from_dto(d, n)?)
        }
        (Type::AggregateBonded, Dto::Aggregate(d)) => {
            TransactionBody::AggregateBonded(aggregate_from_dto(d, n)?)
        }
        (Type::LockFunds, Dto::LockFunds(d)) => TransactionBody::LockFunds(DtoCodec::from_dto(d, n)?),
        (Type::SecretLock, Dto::SecretLock(d)) => {
            TransactionBody::SecretLock(DtoCodec::from_dto(d, n)?)
        }
        (Type::SecretProof, Dto::SecretProof(d)) => {
            TransactionBody::SecretProof(DtoCodec::from_dto(d, n)?)
        }
        (Type::AccountPropertiesAddress, Dto::AccountPropertiesAddress(d)) => {
            TransactionBody::AccountPropertiesAddress(DtoCodec::from_dto(d, n)?)
        }
        (Type::AccountPropertiesMosaic, Dto::AccountPropertiesMosaic(d)) => {
            TransactionBody::AccountPropertiesMosaic(DtoCodec::from_dto(d, n)?)
        }
        (Type::AccountPropertiesEntityType, Dto::AccountPropertiesEntityType(d)) => {
            TransactionBody::AccountPropertiesEntityType(DtoCodec::from_dto(d, n)?)
        }
        (Type::LinkAccount, Dto::LinkAccount(d)) => {
            TransactionBody::LinkAccount(DtoCodec::from_dto(d, n)?)
        }
        (Type::ModifyAddressMetadata, Dto::ModifyAddressMetadata(d)) => {
            TransactionBody::ModifyAddressMetadata(DtoCodec::from_dto(d, n)?)
        }
        (Type::ModifyMosaicMetadata, Dto::ModifyMosaicMetadata(d)) => {
            TransactionBody::ModifyMosaicMetadata(DtoCodec::from_dto(d, n)?)
        }
        (Type::ModifyNamespaceMetadata, Dto::ModifyNamespaceMetadata(d)) => {
            TransactionBody::ModifyNamespaceMetadata(DtoCodec::from_dto(d, n)?)
        }
        (ty, _) => {
            return Err(CodecError::MalformedDto(format!("body does not match type {ty}")).into())
        }
    })
}

fn aggregate_to_dto(aggregate: &AggregateTransaction) -> Result<AggregateTransactionDto, TransactionError> {
    Ok(AggregateTransactionDto {
        transactions: aggregate
            .inner_transactions
            .iter()
            .map(EmbeddedTransaction::to_dto)
            .collect::<Result<_, _>>()?,
        cosignatures: aggregate
            .cosignatures
            .iter()
            .map(|c| AggregateCosignatureDto {
                signer: c.signer.public_key_hex(),
                signature: c.signature.to_hex(),
            })
            .collect(),
    })
}

fn aggregate_from_dto(
    dto: AggregateTransactionDto,
    network_type: NetworkType,
) -> Result<AggregateTransaction, TransactionError> {
    let inner_transactions = dto
        .transactions
        .into_iter()
        .map(|t| EmbeddedTransaction::from_dto(t, network_type))
        .collect::<Result<_, _>>()?;
    let cosignatures = dto
        .cosignatures
        .into_iter()
        .map(|c| {
            Ok(AggregateCosignature {
                signer: PublicAccount::from_hex(&c.signer, network_type)?,
                signature: Signature::from_hex(&c.signature)?,
            })
        })
        .collect::<Result<_, TransactionError>>()?;
    Ok(AggregateTransaction {
        inner_transactions,
        cosignatures,
    })
}

/// Network, version and type out of a header, checked against `expected`.
fn read_header(
    header: &TransactionHeaderDto,
    expected: Option<NetworkType>,
) -> Result<(NetworkType, u32, TransactionType), TransactionError> {
    let (code, version) = unpack_version(header.version);
    let network_type = NetworkType::from_code(code)?;
    if let Some(expected) = expected {
        if expected != network_type {
            return Err(TransactionError::NetworkMismatch {
                expected,
                actual: network_type,
            });
        }
    }
    let transaction_type = TransactionType::from_code(header.transaction_type)
        .ok_or(TransactionError::UnknownType(header.transaction_type))?;
    Ok((network_type, version, transaction_type))
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

impl Transaction {
    pub fn to_dto(&self) -> Result<TransactionDto, TransactionError> {
        Ok(TransactionDto {
            transaction: TransactionEntryDto {
                header: TransactionHeaderDto {
                    signature: self.signature().map(Signature::to_hex),
                    signer: self.signer().map(PublicAccount::public_key_hex),
                    version: pack_version(self.network_type(), self.version())?,
                    transaction_type: self.transaction_type().code(),
                    max_fee: Some(self.max_fee().to_dto()),
                    deadline: Some(self.deadline().to_dto()),
                },
                body: body_to_dto(self.body())?,
            },
            meta: self.transaction_info().map(TransactionInfo::to_dto),
        })
    }

    /// Build a transaction from its REST document. When `network_type` is
    /// given, a document for any other network is rejected.
    pub fn create_from_dto(
        dto: TransactionDto,
        network_type: Option<NetworkType>,
    ) -> Result<Self, TransactionError> {
        let TransactionDto { transaction, meta } = dto;
        let (network_type, version, transaction_type) = read_header(&transaction.header, network_type)?;
        let header = transaction.header;
        let deadline = header
            .deadline
            .ok_or_else(|| CodecError::MalformedDto("transaction lacks a deadline".to_string()))?;
        let body = body_from_dto(transaction_type, transaction.body, network_type)?;

        Ok(Transaction::new(network_type, Deadline::from_dto(deadline, network_type)?, body)
            .with_version(version)
            .with_max_fee(header.max_fee.map(u64::from_dto).unwrap_or_default())
            .with_signature(header.signature.as_deref().map(Signature::from_hex).transpose()?)
            .with_signer(
                header
                    .signer
                    .as_deref()
                    .map(|key| PublicAccount::from_hex(key, network_type))
                    .transpose()?,
            )
            .with_transaction_info(meta.map(TransactionInfo::from_dto).transpose()?))
    }

    pub fn to_json(&self) -> Result<String, TransactionError> {
        Ok(serde_json::to_string_pretty(&self.to_dto()?)?)
    }

    pub fn from_json(json: &str, network_type: Option<NetworkType>) -> Result<Self, TransactionError> {
        let dto: TransactionDto = serde_json::from_str(json)?;
        Self::create_from_dto(dto, network_type)
    }
}

impl EmbeddedTransaction {
    pub fn to_dto(&self) -> Result<TransactionDto, TransactionError> {
        Ok(TransactionDto {
            transaction: TransactionEntryDto {
                header: TransactionHeaderDto {
                    signature: None,
                    signer: Some(self.signer.public_key_hex()),
                    version: pack_version(self.network_type, self.version)?,
                    transaction_type: self.transaction_type().code(),
                    max_fee: None,
                    deadline: None,
                },
                body: body_to_dto(&self.body)?,
            },
            meta: None,
        })
    }

    /// Decode an inner transaction of an aggregate on `network_type`.
    pub fn from_dto(dto: TransactionDto, network_type: NetworkType) -> Result<Self, TransactionError> {
        let entry = dto.transaction;
        let (actual, version, transaction_type) = read_header(&entry.header, Some(network_type))?;
        if transaction_type.is_aggregate() {
            return Err(TransactionError::NestedAggregate);
        }
        let signer = entry
            .header
            .signer
            .as_deref()
            .ok_or_else(|| CodecError::MalformedDto("embedded transaction lacks a signer".to_string()))?;
        Ok(Self {
            signer: PublicAccount::from_hex(signer, actual)?,
            network_type: actual,
            version,
            body: body_from_dto(transaction_type, entry.body, actual)?,
        })
    }
}
