//! Core type definitions for transactions.
//!
//! [`TransactionType`] is the closed registry of every kind the codec knows:
//! its 16-bit wire code, its current version and its display name. The
//! small one-byte enums used inside transaction bodies are generated by
//! [`code_enum!`] so they all encode, decode and serialize the same way.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::codec::{
    CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError, DtoCodec, HalfWidth, StdInt,
};
use crate::crypto::hash::{double_sha256, hash160, keccak_256, sha3_256};
use crate::model::network::NetworkType;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Every transaction kind, keyed by its wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransactionType {
    Transfer,
    RegisterNamespace,
    AddressAlias,
    MosaicAlias,
    MosaicDefinition,
    MosaicSupplyChange,
    ModifyMultisigAccount,
    AggregateComplete,
    AggregateBonded,
    LockFunds,
    SecretLock,
    SecretProof,
    AccountPropertiesAddress,
    AccountPropertiesMosaic,
    AccountPropertiesEntityType,
    LinkAccount,
    ModifyAddressMetadata,
    ModifyMosaicMetadata,
    ModifyNamespaceMetadata,
}

impl TransactionType {
    pub const ALL: [TransactionType; 19] = [
        TransactionType::Transfer,
        TransactionType::RegisterNamespace,
        TransactionType::AddressAlias,
        TransactionType::MosaicAlias,
        TransactionType::MosaicDefinition,
        TransactionType::MosaicSupplyChange,
        TransactionType::ModifyMultisigAccount,
        TransactionType::AggregateComplete,
        TransactionType::AggregateBonded,
        TransactionType::LockFunds,
        TransactionType::SecretLock,
        TransactionType::SecretProof,
        TransactionType::AccountPropertiesAddress,
        TransactionType::AccountPropertiesMosaic,
        TransactionType::AccountPropertiesEntityType,
        TransactionType::LinkAccount,
        TransactionType::ModifyAddressMetadata,
        TransactionType::ModifyMosaicMetadata,
        TransactionType::ModifyNamespaceMetadata,
    ];

    pub fn code(self) -> u16 {
        match self {
            TransactionType::Transfer => 0x4154,
            TransactionType::RegisterNamespace => 0x414E,
            TransactionType::AddressAlias => 0x424E,
            TransactionType::MosaicAlias => 0x434E,
            TransactionType::MosaicDefinition => 0x414D,
            TransactionType::MosaicSupplyChange => 0x424D,
            TransactionType::ModifyMultisigAccount => 0x4155,
            TransactionType::AggregateComplete => 0x4141,
            TransactionType::AggregateBonded => 0x4241,
            TransactionType::LockFunds => 0x4148,
            TransactionType::SecretLock => 0x4152,
            TransactionType::SecretProof => 0x4252,
            TransactionType::AccountPropertiesAddress => 0x4150,
            TransactionType::AccountPropertiesMosaic => 0x4250,
            TransactionType::AccountPropertiesEntityType => 0x4350,
            TransactionType::LinkAccount => 0x414C,
            TransactionType::ModifyAddressMetadata => 0x413D,
            TransactionType::ModifyMosaicMetadata => 0x423D,
            TransactionType::ModifyNamespaceMetadata => 0x433D,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// The version this crate writes for new transactions of this kind.
    pub fn version(self) -> u32 {
        match self {
            TransactionType::Transfer
            | TransactionType::MosaicDefinition
            | TransactionType::ModifyMultisigAccount => 3,
            TransactionType::RegisterNamespace
            | TransactionType::MosaicSupplyChange
            | TransactionType::AggregateComplete
            | TransactionType::AggregateBonded
            | TransactionType::LinkAccount => 2,
            _ => 1,
        }
    }

    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            TransactionType::AggregateComplete | TransactionType::AggregateBonded
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            TransactionType::Transfer => "transfer",
            TransactionType::RegisterNamespace => "register_namespace",
            TransactionType::AddressAlias => "address_alias",
            TransactionType::MosaicAlias => "mosaic_alias",
            TransactionType::MosaicDefinition => "mosaic_definition",
            TransactionType::MosaicSupplyChange => "mosaic_supply_change",
            TransactionType::ModifyMultisigAccount => "modify_multisig_account",
            TransactionType::AggregateComplete => "aggregate_complete",
            TransactionType::AggregateBonded => "aggregate_bonded",
            TransactionType::LockFunds => "lock_funds",
            TransactionType::SecretLock => "secret_lock",
            TransactionType::SecretProof => "secret_proof",
            TransactionType::AccountPropertiesAddress => "account_properties_address",
            TransactionType::AccountPropertiesMosaic => "account_properties_mosaic",
            TransactionType::AccountPropertiesEntityType => "account_properties_entity_type",
            TransactionType::LinkAccount => "link_account",
            TransactionType::ModifyAddressMetadata => "modify_address_metadata",
            TransactionType::ModifyMosaicMetadata => "modify_mosaic_metadata",
            TransactionType::ModifyNamespaceMetadata => "modify_namespace_metadata",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#06x})", self.name(), self.code())
    }
}

fn unknown_type(code: u16) -> CodecError {
    CodecError::UnknownCode {
        kind: "transaction type",
        code: code.into(),
    }
}

/// As an account-property value ("entity type"), a transaction type is its
/// 2-byte code.
impl CatbufferCodec for TransactionType {
    fn catbuffer_size(&self) -> usize {
        u16::BYTES
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write(self.code());
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        let code: u16 = reader.read()?;
        Self::from_code(code).ok_or_else(|| unknown_type(code))
    }
}

impl DtoCodec for TransactionType {
    type Dto = u16;

    fn to_dto(&self) -> Self::Dto {
        self.code()
    }

    fn from_dto(dto: Self::Dto, _network_type: NetworkType) -> Result<Self, CodecError> {
        Self::from_code(dto).ok_or_else(|| unknown_type(dto))
    }
}

// ---------------------------------------------------------------------------
// Version word
// ---------------------------------------------------------------------------

/// Largest version that fits under the network byte.
pub const MAX_VERSION: u32 = 0x00FF_FFFF;

/// Pack `(network << 24) | version`.
pub fn pack_version(network_type: NetworkType, version: u32) -> Result<u32, CodecError> {
    if version > MAX_VERSION {
        return Err(CodecError::Overflow {
            value: version.to_string(),
            width: "u24",
        });
    }
    let high = u16::from_halves(0, network_type.code());
    Ok(u32::from_halves(version.low(), high) | (version & 0x00FF_0000))
}

/// Split a version word into its network code and version.
pub fn unpack_version(word: u32) -> (u8, u32) {
    (word.high().high(), word & MAX_VERSION)
}

// ---------------------------------------------------------------------------
// One-byte body enums
// ---------------------------------------------------------------------------

/// Declare a one-byte enum with catbuffer and integer-DTO encodings.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident : $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub fn code(self) -> u8 {
                match self {
                    $( $name::$variant => $code ),+
                }
            }

            pub fn from_code(code: u8) -> Result<Self, CodecError> {
                match code {
                    $( $code => Ok($name::$variant), )+
                    other => Err(CodecError::UnknownCode {
                        kind: $kind,
                        code: other.into(),
                    }),
                }
            }
        }

        impl CatbufferCodec for $name {
            fn catbuffer_size(&self) -> usize {
                1
            }

            fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
                writer.write(self.code());
                Ok(())
            }

            fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
                Self::from_code(reader.read()?)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = u8::deserialize(deserializer)?;
                Self::from_code(code).map_err(serde::de::Error::custom)
            }
        }
    };
}

code_enum! {
    /// Root namespaces are rented for a duration; children hang off a parent.
    NamespaceType: "namespace type" {
        Root = 0,
        Sub = 1,
    }
}

code_enum! {
    MosaicSupplyType: "mosaic supply direction" {
        Decrease = 0,
        Increase = 1,
    }
}

code_enum! {
    AliasAction: "alias action" {
        Link = 0,
        Unlink = 1,
    }
}

code_enum! {
    MultisigModificationType: "multisig modification" {
        Add = 0,
        Remove = 1,
    }
}

code_enum! {
    PropertyModificationType: "property modification" {
        Add = 0,
        Remove = 1,
    }
}

code_enum! {
    /// Allow/block lists on an account. The high bit marks a block list.
    PropertyType: "property type" {
        AllowAddress = 0x01,
        AllowMosaic = 0x02,
        AllowTransaction = 0x04,
        Sentinel = 0x05,
        BlockAddress = 0x81,
        BlockMosaic = 0x82,
        BlockTransaction = 0x84,
    }
}

code_enum! {
    LinkAction: "link action" {
        Link = 0,
        Unlink = 1,
    }
}

code_enum! {
    MetadataType: "metadata type" {
        Address = 1,
        Mosaic = 2,
        Namespace = 3,
    }
}

code_enum! {
    MetadataModificationType: "metadata modification" {
        Add = 0,
        Remove = 1,
    }
}

code_enum! {
    /// How a secret lock's secret is derived from its proof.
    HashType: "hash type" {
        Sha3_256 = 0,
        Keccak256 = 1,
        Hash160 = 2,
        Sha256 = 3,
    }
}

impl HashType {
    /// Length of the secret this hash produces. `Hash160` secrets are padded
    /// with zeros to 32 bytes on the wire.
    pub fn secret_length(self) -> usize {
        match self {
            HashType::Hash160 => 20,
            _ => 32,
        }
    }

    /// Hash `proof` the way the chain does when checking a secret proof.
    pub fn digest(self, proof: &[u8]) -> Vec<u8> {
        match self {
            HashType::Sha3_256 => sha3_256(proof).to_vec(),
            HashType::Keccak256 => keccak_256(proof).to_vec(),
            HashType::Hash160 => hash160(proof).to_vec(),
            HashType::Sha256 => double_sha256(proof).to_vec(),
        }
    }
}
