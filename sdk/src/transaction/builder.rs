//! The transaction value and its catbuffer encoding.
//!
//! A [`Transaction`] is an immutable value: the shared header attributes
//! (network, version, deadline, max fee, optional signature, signer and
//! chain info) plus a [`TransactionBody`] naming the kind. Changes go
//! through the consuming `with_*` methods, which hand back a modified copy.
//!
//! Signing lives in [`super::signing`]; this module only knows how to turn
//! a transaction into bytes and back.
//!
//! # Header Layout
//!
//! ```text
//! offset  size  field
//!      0     4  size (whole entity)
//!      4    64  signature
//!     68    32  signer public key
//!    100     4  version word: network << 24 | version
//!    104     2  type
//!    106     8  max fee
//!    114     8  deadline
//!    122        body
//! ```

use super::account_link::AccountLinkTransaction;
use super::account_property::AccountPropertiesTransaction;
use super::aggregate::{AggregateTransaction, EmbeddedTransaction};
use super::fee::{calculate_fee, FeeCalculationStrategy};
use super::info::TransactionInfo;
use super::lock::{LockFundsTransaction, SecretLockTransaction, SecretProofTransaction};
use super::metadata::ModifyMetadataTransaction;
use super::mosaic::{MosaicDefinitionTransaction, MosaicSupplyChangeTransaction};
use super::multisig::ModifyMultisigAccountTransaction;
use super::namespace::{AddressAliasTransaction, MosaicAliasTransaction, RegisterNamespaceTransaction};
use super::transfer::TransferTransaction;
use super::types::{pack_version, unpack_version, TransactionType};
use super::TransactionError;
use crate::codec::{CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError};
use crate::config::{TRANSACTION_HEADER_SIZE, VERSION_OFFSET};
use crate::crypto::Signature;
use crate::model::account::{Address, PublicAccount};
use crate::model::deadline::Deadline;
use crate::model::mosaic::MosaicId;
use crate::model::namespace::NamespaceId;
use crate::model::network::NetworkType;

// ---------------------------------------------------------------------------
// TransactionBody
// ---------------------------------------------------------------------------

/// The kind-specific part of a transaction, one variant per
/// [`TransactionType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionBody {
    Transfer(TransferTransaction),
    RegisterNamespace(RegisterNamespaceTransaction),
    AddressAlias(AddressAliasTransaction),
    MosaicAlias(MosaicAliasTransaction),
    MosaicDefinition(MosaicDefinitionTransaction),
    MosaicSupplyChange(MosaicSupplyChangeTransaction),
    ModifyMultisigAccount(ModifyMultisigAccountTransaction),
    AggregateComplete(AggregateTransaction),
    AggregateBonded(AggregateTransaction),
    LockFunds(LockFundsTransaction),
    SecretLock(SecretLockTransaction),
    SecretProof(SecretProofTransaction),
    AccountPropertiesAddress(AccountPropertiesTransaction<Address>),
    AccountPropertiesMosaic(AccountPropertiesTransaction<MosaicId>),
    AccountPropertiesEntityType(AccountPropertiesTransaction<TransactionType>),
    LinkAccount(AccountLinkTransaction),
    ModifyAddressMetadata(ModifyMetadataTransaction<Address>),
    ModifyMosaicMetadata(ModifyMetadataTransaction<MosaicId>),
    ModifyNamespaceMetadata(ModifyMetadataTransaction<NamespaceId>),
}

/// Apply `$f` to whichever body is inside. Aggregates have inherent
/// methods of the same names, so one expression covers every variant.
macro_rules! with_body {
    ($body:expr, $inner:ident => $f:expr) => {
        match $body {
            TransactionBody::Transfer($inner) => $f,
            TransactionBody::RegisterNamespace($inner) => $f,
            TransactionBody::AddressAlias($inner) => $f,
            TransactionBody::MosaicAlias($inner) => $f,
            TransactionBody::MosaicDefinition($inner) => $f,
            TransactionBody::MosaicSupplyChange($inner) => $f,
            TransactionBody::ModifyMultisigAccount($inner) => $f,
            TransactionBody::AggregateComplete($inner) => $f,
            TransactionBody::AggregateBonded($inner) => $f,
            TransactionBody::LockFunds($inner) => $f,
            TransactionBody::SecretLock($inner) => $f,
            TransactionBody::SecretProof($inner) => $f,
            TransactionBody::AccountPropertiesAddress($inner) => $f,
            TransactionBody::AccountPropertiesMosaic($inner) => $f,
            TransactionBody::AccountPropertiesEntityType($inner) => $f,
            TransactionBody::LinkAccount($inner) => $f,
            TransactionBody::ModifyAddressMetadata($inner) => $f,
            TransactionBody::ModifyMosaicMetadata($inner) => $f,
            TransactionBody::ModifyNamespaceMetadata($inner) => $f,
        }
    };
}

impl TransactionBody {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionBody::Transfer(_) => TransactionType::Transfer,
            TransactionBody::RegisterNamespace(_) => TransactionType::RegisterNamespace,
            TransactionBody::AddressAlias(_) => TransactionType::AddressAlias,
            TransactionBody::MosaicAlias(_) => TransactionType::MosaicAlias,
            TransactionBody::MosaicDefinition(_) => TransactionType::MosaicDefinition,
            TransactionBody::MosaicSupplyChange(_) => TransactionType::MosaicSupplyChange,
            TransactionBody::ModifyMultisigAccount(_) => TransactionType::ModifyMultisigAccount,
            TransactionBody::AggregateComplete(_) => TransactionType::AggregateComplete,
            TransactionBody::AggregateBonded(_) => TransactionType::AggregateBonded,
            TransactionBody::LockFunds(_) => TransactionType::LockFunds,
            TransactionBody::SecretLock(_) => TransactionType::SecretLock,
            TransactionBody::SecretProof(_) => TransactionType::SecretProof,
            TransactionBody::AccountPropertiesAddress(_) => TransactionType::AccountPropertiesAddress,
            TransactionBody::AccountPropertiesMosaic(_) => TransactionType::AccountPropertiesMosaic,
            TransactionBody::AccountPropertiesEntityType(_) => {
                TransactionType::AccountPropertiesEntityType
            }
            TransactionBody::LinkAccount(_) => TransactionType::LinkAccount,
            TransactionBody::ModifyAddressMetadata(_) => TransactionType::ModifyAddressMetadata,
            TransactionBody::ModifyMosaicMetadata(_) => TransactionType::ModifyMosaicMetadata,
            TransactionBody::ModifyNamespaceMetadata(_) => TransactionType::ModifyNamespaceMetadata,
        }
    }

    pub fn catbuffer_size(&self) -> usize {
        with_body!(self, body => body.catbuffer_size())
    }

    pub fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        with_body!(self, body => body.write_catbuffer(writer))
    }

    /// Decode the body of a `transaction_type` transaction, consuming
    /// `reader` up to where the body ends.
    pub fn read_catbuffer(
        transaction_type: TransactionType,
        reader: &mut CatbufferReader<'_>,
    ) -> Result<Self, TransactionError> {
        Ok(match transaction_type {
            TransactionType::Transfer => TransactionBody::Transfer(reader.read_item()?),
            TransactionType::RegisterNamespace => {
                TransactionBody::RegisterNamespace(reader.read_item()?)
            }
            TransactionType::AddressAlias => TransactionBody::AddressAlias(reader.read_item()?),
            TransactionType::MosaicAlias => TransactionBody::MosaicAlias(reader.read_item()?),
            TransactionType::MosaicDefinition => {
                TransactionBody::MosaicDefinition(reader.read_item()?)
            }
            TransactionType::MosaicSupplyChange => {
                TransactionBody::MosaicSupplyChange(reader.read_item()?)
            }
            TransactionType::ModifyMultisigAccount => {
                TransactionBody::ModifyMultisigAccount(reader.read_item()?)
            }
            TransactionType::AggregateComplete => {
                TransactionBody::AggregateComplete(AggregateTransaction::read_catbuffer(reader)?)
            }
            TransactionType::AggregateBonded => {
                TransactionBody::AggregateBonded(AggregateTransaction::read_catbuffer(reader)?)
            }
            TransactionType::LockFunds => TransactionBody::LockFunds(reader.read_item()?),
            TransactionType::SecretLock => TransactionBody::SecretLock(reader.read_item()?),
            TransactionType::SecretProof => TransactionBody::SecretProof(reader.read_item()?),
            TransactionType::AccountPropertiesAddress => {
                TransactionBody::AccountPropertiesAddress(reader.read_item()?)
            }
            TransactionType::AccountPropertiesMosaic => {
                TransactionBody::AccountPropertiesMosaic(reader.read_item()?)
            }
            TransactionType::AccountPropertiesEntityType => {
                TransactionBody::AccountPropertiesEntityType(reader.read_item()?)
            }
            TransactionType::LinkAccount => TransactionBody::LinkAccount(reader.read_item()?),
            TransactionType::ModifyAddressMetadata => {
                TransactionBody::ModifyAddressMetadata(reader.read_item()?)
            }
            TransactionType::ModifyMosaicMetadata => {
                TransactionBody::ModifyMosaicMetadata(reader.read_item()?)
            }
            TransactionType::ModifyNamespaceMetadata => {
                TransactionBody::ModifyNamespaceMetadata(reader.read_item()?)
            }
        })
    }

    /// The aggregate inside, for either aggregate kind.
    pub fn as_aggregate(&self) -> Option<&AggregateTransaction> {
        match self {
            TransactionBody::AggregateComplete(aggregate)
            | TransactionBody::AggregateBonded(aggregate) => Some(aggregate),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A transaction at any point of its life: freshly created (no signature,
/// no signer), decoded from a signed payload, or reported by a node with
/// [`TransactionInfo`] attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    network_type: NetworkType,
    version: u32,
    deadline: Deadline,
    max_fee: u64,
    signature: Option<Signature>,
    signer: Option<PublicAccount>,
    transaction_info: Option<TransactionInfo>,
    body: TransactionBody,
}

impl Transaction {
    /// An unsigned transaction at the kind's current version with no max fee.
    pub fn new(network_type: NetworkType, deadline: Deadline, body: TransactionBody) -> Self {
        Self {
            network_type,
            version: body.transaction_type().version(),
            deadline,
            max_fee: 0,
            signature: None,
            signer: None,
            transaction_info: None,
            body,
        }
    }

    pub fn network_type(&self) -> NetworkType {
        self.network_type
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    pub fn max_fee(&self) -> u64 {
        self.max_fee
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn signer(&self) -> Option<&PublicAccount> {
        self.signer.as_ref()
    }

    pub fn transaction_info(&self) -> Option<&TransactionInfo> {
        self.transaction_info.as_ref()
    }

    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn into_body(self) -> TransactionBody {
        self.body
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.body.transaction_type()
    }

    pub fn with_max_fee(mut self, max_fee: u64) -> Self {
        self.max_fee = max_fee;
        self
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_signature(mut self, signature: Option<Signature>) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_signer(mut self, signer: Option<PublicAccount>) -> Self {
        self.signer = signer;
        self
    }

    pub fn with_transaction_info(mut self, info: Option<TransactionInfo>) -> Self {
        self.transaction_info = info;
        self
    }

    pub fn with_body(mut self, body: TransactionBody) -> Self {
        self.body = body;
        self
    }

    // -- lifecycle ----------------------------------------------------------

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Included in a block.
    pub fn is_confirmed(&self) -> bool {
        self.transaction_info
            .as_ref()
            .is_some_and(TransactionInfo::is_confirmed)
    }

    /// Known to a node but not yet in a block.
    pub fn is_unconfirmed(&self) -> bool {
        self.transaction_info
            .as_ref()
            .is_some_and(TransactionInfo::is_unconfirmed)
    }

    /// An announced aggregate bonded still waiting for cosignatures. The
    /// node signals this by reporting a merkle component hash that differs
    /// from the transaction hash.
    pub fn has_missing_signatures(&self) -> bool {
        if self.transaction_type() != TransactionType::AggregateBonded {
            return false;
        }
        self.transaction_info.as_ref().is_some_and(|info| {
            info.is_unconfirmed() && info.hash != info.merkle_component_hash
        })
    }

    /// True when `account` is the initiator or, for aggregates, a cosigner.
    pub fn signed_by_account(&self, account: &PublicAccount) -> bool {
        let initiator = self
            .signer
            .as_ref()
            .is_some_and(|s| s.public_key_bytes() == account.public_key_bytes());
        initiator
            || self
                .body
                .as_aggregate()
                .is_some_and(|aggregate| aggregate.is_cosigned_by(account))
    }

    /// Embed this transaction into an aggregate on behalf of `signer`.
    pub fn to_aggregate(&self, signer: PublicAccount) -> Result<EmbeddedTransaction, TransactionError> {
        let mut embedded = EmbeddedTransaction::new(signer, self.network_type, self.body.clone())?;
        embedded.version = self.version;
        Ok(embedded)
    }

    // -- catbuffer ----------------------------------------------------------

    /// Size of the standalone header, always 122.
    pub fn catbuffer_size_shared() -> usize {
        TRANSACTION_HEADER_SIZE
    }

    pub fn catbuffer_size(&self) -> usize {
        TRANSACTION_HEADER_SIZE + self.body.catbuffer_size()
    }

    /// Serialize for `network_type`, finalizing the max fee under
    /// `fee_strategy`.
    ///
    /// The body is written first so the full size is known before the
    /// header's fee field. An unsigned transaction gets zeroed signature
    /// and signer fields.
    pub fn to_catbuffer(
        &self,
        network_type: NetworkType,
        fee_strategy: FeeCalculationStrategy,
    ) -> Result<Vec<u8>, TransactionError> {
        if network_type != self.network_type {
            return Err(TransactionError::NetworkMismatch {
                expected: self.network_type,
                actual: network_type,
            });
        }

        let mut body = CatbufferWriter::with_capacity(self.body.catbuffer_size());
        self.body.write_catbuffer(&mut body)?;
        let size = TRANSACTION_HEADER_SIZE + body.len();
        let max_fee = calculate_fee(fee_strategy, self.max_fee, size)?;

        let mut writer = CatbufferWriter::with_capacity(size);
        writer.write_len::<u32>(size)?;
        match &self.signature {
            Some(signature) => writer.write_bytes(signature.as_bytes()),
            None => writer.write_bytes(&[0u8; 64]),
        }
        match &self.signer {
            Some(signer) => writer.write_bytes(signer.public_key_bytes()),
            None => writer.write_bytes(&[0u8; 32]),
        }
        writer.write(pack_version(network_type, self.version)?);
        writer.write(self.transaction_type().code());
        writer.write(max_fee);
        writer.write_item(&self.deadline)?;
        writer.write_bytes(body.as_slice());
        Ok(writer.into_vec())
    }

    /// Decode a standalone transaction.
    ///
    /// The network comes from the version word. When `network_type` is
    /// given, a payload for any other network is rejected. All-zero
    /// signature and signer fields decode as absent.
    pub fn from_catbuffer(
        data: &[u8],
        network_type: Option<NetworkType>,
    ) -> Result<Self, TransactionError> {
        if data.len() < TRANSACTION_HEADER_SIZE {
            return Err(CodecError::Truncated {
                needed: TRANSACTION_HEADER_SIZE,
                available: data.len(),
            }
            .into());
        }
        let mut word = [0u8; 4];
        word.copy_from_slice(&data[VERSION_OFFSET..VERSION_OFFSET + 4]);
        let (network_code, version) = unpack_version(u32::from_le_bytes(word));
        let actual = NetworkType::from_code(network_code)?;
        if let Some(expected) = network_type {
            if expected != actual {
                return Err(TransactionError::NetworkMismatch { expected, actual });
            }
        }

        let mut reader = CatbufferReader::new(data, actual);
        let size: u32 = reader.read()?;
        let size = size as usize;
        if size > data.len() {
            return Err(CodecError::Truncated {
                needed: size,
                available: data.len(),
            }
            .into());
        }
        if size < data.len() {
            return Err(CodecError::TrailingBytes(data.len() - size).into());
        }

        let signature = reader.read_array::<64>()?;
        let signer = reader.read_array::<32>()?;
        let _word: u32 = reader.read()?;
        let code: u16 = reader.read()?;
        let transaction_type =
            TransactionType::from_code(code).ok_or(TransactionError::UnknownType(code))?;
        let max_fee = reader.read()?;
        let deadline = reader.read_item()?;
        let body = TransactionBody::read_catbuffer(transaction_type, &mut reader)?;
        reader.finish()?;

        tracing::trace!(
            transaction_type = %transaction_type,
            network = %actual,
            size,
            "decoded transaction"
        );

        Ok(Self {
            network_type: actual,
            version,
            deadline,
            max_fee,
            signature: (signature != [0u8; 64]).then(|| Signature::from_array(signature)),
            signer: (signer != [0u8; 32]).then(|| PublicAccount::from_public_key(signer, actual)),
            transaction_info: None,
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
