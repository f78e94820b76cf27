//! Aggregate transactions.
//!
//! An aggregate carries a list of inner transactions in *embedded* form:
//! the 42-byte shared header keeps size, signer, version and type but drops
//! signature, max fee and deadline, which the aggregate supplies once for
//! all of them.
//!
//! ```text
//! payload size u32 ‖ embedded transaction* ‖ (cosigner 32 ‖ signature 64)*
//! ```
//!
//! `payload size` counts the embedded transactions only. Cosignatures run
//! from there to the end of the payload and are excluded from the hash.

use super::builder::{Transaction, TransactionBody};
use super::types::{pack_version, unpack_version, TransactionType};
use super::TransactionError;
use crate::codec::{CatbufferReader, CatbufferWriter, CodecError};
use crate::config::{COSIGNATURE_SIZE, EMBEDDED_HEADER_SIZE};
use crate::crypto::Signature;
use crate::model::account::PublicAccount;
use crate::model::deadline::Deadline;
use crate::model::network::NetworkType;

// ---------------------------------------------------------------------------
// EmbeddedTransaction
// ---------------------------------------------------------------------------

/// An inner transaction of an aggregate.
///
/// Embedded transactions are never signed on their own; the signer named
/// here must appear among the aggregate's signer and cosigners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedTransaction {
    pub signer: PublicAccount,
    pub network_type: NetworkType,
    pub version: u32,
    pub body: TransactionBody,
}

impl EmbeddedTransaction {
    /// Embed `body` on behalf of `signer`. Aggregates cannot be nested.
    pub fn new(
        signer: PublicAccount,
        network_type: NetworkType,
        body: TransactionBody,
    ) -> Result<Self, TransactionError> {
        let transaction_type = body.transaction_type();
        if transaction_type.is_aggregate() {
            return Err(TransactionError::NestedAggregate);
        }
        Ok(Self {
            signer,
            network_type,
            version: transaction_type.version(),
            body,
        })
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.body.transaction_type()
    }

    /// Size of the embedded header, always 42.
    pub fn catbuffer_size_shared() -> usize {
        EMBEDDED_HEADER_SIZE
    }

    pub fn catbuffer_size(&self) -> usize {
        EMBEDDED_HEADER_SIZE + self.body.catbuffer_size()
    }

    pub fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_len::<u32>(self.catbuffer_size())?;
        writer.write_bytes(self.signer.public_key_bytes());
        writer.write(pack_version(self.network_type, self.version)?);
        writer.write(self.transaction_type().code());
        self.body.write_catbuffer(writer)
    }

    /// Read one embedded transaction; its network must match the aggregate's.
    pub fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, TransactionError> {
        let size: u32 = reader.read()?;
        let size = size as usize;
        if size < EMBEDDED_HEADER_SIZE {
            return Err(TransactionError::InvalidPayload(format!(
                "embedded transaction size {size} is below the header size"
            )));
        }
        let mut entity = reader.sub_reader(size - 4)?;
        let signer_key = entity.read_array::<32>()?;
        let (network_code, version) = unpack_version(entity.read()?);
        let network_type = NetworkType::from_code(network_code)?;
        if network_type != reader.network_type() {
            return Err(TransactionError::NetworkMismatch {
                expected: reader.network_type(),
                actual: network_type,
            });
        }
        let code: u16 = entity.read()?;
        let transaction_type =
            TransactionType::from_code(code).ok_or(TransactionError::UnknownType(code))?;
        if transaction_type.is_aggregate() {
            return Err(TransactionError::NestedAggregate);
        }
        let body = TransactionBody::read_catbuffer(transaction_type, &mut entity)?;
        entity.finish()?;
        Ok(Self {
            signer: PublicAccount::from_public_key(signer_key, network_type),
            network_type,
            version,
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// AggregateTransaction
// ---------------------------------------------------------------------------

/// A cosigner's signature over an aggregate's hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateCosignature {
    pub signer: PublicAccount,
    pub signature: Signature,
}

/// Body of both aggregate kinds. Complete aggregates are announced fully
/// signed; bonded ones collect cosignatures on chain behind a hash lock.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateTransaction {
    pub inner_transactions: Vec<EmbeddedTransaction>,
    pub cosignatures: Vec<AggregateCosignature>,
}

impl AggregateTransaction {
    pub fn new(inner_transactions: Vec<EmbeddedTransaction>) -> Self {
        Self {
            inner_transactions,
            cosignatures: Vec::new(),
        }
    }

    pub fn create_complete(
        deadline: Deadline,
        inner_transactions: Vec<EmbeddedTransaction>,
        network_type: NetworkType,
    ) -> Transaction {
        Transaction::new(
            network_type,
            deadline,
            TransactionBody::AggregateComplete(Self::new(inner_transactions)),
        )
    }

    pub fn create_bonded(
        deadline: Deadline,
        inner_transactions: Vec<EmbeddedTransaction>,
        network_type: NetworkType,
    ) -> Transaction {
        Transaction::new(
            network_type,
            deadline,
            TransactionBody::AggregateBonded(Self::new(inner_transactions)),
        )
    }

    /// Bytes of the embedded transactions, the value of the size prefix.
    pub fn payload_size(&self) -> usize {
        self.inner_transactions
            .iter()
            .map(EmbeddedTransaction::catbuffer_size)
            .sum()
    }

    pub fn catbuffer_size(&self) -> usize {
        4 + self.payload_size() + COSIGNATURE_SIZE * self.cosignatures.len()
    }

    pub fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_len::<u32>(self.payload_size())?;
        for inner in &self.inner_transactions {
            inner.write_catbuffer(writer)?;
        }
        for cosignature in &self.cosignatures {
            writer.write_bytes(cosignature.signer.public_key_bytes());
            writer.write_bytes(cosignature.signature.as_bytes());
        }
        Ok(())
    }

    /// Consumes the rest of `reader`: whatever follows the payload must be
    /// whole cosignatures.
    pub fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, TransactionError> {
        let payload_size: u32 = reader.read()?;
        let mut payload = reader.sub_reader(payload_size as usize)?;
        let mut inner_transactions = Vec::new();
        while payload.remaining() > 0 {
            inner_transactions.push(EmbeddedTransaction::read_catbuffer(&mut payload)?);
        }

        let trailing = reader.remaining();
        if trailing % COSIGNATURE_SIZE != 0 {
            return Err(TransactionError::InvalidPayload(format!(
                "{trailing} bytes after the aggregate payload are not whole cosignatures"
            )));
        }
        let mut cosignatures = Vec::with_capacity(trailing / COSIGNATURE_SIZE);
        while reader.remaining() > 0 {
            let signer = reader.read_array::<32>()?;
            let signature = reader.read_array::<64>()?;
            cosignatures.push(AggregateCosignature {
                signer: PublicAccount::from_public_key(signer, reader.network_type()),
                signature: Signature::from_array(signature),
            });
        }
        Ok(Self {
            inner_transactions,
            cosignatures,
        })
    }

    /// True when `account` cosigned this aggregate.
    pub fn is_cosigned_by(&self, account: &PublicAccount) -> bool {
        self.cosignatures
            .iter()
            .any(|c| c.signer.public_key_bytes() == account.public_key_bytes())
    }
}
