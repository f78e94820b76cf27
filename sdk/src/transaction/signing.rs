//! Transaction hashing and signing.
//!
//! Signing is a separate step from building: a [`Transaction`] stays an
//! unsigned value until an [`Account`] turns it into a
//! [`SignedTransaction`], the announceable payload plus its hash.
//!
//! Both the signature and the hash are computed over byte ranges of the
//! serialized payload, prefixed with the network's generation hash so a
//! payload signed for one chain is worthless on another:
//!
//! ```text
//! signing data = generation hash ‖ payload[100..end]
//! hash         = SHA3-256(payload[4..36] ‖ payload[68..100] ‖ generation hash ‖ payload[100..end])
//! ```
//!
//! `end` is the payload length, except for aggregates where it stops after
//! the embedded transactions so cosignatures can be added later without
//! changing the hash.

use serde::{Deserialize, Serialize};

use super::builder::Transaction;
use super::fee::FeeCalculationStrategy;
use super::types::TransactionType;
use super::TransactionError;
use crate::codec::{hex_upper, CodecError};
use crate::config::{SIGNATURE_OFFSET, SIGNER_OFFSET, TRANSACTION_HEADER_SIZE, TYPE_OFFSET, VERSION_OFFSET};
use crate::crypto::hash::sha3_256_multi;
use crate::crypto::{Signature, SignatureError};
use crate::model::account::{Account, PublicAccount};
use crate::model::network::{GenerationHash, NetworkType};

// ---------------------------------------------------------------------------
// Byte ranges
// ---------------------------------------------------------------------------

fn le_u16(payload: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([payload[offset], payload[offset + 1]])
}

fn le_u32(payload: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        payload[offset],
        payload[offset + 1],
        payload[offset + 2],
        payload[offset + 3],
    ])
}

/// End of the region covered by signature and hash.
pub(crate) fn signed_region_end(payload: &[u8]) -> Result<usize, TransactionError> {
    if payload.len() < TRANSACTION_HEADER_SIZE {
        return Err(CodecError::Truncated {
            needed: TRANSACTION_HEADER_SIZE,
            available: payload.len(),
        }
        .into());
    }
    let code = le_u16(payload, TYPE_OFFSET);
    let is_aggregate = TransactionType::from_code(code).is_some_and(TransactionType::is_aggregate);
    if !is_aggregate {
        return Ok(payload.len());
    }
    let payload_start = TRANSACTION_HEADER_SIZE + 4;
    if payload.len() < payload_start {
        return Err(CodecError::Truncated {
            needed: payload_start,
            available: payload.len(),
        }
        .into());
    }
    let end = payload_start + le_u32(payload, TRANSACTION_HEADER_SIZE) as usize;
    if end > payload.len() {
        return Err(CodecError::Truncated {
            needed: end,
            available: payload.len(),
        }
        .into());
    }
    Ok(end)
}

/// The bytes the initiator signs: `generation hash ‖ payload[100..end]`.
pub fn signing_data(
    payload: &[u8],
    generation_hash: &GenerationHash,
) -> Result<Vec<u8>, TransactionError> {
    let end = signed_region_end(payload)?;
    let mut data = Vec::with_capacity(32 + end - VERSION_OFFSET);
    data.extend_from_slice(generation_hash.as_bytes());
    data.extend_from_slice(&payload[VERSION_OFFSET..end]);
    Ok(data)
}

/// The transaction hash of a serialized payload. Signed or not, and with or
/// without cosignatures, the same transaction hashes the same as long as
/// its signature and signer are the same.
pub fn transaction_hash(
    payload: &[u8],
    generation_hash: &GenerationHash,
) -> Result<[u8; 32], TransactionError> {
    let end = signed_region_end(payload)?;
    Ok(sha3_256_multi(&[
        &payload[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 32],
        &payload[SIGNER_OFFSET..VERSION_OFFSET],
        &generation_hash.as_bytes()[..],
        &payload[VERSION_OFFSET..end],
    ]))
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A serialized, signed transaction ready to announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub payload: Vec<u8>,
    pub hash: [u8; 32],
    pub signer: PublicAccount,
    pub transaction_type: TransactionType,
    pub network_type: NetworkType,
}

impl SignedTransaction {
    pub fn payload_hex(&self) -> String {
        hex_upper(&self.payload)
    }

    pub fn hash_hex(&self) -> String {
        hex_upper(self.hash)
    }

    /// Decode the payload back into a transaction.
    pub fn to_transaction(&self) -> Result<Transaction, TransactionError> {
        Transaction::from_catbuffer(&self.payload, Some(self.network_type))
    }

    pub fn to_dto(&self) -> SignedTransactionDto {
        SignedTransactionDto {
            payload: self.payload_hex(),
            hash: self.hash_hex(),
            signer: self.signer.public_key_hex(),
            transaction_type: self.transaction_type.code(),
            network_type: self.network_type.code(),
        }
    }
}

/// The announce document: what a node's `PUT /transaction` expects plus the
/// locally computed hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedTransactionDto {
    pub payload: String,
    pub hash: String,
    pub signer: String,
    #[serde(rename = "type")]
    pub transaction_type: u16,
    pub network_type: u8,
}

impl Transaction {
    /// Serialize, sign with `account` and hash.
    ///
    /// The signer field is set to `account` before serializing, so the key
    /// recorded in the payload is always the key that produced the
    /// signature.
    pub fn sign_with(
        &self,
        account: &Account,
        generation_hash: &GenerationHash,
        fee_strategy: FeeCalculationStrategy,
    ) -> Result<SignedTransaction, TransactionError> {
        let account_network = account.network_type()?;
        if account_network != self.network_type() {
            return Err(TransactionError::NetworkMismatch {
                expected: self.network_type(),
                actual: account_network,
            });
        }

        let signer = *account.public_account();
        let mut payload = self
            .clone()
            .with_signer(Some(signer))
            .with_signature(None)
            .to_catbuffer(self.network_type(), fee_strategy)?;
        let signature = account.sign_data(&signing_data(&payload, generation_hash)?);
        payload[SIGNATURE_OFFSET..SIGNER_OFFSET].copy_from_slice(signature.as_bytes());
        let hash = transaction_hash(&payload, generation_hash)?;

        tracing::debug!(
            transaction_type = %self.transaction_type(),
            network = %self.network_type(),
            hash = %hex_upper(hash),
            size = payload.len(),
            "signed transaction"
        );

        Ok(SignedTransaction {
            payload,
            hash,
            signer,
            transaction_type: self.transaction_type(),
            network_type: self.network_type(),
        })
    }

    /// Sign an aggregate with `initiator`, then append one
    /// `cosigner ‖ signature(hash)` block per cosignatory, in order.
    pub fn sign_with_cosignatories(
        &self,
        initiator: &Account,
        cosignatories: &[Account],
        generation_hash: &GenerationHash,
        fee_strategy: FeeCalculationStrategy,
    ) -> Result<SignedTransaction, TransactionError> {
        if !self.transaction_type().is_aggregate() {
            return Err(TransactionError::NotAggregate(self.transaction_type()));
        }
        let mut signed = self.sign_with(initiator, generation_hash, fee_strategy)?;
        for cosignatory in cosignatories {
            let cosignature = CosignatureTransaction::from_hash(signed.hash).sign_with(cosignatory)?;
            signed.payload.extend_from_slice(cosignature.signer.public_key_bytes());
            signed.payload.extend_from_slice(cosignature.signature.as_bytes());
        }
        let size = u32::try_from(signed.payload.len()).map_err(|_| CodecError::Overflow {
            value: signed.payload.len().to_string(),
            width: "u32",
        })?;
        signed.payload[..4].copy_from_slice(&size.to_le_bytes());

        tracing::debug!(
            hash = %signed.hash_hex(),
            cosignatures = cosignatories.len(),
            "cosigned aggregate"
        );
        Ok(signed)
    }
}

// ---------------------------------------------------------------------------
// Cosignatures
// ---------------------------------------------------------------------------

/// A request to cosign an announced aggregate bonded, identified by hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CosignatureTransaction {
    hash: [u8; 32],
}

impl CosignatureTransaction {
    /// Cosign `transaction`, which must be an aggregate bonded a node has
    /// reported (so its [`TransactionInfo`](super::TransactionInfo) carries
    /// the hash).
    pub fn create(transaction: &Transaction) -> Result<Self, TransactionError> {
        if transaction.transaction_type() != TransactionType::AggregateBonded {
            return Err(TransactionError::NotAggregate(transaction.transaction_type()));
        }
        let hash = transaction
            .transaction_info()
            .and_then(|info| info.hash)
            .ok_or(TransactionError::MissingHash)?;
        Ok(Self { hash })
    }

    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self { hash }
    }

    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    pub fn sign_with(&self, account: &Account) -> Result<CosignatureSignedTransaction, TransactionError> {
        let signature = account.sign_data(&self.hash);
        tracing::trace!(parent_hash = %hex_upper(self.hash), "cosigned");
        Ok(CosignatureSignedTransaction {
            parent_hash: self.hash,
            signature,
            signer: *account.public_account(),
        })
    }
}

/// A detached cosignature, announced separately from its aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CosignatureSignedTransaction {
    pub parent_hash: [u8; 32],
    pub signature: Signature,
    pub signer: PublicAccount,
}

impl CosignatureSignedTransaction {
    pub fn verify(&self) -> Result<(), SignatureError> {
        self.signer.verify_signature(&self.parent_hash, &self.signature)
    }

    pub fn to_dto(&self) -> CosignatureSignedTransactionDto {
        CosignatureSignedTransactionDto {
            parent_hash: hex_upper(self.parent_hash),
            signature: self.signature.to_hex(),
            signer: self.signer.public_key_hex(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosignatureSignedTransactionDto {
    pub parent_hash: String,
    pub signature: String,
    pub signer: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::deadline::Deadline;
    use crate::model::message::Message;
    use crate::model::mosaic::Mosaic;
    use crate::transaction::aggregate::AggregateTransaction;
    use crate::transaction::info::TransactionInfo;
    use crate::transaction::transfer::TransferTransaction;

    const PRIVATE_KEY: &str = "2a2e0d0ce62c8b9b0a8a3b6b7c5d4e3f2a1b0c9d8e7f6a5b4c3d2e1f0a9b8c7d";
    const COSIGNER_KEY: &str = "1f2e3d4c5b6a79880f1e2d3c4b5a69788796a5b4c3d2e1f00112233445566778";
    const GENERATION_HASH: &str =
        "7B631D803F912B00DC0CBED3014BBD17A302BA50B99D233B9C2D9533B842ABDF";

    fn account(key: &str) -> Account {
        Account::from_private_key(key, NetworkType::MijinTest).unwrap()
    }

    fn generation_hash() -> GenerationHash {
        GENERATION_HASH.parse().unwrap()
    }

    fn transfer() -> Transaction {
        TransferTransaction::create(
            Deadline::from_timestamp(20_000_000_000),
            "SD5DT3CH4BLABL5HIMEKP2TAPUKF4NY3L5HRIR54".parse().unwrap(),
            vec![Mosaic::new(5u64, 1000)],
            Message::plain("Hello world!"),
            NetworkType::MijinTest,
        )
    }

    #[test]
    fn signing_regression() {
        let signed = transfer()
            .sign_with(&account(PRIVATE_KEY), &generation_hash(), FeeCalculationStrategy::Zero)
            .unwrap();
        assert_eq!(
            signed.hash_hex(),
            "F667945F6C9106ADD470A4B63AC651A080C164EA78B232ABFE7A478BDB193A19"
        );
        assert_eq!(
            &signed.payload_hex()[8..136],
            "21575C38EE5A8E13BDA8B0BF66FE7C428629FA651D0317D5B7B307AB973855D6\
             95390106FEB630ACE459DB2AE0B294B19B4BF2B24BFB290822CC8A39DD1CE205"
        );
        assert_eq!(signed.transaction_type, TransactionType::Transfer);
        assert_eq!(signed.signer, *account(PRIVATE_KEY).public_account());
    }

    #[test]
    fn hash_ignores_cosignatures_but_not_the_body() {
        let initiator = account(PRIVATE_KEY);
        let inner = transfer().to_aggregate(*initiator.public_account()).unwrap();
        let aggregate = AggregateTransaction::create_complete(
            Deadline::from_timestamp(20_000_000_000),
            vec![inner],
            NetworkType::MijinTest,
        );
        let alone = aggregate
            .sign_with(&initiator, &generation_hash(), FeeCalculationStrategy::Zero)
            .unwrap();
        let cosigned = aggregate
            .sign_with_cosignatories(
                &initiator,
                &[account(COSIGNER_KEY)],
                &generation_hash(),
                FeeCalculationStrategy::Zero,
            )
            .unwrap();
        assert_eq!(alone.hash, cosigned.hash);
        assert_eq!(cosigned.payload.len(), alone.payload.len() + 96);
        assert_eq!(&cosigned.payload[..4], &(alone.payload.len() as u32 + 96).to_le_bytes());
        assert_eq!(
            alone.hash_hex(),
            "F45D15978BE345C84EBF71C68C30AFEB68BD511D5BB8102D5A7837641838D786"
        );
    }

    #[test]
    fn only_aggregates_take_cosignatories() {
        let err = transfer()
            .sign_with_cosignatories(
                &account(PRIVATE_KEY),
                &[],
                &generation_hash(),
                FeeCalculationStrategy::Zero,
            )
            .unwrap_err();
        assert!(matches!(err, TransactionError::NotAggregate(TransactionType::Transfer)));
    }

    #[test]
    fn account_network_must_match() {
        let foreign = Account::from_private_key(PRIVATE_KEY, NetworkType::MainNet).unwrap();
        assert!(matches!(
            transfer().sign_with(&foreign, &generation_hash(), FeeCalculationStrategy::Zero),
            Err(TransactionError::NetworkMismatch { .. })
        ));
    }

    #[test]
    fn cosignature_needs_an_announced_bonded_aggregate() {
        let bonded = AggregateTransaction::create_bonded(
            Deadline::from_timestamp(1),
            vec![],
            NetworkType::MijinTest,
        );
        assert!(matches!(
            CosignatureTransaction::create(&bonded),
            Err(TransactionError::MissingHash)
        ));
        assert!(matches!(
            CosignatureTransaction::create(&transfer()),
            Err(TransactionError::NotAggregate(_))
        ));

        let announced = bonded.with_transaction_info(Some(TransactionInfo {
            hash: Some([3; 32]),
            ..TransactionInfo::default()
        }));
        let request = CosignatureTransaction::create(&announced).unwrap();
        let cosigner = account(COSIGNER_KEY);
        let signed = cosigner.sign_cosignature(&request).unwrap();
        assert_eq!(signed.parent_hash, [3; 32]);
        signed.verify().unwrap();
        let json = serde_json::to_value(signed.to_dto()).unwrap();
        assert_eq!(json["parentHash"], "03".repeat(32));
        assert_eq!(json["signer"], cosigner.public_key_hex());
    }
}
