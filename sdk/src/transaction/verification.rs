//! Transaction errors and signature verification of signed payloads.
//!
//! [`verify_signed_payload`] is the receiving side of
//! [`Transaction::sign_with`](super::Transaction::sign_with): it recomputes
//! the signing data of a payload, checks the initiator's signature and,
//! for aggregates, every appended cosignature. The structural checks run
//! first so a malformed payload never reaches the curve arithmetic.

use thiserror::Error;

use super::signing::{signed_region_end, signing_data, transaction_hash, SignedTransaction};
use super::types::{unpack_version, TransactionType};
use crate::codec::CodecError;
use crate::config::{COSIGNATURE_SIZE, SIGNATURE_OFFSET, SIGNER_OFFSET, VERSION_OFFSET};
use crate::crypto::{batch_verify, KeyError, SignSchema, Signature, SignatureError, VerifyingKey};
use crate::model::network::{GenerationHash, NetworkType};
use crate::model::ModelError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from building, encoding, signing or verifying transactions.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// The transaction, account or payload belongs to another network.
    #[error("network mismatch: expected {expected}, got {actual}")]
    NetworkMismatch {
        expected: NetworkType,
        actual: NetworkType,
    },

    /// A type code outside the registry.
    #[error("unknown transaction type {0:#06x}")]
    UnknownType(u16),

    #[error("aggregate transactions cannot be embedded in an aggregate")]
    NestedAggregate,

    /// An aggregate-only operation was attempted on another kind.
    #[error("{0} is not an aggregate bonded or complete transaction")]
    NotAggregate(TransactionType),

    #[error("invalid secret: {0}")]
    InvalidSecret(String),

    /// The payload's framing is inconsistent (sizes, cosignature blocks).
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Cosigning needs the hash a node reported for the aggregate.
    #[error("transaction has no hash in its transaction info")]
    MissingHash,

    #[error("invalid transaction JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a signed payload under its network's default schema and return
/// its hash.
pub fn verify_signed_payload(
    payload: &[u8],
    generation_hash: &GenerationHash,
) -> Result<[u8; 32], TransactionError> {
    let network_type = payload_network(payload)?;
    verify_signed_payload_with_schema(payload, generation_hash, network_type.sign_schema())
}

/// Like [`verify_signed_payload`] with an explicit signature schema.
///
/// Checks, in order: the size field matches the payload, cosignatures are
/// whole 96-byte blocks, then all signatures in one batch.
pub fn verify_signed_payload_with_schema(
    payload: &[u8],
    generation_hash: &GenerationHash,
    schema: SignSchema,
) -> Result<[u8; 32], TransactionError> {
    let end = signed_region_end(payload)?;
    let declared = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
    if declared != payload.len() {
        return Err(TransactionError::InvalidPayload(format!(
            "size field says {declared} bytes, payload has {}",
            payload.len()
        )));
    }
    let cosignatures = &payload[end..];
    if cosignatures.len() % COSIGNATURE_SIZE != 0 {
        return Err(TransactionError::InvalidPayload(format!(
            "{} bytes after the signed region are not whole cosignatures",
            cosignatures.len()
        )));
    }

    let data = signing_data(payload, generation_hash)?;
    let hash = transaction_hash(payload, generation_hash)?;

    let initiator = VerifyingKey::from_bytes(&payload[SIGNER_OFFSET..VERSION_OFFSET], schema)?;
    let signature = Signature::from_bytes(&payload[SIGNATURE_OFFSET..SIGNER_OFFSET])?;
    let mut items = vec![(initiator, data.as_slice(), signature)];
    for block in cosignatures.chunks_exact(COSIGNATURE_SIZE) {
        let cosigner = VerifyingKey::from_bytes(&block[..32], schema)?;
        let cosignature = Signature::from_bytes(&block[32..])?;
        items.push((cosigner, &hash[..], cosignature));
    }
    batch_verify(&items)?;

    tracing::debug!(
        hash = %hex::encode_upper(hash),
        cosignatures = items.len() - 1,
        "verified signed payload"
    );
    Ok(hash)
}

fn payload_network(payload: &[u8]) -> Result<NetworkType, TransactionError> {
    let word = payload
        .get(VERSION_OFFSET..VERSION_OFFSET + 4)
        .ok_or(CodecError::Truncated {
            needed: VERSION_OFFSET + 4,
            available: payload.len(),
        })?;
    let (code, _) = unpack_version(u32::from_le_bytes([word[0], word[1], word[2], word[3]]));
    Ok(NetworkType::from_code(code)?)
}

impl SignedTransaction {
    /// Verify every signature in the payload under the signer's schema and
    /// check that the recorded hash is the payload's hash.
    pub fn verify(&self, generation_hash: &GenerationHash) -> Result<(), TransactionError> {
        let hash = verify_signed_payload_with_schema(
            &self.payload,
            generation_hash,
            self.signer.public_key().schema(),
        )?;
        if hash != self.hash {
            return Err(TransactionError::InvalidPayload(
                "recorded hash does not match the payload".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::account::Account;
    use crate::model::deadline::Deadline;
    use crate::model::message::Message;
    use crate::model::mosaic::Mosaic;
    use crate::transaction::aggregate::AggregateTransaction;
    use crate::transaction::builder::Transaction;
    use crate::transaction::fee::FeeCalculationStrategy;
    use crate::transaction::transfer::TransferTransaction;

    const SIGNED_TRANSFER: &str = "B300000021575C38EE5A8E13BDA8B0BF66FE7C428629FA651D0317D5B7B307AB\
        973855D695390106FEB630ACE459DB2AE0B294B19B4BF2B24BFB290822CC8A39DD1CE2058155342A7C93E7777F\
        690970007C8E61DD5B88D514D2D000E435AFCA29F66905030000905441000000000000000000C817A804000000\
        90FA39EC47E05600AFA74308A7EA607D145E371B5F4F1447BC0D00010048656C6C6F20776F726C642105000000\
        00000000E803000000000000";

    fn generation_hash() -> GenerationHash {
        "7B631D803F912B00DC0CBED3014BBD17A302BA50B99D233B9C2D9533B842ABDF"
            .parse()
            .unwrap()
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
    fn recorded_payload_verifies() {
        let payload = hex::decode(SIGNED_TRANSFER).unwrap();
        let hash = verify_signed_payload(&payload, &generation_hash()).unwrap();
        assert_eq!(
            hex::encode_upper(hash),
            "F667945F6C9106ADD470A4B63AC651A080C164EA78B232ABFE7A478BDB193A19"
        );
    }

    #[test]
    fn tampering_is_detected() {
        let mut payload = hex::decode(SIGNED_TRANSFER).unwrap();
        let last = payload.len() - 1;
        payload[last] ^= 1;
        assert!(matches!(
            verify_signed_payload(&payload, &generation_hash()),
            Err(TransactionError::Signature(SignatureError::BadSignature))
        ));

        let payload = hex::decode(SIGNED_TRANSFER).unwrap();
        let mut other_chain = generation_hash();
        other_chain.0[0] ^= 1;
        assert!(verify_signed_payload(&payload, &other_chain).is_err());
    }

    #[test]
    fn size_field_must_match() {
        let mut payload = hex::decode(SIGNED_TRANSFER).unwrap();
        payload.push(0);
        assert!(matches!(
            verify_signed_payload(&payload, &generation_hash()),
            Err(TransactionError::InvalidPayload(_))
        ));
    }

    #[test]
    fn cosignatures_are_verified() {
        let initiator = Account::generate(NetworkType::MijinTest);
        let cosigner = Account::generate(NetworkType::MijinTest);
        let inner = transfer().to_aggregate(*cosigner.public_account()).unwrap();
        let aggregate = AggregateTransaction::create_complete(
            Deadline::from_timestamp(20_000_000_000),
            vec![inner],
            NetworkType::MijinTest,
        );
        let signed = aggregate
            .sign_with_cosignatories(
                &initiator,
                std::slice::from_ref(&cosigner),
                &generation_hash(),
                FeeCalculationStrategy::Middle,
            )
            .unwrap();
        signed.verify(&generation_hash()).unwrap();

        let decoded = signed.to_transaction().unwrap();
        assert!(decoded.signed_by_account(initiator.public_account()));
        assert!(decoded.signed_by_account(cosigner.public_account()));
        assert!(!decoded.signed_by_account(Account::generate(NetworkType::MijinTest).public_account()));

        let mut forged = signed.clone();
        let last = forged.payload.len() - 1;
        forged.payload[last] ^= 0x40;
        assert!(forged.verify(&generation_hash()).is_err());
    }
}
