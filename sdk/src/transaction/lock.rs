//! Hash locks and secret lock / proof pairs.
//!
//! A hash lock ("lock funds") parks a deposit against the hash of an
//! aggregate bonded transaction so the network will hold that aggregate
//! while cosignatures arrive. A secret lock parks a mosaic until someone
//! reveals a proof whose digest equals the secret.

use serde::{Deserialize, Serialize};

use super::builder::{Transaction, TransactionBody};
use super::signing::SignedTransaction;
use super::types::{HashType, TransactionType};
use super::TransactionError;
use crate::codec::{
    decode_hex, decode_hex_array, hex_upper, CatbufferCodec, CatbufferReader, CatbufferWriter,
    CodecError, DtoCodec, StdInt, Uint64Dto,
};
use crate::model::account::Address;
use crate::model::deadline::Deadline;
use crate::model::mosaic::{Mosaic, MosaicId};
use crate::model::network::NetworkType;

/// Secrets always occupy this many bytes on the wire.
pub const SECRET_WIRE_LENGTH: usize = 32;

fn check_secret(hash_type: HashType, secret: &[u8]) -> Result<(), String> {
    if secret.len() != hash_type.secret_length() {
        return Err(format!(
            "{:?} secret must be {} bytes, got {}",
            hash_type,
            hash_type.secret_length(),
            secret.len()
        ));
    }
    Ok(())
}

fn pad_secret(secret: &[u8]) -> Option<[u8; SECRET_WIRE_LENGTH]> {
    let mut padded = [0u8; SECRET_WIRE_LENGTH];
    padded.get_mut(..secret.len())?.copy_from_slice(secret);
    Some(padded)
}

fn write_secret(writer: &mut CatbufferWriter, secret: &[u8]) -> Result<(), CodecError> {
    let padded = pad_secret(secret).ok_or_else(|| CodecError::InvalidField {
        field: "secret",
        reason: format!("{} bytes exceed the {SECRET_WIRE_LENGTH}-byte slot", secret.len()),
    })?;
    writer.write_bytes(&padded);
    Ok(())
}

/// Strip the zero padding of a short secret, refusing anything else in it.
fn unpad_secret(hash_type: HashType, wire: [u8; SECRET_WIRE_LENGTH]) -> Result<Vec<u8>, CodecError> {
    let len = hash_type.secret_length();
    if wire[len..].iter().any(|&b| b != 0) {
        return Err(CodecError::InvalidField {
            field: "secret",
            reason: format!("{hash_type:?} secret has non-zero padding"),
        });
    }
    Ok(wire[..len].to_vec())
}

/// Oversized secrets are emitted unpadded; reading them back fails.
fn secret_to_dto(secret: &[u8]) -> String {
    match pad_secret(secret) {
        Some(padded) => hex_upper(padded),
        None => hex_upper(secret),
    }
}

fn secret_from_dto(hash_type: HashType, value: &str) -> Result<Vec<u8>, CodecError> {
    unpad_secret(hash_type, decode_hex_array("secret", value)?)
}

// ---------------------------------------------------------------------------
// Lock funds
// ---------------------------------------------------------------------------

/// Body layout: `mosaic id u64 ‖ amount u64 ‖ duration u64 ‖ hash 32`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockFundsTransaction {
    pub mosaic: Mosaic,
    pub duration: u64,
    pub hash: [u8; 32],
}

impl LockFundsTransaction {
    /// Lock `mosaic` for `duration` blocks against a signed aggregate bonded.
    pub fn create(
        deadline: Deadline,
        mosaic: Mosaic,
        duration: u64,
        signed: &SignedTransaction,
        network_type: NetworkType,
    ) -> Result<Transaction, TransactionError> {
        if signed.transaction_type != TransactionType::AggregateBonded {
            return Err(TransactionError::NotAggregate(signed.transaction_type));
        }
        Ok(Transaction::new(
            network_type,
            deadline,
            TransactionBody::LockFunds(Self {
                mosaic,
                duration,
                hash: signed.hash,
            }),
        ))
    }
}

impl CatbufferCodec for LockFundsTransaction {
    fn catbuffer_size(&self) -> usize {
        16 + 8 + 32
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_item(&self.mosaic)?;
        writer.write(self.duration);
        writer.write_bytes(&self.hash);
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            mosaic: reader.read_item()?,
            duration: reader.read()?,
            hash: reader.read_array()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockFundsTransactionDto {
    pub mosaic_id: Uint64Dto,
    pub amount: Uint64Dto,
    pub duration: Uint64Dto,
    pub hash: String,
}

impl DtoCodec for LockFundsTransaction {
    type Dto = LockFundsTransactionDto;

    fn to_dto(&self) -> Self::Dto {
        LockFundsTransactionDto {
            mosaic_id: self.mosaic.id.to_dto(),
            amount: self.mosaic.amount.to_dto(),
            duration: self.duration.to_dto(),
            hash: hex_upper(self.hash),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            mosaic: Mosaic::new(
                MosaicId::from_dto(dto.mosaic_id, network_type)?,
                u64::from_dto(dto.amount),
            ),
            duration: u64::from_dto(dto.duration),
            hash: decode_hex_array("hash", &dto.hash)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Secret lock
// ---------------------------------------------------------------------------

/// Body layout:
///
/// ```text
/// mosaic id u64 ‖ amount u64 ‖ duration u64 ‖ hash type u8 ‖ secret 32 ‖ recipient 25
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretLockTransaction {
    pub mosaic: Mosaic,
    pub duration: u64,
    pub hash_type: HashType,
    pub secret: Vec<u8>,
    pub recipient: Address,
}

impl SecretLockTransaction {
    pub fn create(
        deadline: Deadline,
        mosaic: Mosaic,
        duration: u64,
        hash_type: HashType,
        secret: Vec<u8>,
        recipient: Address,
        network_type: NetworkType,
    ) -> Result<Transaction, TransactionError> {
        check_secret(hash_type, &secret).map_err(TransactionError::InvalidSecret)?;
        Ok(Transaction::new(
            network_type,
            deadline,
            TransactionBody::SecretLock(Self {
                mosaic,
                duration,
                hash_type,
                secret,
                recipient,
            }),
        ))
    }
}

impl CatbufferCodec for SecretLockTransaction {
    fn catbuffer_size(&self) -> usize {
        16 + 8 + 1 + SECRET_WIRE_LENGTH + 25
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        check_secret(self.hash_type, &self.secret).map_err(|reason| CodecError::InvalidField {
            field: "secret",
            reason,
        })?;
        writer.write_item(&self.mosaic)?;
        writer.write(self.duration);
        writer.write_item(&self.hash_type)?;
        write_secret(writer, &self.secret)?;
        writer.write_item(&self.recipient)
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        let mosaic = reader.read_item()?;
        let duration = reader.read()?;
        let hash_type = reader.read_item()?;
        let secret = unpad_secret(hash_type, reader.read_array()?)?;
        Ok(Self {
            mosaic,
            duration,
            hash_type,
            secret,
            recipient: reader.read_item()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretLockTransactionDto {
    pub mosaic_id: Uint64Dto,
    pub amount: Uint64Dto,
    pub duration: Uint64Dto,
    pub hash_algorithm: HashType,
    pub secret: String,
    pub recipient: String,
}

impl DtoCodec for SecretLockTransaction {
    type Dto = SecretLockTransactionDto;

    fn to_dto(&self) -> Self::Dto {
        SecretLockTransactionDto {
            mosaic_id: self.mosaic.id.to_dto(),
            amount: self.mosaic.amount.to_dto(),
            duration: self.duration.to_dto(),
            hash_algorithm: self.hash_type,
            secret: secret_to_dto(&self.secret),
            recipient: self.recipient.to_dto(),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            mosaic: Mosaic::new(
                MosaicId::from_dto(dto.mosaic_id, network_type)?,
                u64::from_dto(dto.amount),
            ),
            duration: u64::from_dto(dto.duration),
            hash_type: dto.hash_algorithm,
            secret: secret_from_dto(dto.hash_algorithm, &dto.secret)?,
            recipient: Address::from_dto(dto.recipient, network_type)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Secret proof
// ---------------------------------------------------------------------------

/// Body layout:
///
/// ```text
/// hash type u8 ‖ secret 32 ‖ recipient 25 ‖ proof size u16 ‖ proof
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretProofTransaction {
    pub hash_type: HashType,
    pub secret: Vec<u8>,
    pub recipient: Address,
    pub proof: Vec<u8>,
}

impl SecretProofTransaction {
    pub fn create(
        deadline: Deadline,
        hash_type: HashType,
        secret: Vec<u8>,
        recipient: Address,
        proof: Vec<u8>,
        network_type: NetworkType,
    ) -> Result<Transaction, TransactionError> {
        check_secret(hash_type, &secret).map_err(TransactionError::InvalidSecret)?;
        Ok(Transaction::new(
            network_type,
            deadline,
            TransactionBody::SecretProof(Self {
                hash_type,
                secret,
                recipient,
                proof,
            }),
        ))
    }

    /// True when hashing the proof reproduces the secret.
    pub fn verify_proof(&self) -> bool {
        self.hash_type.digest(&self.proof) == self.secret
    }
}

impl CatbufferCodec for SecretProofTransaction {
    fn catbuffer_size(&self) -> usize {
        1 + SECRET_WIRE_LENGTH + 25 + 2 + self.proof.len()
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        check_secret(self.hash_type, &self.secret).map_err(|reason| CodecError::InvalidField {
            field: "secret",
            reason,
        })?;
        writer.write_item(&self.hash_type)?;
        write_secret(writer, &self.secret)?;
        writer.write_item(&self.recipient)?;
        writer.write_len::<u16>(self.proof.len())?;
        writer.write_bytes(&self.proof);
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        let hash_type = reader.read_item()?;
        let secret = unpad_secret(hash_type, reader.read_array()?)?;
        let recipient = reader.read_item()?;
        let proof_size: u16 = reader.read()?;
        Ok(Self {
            hash_type,
            secret,
            recipient,
            proof: reader.take(proof_size.into())?.to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretProofTransactionDto {
    pub hash_algorithm: HashType,
    pub secret: String,
    pub recipient: String,
    pub proof: String,
}

impl DtoCodec for SecretProofTransaction {
    type Dto = SecretProofTransactionDto;

    fn to_dto(&self) -> Self::Dto {
        SecretProofTransactionDto {
            hash_algorithm: self.hash_type,
            secret: secret_to_dto(&self.secret),
            recipient: self.recipient.to_dto(),
            proof: hex_upper(&self.proof),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            hash_type: dto.hash_algorithm,
            secret: secret_from_dto(dto.hash_algorithm, &dto.secret)?,
            recipient: Address::from_dto(dto.recipient, network_type)?,
            proof: decode_hex("proof", &dto.proof)?,
        })
    }
}
