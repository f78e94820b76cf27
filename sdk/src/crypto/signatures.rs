//! # Digital Signatures
//!
//! Free-function signing and verification over [`SigningKey`] /
//! [`VerifyingKey`], plus a raw-bytes entry point for material that arrives
//! straight off a catbuffer payload.
//!
//! Verification distinguishes two failures: the inputs had the wrong shape
//! ([`SignatureError::InvalidLength`]), or they had the right shape and the
//! signature is simply not valid ([`SignatureError::BadSignature`]). A public
//! key that does not decode to a curve point is the second kind.

use thiserror::Error;

use super::ed25519::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use super::keys::{SignSchema, Signature, SigningKey, VerifyingKey};

/// Errors during signature operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    BadSignature,

    #[error("invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid signature hex: {0}")]
    InvalidHex(String),
}

/// Sign `message` with `key`.
pub fn sign(key: &SigningKey, message: &[u8]) -> Signature {
    key.sign(message)
}

/// Verify `signature` over `message` against `public_key`.
pub fn verify(
    public_key: &VerifyingKey,
    message: &[u8],
    signature: &Signature,
) -> Result<(), SignatureError> {
    public_key.verify(message, signature)
}

/// Verify from raw byte slices, checking their lengths first.
pub fn verify_raw(
    schema: SignSchema,
    public_key: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<(), SignatureError> {
    let public_key = <[u8; PUBLIC_KEY_LENGTH]>::try_from(public_key).map_err(|_| {
        SignatureError::InvalidLength {
            what: "public key",
            expected: PUBLIC_KEY_LENGTH,
            actual: public_key.len(),
        }
    })?;
    let signature = <[u8; SIGNATURE_LENGTH]>::try_from(signature).map_err(|_| {
        SignatureError::InvalidLength {
            what: "signature",
            expected: SIGNATURE_LENGTH,
            actual: signature.len(),
        }
    })?;
    schema.verify(&public_key, &signature, message)
}

/// Verify several `(key, message, signature)` triples.
///
/// Fails on the first bad entry. Verification is sequential; callers that
/// need to know which entry failed should verify individually.
pub fn batch_verify(items: &[(VerifyingKey, &[u8], Signature)]) -> Result<(), SignatureError> {
    for (public_key, message, signature) in items {
        verify(public_key, message, signature)?;
    }
    Ok(())
}
