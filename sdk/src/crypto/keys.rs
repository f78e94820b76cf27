//! # Key Management
//!
//! Ed25519 keypairs for xpxchain accounts.
//!
//! A key is always tied to the hash variant it was expanded with (see
//! [`SignSchema`]). The same 32-byte seed yields two different public keys
//! under SHA3-512 and SHA-512, so the schema travels with every key and
//! signature check instead of being a global switch.
//!
//! ## Security considerations
//!
//! - Key generation pulls from the OS RNG (`OsRng`).
//! - `Debug` output of a [`SigningKey`] only ever shows the public half.
//! - Secret bytes are never logged anywhere in this crate.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use sha3::Sha3_512;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

use super::ed25519::{self, PUBLIC_KEY_LENGTH, SEED_LENGTH, SIGNATURE_LENGTH};
use super::signatures::SignatureError;

/// Errors raised while building keys from external bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid key length: expected {expected}, got {actual} bytes")]
    InvalidLength { expected: &'static str, actual: usize },

    #[error("invalid key hex: {0}")]
    InvalidHex(String),

    /// A 64-byte `seed ‖ public` whose public half is not derived from the seed.
    #[error("keypair validation failed: public key does not match secret key")]
    KeypairMismatch,
}

/// The 512-bit hash Ed25519 runs on.
///
/// `Sha3` is what the network itself uses; `Sha2` is plain RFC 8032 and
/// exists for interop with tooling built on stock Ed25519 libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignSchema {
    #[default]
    Sha3,
    Sha2,
}

impl SignSchema {
    fn public_key(self, seed: &[u8; SEED_LENGTH]) -> [u8; PUBLIC_KEY_LENGTH] {
        match self {
            SignSchema::Sha3 => ed25519::public_key::<Sha3_512>(seed),
            SignSchema::Sha2 => ed25519::public_key::<Sha512>(seed),
        }
    }

    fn sign(
        self,
        seed: &[u8; SEED_LENGTH],
        public: &[u8; PUBLIC_KEY_LENGTH],
        message: &[u8],
    ) -> [u8; SIGNATURE_LENGTH] {
        match self {
            SignSchema::Sha3 => ed25519::sign::<Sha3_512>(seed, public, message),
            SignSchema::Sha2 => ed25519::sign::<Sha512>(seed, public, message),
        }
    }

    pub(crate) fn verify(
        self,
        public: &[u8; PUBLIC_KEY_LENGTH],
        signature: &[u8; SIGNATURE_LENGTH],
        message: &[u8],
    ) -> Result<(), SignatureError> {
        match self {
            SignSchema::Sha3 => ed25519::verify::<Sha3_512>(public, signature, message),
            SignSchema::Sha2 => ed25519::verify::<Sha512>(public, signature, message),
        }
    }
}

impl fmt::Display for SignSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignSchema::Sha3 => "sha3",
            SignSchema::Sha2 => "sha2",
        })
    }
}

impl FromStr for SignSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha3" => Ok(SignSchema::Sha3),
            "sha2" => Ok(SignSchema::Sha2),
            other => Err(format!("unknown sign schema {other:?}, expected sha3 or sha2")),
        }
    }
}

/// A private key: the 32-byte seed plus its cached public key.
///
/// `SigningKey` deliberately has no serde impls. Exporting secret material
/// goes through [`seed`](Self::seed) or [`to_bytes`](Self::to_bytes).
#[derive(Clone)]
pub struct SigningKey {
    seed: [u8; SEED_LENGTH],
    public: [u8; PUBLIC_KEY_LENGTH],
    schema: SignSchema,
}

impl SigningKey {
    /// A fresh key from the OS RNG.
    pub fn generate(schema: SignSchema) -> Self {
        Self::from_entropy(schema, |seed| OsRng.fill_bytes(seed))
    }

    /// A key whose seed is filled in by `entropy`.
    ///
    /// Lets callers plug in their own randomness source, or a fixed seed
    /// for reproducible tests.
    pub fn from_entropy(schema: SignSchema, entropy: impl FnOnce(&mut [u8; SEED_LENGTH])) -> Self {
        let mut seed = [0u8; SEED_LENGTH];
        entropy(&mut seed);
        Self::from_seed(&seed, schema)
    }

    pub fn from_seed(seed: &[u8; SEED_LENGTH], schema: SignSchema) -> Self {
        Self {
            seed: *seed,
            public: schema.public_key(seed),
            schema,
        }
    }

    /// Accepts a bare 32-byte seed or a 64-byte `seed ‖ public`.
    ///
    /// In the 64-byte form the public half is re-derived and compared, so a
    /// key exported under the other schema is caught here rather than at
    /// signing time.
    pub fn from_bytes(bytes: &[u8], schema: SignSchema) -> Result<Self, KeyError> {
        match bytes.len() {
            SEED_LENGTH => {
                let mut seed = [0u8; SEED_LENGTH];
                seed.copy_from_slice(bytes);
                Ok(Self::from_seed(&seed, schema))
            }
            64 => {
                let mut seed = [0u8; SEED_LENGTH];
                seed.copy_from_slice(&bytes[..SEED_LENGTH]);
                let key = Self::from_seed(&seed, schema);
                if key.public[..] != bytes[SEED_LENGTH..] {
                    return Err(KeyError::KeypairMismatch);
                }
                Ok(key)
            }
            actual => Err(KeyError::InvalidLength {
                expected: "32 or 64",
                actual,
            }),
        }
    }

    pub fn from_hex(hex_str: &str, schema: SignSchema) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes, schema)
    }

    /// The raw seed. Handle with care.
    pub fn seed(&self) -> &[u8; SEED_LENGTH] {
        &self.seed
    }

    /// `seed ‖ public`, the 64-byte export form.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..SEED_LENGTH].copy_from_slice(&self.seed);
        out[SEED_LENGTH..].copy_from_slice(&self.public);
        out
    }

    pub fn schema(&self) -> SignSchema {
        self.schema
    }

    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.public
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey {
            bytes: self.public,
            schema: self.schema,
        }
    }

    /// Deterministic: the same key and message always give the same signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.schema.sign(&self.seed, &self.public, message))
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        self.verifying_key().verify(message, signature)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SigningKey(pub={}, schema={})",
            hex::encode_upper(self.public),
            self.schema
        )
    }
}

impl PartialEq for SigningKey {
    /// Compared by public key and schema, never by secret bytes.
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public && self.schema == other.schema
    }
}

impl Eq for SigningKey {}

/// Build a keypair from caller-supplied entropy.
pub fn create_keypair(
    schema: SignSchema,
    entropy: impl FnOnce(&mut [u8; SEED_LENGTH]),
) -> SigningKey {
    SigningKey::from_entropy(schema, entropy)
}

// ---------------------------------------------------------------------------
// VerifyingKey
// ---------------------------------------------------------------------------

/// A public key together with the schema its signatures are checked under.
///
/// Construction only checks the length. Whether the bytes are a curve point
/// is settled at verification time, where a bad point is reported as
/// [`SignatureError::BadSignature`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct VerifyingKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
    schema: SignSchema,
}

impl VerifyingKey {
    pub fn from_array(bytes: [u8; PUBLIC_KEY_LENGTH], schema: SignSchema) -> Self {
        Self { bytes, schema }
    }

    pub fn from_bytes(bytes: &[u8], schema: SignSchema) -> Result<Self, KeyError> {
        let bytes = <[u8; PUBLIC_KEY_LENGTH]>::try_from(bytes).map_err(|_| {
            KeyError::InvalidLength {
                expected: "32",
                actual: bytes.len(),
            }
        })?;
        Ok(Self { bytes, schema })
    }

    pub fn from_hex(hex_str: &str, schema: SignSchema) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|e| KeyError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes, schema)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    pub fn schema(&self) -> SignSchema {
        self.schema
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        self.schema.verify(&self.bytes, &signature.0, message)
    }

    /// Upper-case hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.bytes)
    }
}

impl Hash for VerifyingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
        self.schema.hash(state);
    }
}

impl fmt::Display for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerifyingKey({}, {})", &self.to_hex()[..16], self.schema)
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A 64-byte `R ‖ S` signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub(crate) [u8; SIGNATURE_LENGTH]);

impl Signature {
    pub fn from_array(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        <[u8; SIGNATURE_LENGTH]>::try_from(bytes)
            .map(Self)
            .map_err(|_| SignatureError::InvalidLength {
                what: "signature",
                expected: SIGNATURE_LENGTH,
                actual: bytes.len(),
            })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(hex_str).map_err(|e| SignatureError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "Signature({}...{})", &hex_str[..8], &hex_str[120..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: [u8; 32] = [7u8; 32];

    #[test]
    fn generated_keys_differ() {
        let a = SigningKey::generate(SignSchema::Sha3);
        let b = SigningKey::generate(SignSchema::Sha3);
        assert_ne!(a.public_key_bytes(), b.public_key_bytes());
    }

    #[test]
    fn sign_verify_roundtrip_under_both_schemas() {
        for schema in [SignSchema::Sha3, SignSchema::Sha2] {
            let key = SigningKey::from_seed(&SEED, schema);
            let sig = key.sign(b"transfer 10 xpx");
            assert!(key.verify(b"transfer 10 xpx", &sig).is_ok());
            assert_eq!(
                key.verify(b"transfer 11 xpx", &sig),
                Err(SignatureError::BadSignature)
            );
        }
    }

    #[test]
    fn schema_changes_the_public_key() {
        let sha3 = SigningKey::from_seed(&SEED, SignSchema::Sha3);
        let sha2 = SigningKey::from_seed(&SEED, SignSchema::Sha2);
        assert_ne!(sha3.public_key_bytes(), sha2.public_key_bytes());
    }

    #[test]
    fn signature_does_not_cross_schemas() {
        let sha3 = SigningKey::from_seed(&SEED, SignSchema::Sha3);
        let sig = sha3.sign(b"m");
        let foreign = VerifyingKey::from_array(sha3.public_key_bytes(), SignSchema::Sha2);
        assert_eq!(foreign.verify(b"m", &sig), Err(SignatureError::BadSignature));
    }

    #[test]
    fn sixty_four_byte_form_roundtrips() {
        let key = SigningKey::from_seed(&SEED, SignSchema::Sha3);
        let restored = SigningKey::from_bytes(&key.to_bytes(), SignSchema::Sha3).unwrap();
        assert_eq!(key, restored);
    }

    #[test]
    fn mismatched_public_half_is_rejected() {
        let key = SigningKey::from_seed(&SEED, SignSchema::Sha3);
        let mut bytes = key.to_bytes();
        bytes[40] ^= 1;
        assert_eq!(
            SigningKey::from_bytes(&bytes, SignSchema::Sha3),
            Err(KeyError::KeypairMismatch)
        );
        // Same bytes, other schema: the cached public key no longer matches.
        assert_eq!(
            SigningKey::from_bytes(&key.to_bytes(), SignSchema::Sha2),
            Err(KeyError::KeypairMismatch)
        );
    }

    #[test]
    fn bad_lengths_and_hex_are_rejected() {
        assert!(matches!(
            SigningKey::from_bytes(&[0u8; 31], SignSchema::Sha3),
            Err(KeyError::InvalidLength { actual: 31, .. })
        ));
        assert!(matches!(
            SigningKey::from_hex("not-hex", SignSchema::Sha3),
            Err(KeyError::InvalidHex(_))
        ));
        assert!(VerifyingKey::from_bytes(&[0u8; 33], SignSchema::Sha3).is_err());
        assert!(matches!(
            Signature::from_bytes(&[0u8; 63]),
            Err(SignatureError::InvalidLength {
                expected: 64,
                actual: 63,
                ..
            })
        ));
    }

    #[test]
    fn create_keypair_uses_supplied_entropy() {
        let key = create_keypair(SignSchema::Sha3, |seed| seed.copy_from_slice(&SEED));
        assert_eq!(key.seed(), &SEED);
        assert_eq!(key, SigningKey::from_seed(&SEED, SignSchema::Sha3));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let key = SigningKey::from_seed(&SEED, SignSchema::Sha3);
        let debug_str = format!("{:?}", key);
        assert!(debug_str.starts_with("SigningKey(pub="));
        assert!(!debug_str.contains(&hex::encode_upper(SEED)));
    }

    #[test]
    fn hex_forms_are_upper_case() {
        let key = SigningKey::from_seed(&SEED, SignSchema::Sha3);
        let pk = key.verifying_key().to_hex();
        assert_eq!(pk, pk.to_uppercase());
        let sig = key.sign(b"");
        assert_eq!(Signature::from_hex(&sig.to_hex()).unwrap(), sig);
    }

    #[test]
    fn schema_parses_from_str() {
        assert_eq!("SHA3".parse::<SignSchema>().unwrap(), SignSchema::Sha3);
        assert_eq!("sha2".parse::<SignSchema>().unwrap(), SignSchema::Sha2);
        assert!("md5".parse::<SignSchema>().is_err());
        assert_eq!(SignSchema::default(), SignSchema::Sha3);
    }
}
