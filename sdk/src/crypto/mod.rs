//! # Cryptographic Primitives
//!
//! Everything the transaction layer needs to hash and sign:
//!
//! - **hash**: streaming Keccak / SHA3 / SHA-2 / RIPEMD160 digests.
//! - **ed25519**: Ed25519 generic over its 512-bit hash, on top of
//!   `curve25519-dalek` group arithmetic.
//! - **keys** / **signatures**: typed keys that carry their [`SignSchema`].
//!
//! Nothing here is hand-rolled below the group law. Field arithmetic, the
//! precomputed base-point table and scalar reduction all come from
//! `curve25519-dalek`; the digests come from the RustCrypto crates.

pub mod ed25519;
pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{double_sha256, hash160, keccak_256, ripemd160, sha256, sha3_256, HashAlgorithm, Hasher};
pub use keys::{create_keypair, KeyError, SignSchema, Signature, SigningKey, VerifyingKey};
pub use signatures::{batch_verify, sign, verify, verify_raw, SignatureError};
