//! # Hashing Utilities
//!
//! Content hashes used for address derivation, identifier generation,
//! secret locks and transaction hashes. Four families are supported:
//!
//! - **SHA3**: the network's workhorse. Addresses, mosaic and namespace
//!   ids and transaction hashes are all SHA3-256.
//! - **Keccak**: the pre-standard SHA3 (same sponge, `0x01` padding instead
//!   of `0x06`). Needed for secret locks that interoperate with Ethereum.
//! - **SHA-2**: SHA-512 drives the "sha2" Ed25519 variant, SHA-256 backs
//!   the Hash160 and double-SHA-256 secret types.
//! - **RIPEMD160**: the 20-byte middle step of address derivation.
//!
//! ## Streaming
//!
//! [`Hasher`] wraps any of these behind one streaming interface:
//! `update` as often as you like, then `digest`. The digest is computed from
//! a snapshot of the sponge and cached, so calling `digest` twice does not
//! re-absorb anything. A later `update` keeps absorbing and drops the cache.

use std::fmt;

use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::digest::DynDigest;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use sha3::{Keccak224, Keccak256, Keccak384, Keccak512, Sha3_224, Sha3_256, Sha3_384, Sha3_512};

/// Every hash function the SDK knows how to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Keccak224,
    Keccak256,
    Keccak384,
    Keccak512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Ripemd160,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    pub fn digest_size(self) -> usize {
        match self {
            Self::Keccak224 | Self::Sha3_224 | Self::Sha224 => 28,
            Self::Keccak256 | Self::Sha3_256 | Self::Sha256 => 32,
            Self::Keccak384 | Self::Sha3_384 | Self::Sha384 => 48,
            Self::Keccak512 | Self::Sha3_512 | Self::Sha512 => 64,
            Self::Ripemd160 => 20,
        }
    }

    /// Sponge rate in bytes for the Keccak/SHA3 family, `None` otherwise.
    ///
    /// Capacity is twice the output size; rate is what is left of the
    /// 1600-bit state.
    pub fn sponge_rate(self) -> Option<usize> {
        match self {
            Self::Keccak224
            | Self::Keccak256
            | Self::Keccak384
            | Self::Keccak512
            | Self::Sha3_224
            | Self::Sha3_256
            | Self::Sha3_384
            | Self::Sha3_512 => Some(200 - 2 * self.digest_size()),
            _ => None,
        }
    }

    /// Start a new streaming hasher.
    pub fn hasher(self) -> Hasher {
        Hasher::new(self)
    }

    fn boxed_state(self) -> Box<dyn DynDigest> {
        match self {
            Self::Keccak224 => Box::new(Keccak224::new()),
            Self::Keccak256 => Box::new(Keccak256::new()),
            Self::Keccak384 => Box::new(Keccak384::new()),
            Self::Keccak512 => Box::new(Keccak512::new()),
            Self::Sha3_224 => Box::new(Sha3_224::new()),
            Self::Sha3_256 => Box::new(Sha3_256::new()),
            Self::Sha3_384 => Box::new(Sha3_384::new()),
            Self::Sha3_512 => Box::new(Sha3_512::new()),
            Self::Sha224 => Box::new(Sha224::new()),
            Self::Sha256 => Box::new(Sha256::new()),
            Self::Sha384 => Box::new(Sha384::new()),
            Self::Sha512 => Box::new(Sha512::new()),
            Self::Ripemd160 => Box::new(Ripemd160::new()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Keccak224 => "keccak-224",
            Self::Keccak256 => "keccak-256",
            Self::Keccak384 => "keccak-384",
            Self::Keccak512 => "keccak-512",
            Self::Sha3_224 => "sha3-224",
            Self::Sha3_256 => "sha3-256",
            Self::Sha3_384 => "sha3-384",
            Self::Sha3_512 => "sha3-512",
            Self::Sha224 => "sha-224",
            Self::Sha256 => "sha-256",
            Self::Sha384 => "sha-384",
            Self::Sha512 => "sha-512",
            Self::Ripemd160 => "ripemd-160",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "keccak224" => Ok(Self::Keccak224),
            "keccak256" => Ok(Self::Keccak256),
            "keccak384" => Ok(Self::Keccak384),
            "keccak512" => Ok(Self::Keccak512),
            "sha3224" => Ok(Self::Sha3_224),
            "sha3256" => Ok(Self::Sha3_256),
            "sha3384" => Ok(Self::Sha3_384),
            "sha3512" => Ok(Self::Sha3_512),
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            "ripemd160" => Ok(Self::Ripemd160),
            _ => Err(format!("unknown hash algorithm: {}", s)),
        }
    }
}

/// A streaming hasher over any [`HashAlgorithm`].
///
/// Owned by one caller at a time; share the finished digest, not the
/// hasher.
pub struct Hasher {
    algorithm: HashAlgorithm,
    state: Box<dyn DynDigest>,
    digest: Option<Box<[u8]>>,
}

impl Hasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            state: algorithm.boxed_state(),
            digest: None,
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn digest_size(&self) -> usize {
        self.algorithm.digest_size()
    }

    /// Absorb more input.
    pub fn update(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        self.state.update(data.as_ref());
        self.digest = None;
        self
    }

    /// Finalize and return the digest. Idempotent until the next `update`.
    pub fn digest(&mut self) -> &[u8] {
        let state = &self.state;
        self.digest
            .get_or_insert_with(|| state.box_clone().finalize())
    }

    /// Upper-case hex of [`digest`](Self::digest).
    pub fn hexdigest(&mut self) -> String {
        hex::encode_upper(self.digest())
    }
}

impl Clone for Hasher {
    fn clone(&self) -> Self {
        Self {
            algorithm: self.algorithm,
            state: self.state.box_clone(),
            digest: self.digest.clone(),
        }
    }
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("algorithm", &self.algorithm)
            .field("finalized", &self.digest.is_some())
            .finish()
    }
}

fn fixed<D: Digest, const N: usize>(data: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&D::digest(data));
    out
}

/// One-shot digest with any algorithm.
pub fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    hasher.digest().to_vec()
}

/// SHA3-256. Addresses, identifiers and transaction hashes.
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    fixed::<Sha3_256, 32>(data)
}

/// SHA3-256 over several parts without concatenating them first.
pub fn sha3_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    for part in parts {
        Digest::update(&mut hasher, part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Keccak-256 (pre-standard padding).
pub fn keccak_256(data: &[u8]) -> [u8; 32] {
    fixed::<Keccak256, 32>(data)
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    fixed::<Sha256, 32>(data)
}

/// `SHA-256(SHA-256(data))`.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    fixed::<Ripemd160, 20>(data)
}

/// `RIPEMD160(SHA-256(data))`, Bitcoin's Hash160.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hex_of(algorithm: HashAlgorithm, data: &[u8]) -> String {
        hex::encode(digest(algorithm, data))
    }

    #[test]
    fn keccak_differs_from_sha3_on_empty_input() {
        assert_eq!(
            hex_of(HashAlgorithm::Keccak256, b""),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            hex_of(HashAlgorithm::Sha3_256, b""),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn known_vectors_on_ascii_input() {
        assert_eq!(
            hex_of(HashAlgorithm::Keccak256, b"abc"),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
        assert_eq!(
            hex_of(HashAlgorithm::Sha3_256, b"abc"),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
        assert_eq!(
            hex_of(HashAlgorithm::Ripemd160, b"abc"),
            "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc"
        );
        assert_eq!(
            hex_of(HashAlgorithm::Sha256, b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn keccak_512_empty() {
        assert_eq!(
            hex_of(HashAlgorithm::Keccak512, b""),
            "0eab42de4c3ceb9235fc91acffe746b29c29a8c366b7c60e4e67c466f36a4304\
             c00fa9caf9d87976ba469bcbe06713b435f091ef2769fb160cdab33d3670680e"
        );
    }

    #[test]
    fn keccak_on_multibyte_utf8() {
        assert_eq!(
            hex::encode(keccak_256("Привет".as_bytes())),
            "a7cc6cc07e9c60cfc722c1ab82d5c78dacc70238b47961cc4c5c067335ca9f07"
        );
    }

    #[test]
    fn digest_sizes_match_algorithms() {
        for algorithm in [
            HashAlgorithm::Keccak224,
            HashAlgorithm::Keccak384,
            HashAlgorithm::Sha3_512,
            HashAlgorithm::Sha224,
            HashAlgorithm::Sha384,
            HashAlgorithm::Ripemd160,
        ] {
            let mut hasher = algorithm.hasher();
            hasher.update(b"size check");
            assert_eq!(hasher.digest().len(), algorithm.digest_size(), "{}", algorithm);
        }
    }

    #[test]
    fn sponge_rates() {
        assert_eq!(HashAlgorithm::Keccak256.sponge_rate(), Some(136));
        assert_eq!(HashAlgorithm::Sha3_512.sponge_rate(), Some(72));
        assert_eq!(HashAlgorithm::Keccak224.sponge_rate(), Some(144));
        assert_eq!(HashAlgorithm::Sha256.sponge_rate(), None);
    }

    #[test]
    fn digest_is_idempotent() {
        let mut hasher = Hasher::new(HashAlgorithm::Keccak256);
        hasher.update(b"once");
        let first = hasher.digest().to_vec();
        let second = hasher.digest().to_vec();
        assert_eq!(first, second);
        assert_eq!(first, keccak_256(b"once").to_vec());
    }

    #[test]
    fn update_after_digest_keeps_absorbing() {
        let mut hasher = Hasher::new(HashAlgorithm::Sha3_256);
        hasher.update(b"hello");
        let _ = hasher.digest();
        hasher.update(b" world");
        assert_eq!(hasher.digest(), sha3_256(b"hello world").as_slice());
    }

    #[test]
    fn hexdigest_is_upper_case() {
        let mut hasher = Hasher::new(HashAlgorithm::Sha3_256);
        hasher.update(b"abc");
        assert_eq!(
            hasher.hexdigest(),
            "3A985DA74FE225B2045C172D6BD390BD855F086E3E9D525B46BFE24511431532"
        );
    }

    #[test]
    fn multi_part_equals_concatenation() {
        assert_eq!(sha3_256_multi(&[&b"ab"[..], &b"c"[..]]), sha3_256(b"abc"));
    }

    #[test]
    fn hash160_and_double_sha256_compose() {
        assert_eq!(hash160(b"x"), ripemd160(&sha256(b"x")));
        assert_eq!(double_sha256(b"x"), sha256(&sha256(b"x")));
    }

    #[test]
    fn algorithm_names_parse() {
        assert_eq!("keccak-256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Keccak256));
        assert_eq!("SHA3_512".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha3_512));
        assert!("md5".parse::<HashAlgorithm>().is_err());
    }

    proptest! {
        #[test]
        fn prop_split_updates_match_single_update(
            data in proptest::collection::vec(any::<u8>(), 0..512),
            split in 0usize..512,
        ) {
            let split = split.min(data.len());
            let mut streamed = Hasher::new(HashAlgorithm::Keccak512);
            streamed.update(&data[..split]).update(&data[split..]);
            let mut single = Hasher::new(HashAlgorithm::Keccak512);
            single.update(&data);
            prop_assert_eq!(streamed.digest(), single.digest());
        }
    }
}
