//! Network identity: the one-byte network type and the generation hash.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ModelError;
use crate::codec::hex_upper;
use crate::crypto::SignSchema;

/// The network a key, address or transaction belongs to.
///
/// The code is the first byte of every raw address and the high byte of
/// every transaction version word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NetworkType {
    MainNet,
    TestNet,
    Private,
    PrivateTest,
    Mijin,
    MijinTest,
}

impl NetworkType {
    pub const ALL: [NetworkType; 6] = [
        NetworkType::MainNet,
        NetworkType::TestNet,
        NetworkType::Private,
        NetworkType::PrivateTest,
        NetworkType::Mijin,
        NetworkType::MijinTest,
    ];

    pub fn code(self) -> u8 {
        match self {
            NetworkType::MainNet => 0xB8,
            NetworkType::TestNet => 0xA8,
            NetworkType::Private => 0xC8,
            NetworkType::PrivateTest => 0xB0,
            NetworkType::Mijin => 0x60,
            NetworkType::MijinTest => 0x90,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, ModelError> {
        Self::ALL
            .into_iter()
            .find(|n| n.code() == code)
            .ok_or(ModelError::UnknownNetworkType(code))
    }

    /// The Ed25519 hash variant keys on this network are expanded with.
    pub fn sign_schema(self) -> SignSchema {
        SignSchema::Sha3
    }

    pub fn name(self) -> &'static str {
        match self {
            NetworkType::MainNet => "MAIN_NET",
            NetworkType::TestNet => "TEST_NET",
            NetworkType::Private => "PRIVATE",
            NetworkType::PrivateTest => "PRIVATE_TEST",
            NetworkType::Mijin => "MIJIN",
            NetworkType::MijinTest => "MIJIN_TEST",
        }
    }
}

impl From<NetworkType> for u8 {
    fn from(network: NetworkType) -> Self {
        network.code()
    }
}

impl TryFrom<u8> for NetworkType {
    type Error = ModelError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        NetworkType::from_code(code)
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkType {
    type Err = ModelError;

    /// Accepts the canonical name in any case, with `-` or `_`, or the code
    /// as a decimal or `0x` hex number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        if let Some(found) = Self::ALL.into_iter().find(|n| n.name() == normalized) {
            return Ok(found);
        }
        let code = match normalized.strip_prefix("0X") {
            Some(hex_digits) => u8::from_str_radix(hex_digits, 16),
            None => normalized.parse::<u8>(),
        }
        .map_err(|_| ModelError::UnknownNetworkName(s.to_string()))?;
        Self::from_code(code)
    }
}

/// The 32-byte hash of a network's genesis block.
///
/// Mixed into every signature so a payload signed for one network is
/// worthless on another.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationHash(pub [u8; 32]);

impl GenerationHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex_upper(self.0)
    }
}

impl FromStr for GenerationHash {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| ModelError::InvalidGenerationHash(e.to_string()))?;
        let bytes = <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
            ModelError::InvalidGenerationHash(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for GenerationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for GenerationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GenerationHash({})", self.to_hex())
    }
}

impl Serialize for GenerationHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for GenerationHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for network in NetworkType::ALL {
            assert_eq!(NetworkType::from_code(network.code()).unwrap(), network);
        }
        assert_eq!(NetworkType::MijinTest.code(), 0x90);
        assert_eq!(NetworkType::MainNet.code(), 0xB8);
        assert!(NetworkType::from_code(0x00).is_err());
    }

    #[test]
    fn parses_names_and_codes() {
        assert_eq!("mijin-test".parse::<NetworkType>().unwrap(), NetworkType::MijinTest);
        assert_eq!("TEST_NET".parse::<NetworkType>().unwrap(), NetworkType::TestNet);
        assert_eq!("0xb8".parse::<NetworkType>().unwrap(), NetworkType::MainNet);
        assert_eq!("144".parse::<NetworkType>().unwrap(), NetworkType::MijinTest);
        assert_eq!("96".parse::<NetworkType>().unwrap(), NetworkType::Mijin);
        assert!("moon".parse::<NetworkType>().is_err());
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&NetworkType::MijinTest).unwrap(), "144");
        let back: NetworkType = serde_json::from_str("168").unwrap();
        assert_eq!(back, NetworkType::TestNet);
        assert!(serde_json::from_str::<NetworkType>("1").is_err());
    }

    #[test]
    fn generation_hash_parses_64_hex_chars() {
        let hex_str = "7B631D803F912B00DC0CBED3014BBD17A302BA50B99D233B9C2D9533B842ABDF";
        let hash: GenerationHash = hex_str.parse().unwrap();
        assert_eq!(hash.to_hex(), hex_str);
        assert!("7B631D".parse::<GenerationHash>().is_err());
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{hex_str}\""));
    }
}
