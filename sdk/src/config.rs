//! # Protocol Configuration & Constants
//!
//! Every fixed number of the wire format lives here, next to the small
//! [`NetworkConfig`] record that tells a client which network it talks to.
//! Layout sizes are consensus rules: a header one byte off is a payload every
//! node rejects.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::crypto::SignSchema;
use crate::model::network::{GenerationHash, NetworkType};
use crate::transaction::fee::FeeCalculationStrategy;

// ---------------------------------------------------------------------------
// Transaction Layout
// ---------------------------------------------------------------------------

/// size ‖ signature ‖ signer ‖ version ‖ type ‖ max fee ‖ deadline.
pub const TRANSACTION_HEADER_SIZE: usize = 4 + 64 + 32 + 4 + 2 + 8 + 8;

/// size ‖ signer ‖ version ‖ type. Inner transactions of an aggregate share
/// the outer signature, fee and deadline.
pub const EMBEDDED_HEADER_SIZE: usize = 4 + 32 + 4 + 2;

/// Offsets into a standalone payload.
pub const SIGNATURE_OFFSET: usize = 4;
pub const SIGNER_OFFSET: usize = 68;
pub const VERSION_OFFSET: usize = 100;
pub const TYPE_OFFSET: usize = 104;

/// Bytes of a cosignature block appended to an aggregate: signer ‖ signature.
pub const COSIGNATURE_SIZE: usize = 32 + 64;

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// The network epoch, 2016-04-01T00:00:00Z, in Unix seconds. Deadlines count
/// milliseconds from here.
pub const NETWORK_EPOCH_SECONDS: i64 = 1_459_468_800;

/// Default validity window for a new transaction.
pub const DEFAULT_DEADLINE_HOURS: i64 = 2;

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

/// Root plus at most two levels of sub-namespaces.
pub const NAMESPACE_MAX_DEPTH: usize = 3;

/// Longest single segment of a namespace name.
pub const NAMESPACE_MAX_NAME_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Client configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which network to build and sign for.
///
/// Loaded from JSON such as:
///
/// ```json
/// {
///   "networkType": 144,
///   "generationHash": "7B631D803F912B00DC0CBED3014BBD17A302BA50B99D233B9C2D9533B842ABDF",
///   "feeStrategy": "middle",
///   "signSchema": "sha3"
/// }
/// ```
///
/// `feeStrategy` and `signSchema` are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub network_type: NetworkType,
    pub generation_hash: GenerationHash,
    #[serde(default)]
    pub fee_strategy: FeeCalculationStrategy,
    #[serde(default)]
    pub sign_schema: SignSchema,
}

impl NetworkConfig {
    pub fn new(network_type: NetworkType, generation_hash: GenerationHash) -> Self {
        Self {
            network_type,
            generation_hash,
            fee_strategy: FeeCalculationStrategy::default(),
            sign_schema: network_type.sign_schema(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEN_HASH: &str = "7B631D803F912B00DC0CBED3014BBD17A302BA50B99D233B9C2D9533B842ABDF";

    #[test]
    fn header_sizes() {
        assert_eq!(TRANSACTION_HEADER_SIZE, 122);
        assert_eq!(EMBEDDED_HEADER_SIZE, 42);
        assert_eq!(TYPE_OFFSET + 2 + 8 + 8, TRANSACTION_HEADER_SIZE);
    }

    #[test]
    fn config_parses_with_defaults() {
        let json = format!(r#"{{"networkType": 144, "generationHash": "{GEN_HASH}"}}"#);
        let config = NetworkConfig::from_json(&json).unwrap();
        assert_eq!(config.network_type, NetworkType::MijinTest);
        assert_eq!(config.generation_hash.to_hex(), GEN_HASH);
        assert_eq!(config.fee_strategy, FeeCalculationStrategy::Middle);
        assert_eq!(config.sign_schema, SignSchema::Sha3);
    }

    #[test]
    fn config_roundtrips_through_json() {
        let mut config = NetworkConfig::new(NetworkType::TestNet, GEN_HASH.parse().unwrap());
        config.fee_strategy = FeeCalculationStrategy::Zero;
        config.sign_schema = SignSchema::Sha2;
        let json = config.to_json().unwrap();
        assert!(json.contains("\"feeStrategy\": \"zero\""));
        assert_eq!(NetworkConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn bad_config_is_an_error() {
        assert!(NetworkConfig::from_json(r#"{"networkType": 1}"#).is_err());
        assert!(matches!(
            NetworkConfig::load("/nonexistent/xpx.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
