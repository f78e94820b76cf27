//! Chain-assigned metadata about an announced transaction.

use serde::{Deserialize, Serialize};

use crate::codec::{decode_hex_array, hex_upper, CodecError, StdInt, Uint64Dto};

/// Where a transaction landed on chain, as reported by a node.
///
/// `height == 0` means the node knows the transaction but has not put it in
/// a block yet. Embedded transactions report the hash and id of their
/// enclosing aggregate instead of their own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionInfo {
    pub height: u64,
    pub index: u32,
    pub id: String,
    pub hash: Option<[u8; 32]>,
    pub merkle_component_hash: Option<[u8; 32]>,
    pub aggregate_hash: Option<[u8; 32]>,
    pub aggregate_id: Option<String>,
}

impl TransactionInfo {
    pub fn is_confirmed(&self) -> bool {
        self.height > 0
    }

    pub fn is_unconfirmed(&self) -> bool {
        self.height == 0
    }

    /// True for embedded transactions, which carry their aggregate's identity.
    pub fn is_embedded(&self) -> bool {
        self.aggregate_hash.is_some() || self.aggregate_id.is_some()
    }

    pub fn to_dto(&self) -> TransactionInfoDto {
        TransactionInfoDto {
            height: self.height.to_dto(),
            index: self.index,
            id: self.id.clone(),
            hash: self.hash.map(hex_upper),
            merkle_component_hash: self.merkle_component_hash.map(hex_upper),
            aggregate_hash: self.aggregate_hash.map(hex_upper),
            aggregate_id: self.aggregate_id.clone(),
        }
    }

    pub fn from_dto(dto: TransactionInfoDto) -> Result<Self, CodecError> {
        let hash32 = |field: &'static str, value: Option<String>| {
            value
                .map(|v| decode_hex_array::<32>(field, &v))
                .transpose()
        };
        Ok(Self {
            height: u64::from_dto(dto.height),
            index: dto.index,
            id: dto.id,
            hash: hash32("meta.hash", dto.hash)?,
            merkle_component_hash: hash32("meta.merkleComponentHash", dto.merkle_component_hash)?,
            aggregate_hash: hash32("meta.aggregateHash", dto.aggregate_hash)?,
            aggregate_id: dto.aggregate_id,
        })
    }
}

/// The `meta` object of a REST transaction document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfoDto {
    pub height: Uint64Dto,
    pub index: u32,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merkle_component_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_decides_confirmation() {
        let mut info = TransactionInfo::default();
        assert!(info.is_unconfirmed());
        info.height = 12;
        assert!(info.is_confirmed());
        assert!(!info.is_embedded());
    }

    #[test]
    fn dto_roundtrip_through_json() {
        let info = TransactionInfo {
            height: 1 << 33,
            index: 4,
            id: "5C9A5A8B0E1A2B3C4D5E6F70".to_string(),
            hash: Some([0xAB; 32]),
            merkle_component_hash: Some([0xCD; 32]),
            aggregate_hash: None,
            aggregate_id: None,
        };
        let json = serde_json::to_value(info.to_dto()).unwrap();
        assert_eq!(json["height"], serde_json::json!([0, 2]));
        assert!(json.get("aggregateHash").is_none());
        let dto: TransactionInfoDto = serde_json::from_value(json).unwrap();
        assert_eq!(TransactionInfo::from_dto(dto).unwrap(), info);
    }
}
