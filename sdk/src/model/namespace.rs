//! Namespace identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::identifier;
use super::network::NetworkType;
use super::ModelError;
use crate::codec::{
    CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError, DtoCodec, StdInt, Uint64Dto,
};

/// A 64-bit namespace id. Derived ids always have the top bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespaceId(pub u64);

impl NamespaceId {
    /// Id of the last segment of a dotted name like `"xpx.asset"`.
    pub fn from_name(name: &str) -> Result<Self, ModelError> {
        let path = identifier::generate_namespace_id(name)?;
        path.last().copied().ok_or_else(|| ModelError::InvalidNamespaceName {
            name: name.to_string(),
            reason: "empty name".to_string(),
        })
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn to_hex(self) -> String {
        format!("{:016X}", self.0)
    }
}

impl From<u64> for NamespaceId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl CatbufferCodec for NamespaceId {
    fn catbuffer_size(&self) -> usize {
        u64::BYTES
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write(self.0);
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        reader.read::<u64>().map(Self)
    }
}

impl DtoCodec for NamespaceId {
    type Dto = Uint64Dto;

    fn to_dto(&self) -> Self::Dto {
        self.0.to_dto()
    }

    fn from_dto(dto: Self::Dto, _network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self(u64::from_dto(dto)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_takes_the_leaf() {
        let id = NamespaceId::from_name("sample.sub.full").unwrap();
        assert_eq!(id, NamespaceId(0x8BC7_011B_0B34_4C54));
        assert_eq!(id.to_hex(), "8BC7011B0B344C54");
    }

    #[test]
    fn dto_is_low_high_pair() {
        let id = NamespaceId(0x8BC7_011B_0B34_4C54);
        assert_eq!(serde_json::to_value(id.to_dto()).unwrap(), serde_json::json!([0x0B34_4C54u32, 0x8BC7_011Bu32]));
        assert_eq!(NamespaceId::from_dto(id.to_dto(), NetworkType::MijinTest).unwrap(), id);
    }
}
