//! Account properties: allow or block lists of addresses, mosaics or
//! transaction types.
//!
//! The three wire variants share one layout and differ only in the value
//! they list, so they share one generic body parameterized by
//! [`PropertyValue`].

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::builder::{Transaction, TransactionBody};
use super::types::{PropertyModificationType, PropertyType, TransactionType};
use super::TransactionError;
use crate::codec::{CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError, DtoCodec};
use crate::model::account::Address;
use crate::model::deadline::Deadline;
use crate::model::mosaic::MosaicId;
use crate::model::network::NetworkType;

/// A value an account property can list.
pub trait PropertyValue: CatbufferCodec + DtoCodec + Clone + PartialEq + Debug {
    /// Property type code with the block bit cleared.
    const KIND: u8;

    fn into_body(body: AccountPropertiesTransaction<Self>) -> TransactionBody;
}

impl PropertyValue for Address {
    const KIND: u8 = 0x01;

    fn into_body(body: AccountPropertiesTransaction<Self>) -> TransactionBody {
        TransactionBody::AccountPropertiesAddress(body)
    }
}

impl PropertyValue for MosaicId {
    const KIND: u8 = 0x02;

    fn into_body(body: AccountPropertiesTransaction<Self>) -> TransactionBody {
        TransactionBody::AccountPropertiesMosaic(body)
    }
}

impl PropertyValue for TransactionType {
    const KIND: u8 = 0x04;

    fn into_body(body: AccountPropertiesTransaction<Self>) -> TransactionBody {
        TransactionBody::AccountPropertiesEntityType(body)
    }
}

fn check_property_type<V: PropertyValue>(property_type: PropertyType) -> Result<(), CodecError> {
    if property_type.code() & 0x7F != V::KIND {
        return Err(CodecError::InvalidField {
            field: "property type",
            reason: format!("{property_type:?} cannot list this kind of value"),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPropertyModification<V> {
    pub kind: PropertyModificationType,
    pub value: V,
}

impl<V> AccountPropertyModification<V> {
    pub fn new(kind: PropertyModificationType, value: V) -> Self {
        Self { kind, value }
    }
}

impl<V: PropertyValue> CatbufferCodec for AccountPropertyModification<V> {
    fn catbuffer_size(&self) -> usize {
        1 + self.value.catbuffer_size()
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_item(&self.kind)?;
        writer.write_item(&self.value)
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            kind: reader.read_item()?,
            value: reader.read_item()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPropertyModificationDto<D> {
    #[serde(rename = "type")]
    pub kind: PropertyModificationType,
    pub value: D,
}

impl<V: PropertyValue> DtoCodec for AccountPropertyModification<V> {
    type Dto = AccountPropertyModificationDto<V::Dto>;

    fn to_dto(&self) -> Self::Dto {
        AccountPropertyModificationDto {
            kind: self.kind,
            value: self.value.to_dto(),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            kind: dto.kind,
            value: V::from_dto(dto.value, network_type)?,
        })
    }
}

/// Body layout: `property type u8 ‖ count u8 ‖ (modification type u8 ‖ value)*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPropertiesTransaction<V> {
    pub property_type: PropertyType,
    pub modifications: Vec<AccountPropertyModification<V>>,
}

impl<V: PropertyValue> AccountPropertiesTransaction<V> {
    /// Fails when `property_type` lists a different kind of value than `V`.
    pub fn create(
        deadline: Deadline,
        property_type: PropertyType,
        modifications: Vec<AccountPropertyModification<V>>,
        network_type: NetworkType,
    ) -> Result<Transaction, TransactionError> {
        check_property_type::<V>(property_type)?;
        let body = Self {
            property_type,
            modifications,
        };
        Ok(Transaction::new(network_type, deadline, V::into_body(body)))
    }
}

impl<V: PropertyValue> CatbufferCodec for AccountPropertiesTransaction<V> {
    fn catbuffer_size(&self) -> usize {
        1 + 1
            + self
                .modifications
                .iter()
                .map(CatbufferCodec::catbuffer_size)
                .sum::<usize>()
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        check_property_type::<V>(self.property_type)?;
        writer.write_item(&self.property_type)?;
        writer.write_len::<u8>(self.modifications.len())?;
        for modification in &self.modifications {
            writer.write_item(modification)?;
        }
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        let property_type = reader.read_item()?;
        check_property_type::<V>(property_type)?;
        let count: u8 = reader.read()?;
        Ok(Self {
            property_type,
            modifications: reader.read_items(count.into())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPropertiesTransactionDto<D> {
    pub property_type: PropertyType,
    pub modifications: Vec<AccountPropertyModificationDto<D>>,
}

impl<V: PropertyValue> DtoCodec for AccountPropertiesTransaction<V> {
    type Dto = AccountPropertiesTransactionDto<V::Dto>;

    fn to_dto(&self) -> Self::Dto {
        AccountPropertiesTransactionDto {
            property_type: self.property_type,
            modifications: self.modifications.iter().map(DtoCodec::to_dto).collect(),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        check_property_type::<V>(dto.property_type)?;
        Ok(Self {
            property_type: dto.property_type,
            modifications: dto
                .modifications
                .into_iter()
                .map(|m| AccountPropertyModification::from_dto(m, network_type))
                .collect::<Result<_, _>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_type_values_are_two_byte_codes() {
        let body = AccountPropertiesTransaction {
            property_type: PropertyType::BlockTransaction,
            modifications: vec![AccountPropertyModification::new(
                PropertyModificationType::Add,
                TransactionType::Transfer,
            )],
        };
        assert_eq!(hex::encode(body.to_catbuffer().unwrap()), "8401005441");
        assert_eq!(
            AccountPropertiesTransaction::<TransactionType>::from_catbuffer(
                &[0x84, 1, 0, 0x54, 0x41],
                NetworkType::MijinTest
            )
            .unwrap(),
            body
        );
    }

    #[test]
    fn mismatched_property_type_is_rejected() {
        let err = AccountPropertiesTransaction::<MosaicId>::create(
            Deadline::from_timestamp(1),
            PropertyType::AllowAddress,
            vec![],
            NetworkType::MijinTest,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Codec(CodecError::InvalidField { .. })
        ));
        assert!(AccountPropertiesTransaction::<Address>::from_catbuffer(
            &[0x02, 0],
            NetworkType::MijinTest
        )
        .is_err());
    }

    #[test]
    fn address_property_dto() {
        let address: Address = "SD5DT3CH4BLABL5HIMEKP2TAPUKF4NY3L5HRIR54".parse().unwrap();
        let body = AccountPropertiesTransaction {
            property_type: PropertyType::AllowAddress,
            modifications: vec![AccountPropertyModification::new(
                PropertyModificationType::Remove,
                address,
            )],
        };
        assert_eq!(body.catbuffer_size(), 2 + 26);
        let json = serde_json::to_value(body.to_dto()).unwrap();
        assert_eq!(json["propertyType"], 1);
        assert_eq!(json["modifications"][0]["type"], 1);
        assert_eq!(json["modifications"][0]["value"], address.to_dto());
        let dto = serde_json::from_value(json).unwrap();
        assert_eq!(
            AccountPropertiesTransaction::<Address>::from_dto(dto, NetworkType::MijinTest)
                .unwrap(),
            body
        );
    }
}
