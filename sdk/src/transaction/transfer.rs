//! Transfer transactions: mosaics and a message to one recipient.

use serde::{Deserialize, Serialize};

use super::builder::{Transaction, TransactionBody};
use crate::codec::{
    CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError, DtoCodec,
};
use crate::model::account::Address;
use crate::model::deadline::Deadline;
use crate::model::message::{Message, MessageDto};
use crate::model::mosaic::{Mosaic, MosaicDto};
use crate::model::network::NetworkType;

/// Body layout:
///
/// ```text
/// recipient 25 ‖ message size u16 ‖ mosaic count u8 ‖ message ‖ (id u64 ‖ amount u64)*
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTransaction {
    pub recipient: Address,
    pub mosaics: Vec<Mosaic>,
    pub message: Message,
}

impl TransferTransaction {
    pub fn create(
        deadline: Deadline,
        recipient: Address,
        mosaics: Vec<Mosaic>,
        message: Message,
        network_type: NetworkType,
    ) -> Transaction {
        Transaction::new(
            network_type,
            deadline,
            TransactionBody::Transfer(Self {
                recipient,
                mosaics,
                message,
            }),
        )
    }
}

impl CatbufferCodec for TransferTransaction {
    fn catbuffer_size(&self) -> usize {
        25 + 2 + 1 + self.message.catbuffer_size() + 16 * self.mosaics.len()
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_item(&self.recipient)?;
        writer.write_len::<u16>(self.message.catbuffer_size())?;
        writer.write_len::<u8>(self.mosaics.len())?;
        writer.write_item(&self.message)?;
        for mosaic in &self.mosaics {
            writer.write_item(mosaic)?;
        }
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        let recipient = reader.read_item()?;
        let message_size: u16 = reader.read()?;
        let mosaic_count: u8 = reader.read()?;
        let message = if message_size == 0 {
            Message::empty()
        } else {
            let mut sub = reader.sub_reader(message_size.into())?;
            let message = sub.read_item()?;
            sub.finish()?;
            message
        };
        let mosaics = reader.read_items(mosaic_count.into())?;
        Ok(Self {
            recipient,
            mosaics,
            message,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferTransactionDto {
    pub recipient: String,
    #[serde(default)]
    pub mosaics: Vec<MosaicDto>,
    pub message: MessageDto,
}

impl DtoCodec for TransferTransaction {
    type Dto = TransferTransactionDto;

    fn to_dto(&self) -> Self::Dto {
        TransferTransactionDto {
            recipient: self.recipient.to_dto(),
            mosaics: self.mosaics.iter().map(DtoCodec::to_dto).collect(),
            message: self.message.to_dto(),
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            recipient: Address::from_dto(dto.recipient, network_type)?,
            mosaics: dto
                .mosaics
                .into_iter()
                .map(|m| Mosaic::from_dto(m, network_type))
                .collect::<Result<_, _>>()?,
            message: Message::from_dto(dto.message, network_type)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransferTransaction {
        TransferTransaction {
            recipient: "SD5DT3CH4BLABL5HIMEKP2TAPUKF4NY3L5HRIR54".parse().unwrap(),
            mosaics: vec![Mosaic::new(5u64, 1000)],
            message: Message::plain("Hello world!"),
        }
    }

    #[test]
    fn body_layout_matches_fixture() {
        let body = sample().to_catbuffer().unwrap();
        assert_eq!(
            hex::encode(body),
            "90fa39ec47e05600afa74308a7ea607d145e371b5f4f1447bc0d00010048656c6c6f20776f726c6421\
             0500000000000000e803000000000000"
        );
    }

    #[test]
    fn empty_message_has_zero_size() {
        let body = TransferTransaction {
            message: Message::empty(),
            mosaics: vec![],
            ..sample()
        };
        let bytes = body.to_catbuffer().unwrap();
        // An empty plain message still writes its type byte.
        assert_eq!(&bytes[25..28], &[1, 0, 0]);
        assert_eq!(
            TransferTransaction::from_catbuffer(&bytes, NetworkType::MijinTest).unwrap(),
            body
        );
    }

    #[test]
    fn too_many_mosaics_overflow_the_count() {
        let body = TransferTransaction {
            mosaics: vec![Mosaic::new(1u64, 1); 256],
            ..sample()
        };
        assert!(matches!(
            body.to_catbuffer(),
            Err(CodecError::Overflow { width: "u8", .. })
        ));
    }

    #[test]
    fn truncated_body_is_rejected() {
        let bytes = sample().to_catbuffer().unwrap();
        assert!(matches!(
            TransferTransaction::from_catbuffer(&bytes[..bytes.len() - 1], NetworkType::MijinTest),
            Err(CodecError::Truncated { .. })
        ));
    }

    #[test]
    fn dto_fields() {
        let dto = sample().to_dto();
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["recipient"].as_str().unwrap().len(), 50);
        assert_eq!(json["mosaics"][0]["amount"], serde_json::json!([1000, 0]));
        assert_eq!(json["message"]["payload"], "48656C6C6F20776F726C6421");
        assert_eq!(
            TransferTransaction::from_dto(dto, NetworkType::MijinTest).unwrap(),
            sample()
        );
    }
}
