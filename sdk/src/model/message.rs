//! Transfer messages.

use serde::{Deserialize, Serialize};

use super::network::NetworkType;
use crate::codec::{
    decode_hex, hex_upper, CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError, DtoCodec,
};

/// How the payload should be read by the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageType {
    #[default]
    Plain,
    /// Encrypted for the recipient. Opaque to this crate.
    Secure,
}

impl MessageType {
    pub fn code(self) -> u8 {
        match self {
            MessageType::Plain => 0,
            MessageType::Secure => 1,
        }
    }

    pub fn from_code(code: u8) -> Result<Self, CodecError> {
        match code {
            0 => Ok(MessageType::Plain),
            1 => Ok(MessageType::Secure),
            other => Err(CodecError::UnknownCode {
                kind: "message type",
                code: other.into(),
            }),
        }
    }
}

/// A message attached to a transfer: a type byte and raw payload.
///
/// On the wire the type byte counts toward the message size field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Message {
    pub kind: MessageType,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: MessageType::Plain,
            payload: text.into().into_bytes(),
        }
    }

    pub fn secure(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: MessageType::Secure,
            payload: payload.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The payload as UTF-8, if it is.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    #[serde(rename = "type")]
    pub kind: u8,
    pub payload: String,
}

impl CatbufferCodec for Message {
    fn catbuffer_size(&self) -> usize {
        1 + self.payload.len()
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write(self.kind.code());
        writer.write_bytes(&self.payload);
        Ok(())
    }

    /// Reads the type byte and then everything left in `reader`; callers
    /// hand in a sub-reader bounded by the message size field.
    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        let kind = MessageType::from_code(reader.read()?)?;
        let len = reader.remaining();
        let payload = reader.take(len)?.to_vec();
        Ok(Self { kind, payload })
    }
}

impl DtoCodec for Message {
    type Dto = MessageDto;

    fn to_dto(&self) -> Self::Dto {
        MessageDto {
            kind: self.kind.code(),
            payload: hex_upper(&self.payload),
        }
    }

    fn from_dto(dto: Self::Dto, _network_type: NetworkType) -> Result<Self, CodecError> {
        Ok(Self {
            kind: MessageType::from_code(dto.kind)?,
            payload: decode_hex("message payload", &dto.payload)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_message_layout() {
        let msg = Message::plain("Hello world!");
        let bytes = msg.to_catbuffer().unwrap();
        assert_eq!(bytes.len(), 13);
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..], b"Hello world!");
        assert_eq!(
            Message::from_catbuffer(&bytes, NetworkType::MijinTest).unwrap(),
            msg
        );
    }

    #[test]
    fn dto_payload_is_upper_hex() {
        let dto = Message::plain("hi").to_dto();
        assert_eq!(dto.payload, "6869");
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], 0);
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(Message::from_catbuffer(&[7, b'x'], NetworkType::MijinTest).is_err());
    }
}
