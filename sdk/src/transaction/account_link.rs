//! Delegated harvesting: link an account to a remote key.

use serde::{Deserialize, Serialize};

use super::builder::{Transaction, TransactionBody};
use super::types::LinkAction;
use crate::codec::{
    decode_hex_array, CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError, DtoCodec,
};
use crate::model::account::PublicAccount;
use crate::model::deadline::Deadline;
use crate::model::network::NetworkType;

/// Body layout: `remote public key 32 ‖ link action u8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLinkTransaction {
    pub remote_account: PublicAccount,
    pub action: LinkAction,
}

impl AccountLinkTransaction {
    pub fn create(
        deadline: Deadline,
        remote_account: PublicAccount,
        action: LinkAction,
        network_type: NetworkType,
    ) -> Transaction {
        Transaction::new(
            network_type,
            deadline,
            TransactionBody::LinkAccount(Self {
                remote_account,
                action,
            }),
        )
    }
}

impl CatbufferCodec for AccountLinkTransaction {
    fn catbuffer_size(&self) -> usize {
        32 + 1
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_bytes(self.remote_account.public_key_bytes());
        writer.write_item(&self.action)
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        let key = reader.read_array::<32>()?;
        Ok(Self {
            remote_account: PublicAccount::from_public_key(key, reader.network_type()),
            action: reader.read_item()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountLinkTransactionDto {
    pub remote_account_key: String,
    pub link_action: LinkAction,
}

impl DtoCodec for AccountLinkTransaction {
    type Dto = AccountLinkTransactionDto;

    fn to_dto(&self) -> Self::Dto {
        AccountLinkTransactionDto {
            remote_account_key: self.remote_account.public_key_hex(),
            link_action: self.action,
        }
    }

    fn from_dto(dto: Self::Dto, network_type: NetworkType) -> Result<Self, CodecError> {
        let key = decode_hex_array("remoteAccountKey", &dto.remote_account_key)?;
        Ok(Self {
            remote_account: PublicAccount::from_public_key(key, network_type),
            action: dto.link_action,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_then_action() {
        let remote = PublicAccount::from_hex(
            "39DD21C50F2D85555F935957F2F22D457EC71F2A6D0136EB3E91D4A954478769",
            NetworkType::MijinTest,
        )
        .unwrap();
        let body = AccountLinkTransaction {
            remote_account: remote,
            action: LinkAction::Unlink,
        };
        let bytes = body.to_catbuffer().unwrap();
        assert_eq!(&bytes[..32], remote.public_key_bytes());
        assert_eq!(bytes[32], 1);
        assert_eq!(
            AccountLinkTransaction::from_catbuffer(&bytes, NetworkType::MijinTest).unwrap(),
            body
        );
        let json = serde_json::to_value(body.to_dto()).unwrap();
        assert_eq!(json["linkAction"], 1);
    }
}
