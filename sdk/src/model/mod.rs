//! # Chain Model
//!
//! Value types shared by every transaction kind: networks, accounts and
//! addresses, mosaic and namespace identifiers, deadlines and messages.
//! Each type owns its catbuffer and DTO layout through the traits in
//! [`crate::codec`].

pub mod account;
pub mod deadline;
pub mod identifier;
pub mod message;
pub mod mosaic;
pub mod namespace;
pub mod network;

use thiserror::Error;

pub use account::{Account, Address, PublicAccount};
pub use deadline::Deadline;
pub use identifier::{generate_mosaic_id, generate_namespace_id, generate_sub_namespace_id};
pub use message::{Message, MessageType};
pub use mosaic::{Mosaic, MosaicId, MosaicNonce, MosaicProperties};
pub use namespace::NamespaceId;
pub use network::{GenerationHash, NetworkType};

/// Errors from building model values out of external input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown network type code {0:#04x}")]
    UnknownNetworkType(u8),

    #[error("unknown network name {0:?}")]
    UnknownNetworkName(String),

    #[error("invalid generation hash: {0}")]
    InvalidGenerationHash(String),

    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("invalid namespace name {name:?}: {reason}")]
    InvalidNamespaceName { name: String, reason: String },

    #[error("invalid mosaic nonce: {0}")]
    InvalidNonce(String),

    #[error("deadline out of range: {0}")]
    InvalidDeadline(String),
}
