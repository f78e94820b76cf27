//! # Transaction Module
//!
//! Construction, binary encoding, signing and verification of Sirius chain
//! transactions. Every state change on the network is announced as a
//! [`Transaction`]: a common header plus one [`TransactionBody`] kind.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        : type registry, versions and the small wire enums
//! fee.rs          : fee strategies and the max-fee floor
//! info.rs         : chain metadata reported for announced transactions
//! builder.rs      : the transaction envelope and catbuffer header codec
//! transfer.rs … metadata.rs : one module per body kind
//! aggregate.rs    : embedded transactions and aggregate bodies
//! signing.rs      : signing data, hashes, signed and cosigned results
//! verification.rs : errors and signature verification of payloads
//! dto.rs          : REST JSON documents
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build** with a kind's `create` constructor.
//! 2. **Sign** with [`Account::sign`](crate::model::Account::sign), which
//!    serializes, fixes the max fee and produces a [`SignedTransaction`].
//! 3. **Announce** the payload hex. Bonded aggregates first need a
//!    confirmed [`LockFundsTransaction`].
//! 4. **Cosign** bonded aggregates with [`CosignatureTransaction`].

pub mod account_link;
pub mod account_property;
pub mod aggregate;
pub mod builder;
pub mod dto;
pub mod fee;
pub mod info;
pub mod lock;
pub mod metadata;
pub mod mosaic;
pub mod multisig;
pub mod namespace;
pub mod signing;
pub mod transfer;
pub mod types;
pub mod verification;

pub use account_link::AccountLinkTransaction;
pub use account_property::{AccountPropertiesTransaction, AccountPropertyModification, PropertyValue};
pub use aggregate::{AggregateCosignature, AggregateTransaction, EmbeddedTransaction};
pub use builder::{Transaction, TransactionBody};
pub use dto::{TransactionBodyDto, TransactionDto};
pub use fee::{calculate_fee, FeeCalculationStrategy};
pub use info::TransactionInfo;
pub use lock::{LockFundsTransaction, SecretLockTransaction, SecretProofTransaction};
pub use metadata::{MetadataModification, MetadataTarget, ModifyMetadataTransaction};
pub use mosaic::{MosaicDefinitionTransaction, MosaicSupplyChangeTransaction};
pub use multisig::{ModifyMultisigAccountTransaction, MultisigCosignatoryModification};
pub use namespace::{
    AddressAliasTransaction, MosaicAliasTransaction, NamespaceRegistration,
    RegisterNamespaceTransaction,
};
pub use signing::{
    signing_data, transaction_hash, CosignatureSignedTransaction, CosignatureTransaction,
    SignedTransaction,
};
pub use transfer::TransferTransaction;
pub use types::{
    AliasAction, HashType, LinkAction, MetadataModificationType, MetadataType,
    MosaicSupplyType, MultisigModificationType, NamespaceType, PropertyModificationType,
    PropertyType, TransactionType,
};
pub use verification::{verify_signed_payload, verify_signed_payload_with_schema, TransactionError};
