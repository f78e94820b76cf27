// Copyright (c) 2026 xpxchain SDK contributors. MIT License.
// See LICENSE for details.

//! # xpxchain SDK Core
//!
//! Offline building blocks for talking to a Sirius (xpxchain) node: build a
//! transaction, serialize it to the catbuffer wire format, sign it with an
//! account key and hand the payload hex to a node for announcement.
//!
//! ## Architecture
//!
//! - **codec** : catbuffer reader/writer and the `[low, high]` JSON integers.
//! - **crypto** : hashes, Ed25519 under the SHA3 and Keccak schemas, keys.
//! - **model** : networks, addresses, accounts, mosaics, namespaces.
//! - **transaction** : every transaction kind, signing and verification.
//! - **config** : wire layout constants and per-network defaults.
//!
//! ## Example
//!
//! ```no_run
//! use xpx_chain_sdk::model::{Account, Deadline, GenerationHash, Message, Mosaic, NetworkType};
//! use xpx_chain_sdk::transaction::{FeeCalculationStrategy, TransferTransaction};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let account = Account::generate(NetworkType::TestNet);
//! let transfer = TransferTransaction::create(
//!     Deadline::default_from_now()?,
//!     *account.public_account().address(),
//!     vec![Mosaic::new(0x0DC6_7FBE_1CAD_29E3u64, 10_000_000)],
//!     Message::plain("hello"),
//!     NetworkType::TestNet,
//! );
//! let generation_hash: GenerationHash = "7B631D803F912B00DC0CBED3014BBD17A302BA50B99D233B9C2D9533B842ABDF".parse()?;
//! let signed = account.sign(&transfer, &generation_hash, FeeCalculationStrategy::Middle)?;
//! println!("{} {}", signed.hash_hex(), signed.payload_hex());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod crypto;
pub mod model;
pub mod transaction;
