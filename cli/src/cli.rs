//! # CLI Interface
//!
//! Defines the command-line argument structure for `xpx-cli` using
//! `clap` derive. Network selection is shared by every subcommand and can
//! come from flags, environment variables or a JSON config file.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use xpx_chain_sdk::crypto::SignSchema;
use xpx_chain_sdk::model::{Address, GenerationHash, Mosaic, MosaicId, MosaicNonce, NetworkType};
use xpx_chain_sdk::transaction::FeeCalculationStrategy;

use crate::logging::LogFormat;

/// Offline transaction tool for xpxchain.
///
/// Generates keys, derives mosaic and namespace ids, signs transfers and
/// inspects signed payloads. Nothing here talks to a node: payloads are
/// printed for announcement by other tooling.
#[derive(Parser, Debug)]
#[command(
    name = "xpx-cli",
    about = "Offline transaction tool for xpxchain",
    version,
    propagate_version = true
)]
pub struct XpxCli {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Log output format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Which network to work on. Flags override the config file.
#[derive(Args, Debug)]
pub struct NetworkArgs {
    /// JSON network config with `networkType` and `generationHash`.
    #[arg(long, short = 'c', env = "XPX_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Network name (`MIJIN_TEST`, `mijin-test`) or code (`144`, `0x90`).
    #[arg(long, short = 'n', env = "XPX_NETWORK", global = true)]
    pub network: Option<NetworkType>,

    /// Generation hash of the target chain, 64 hex characters.
    #[arg(long, env = "XPX_GENERATION_HASH", global = true)]
    pub generation_hash: Option<GenerationHash>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh account and print its keys and address.
    Keygen(KeygenArgs),
    /// Derive the address of a public key.
    Address(AddressArgs),
    /// Derive a mosaic id from a nonce and owner public key.
    MosaicId(MosaicIdArgs),
    /// Derive the ids of every segment of a dotted namespace name.
    NamespaceId(NamespaceIdArgs),
    /// Build and sign a transfer; prints the signed payload and hash.
    Transfer(TransferArgs),
    /// Decode a catbuffer payload into its JSON document.
    Decode(PayloadArgs),
    /// Compute the hash of a signed payload.
    Hash(PayloadArgs),
    /// Verify every signature in a signed payload.
    Verify(PayloadArgs),
}

/// Hash variant used inside Ed25519.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaArg {
    Sha3,
    Sha2,
}

impl From<SchemaArg> for SignSchema {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Sha3 => SignSchema::Sha3,
            SchemaArg::Sha2 => SignSchema::Sha2,
        }
    }
}

#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Signature schema; defaults to the network's.
    #[arg(long, value_enum)]
    pub schema: Option<SchemaArg>,
}

#[derive(Parser, Debug)]
pub struct AddressArgs {
    /// Public key, 64 hex characters.
    pub public_key: String,
}

#[derive(Parser, Debug)]
pub struct MosaicIdArgs {
    /// Nonce as 8 hex characters.
    #[arg(long)]
    pub nonce: MosaicNonce,

    /// Owner public key, 64 hex characters.
    #[arg(long)]
    pub owner: String,
}

#[derive(Parser, Debug)]
pub struct NamespaceIdArgs {
    /// Dotted name such as `prx.xpx`.
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct TransferArgs {
    /// Hex private key of the sender.
    ///
    /// Prefer the environment variable over the flag so the key stays out
    /// of shell history.
    #[arg(long, env = "XPX_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Recipient address, plain or dashed.
    #[arg(long)]
    pub recipient: Address,

    /// Mosaic as `<hex id>:<amount>`; repeatable.
    #[arg(long = "mosaic", value_parser = parse_mosaic)]
    pub mosaics: Vec<Mosaic>,

    /// Plain-text message.
    #[arg(long, default_value = "")]
    pub message: String,

    /// Fee strategy: zero, low, middle or high. Defaults to the config's.
    #[arg(long)]
    pub fee: Option<FeeCalculationStrategy>,

    /// Hours until the deadline.
    #[arg(long, default_value_t = 2)]
    pub deadline_hours: i64,
}

#[derive(Parser, Debug)]
pub struct PayloadArgs {
    /// Payload as hex.
    pub payload: String,
}

/// Parse `<hex id>:<amount>`.
fn parse_mosaic(s: &str) -> Result<Mosaic, String> {
    let (id, amount) = s
        .split_once(':')
        .ok_or_else(|| format!("expected <hex id>:<amount>, got {s:?}"))?;
    let id = u64::from_str_radix(id.trim_start_matches("0x"), 16)
        .map_err(|e| format!("bad mosaic id {id:?}: {e}"))?;
    let amount = amount
        .parse::<u64>()
        .map_err(|e| format!("bad amount {amount:?}: {e}"))?;
    Ok(Mosaic::new(MosaicId(id), amount))
}
