// Copyright (c) 2026 xpxchain SDK contributors. MIT License.
// See LICENSE for details.

//! # xpx-cli
//!
//! Entry point for the `xpx-cli` binary. Parses CLI arguments, initializes
//! logging, resolves the target network and runs one offline command.
//!
//! - `keygen`       : generate an account
//! - `address`      : address of a public key
//! - `mosaic-id`    : mosaic id from nonce and owner
//! - `namespace-id` : ids of a dotted namespace name
//! - `transfer`     : build and sign a transfer
//! - `decode`       : payload hex to JSON
//! - `hash`         : hash of a signed payload
//! - `verify`       : check every signature of a signed payload

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use xpx_chain_sdk::codec::decode_hex_array;
use xpx_chain_sdk::config::NetworkConfig;
use xpx_chain_sdk::crypto::SigningKey;
use xpx_chain_sdk::model::{
    generate_mosaic_id, generate_namespace_id, Account, Address, Deadline, Message, NetworkType,
};
use xpx_chain_sdk::transaction::{
    transaction_hash, verify_signed_payload_with_schema, Transaction, TransferTransaction,
};

use cli::{Commands, NetworkArgs, XpxCli};

fn main() -> Result<()> {
    let cli = XpxCli::parse();
    logging::init_logging("warn,xpx_cli=info", cli.log_format);

    match cli.command {
        Commands::Keygen(args) => keygen(&cli.network, args),
        Commands::Address(args) => address(&cli.network, args),
        Commands::MosaicId(args) => mosaic_id(args),
        Commands::NamespaceId(args) => namespace_id(args),
        Commands::Transfer(args) => transfer(&cli.network, args),
        Commands::Decode(args) => decode(&cli.network, args),
        Commands::Hash(args) => hash(&cli.network, args),
        Commands::Verify(args) => verify(&cli.network, args),
    }
}

// ---------------------------------------------------------------------------
// Network resolution
// ---------------------------------------------------------------------------

fn load_config(args: &NetworkArgs) -> Result<Option<NetworkConfig>> {
    args.config
        .as_ref()
        .map(|path| {
            NetworkConfig::load(path)
                .with_context(|| format!("failed to load network config {}", path.display()))
        })
        .transpose()
}

/// The network from `--network`, else the config file, if either is set.
fn optional_network(args: &NetworkArgs) -> Result<Option<NetworkType>> {
    Ok(args
        .network
        .or(load_config(args)?.map(|config| config.network_type)))
}

fn network_type(args: &NetworkArgs) -> Result<NetworkType> {
    optional_network(args)?.context("no network selected: pass --network or --config")
}

/// Full config for commands that sign or hash. Flags override the file.
fn network_config(args: &NetworkArgs) -> Result<NetworkConfig> {
    let mut config = match load_config(args)? {
        Some(config) => config,
        None => {
            let network_type = args
                .network
                .context("no network selected: pass --network or --config")?;
            let generation_hash = args
                .generation_hash
                .context("no generation hash: pass --generation-hash or --config")?;
            NetworkConfig::new(network_type, generation_hash)
        }
    };
    if let Some(network_type) = args.network {
        config.network_type = network_type;
    }
    if let Some(generation_hash) = args.generation_hash {
        config.generation_hash = generation_hash;
    }
    tracing::debug!(network = %config.network_type, "network resolved");
    Ok(config)
}

fn decode_payload(hex_payload: &str) -> Result<Vec<u8>> {
    hex::decode(hex_payload.trim()).context("payload is not valid hex")
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn keygen(network: &NetworkArgs, args: cli::KeygenArgs) -> Result<()> {
    let network_type = network_type(network)?;
    let schema = args
        .schema
        .map(Into::into)
        .unwrap_or_else(|| network_type.sign_schema());
    let account = Account::new(SigningKey::generate(schema), network_type);
    tracing::info!(network = %network_type, ?schema, "generated account");

    print_json(&json!({
        "privateKey": account.private_key_hex(),
        "publicKey": account.public_key_hex(),
        "address": account.address().plain(),
        "networkType": network_type,
    }))
}

fn address(network: &NetworkArgs, args: cli::AddressArgs) -> Result<()> {
    let network_type = network_type(network)?;
    let public_key = decode_hex_array::<32>("public key", &args.public_key)?;
    let address = Address::from_public_key(&public_key, network_type);
    println!("{}", address.pretty());
    Ok(())
}

fn mosaic_id(args: cli::MosaicIdArgs) -> Result<()> {
    let owner = decode_hex_array::<32>("owner", &args.owner)?;
    println!("{}", generate_mosaic_id(args.nonce, &owner).to_hex());
    Ok(())
}

fn namespace_id(args: cli::NamespaceIdArgs) -> Result<()> {
    let ids = generate_namespace_id(&args.name)
        .with_context(|| format!("invalid namespace name {:?}", args.name))?;
    let segments = args.name.split('.');
    let path: Vec<_> = segments
        .zip(ids)
        .map(|(segment, id)| json!({ "name": segment, "id": id.to_hex() }))
        .collect();
    print_json(&path)
}

fn transfer(network: &NetworkArgs, args: cli::TransferArgs) -> Result<()> {
    let config = network_config(network)?;
    let account = Account::from_private_key_with_schema(
        &args.private_key,
        config.network_type,
        config.sign_schema,
    )
    .context("invalid private key")?;
    let deadline = Deadline::create(chrono::Duration::hours(args.deadline_hours))?;

    let tx = TransferTransaction::create(
        deadline,
        args.recipient,
        args.mosaics,
        Message::plain(args.message),
        config.network_type,
    );
    let fee_strategy = args.fee.unwrap_or(config.fee_strategy);
    let signed = account
        .sign(&tx, &config.generation_hash, fee_strategy)
        .context("failed to sign transfer")?;
    tracing::info!(hash = %signed.hash_hex(), size = signed.payload.len(), "signed transfer");

    print_json(&signed.to_dto())
}

fn decode(network: &NetworkArgs, args: cli::PayloadArgs) -> Result<()> {
    let payload = decode_payload(&args.payload)?;
    let tx = Transaction::from_catbuffer(&payload, optional_network(network)?)
        .context("failed to decode payload")?;
    print_json(&tx.to_dto()?)
}

fn hash(network: &NetworkArgs, args: cli::PayloadArgs) -> Result<()> {
    let config = network_config(network)?;
    let payload = decode_payload(&args.payload)?;
    let hash = transaction_hash(&payload, &config.generation_hash)?;
    println!("{}", hex::encode_upper(hash));
    Ok(())
}

fn verify(network: &NetworkArgs, args: cli::PayloadArgs) -> Result<()> {
    let config = network_config(network)?;
    let payload = decode_payload(&args.payload)?;
    let hash = verify_signed_payload_with_schema(&payload, &config.generation_hash, config.sign_schema)
        .context("verification failed")?;
    println!("OK {}", hex::encode_upper(hash));
    Ok(())
}
