//! Walkthrough of an escrow trade between two accounts.
//!
//! Alice pays Bob in one mosaic and Bob pays back in another. Both legs go
//! into one bonded aggregate, locked with a hash lock, announced by Alice
//! and cosigned by Bob. Every step prints the payload a wallet would send.
//!
//! Run with:
//!   cargo run --example demo

use xpx_chain_sdk::model::{
    Account, Deadline, GenerationHash, Message, Mosaic, MosaicId, NetworkType,
};
use xpx_chain_sdk::transaction::{
    verify_signed_payload, AggregateTransaction, CosignatureTransaction, FeeCalculationStrategy,
    LockFundsTransaction, TransactionInfo, TransferTransaction,
};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";

const NETWORK: NetworkType = NetworkType::MijinTest;
const XPX: MosaicId = MosaicId(0x0DC6_7FBE_1CAD_29E3);
const GOLD: MosaicId = MosaicId(0x2FF7_D64F_483B_C0A6);

fn step(n: usize, title: &str) {
    println!("\n{BOLD}{CYAN}[{n}]{RESET} {BOLD}{title}{RESET}");
}

fn field(name: &str, value: impl std::fmt::Display) {
    println!("    {DIM}{name:<12}{RESET} {value}");
}

fn short(hex: &str) -> String {
    if hex.len() > 48 {
        format!("{}…{} ({} bytes)", &hex[..24], &hex[hex.len() - 16..], hex.len() / 2)
    } else {
        hex.to_string()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let generation_hash: GenerationHash =
        "7B631D803F912B00DC0CBED3014BBD17A302BA50B99D233B9C2D9533B842ABDF".parse()?;
    let fee = FeeCalculationStrategy::Middle;

    step(1, "Accounts");
    let alice = Account::generate(NETWORK);
    let bob = Account::generate(NETWORK);
    field("alice", alice.address().pretty());
    field("bob", bob.address().pretty());

    step(2, "Both legs of the trade");
    let deadline = Deadline::default_from_now()?;
    let pay = TransferTransaction::create(
        deadline,
        *bob.address(),
        vec![Mosaic::new(XPX, 100_000_000)],
        Message::plain("100 XPX for 1 GOLD"),
        NETWORK,
    )
    .to_aggregate(*alice.public_account())?;
    let deliver = TransferTransaction::create(
        deadline,
        *alice.address(),
        vec![Mosaic::new(GOLD, 1)],
        Message::plain("1 GOLD"),
        NETWORK,
    )
    .to_aggregate(*bob.public_account())?;
    let bonded = AggregateTransaction::create_bonded(deadline, vec![pay, deliver], NETWORK);
    let signed_bonded = alice.sign(&bonded, &generation_hash, fee)?;
    field("aggregate", signed_bonded.hash_hex());
    field("payload", short(&signed_bonded.payload_hex()));

    step(3, "Hash lock, announced first");
    let lock = LockFundsTransaction::create(
        deadline,
        Mosaic::new(XPX, 10_000_000),
        480,
        &signed_bonded,
        NETWORK,
    )?;
    let signed_lock = alice.sign(&lock, &generation_hash, fee)?;
    field("lock", signed_lock.hash_hex());
    field("max fee", signed_lock.to_transaction()?.max_fee());

    step(4, "Bob cosigns what the node reports");
    let reported = signed_bonded
        .to_transaction()?
        .with_transaction_info(Some(TransactionInfo {
            hash: Some(signed_bonded.hash),
            ..TransactionInfo::default()
        }));
    let cosignature = bob.sign_cosignature(&CosignatureTransaction::create(&reported)?)?;
    cosignature.verify()?;
    field("parent", hex::encode_upper(cosignature.parent_hash));
    field("signature", short(&cosignature.signature.to_hex()));

    step(5, "The same trade as one complete aggregate");
    let complete = AggregateTransaction::create_complete(
        deadline,
        bonded.body().as_aggregate().map(|a| a.inner_transactions.clone()).unwrap_or_default(),
        NETWORK,
    );
    let signed_complete =
        alice.sign_with_cosignatories(&complete, std::slice::from_ref(&bob), &generation_hash, fee)?;
    let hash = verify_signed_payload(&signed_complete.payload, &generation_hash)?;
    field("hash", hex::encode_upper(hash));
    field("payload", short(&signed_complete.payload_hex()));

    println!("\n{GREEN}{BOLD}done{RESET}: every payload verified offline");
    Ok(())
}
