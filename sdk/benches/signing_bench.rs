// Signing & serialization benchmarks for the xpxchain SDK.
//
// Covers key generation under both schemas, raw signing and verification,
// catbuffer encode/decode of a transfer, full transaction signing, and
// verification of aggregates with growing cosigner counts.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use xpx_chain_sdk::crypto::{sign, verify, SignSchema, SigningKey};
use xpx_chain_sdk::model::{Account, Deadline, GenerationHash, Message, Mosaic, NetworkType};
use xpx_chain_sdk::transaction::{
    verify_signed_payload, AggregateTransaction, FeeCalculationStrategy, Transaction,
    TransferTransaction,
};

const NETWORK: NetworkType = NetworkType::MijinTest;

fn generation_hash() -> GenerationHash {
    GenerationHash([0x7B; 32])
}

fn transfer(account: &Account) -> Transaction {
    TransferTransaction::create(
        Deadline::from_timestamp(20_000_000_000),
        *account.address(),
        vec![Mosaic::new(0x0DC6_7FBE_1CAD_29E3u64, 1_000_000)],
        Message::plain("transfer 1 XPX; invoice 42"),
        NETWORK,
    )
}

fn bench_keypair_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("ed25519/keypair_generate");
    for schema in [SignSchema::Sha3, SignSchema::Sha2] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{schema:?}")), &schema, |b, &s| {
            b.iter(|| SigningKey::generate(s));
        });
    }
    group.finish();
}

fn bench_sign_and_verify(c: &mut Criterion) {
    let key = SigningKey::generate(SignSchema::Sha3);
    let message = [0x42u8; 200];
    let signature = sign(&key, &message);
    let public_key = key.verifying_key();

    c.bench_function("ed25519/sign_message", |b| {
        b.iter(|| sign(&key, &message));
    });
    c.bench_function("ed25519/verify_signature", |b| {
        b.iter(|| verify(&public_key, &message, &signature).unwrap());
    });
}

fn bench_catbuffer(c: &mut Criterion) {
    let account = Account::generate(NETWORK);
    let tx = transfer(&account);
    let payload = tx.to_catbuffer(NETWORK, FeeCalculationStrategy::Middle).unwrap();

    c.bench_function("catbuffer/encode_transfer", |b| {
        b.iter(|| tx.to_catbuffer(NETWORK, FeeCalculationStrategy::Middle).unwrap());
    });
    c.bench_function("catbuffer/decode_transfer", |b| {
        b.iter(|| Transaction::from_catbuffer(&payload, Some(NETWORK)).unwrap());
    });
}

fn bench_sign_transaction(c: &mut Criterion) {
    let account = Account::generate(NETWORK);
    let tx = transfer(&account);
    let generation_hash = generation_hash();

    c.bench_function("transaction/sign_transfer", |b| {
        b.iter(|| {
            account
                .sign(&tx, &generation_hash, FeeCalculationStrategy::Middle)
                .unwrap()
        });
    });
}

fn bench_verify_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction/verify_aggregate");
    let generation_hash = generation_hash();
    let initiator = Account::generate(NETWORK);

    for cosigners in [1usize, 5, 10, 25] {
        let accounts: Vec<Account> = (0..cosigners).map(|_| Account::generate(NETWORK)).collect();
        let inner = accounts
            .iter()
            .map(|a| transfer(a).to_aggregate(*a.public_account()).unwrap())
            .collect();
        let aggregate = AggregateTransaction::create_complete(
            Deadline::from_timestamp(20_000_000_000),
            inner,
            NETWORK,
        );
        let signed = initiator
            .sign_with_cosignatories(
                &aggregate,
                &accounts,
                &generation_hash,
                FeeCalculationStrategy::Middle,
            )
            .unwrap();

        group.throughput(Throughput::Elements(cosigners as u64 + 1));
        group.bench_with_input(BenchmarkId::from_parameter(cosigners), &signed.payload, |b, p| {
            b.iter(|| verify_signed_payload(p, &generation_hash).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_keypair_generation,
    bench_sign_and_verify,
    bench_catbuffer,
    bench_sign_transaction,
    bench_verify_aggregate,
);
criterion_main!(benches);
