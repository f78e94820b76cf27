//! End-to-end tests for the transaction lifecycle.
//!
//! Each test goes the way a wallet does: build a transaction, sign it with
//! a fixed key, then check the exact payload bytes and that the payload
//! decodes, verifies and converts to JSON and back without loss. Keys and
//! the generation hash are fixed, so every signature is deterministic.

use xpx_chain_sdk::model::mosaic::{FLAG_SUPPLY_MUTABLE, FLAG_TRANSFERABLE};
use xpx_chain_sdk::model::{
    Account, Address, Deadline, GenerationHash, Message, Mosaic, MosaicId, MosaicNonce,
    MosaicProperties, NamespaceId, NetworkType,
};
use xpx_chain_sdk::transaction::{
    verify_signed_payload, AccountLinkTransaction, AccountPropertiesTransaction,
    AccountPropertyModification, AddressAliasTransaction, AggregateTransaction, AliasAction,
    CosignatureTransaction, FeeCalculationStrategy, HashType, LinkAction, LockFundsTransaction,
    MetadataModification, ModifyMetadataTransaction, ModifyMultisigAccountTransaction,
    MosaicAliasTransaction, MosaicDefinitionTransaction, MosaicSupplyChangeTransaction,
    MosaicSupplyType, MultisigCosignatoryModification, MultisigModificationType,
    PropertyModificationType, PropertyType, RegisterNamespaceTransaction, SecretLockTransaction,
    SecretProofTransaction, Transaction, TransactionError, TransactionInfo, TransactionType,
    TransferTransaction,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const NETWORK: NetworkType = NetworkType::MijinTest;
const PRIVATE_KEY: &str = "2a2e0d0ce62c8b9b0a8a3b6b7c5d4e3f2a1b0c9d8e7f6a5b4c3d2e1f0a9b8c7d";
const COSIGNER_KEY: &str = "1f2e3d4c5b6a79880f1e2d3c4b5a69788796a5b4c3d2e1f00112233445566778";
const GENERATION_HASH: &str = "7B631D803F912B00DC0CBED3014BBD17A302BA50B99D233B9C2D9533B842ABDF";

const SIGNED_TRANSFER: &str = "\
    B300000021575C38EE5A8E13BDA8B0BF66FE7C428629FA651D0317D5B7B307AB973855D695390106FEB630ACE4\
    59DB2AE0B294B19B4BF2B24BFB290822CC8A39DD1CE2058155342A7C93E7777F690970007C8E61DD5B88D514D2\
    D000E435AFCA29F66905030000905441000000000000000000C817A80400000090FA39EC47E05600AFA74308A7\
    EA607D145E371B5F4F1447BC0D00010048656C6C6F20776F726C64210500000000000000E803000000000000";

const COSIGNED_AGGREGATE: &str = "\
    410100009CC49FBC6260A020CC1DF43014AC597F2ED4374BBAF0A63B6D8DE1B1DB77AAE3FD2DC2B2207A01F3BB\
    94CD0A2D4418F8EB34DDCFDB52BD19E03D58C6CC57D20F8155342A7C93E7777F690970007C8E61DD5B88D514D2\
    D000E435AFCA29F66905020000904141000000000000000000C817A80400000063000000630000008155342A7C\
    93E7777F690970007C8E61DD5B88D514D2D000E435AFCA29F6690503000090544190FA39EC47E05600AFA74308\
    A7EA607D145E371B5F4F1447BC0D00010048656C6C6F20776F726C64210500000000000000E803000000000000\
    39DD21C50F2D85555F935957F2F22D457EC71F2A6D0136EB3E91D4A95447876931E496668EA589727F52BC0D71\
    F5BD9FB9028E2F23C248D9B5D7528E74D7634419D76AC2B85CFE14B28829270FA13677629F8FD6A66D63849C23\
    01CF0B83B20D";

fn account(key: &str) -> Account {
    Account::from_private_key(key, NETWORK).unwrap()
}

fn generation_hash() -> GenerationHash {
    GENERATION_HASH.parse().unwrap()
}

fn deadline() -> Deadline {
    Deadline::from_timestamp(20_000_000_000)
}

fn recipient() -> Address {
    "SD5DT3CH4BLABL5HIMEKP2TAPUKF4NY3L5HRIR54".parse().unwrap()
}

fn transfer() -> Transaction {
    TransferTransaction::create(
        deadline(),
        recipient(),
        vec![Mosaic::new(5u64, 1000)],
        Message::plain("Hello world!"),
        NETWORK,
    )
}

/// Sign, then check the payload verifies, decodes to the same transaction
/// and survives a JSON round trip.
fn sign_and_check(transaction: &Transaction) -> Transaction {
    let signer = account(PRIVATE_KEY);
    let signed = signer
        .sign(transaction, &generation_hash(), FeeCalculationStrategy::Middle)
        .unwrap();
    signed.verify(&generation_hash()).unwrap();
    assert_eq!(
        verify_signed_payload(&signed.payload, &generation_hash()).unwrap(),
        signed.hash
    );

    let decoded = signed.to_transaction().unwrap();
    assert_eq!(decoded.transaction_type(), transaction.transaction_type());
    assert_eq!(decoded.body(), transaction.body());
    assert!(decoded.is_signed());
    assert_eq!(decoded.max_fee(), 250 * signed.payload.len() as u64);
    assert_eq!(
        decoded.to_catbuffer(NETWORK, FeeCalculationStrategy::Zero).unwrap(),
        signed.payload
    );

    let json = decoded.to_json().unwrap();
    assert_eq!(Transaction::from_json(&json, Some(NETWORK)).unwrap(), decoded);
    decoded
}

// ---------------------------------------------------------------------------
// Known payloads
// ---------------------------------------------------------------------------

#[test]
fn transfer_payload_is_stable() {
    let signed = account(PRIVATE_KEY)
        .sign(&transfer(), &generation_hash(), FeeCalculationStrategy::Zero)
        .unwrap();
    assert_eq!(signed.payload_hex(), SIGNED_TRANSFER);
    assert_eq!(
        signed.hash_hex(),
        "F667945F6C9106ADD470A4B63AC651A080C164EA78B232ABFE7A478BDB193A19"
    );
    assert_eq!(signed.payload.len(), 179);
    assert_eq!(
        signed.signer.public_key_hex(),
        "8155342A7C93E7777F690970007C8E61DD5B88D514D2D000E435AFCA29F66905"
    );
}

#[test]
fn cosigned_aggregate_payload_is_stable() {
    let initiator = account(PRIVATE_KEY);
    let cosigner = account(COSIGNER_KEY);
    let inner = transfer().to_aggregate(*initiator.public_account()).unwrap();
    let aggregate = AggregateTransaction::create_complete(deadline(), vec![inner], NETWORK);

    let signed = initiator
        .sign_with_cosignatories(
            &aggregate,
            std::slice::from_ref(&cosigner),
            &generation_hash(),
            FeeCalculationStrategy::Zero,
        )
        .unwrap();
    assert_eq!(signed.payload_hex(), COSIGNED_AGGREGATE);
    assert_eq!(
        signed.hash_hex(),
        "F45D15978BE345C84EBF71C68C30AFEB68BD511D5BB8102D5A7837641838D786"
    );
    signed.verify(&generation_hash()).unwrap();

    let decoded = signed.to_transaction().unwrap();
    let body = decoded.body().as_aggregate().unwrap();
    assert_eq!(body.inner_transactions.len(), 1);
    assert!(body.is_cosigned_by(cosigner.public_account()));
    assert_eq!(
        decoded.to_catbuffer(NETWORK, FeeCalculationStrategy::Zero).unwrap(),
        signed.payload
    );
}

#[test]
fn foreign_network_payload_is_rejected() {
    let payload = hex::decode(SIGNED_TRANSFER).unwrap();
    assert!(matches!(
        Transaction::from_catbuffer(&payload, Some(NetworkType::MainNet)),
        Err(TransactionError::NetworkMismatch { .. })
    ));
    let tx = Transaction::from_catbuffer(&payload, None).unwrap();
    assert_eq!(tx.network_type(), NETWORK);
    assert!(tx.signed_by_account(account(PRIVATE_KEY).public_account()));
}

// ---------------------------------------------------------------------------
// Every kind through the whole pipeline
// ---------------------------------------------------------------------------

#[test]
fn namespace_and_alias_kinds() {
    let root = RegisterNamespaceTransaction::create_root(deadline(), "prx", 1000, NETWORK).unwrap();
    sign_and_check(&root);

    let parent = NamespaceId::from_name("prx").unwrap();
    let sub = RegisterNamespaceTransaction::create_sub(deadline(), "xpx", parent, NETWORK).unwrap();
    sign_and_check(&sub);

    let alias_id = NamespaceId::from_name("prx.xpx").unwrap();
    sign_and_check(&AddressAliasTransaction::create(
        deadline(),
        AliasAction::Link,
        alias_id,
        recipient(),
        NETWORK,
    ));
    sign_and_check(&MosaicAliasTransaction::create(
        deadline(),
        AliasAction::Unlink,
        alias_id,
        MosaicId(0x0DC6_7FBE_1CAD_29E3),
        NETWORK,
    ));
}

#[test]
fn mosaic_kinds() {
    let owner = account(PRIVATE_KEY);
    let nonce = MosaicNonce::from_u32(7);
    let properties =
        MosaicProperties::from_flags(FLAG_SUPPLY_MUTABLE | FLAG_TRANSFERABLE, 6, Some(10_000));
    let definition = MosaicDefinitionTransaction::create(
        deadline(),
        nonce,
        owner.public_account(),
        properties,
        NETWORK,
    );
    let decoded = sign_and_check(&definition);

    let mosaic_id = MosaicId::from_nonce(nonce, owner.public_account().public_key_bytes());
    match decoded.body() {
        xpx_chain_sdk::transaction::TransactionBody::MosaicDefinition(body) => {
            assert_eq!(body.mosaic_id, mosaic_id);
        }
        other => panic!("unexpected body {other:?}"),
    }

    sign_and_check(&MosaicSupplyChangeTransaction::create(
        deadline(),
        mosaic_id,
        MosaicSupplyType::Increase,
        1_000_000,
        NETWORK,
    ));
}

#[test]
fn multisig_and_link_kinds() {
    let cosigner = account(COSIGNER_KEY);
    sign_and_check(&ModifyMultisigAccountTransaction::create(
        deadline(),
        2,
        -1,
        vec![MultisigCosignatoryModification::new(
            MultisigModificationType::Add,
            *cosigner.public_account(),
        )],
        NETWORK,
    ));
    sign_and_check(&AccountLinkTransaction::create(
        deadline(),
        *cosigner.public_account(),
        LinkAction::Link,
        NETWORK,
    ));
}

#[test]
fn secret_lock_and_proof() {
    let proof = b"open sesame".to_vec();
    for hash_type in [HashType::Sha3_256, HashType::Keccak256, HashType::Hash160, HashType::Sha256] {
        let secret = hash_type.digest(&proof);
        let lock = SecretLockTransaction::create(
            deadline(),
            Mosaic::new(5u64, 10),
            100,
            hash_type,
            secret.clone(),
            recipient(),
            NETWORK,
        )
        .unwrap();
        sign_and_check(&lock);

        let reveal = SecretProofTransaction::create(
            deadline(),
            hash_type,
            secret,
            recipient(),
            proof.clone(),
            NETWORK,
        )
        .unwrap();
        let decoded = sign_and_check(&reveal);
        match decoded.body() {
            xpx_chain_sdk::transaction::TransactionBody::SecretProof(body) => {
                assert!(body.verify_proof());
            }
            other => panic!("unexpected body {other:?}"),
        }
    }
}

#[test]
fn account_property_kinds() {
    sign_and_check(
        &AccountPropertiesTransaction::create(
            deadline(),
            PropertyType::BlockAddress,
            vec![AccountPropertyModification::new(PropertyModificationType::Add, recipient())],
            NETWORK,
        )
        .unwrap(),
    );
    sign_and_check(
        &AccountPropertiesTransaction::create(
            deadline(),
            PropertyType::AllowMosaic,
            vec![AccountPropertyModification::new(
                PropertyModificationType::Remove,
                MosaicId(0x0DC6_7FBE_1CAD_29E3),
            )],
            NETWORK,
        )
        .unwrap(),
    );
    sign_and_check(
        &AccountPropertiesTransaction::create(
            deadline(),
            PropertyType::AllowTransaction,
            vec![AccountPropertyModification::new(
                PropertyModificationType::Add,
                TransactionType::Transfer,
            )],
            NETWORK,
        )
        .unwrap(),
    );
}

#[test]
fn metadata_kinds() {
    let modifications = vec![
        MetadataModification::add("name", "alice"),
        MetadataModification::remove("stale"),
    ];
    sign_and_check(&ModifyMetadataTransaction::create(
        deadline(),
        recipient(),
        modifications.clone(),
        NETWORK,
    ));
    sign_and_check(&ModifyMetadataTransaction::create(
        deadline(),
        MosaicId(0x0DC6_7FBE_1CAD_29E3),
        modifications.clone(),
        NETWORK,
    ));
    sign_and_check(&ModifyMetadataTransaction::create(
        deadline(),
        NamespaceId::from_name("prx").unwrap(),
        modifications,
        NETWORK,
    ));
}

// ---------------------------------------------------------------------------
// Bonded aggregate workflow
// ---------------------------------------------------------------------------

#[test]
fn bonded_aggregate_lock_and_cosign() {
    let initiator = account(PRIVATE_KEY);
    let cosigner = account(COSIGNER_KEY);

    let inner = transfer().to_aggregate(*cosigner.public_account()).unwrap();
    let bonded = AggregateTransaction::create_bonded(deadline(), vec![inner], NETWORK);
    let signed_bonded = initiator
        .sign(&bonded, &generation_hash(), FeeCalculationStrategy::Middle)
        .unwrap();
    assert_eq!(signed_bonded.transaction_type, TransactionType::AggregateBonded);

    let lock = LockFundsTransaction::create(
        deadline(),
        Mosaic::new(5u64, 10_000_000),
        480,
        &signed_bonded,
        NETWORK,
    )
    .unwrap();
    sign_and_check(&lock);

    let signed_transfer = initiator
        .sign(&transfer(), &generation_hash(), FeeCalculationStrategy::Middle)
        .unwrap();
    assert!(matches!(
        LockFundsTransaction::create(deadline(), Mosaic::new(5u64, 1), 1, &signed_transfer, NETWORK),
        Err(TransactionError::NotAggregate(TransactionType::Transfer))
    ));

    // The node reports the announced aggregate with its hash.
    let announced = signed_bonded
        .to_transaction()
        .unwrap()
        .with_transaction_info(Some(TransactionInfo {
            hash: Some(signed_bonded.hash),
            ..TransactionInfo::default()
        }));
    assert!(announced.has_missing_signatures());

    let cosignature = CosignatureTransaction::create(&announced).unwrap();
    let signed_cosignature = cosigner.sign_cosignature(&cosignature).unwrap();
    assert_eq!(signed_cosignature.parent_hash, signed_bonded.hash);
    signed_cosignature.verify().unwrap();
    cosigner
        .public_account()
        .verify_signature(&signed_bonded.hash, &signed_cosignature.signature)
        .unwrap();
}
