//! # Accounts and Addresses
//!
//! An address is 25 raw bytes:
//!
//! ```text
//! network byte ‖ RIPEMD160(SHA3-256(public key)) ‖ SHA3-256(first 21 bytes)[0..4]
//! ```
//!
//! shown to users as 40 characters of base32, optionally grouped in sixes
//! with dashes (`SD5DT3-CH4BLA-...`).

use data_encoding::BASE32;
use std::fmt;
use std::str::FromStr;

use super::network::{GenerationHash, NetworkType};
use super::ModelError;
use crate::codec::{
    decode_hex_array, hex_upper, CatbufferCodec, CatbufferReader, CatbufferWriter, CodecError,
    DtoCodec,
};
use crate::crypto::hash::{ripemd160, sha3_256};
use crate::crypto::{KeyError, SignSchema, Signature, SignatureError, SigningKey, VerifyingKey};
use crate::transaction::{
    CosignatureSignedTransaction, CosignatureTransaction, FeeCalculationStrategy,
    SignedTransaction, Transaction, TransactionError,
};

pub const ADDRESS_LENGTH: usize = 25;
const CHECKSUM_LENGTH: usize = 4;
const ENCODED_LENGTH: usize = 40;

/// A raw 25-byte address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub fn from_public_key(public_key: &[u8; 32], network_type: NetworkType) -> Self {
        let mut raw = [0u8; ADDRESS_LENGTH];
        raw[0] = network_type.code();
        raw[1..21].copy_from_slice(&ripemd160(&sha3_256(public_key)));
        let checksum = sha3_256(&raw[..21]);
        raw[21..].copy_from_slice(&checksum[..CHECKSUM_LENGTH]);
        Self(raw)
    }

    /// Wrap raw bytes as they appear on the wire.
    ///
    /// No checksum check: the recipient slot of a transaction may hold an
    /// alias rather than a derived address.
    pub fn from_raw(raw: [u8; ADDRESS_LENGTH]) -> Self {
        Self(raw)
    }

    /// Parse the plain or dash-separated base32 form, checking network byte
    /// and checksum.
    pub fn from_encoded(encoded: &str) -> Result<Self, ModelError> {
        let invalid = |reason: &str| ModelError::InvalidAddress {
            address: encoded.to_string(),
            reason: reason.to_string(),
        };
        let plain: String = encoded
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if plain.len() != ENCODED_LENGTH {
            return Err(invalid("expected 40 base32 characters"));
        }
        let bytes = BASE32
            .decode(plain.as_bytes())
            .map_err(|_| invalid("not base32"))?;
        let raw = <[u8; ADDRESS_LENGTH]>::try_from(bytes.as_slice())
            .map_err(|_| invalid("wrong decoded length"))?;
        let address = Self(raw);
        NetworkType::from_code(raw[0]).map_err(|_| invalid("unknown network byte"))?;
        if !address.has_valid_checksum() {
            return Err(invalid("checksum mismatch"));
        }
        Ok(address)
    }

    pub fn has_valid_checksum(&self) -> bool {
        sha3_256(&self.0[..21])[..CHECKSUM_LENGTH] == self.0[21..]
    }

    pub fn network_type(&self) -> Result<NetworkType, ModelError> {
        NetworkType::from_code(self.0[0])
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// 40 upper-case base32 characters.
    pub fn plain(&self) -> String {
        BASE32.encode(&self.0)
    }

    /// [`plain`](Self::plain) in dash-separated groups of six.
    pub fn pretty(&self) -> String {
        let plain = self.plain();
        plain
            .as_bytes()
            .chunks(6)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl FromStr for Address {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_encoded(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.plain())
    }
}

impl CatbufferCodec for Address {
    fn catbuffer_size(&self) -> usize {
        ADDRESS_LENGTH
    }

    fn write_catbuffer(&self, writer: &mut CatbufferWriter) -> Result<(), CodecError> {
        writer.write_bytes(&self.0);
        Ok(())
    }

    fn read_catbuffer(reader: &mut CatbufferReader<'_>) -> Result<Self, CodecError> {
        reader.read_array().map(Self)
    }
}

/// The REST gateway carries addresses as hex of the raw bytes.
impl DtoCodec for Address {
    type Dto = String;

    fn to_dto(&self) -> Self::Dto {
        hex_upper(self.0)
    }

    fn from_dto(dto: Self::Dto, _network_type: NetworkType) -> Result<Self, CodecError> {
        decode_hex_array("address", &dto).map(Self)
    }
}

// ---------------------------------------------------------------------------
// PublicAccount
// ---------------------------------------------------------------------------

/// A public key and the address it maps to on one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicAccount {
    public_key: VerifyingKey,
    address: Address,
}

impl PublicAccount {
    pub fn from_public_key(public_key: [u8; 32], network_type: NetworkType) -> Self {
        Self::from_verifying_key(
            VerifyingKey::from_array(public_key, network_type.sign_schema()),
            network_type,
        )
    }

    pub fn from_verifying_key(public_key: VerifyingKey, network_type: NetworkType) -> Self {
        Self {
            address: Address::from_public_key(public_key.as_bytes(), network_type),
            public_key,
        }
    }

    pub fn from_hex(public_key: &str, network_type: NetworkType) -> Result<Self, KeyError> {
        let key = VerifyingKey::from_hex(public_key, network_type.sign_schema())?;
        Ok(Self::from_verifying_key(key, network_type))
    }

    pub fn public_key(&self) -> &VerifyingKey {
        &self.public_key
    }

    pub fn public_key_bytes(&self) -> &[u8; 32] {
        self.public_key.as_bytes()
    }

    pub fn public_key_hex(&self) -> String {
        self.public_key.to_hex()
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn network_type(&self) -> Result<NetworkType, ModelError> {
        self.address.network_type()
    }

    /// Check a signature this account made over arbitrary `data`.
    pub fn verify_signature(&self, data: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        self.public_key.verify(data, signature)
    }
}

impl fmt::Display for PublicAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address.pretty(), self.public_key.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// A private key bound to a network. Everything that signs goes through here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    key: SigningKey,
    public_account: PublicAccount,
}

impl Account {
    pub fn new(key: SigningKey, network_type: NetworkType) -> Self {
        Self {
            public_account: PublicAccount::from_verifying_key(key.verifying_key(), network_type),
            key,
        }
    }

    /// A fresh random account using the network's default schema.
    pub fn generate(network_type: NetworkType) -> Self {
        Self::new(SigningKey::generate(network_type.sign_schema()), network_type)
    }

    pub fn from_private_key(private_key: &str, network_type: NetworkType) -> Result<Self, KeyError> {
        Self::from_private_key_with_schema(private_key, network_type, network_type.sign_schema())
    }

    /// Like [`from_private_key`](Self::from_private_key) with an explicit
    /// hash variant, for networks or tools on RFC 8032 keys.
    pub fn from_private_key_with_schema(
        private_key: &str,
        network_type: NetworkType,
        schema: SignSchema,
    ) -> Result<Self, KeyError> {
        Ok(Self::new(SigningKey::from_hex(private_key, schema)?, network_type))
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }

    pub fn private_key_hex(&self) -> String {
        hex_upper(self.key.seed())
    }

    pub fn public_account(&self) -> &PublicAccount {
        &self.public_account
    }

    pub fn public_key_hex(&self) -> String {
        self.public_account.public_key_hex()
    }

    pub fn address(&self) -> &Address {
        self.public_account.address()
    }

    pub fn network_type(&self) -> Result<NetworkType, ModelError> {
        self.public_account.network_type()
    }

    /// Sign arbitrary bytes (not a transaction).
    pub fn sign_data(&self, data: &[u8]) -> Signature {
        self.key.sign(data)
    }

    pub fn sign(
        &self,
        transaction: &Transaction,
        generation_hash: &GenerationHash,
        fee_strategy: FeeCalculationStrategy,
    ) -> Result<SignedTransaction, TransactionError> {
        transaction.sign_with(self, generation_hash, fee_strategy)
    }

    pub fn sign_with_cosignatories(
        &self,
        transaction: &Transaction,
        cosignatories: &[Account],
        generation_hash: &GenerationHash,
        fee_strategy: FeeCalculationStrategy,
    ) -> Result<SignedTransaction, TransactionError> {
        transaction.sign_with_cosignatories(self, cosignatories, generation_hash, fee_strategy)
    }

    pub fn sign_cosignature(
        &self,
        cosignature: &CosignatureTransaction,
    ) -> Result<CosignatureSignedTransaction, TransactionError> {
        cosignature.sign_with(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC_KEY: &str = "8155342A7C93E7777F690970007C8E61DD5B88D514D2D000E435AFCA29F66905";

    fn public_key() -> [u8; 32] {
        decode_hex_array("pk", PUBLIC_KEY).unwrap()
    }

    #[test]
    fn address_from_public_key_known_answer() {
        let address = Address::from_public_key(&public_key(), NetworkType::MijinTest);
        assert_eq!(address.plain(), "SBRERGDXA4PX66WLIVDTTANJVN76DZJ5DLFRQEMZ");
        assert_eq!(address.pretty(), "SBRERG-DXA4PX-66WLIV-DTTANJ-VN76DZ-J5DLFR-QEMZ");
        assert_eq!(address.network_type().unwrap(), NetworkType::MijinTest);
        assert!(address.has_valid_checksum());
    }

    #[test]
    fn encoded_forms_parse() {
        let address = Address::from_public_key(&public_key(), NetworkType::MijinTest);
        assert_eq!(Address::from_encoded(&address.plain()).unwrap(), address);
        assert_eq!(Address::from_encoded(&address.pretty()).unwrap(), address);
        assert_eq!(
            Address::from_encoded(&address.plain().to_lowercase()).unwrap(),
            address
        );
        assert!(Address::from_encoded("SD5DT3CH4BLABL5HIMEKP2TAPUKF4NY3L5HRIR54").is_ok());
    }

    #[test]
    fn corrupted_address_is_rejected() {
        let mut plain = Address::from_public_key(&public_key(), NetworkType::MijinTest).plain();
        let swapped = if &plain[10..11] == "A" { "B" } else { "A" };
        plain.replace_range(10..11, swapped);
        assert!(matches!(
            Address::from_encoded(&plain),
            Err(ModelError::InvalidAddress { .. })
        ));
        assert!(Address::from_encoded("SBRERG").is_err());
        assert!(Address::from_encoded(&"1".repeat(40)).is_err());
    }

    #[test]
    fn network_byte_leads_the_address() {
        let main = Address::from_public_key(&public_key(), NetworkType::MainNet);
        assert!(main.plain().starts_with('X'));
        let test = Address::from_public_key(&public_key(), NetworkType::TestNet);
        assert!(test.plain().starts_with('V'));
    }

    #[test]
    fn account_signs_and_public_account_verifies() {
        let account = Account::generate(NetworkType::MijinTest);
        let sig = account.sign_data(b"catapult");
        assert!(account.public_account().verify_signature(b"catapult", &sig).is_ok());
        assert!(account.public_account().verify_signature(b"catapulT", &sig).is_err());
    }

    #[test]
    fn private_key_roundtrip() {
        let account = Account::generate(NetworkType::MijinTest);
        let restored =
            Account::from_private_key(&account.private_key_hex(), NetworkType::MijinTest).unwrap();
        assert_eq!(account, restored);
        assert_eq!(account.address(), restored.address());
    }

    #[test]
    fn dto_is_raw_hex() {
        let address = Address::from_public_key(&public_key(), NetworkType::MijinTest);
        let dto = address.to_dto();
        assert_eq!(dto.len(), 50);
        assert!(dto.starts_with("90"));
        assert_eq!(Address::from_dto(dto, NetworkType::MijinTest).unwrap(), address);
    }
}
