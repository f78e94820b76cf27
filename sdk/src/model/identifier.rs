//! # Identifier Derivation
//!
//! Mosaic and namespace ids are not assigned by the chain: every client
//! derives them from their inputs with SHA3-256, and the network recomputes
//! them to check. Getting a bit wrong here means the transaction is
//! rejected, so these functions are pinned by known-answer tests.
//!
//! ```text
//! mosaic id    = u64_le(SHA3-256(nonce ‖ owner public key)[0..8]) & !(1 << 63)
//! namespace id = u64_le(SHA3-256(parent id LE ‖ name)[0..8])      |  (1 << 63)
//! ```
//!
//! The top bit tells the two kinds apart wherever an "unresolved" id may be
//! either a mosaic or a namespace alias.

use crate::config::{NAMESPACE_MAX_DEPTH, NAMESPACE_MAX_NAME_LENGTH};
use crate::crypto::hash::sha3_256_multi;

use super::mosaic::{MosaicId, MosaicNonce};
use super::namespace::NamespaceId;
use super::ModelError;

const NAMESPACE_FLAG: u64 = 1 << 63;

fn low_u64(digest: &[u8; 32]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(word)
}

/// Derive the id of the mosaic `owner` defines with `nonce`.
pub fn generate_mosaic_id(nonce: MosaicNonce, owner: &[u8; 32]) -> MosaicId {
    let digest = sha3_256_multi(&[&nonce.0[..], &owner[..]]);
    MosaicId(low_u64(&digest) & !NAMESPACE_FLAG)
}

fn invalid(name: &str, reason: impl Into<String>) -> ModelError {
    ModelError::InvalidNamespaceName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Check one namespace segment.
///
/// Segments are 1 to 64 characters from `a-z`, `0-9`, `_` and `-`, and
/// must not start with a digit.
pub fn validate_namespace_name(segment: &str) -> Result<(), ModelError> {
    if segment.is_empty() {
        return Err(invalid(segment, "empty segment"));
    }
    if segment.len() > NAMESPACE_MAX_NAME_LENGTH {
        return Err(invalid(
            segment,
            format!("longer than {NAMESPACE_MAX_NAME_LENGTH} characters"),
        ));
    }
    if let Some(bad) = segment
        .chars()
        .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '_' | '-'))
    {
        return Err(invalid(segment, format!("illegal character {bad:?}")));
    }
    if segment.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid(segment, "starts with a digit"));
    }
    Ok(())
}

/// Id of `name` directly under `parent` (`NamespaceId(0)` for a root).
pub fn generate_sub_namespace_id(parent: NamespaceId, name: &str) -> Result<NamespaceId, ModelError> {
    validate_namespace_name(name)?;
    let digest = sha3_256_multi(&[&parent.0.to_le_bytes()[..], name.as_bytes()]);
    Ok(NamespaceId(low_u64(&digest) | NAMESPACE_FLAG))
}

/// Ids of every level of a dotted name, root first.
///
/// `"a.b.c"` yields `[id(a), id(b under a), id(c under b)]`.
pub fn generate_namespace_id(name: &str) -> Result<Vec<NamespaceId>, ModelError> {
    let segments: Vec<&str> = name.split('.').collect();
    if segments.len() > NAMESPACE_MAX_DEPTH {
        return Err(invalid(
            name,
            format!("more than {NAMESPACE_MAX_DEPTH} levels"),
        ));
    }
    let mut parent = NamespaceId(0);
    let mut path = Vec::with_capacity(segments.len());
    for segment in segments {
        parent = generate_sub_namespace_id(parent, segment)?;
        path.push(parent);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "7D08373CFFE4154E129E04F0827E5F3D6907587E348757B0F87D2F839BF88246";

    fn owner() -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&hex::decode(OWNER).unwrap());
        out
    }

    #[test]
    fn mosaic_id_known_answer() {
        let id = generate_mosaic_id(MosaicNonce([0, 0, 0, 0]), &owner());
        assert_eq!(id, MosaicId(0x2FF7_D64F_483B_C0A6));
    }

    #[test]
    fn mosaic_id_never_has_the_namespace_bit() {
        for n in 0u32..64 {
            let id = generate_mosaic_id(MosaicNonce(n.to_le_bytes()), &owner());
            assert_eq!(id.0 & NAMESPACE_FLAG, 0);
        }
    }

    #[test]
    fn namespace_path_known_answer() {
        let path = generate_namespace_id("sample.sub.full").unwrap();
        assert_eq!(
            path,
            vec![
                NamespaceId(0x88B6_4C3B_E2F4_7144),
                NamespaceId(0xFA94_2971_5A71_ACC9),
                NamespaceId(0x8BC7_011B_0B34_4C54),
            ]
        );
    }

    #[test]
    fn path_is_built_from_sub_namespace_ids() {
        let root = generate_sub_namespace_id(NamespaceId(0), "sample").unwrap();
        let sub = generate_sub_namespace_id(root, "sub").unwrap();
        assert_eq!(generate_namespace_id("sample.sub").unwrap(), vec![root, sub]);
    }

    #[test]
    fn depth_four_is_rejected() {
        assert!(generate_namespace_id("sample.sub.full.overload").is_err());
    }

    #[test]
    fn name_character_rules() {
        for ok in ["a", "-sample", "_sample", "sample-1_x", "a0bc"] {
            assert!(generate_namespace_id(ok).is_ok(), "{ok} should be accepted");
        }
        for bad in ["", "a..b", "Sample", "sample*", "sam ple", "sämple", "a.", "0abc", "a.9b"] {
            assert!(generate_namespace_id(bad).is_err(), "{bad} should be rejected");
        }
        let longest = "a".repeat(64);
        assert!(generate_namespace_id(&longest).is_ok());
        assert!(generate_namespace_id(&format!("{longest}a")).is_err());
    }
}
