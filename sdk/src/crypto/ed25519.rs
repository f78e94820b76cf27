//! Ed25519 parameterized over its 512-bit hash.
//!
//! RFC 8032 hard-wires SHA-512. The network instead signs with SHA3-512, and
//! some tooling still expects the SHA-512 flavour, so the hash is a type
//! parameter here. Everything else is textbook Ed25519:
//!
//! ```text
//! h      = H(seed)                      64 bytes
//! a      = clamp(h[0..32])              secret scalar
//! A      = a·B                          public key
//! r      = H(h[32..64] ‖ M) mod L       per-message nonce
//! R      = r·B
//! k      = H(R ‖ A ‖ M) mod L
//! S      = (r + k·a) mod L              signature = R ‖ S
//! verify:  S·B == R + k·A
//! ```
//!
//! Curve and field arithmetic (q = 2^255 − 19, L = 2^252 +
//! 27742317777372353535851937790883648493, extended twisted Edwards
//! coordinates, fixed-base table for `·B`) come from `curve25519-dalek`.
//! The hash is the only moving part, and it is a protocol parameter: a key
//! expanded under one hash produces a different public key than under the
//! other, and signatures never cross over.

use curve25519_dalek::constants::ED25519_BASEPOINT_TABLE;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use sha2::digest::consts::U64;
use sha2::Digest;

use super::signatures::SignatureError;

pub const SEED_LENGTH: usize = 32;
pub const PUBLIC_KEY_LENGTH: usize = 32;
pub const SIGNATURE_LENGTH: usize = 64;

/// The secret half of an expanded seed.
pub(crate) struct ExpandedSecret {
    scalar: Scalar,
    nonce_prefix: [u8; 32],
}

fn wide_scalar<H: Digest<OutputSize = U64>>(parts: &[&[u8]]) -> Scalar {
    let mut hasher = H::new();
    for part in parts {
        hasher.update(part);
    }
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&hasher.finalize());
    Scalar::from_bytes_mod_order_wide(&wide)
}

/// Hash the seed and clamp the lower half into the secret scalar.
pub(crate) fn expand<H: Digest<OutputSize = U64>>(seed: &[u8; SEED_LENGTH]) -> ExpandedSecret {
    let h = H::digest(seed);
    let mut lower = [0u8; 32];
    lower.copy_from_slice(&h[..32]);
    lower[0] &= 248;
    lower[31] &= 127;
    lower[31] |= 64;
    let mut nonce_prefix = [0u8; 32];
    nonce_prefix.copy_from_slice(&h[32..]);
    // The clamped value may exceed L; B has order L, so reducing first does
    // not change a·B.
    ExpandedSecret {
        scalar: Scalar::from_bytes_mod_order(lower),
        nonce_prefix,
    }
}

/// Derive the 32-byte public key for `seed`.
pub(crate) fn public_key<H: Digest<OutputSize = U64>>(
    seed: &[u8; SEED_LENGTH],
) -> [u8; PUBLIC_KEY_LENGTH] {
    let secret = expand::<H>(seed);
    (&secret.scalar * ED25519_BASEPOINT_TABLE)
        .compress()
        .to_bytes()
}

/// Produce `R ‖ S` for `message`.
pub(crate) fn sign<H: Digest<OutputSize = U64>>(
    seed: &[u8; SEED_LENGTH],
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    message: &[u8],
) -> [u8; SIGNATURE_LENGTH] {
    let secret = expand::<H>(seed);
    let r = wide_scalar::<H>(&[&secret.nonce_prefix[..], message]);
    let big_r = (&r * ED25519_BASEPOINT_TABLE).compress();
    let k = wide_scalar::<H>(&[&big_r.as_bytes()[..], &public_key[..], message]);
    let s = r + k * secret.scalar;

    let mut signature = [0u8; SIGNATURE_LENGTH];
    signature[..32].copy_from_slice(big_r.as_bytes());
    signature[32..].copy_from_slice(s.as_bytes());
    signature
}

fn decompress(bytes: &[u8; 32]) -> Option<EdwardsPoint> {
    CompressedEdwardsY(*bytes).decompress()
}

/// Check `S·B == R + k·A`.
///
/// Both points must decode onto the curve and lie outside the small-order
/// torsion subgroup, and `S` must be a canonical scalar. Anything else is a
/// bad signature, not a malformed input, because the lengths were already
/// right.
pub(crate) fn verify<H: Digest<OutputSize = U64>>(
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    signature: &[u8; SIGNATURE_LENGTH],
    message: &[u8],
) -> Result<(), SignatureError> {
    let mut r_bytes = [0u8; 32];
    r_bytes.copy_from_slice(&signature[..32]);
    let mut s_bytes = [0u8; 32];
    s_bytes.copy_from_slice(&signature[32..]);

    let a = decompress(public_key).ok_or(SignatureError::BadSignature)?;
    let big_r = decompress(&r_bytes).ok_or(SignatureError::BadSignature)?;
    if a.is_small_order() || big_r.is_small_order() {
        return Err(SignatureError::BadSignature);
    }
    let s = Option::<Scalar>::from(Scalar::from_canonical_bytes(s_bytes))
        .ok_or(SignatureError::BadSignature)?;

    let k = wide_scalar::<H>(&[&r_bytes[..], &public_key[..], message]);
    let lhs = &s * ED25519_BASEPOINT_TABLE;
    let rhs = big_r + k * a;

    if lhs.compress() == rhs.compress() {
        Ok(())
    } else {
        Err(SignatureError::BadSignature)
    }
}
