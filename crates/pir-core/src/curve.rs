//! Thin, typed contracts over Curve25519 scalar and Edwards-point arithmetic.
//!
//! Built directly on `curve25519-dalek`: this module does not reimplement field
//! or group arithmetic, it only names the operations the rest of the crate
//! needs and documents their time-variance contract.

use curve25519_dalek::constants::{ED25519_BASEPOINT_POINT, ED25519_BASEPOINT_TABLE};
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::VartimeMultiscalarMul;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::PirError;

/// Draw a scalar uniformly at random over `[0, ℓ)`.
///
/// `Scalar::from_bytes_mod_order` on 32 random bytes would bias the top of the
/// range (the order `ℓ` is slightly less than `2^252`), so this rejects and
/// redraws until the sampled bytes are already a canonical representative —
/// the same rejection-sampling contract as `crypto_core_ed25519_scalar_random`.
pub fn scalar_random() -> Scalar {
    let mut rng = OsRng;
    loop {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        if let Some(s) = Option::from(Scalar::from_canonical_bytes(bytes)) {
            return s;
        }
    }
}

/// Canonical little-endian embedding of a small integer as a scalar.
pub fn scalar_from_u64(x: u64) -> Scalar {
    Scalar::from(x)
}

/// `r·a + b mod ℓ`.
pub fn scalar_muladd(r: &Scalar, a: &Scalar, b: &Scalar) -> Scalar {
    r * a + b
}

/// `s·G` for the fixed base point, using the precomputed basepoint table.
pub fn point_base_mul(s: &Scalar) -> EdwardsPoint {
    s * ED25519_BASEPOINT_TABLE
}

/// `s·P` for a variable point, constant-time in `s`.
pub fn point_mul(s: &Scalar, p: &EdwardsPoint) -> EdwardsPoint {
    s * p
}

/// `r·G + m·P`, variable-time.
///
/// Safe to use whenever both scalars are public to the caller performing the
/// multiplication — true for every call site in this crate: the encrypter
/// owns `r`, and `m ∈ {0, 1}` for selector slots.
pub fn point_double_scalarmult_vartime(r: &Scalar, p: &EdwardsPoint, m: &Scalar) -> EdwardsPoint {
    EdwardsPoint::vartime_multiscalar_mul([r, m], [&ED25519_BASEPOINT_POINT, p])
}

pub fn point_add(a: &EdwardsPoint, b: &EdwardsPoint) -> EdwardsPoint {
    a + b
}

pub fn point_sub(a: &EdwardsPoint, b: &EdwardsPoint) -> EdwardsPoint {
    a - b
}

pub fn point_compress(p: &EdwardsPoint) -> [u8; 32] {
    p.compress().to_bytes()
}

pub fn point_decompress(bytes: &[u8; 32]) -> Result<EdwardsPoint, PirError> {
    CompressedEdwardsY(*bytes)
        .decompress()
        .ok_or(PirError::BadPointEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_random_is_canonical() {
        for _ in 0..64 {
            let s = scalar_random();
            assert!(bool::from(Scalar::from_canonical_bytes(s.to_bytes()).is_some()));
        }
    }

    #[test]
    fn base_mul_matches_double_scalarmult_with_zero_m() {
        let r = scalar_from_u64(7);
        let p = point_base_mul(&scalar_from_u64(9));
        let direct = point_base_mul(&r);
        let via_double = point_double_scalarmult_vartime(&r, &p, &Scalar::ZERO);
        assert_eq!(point_compress(&direct), point_compress(&via_double));
    }

    #[test]
    fn decompress_rejects_garbage() {
        // A byte string with the high bit set and low bytes all 0xFF is not a
        // valid Edwards y-coordinate in canonical form for this curve.
        let bytes = [0xFFu8; 32];
        assert!(point_decompress(&bytes).is_err());
    }

    #[test]
    fn add_sub_roundtrip() {
        let a = point_base_mul(&scalar_from_u64(3));
        let b = point_base_mul(&scalar_from_u64(5));
        let sum = point_add(&a, &b);
        let back = point_sub(&sum, &b);
        assert_eq!(point_compress(&back), point_compress(&a));
    }
}
