//! Lifted EC-ElGamal: encrypt a small integer, decrypt back to a lifted point
//! or (given the `mG` table) all the way to the integer.

use curve25519_dalek::scalar::Scalar;
use log::trace;

use crate::constants::{CIPHER_SIZE, POINT_SIZE};
use crate::curve;
use crate::error::PirError;
use crate::keys::{PrivKey, PubKey};
use crate::mg_search;
use crate::mg_table::MgTable;

/// A 64-byte EC-ElGamal cipher: `compress(c1) ‖ compress(c2)`.
pub type Cipher = [u8; CIPHER_SIZE];

/// Interprets `bytes` as an already-reduced scalar, the same contract as the
/// original's `memcpy(rr, r, EPIR_SCALAR_SIZE)`: the caller supplying `r` is
/// responsible for passing a canonical representative, exactly as every
/// other `Scalar` crossing this crate's boundary must be. A non-canonical
/// `r` is a precondition violation, not a value to be silently re-reduced
/// into a different scalar than what the caller asked to use.
fn randomness(r: Option<[u8; 32]>) -> Scalar {
    match r {
        Some(bytes) => Option::from(Scalar::from_canonical_bytes(bytes))
            .expect("r must be a canonical, already-reduced scalar"),
        None => curve::scalar_random(),
    }
}

/// Standard encrypt: `(r·G, r·P + m·G)` under the recipient's public key.
pub fn ecelgamal_encrypt(pubkey: &PubKey, m: u64, r: Option<[u8; 32]>) -> Cipher {
    let rr = randomness(r);
    let c1 = curve::point_base_mul(&rr);
    let mm = curve::scalar_from_u64(m);
    // point_double_scalarmult_vartime(a, P, b) = a·G + b·P, so to get
    // r·P + m·G the roles are swapped: first scalar multiplies G.
    let c2 = curve::point_double_scalarmult_vartime(&mm, &pubkey.0, &rr);

    let mut out = [0u8; CIPHER_SIZE];
    out[..POINT_SIZE].copy_from_slice(&curve::point_compress(&c1));
    out[POINT_SIZE..].copy_from_slice(&curve::point_compress(&c2));
    out
}

/// Fast encrypt: same distribution as [`ecelgamal_encrypt`] when `pubkey =
/// privkey·G`, but replaces the variable-base multiply with a scalar
/// muladd and a second base multiply — cheaper when the encrypter already
/// knows the discrete log of its own public key.
pub fn ecelgamal_encrypt_fast(privkey: &PrivKey, m: u64, r: Option<[u8; 32]>) -> Cipher {
    let rr = randomness(r);
    let c1 = curve::point_base_mul(&rr);
    let mm = curve::scalar_from_u64(m);
    let rr2 = curve::scalar_muladd(&rr, &privkey.0, &mm);
    let c2 = curve::point_base_mul(&rr2);

    let mut out = [0u8; CIPHER_SIZE];
    out[..POINT_SIZE].copy_from_slice(&curve::point_compress(&c1));
    out[POINT_SIZE..].copy_from_slice(&curve::point_compress(&c2));
    out
}

/// Decrypt `cipher` to the lifted point `M = c2 − privkey·c1`, overwriting the
/// first [`POINT_SIZE`] bytes of `cipher` with `compress(M)` in place. The
/// remaining bytes of `cipher` are left as-is and must not be relied upon.
pub fn ecelgamal_decrypt_to_mg(privkey: &PrivKey, cipher: &mut [u8]) -> Result<(), PirError> {
    let c1_bytes: [u8; 32] = cipher[..POINT_SIZE].try_into().unwrap();
    let c2_bytes: [u8; 32] = cipher[POINT_SIZE..CIPHER_SIZE].try_into().unwrap();
    let c1 = curve::point_decompress(&c1_bytes)?;
    let c2 = curve::point_decompress(&c2_bytes)?;

    let shared = curve::point_mul(&privkey.0, &c1);
    let m = curve::point_sub(&c2, &shared);
    cipher[..POINT_SIZE].copy_from_slice(&curve::point_compress(&m));
    Ok(())
}

/// Decrypt `cipher` all the way to the plaintext integer by looking up its
/// lifted point in `mg`.
pub fn ecelgamal_decrypt(
    privkey: &PrivKey,
    cipher: &mut [u8],
    mg: &MgTable,
) -> Result<u32, PirError> {
    ecelgamal_decrypt_to_mg(privkey, cipher)?;
    let point: [u8; 32] = cipher[..POINT_SIZE].try_into().unwrap();
    let m = mg_search::interpolation_search(&point, mg).ok_or(PirError::NotInTable)?;
    trace!("ecelgamal_decrypt: recovered m={}", m);
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{create_privkey, pubkey_from_privkey};
    use crate::mg_table::mg_generate;

    #[test]
    fn encrypt_variants_agree_on_fixed_randomness() {
        let sk = create_privkey();
        let pk = pubkey_from_privkey(&sk);
        let r_hex = "0100000000000000000000000000000000000000000000000000000000000000";
        let r: [u8; 32] = hex::decode(r_hex).unwrap().try_into().unwrap();

        let standard = ecelgamal_encrypt(&pk, 42, Some(r));
        let fast = ecelgamal_encrypt_fast(&sk, 42, Some(r));
        assert_eq!(
            hex::encode(standard),
            hex::encode(fast),
            "standard and fast encrypt must be byte-identical under shared randomness"
        );
    }

    #[test]
    fn roundtrip_small_table() {
        let mg = mg_generate(1000, |_| {});
        let sk = create_privkey();
        let pk = pubkey_from_privkey(&sk);

        for m in [0u64, 1, 7, 255, 999] {
            let mut c1 = ecelgamal_encrypt(&pk, m, None);
            assert_eq!(ecelgamal_decrypt(&sk, &mut c1, &mg).unwrap(), m as u32);

            let mut c2 = ecelgamal_encrypt_fast(&sk, m, None);
            assert_eq!(ecelgamal_decrypt(&sk, &mut c2, &mg).unwrap(), m as u32);
        }
    }

    #[test]
    fn decrypt_out_of_table_is_not_in_table() {
        let mg = mg_generate(1000, |_| {});
        let sk = create_privkey();
        let pk = pubkey_from_privkey(&sk);

        let mut cipher = ecelgamal_encrypt(&pk, 1000, None);
        let err = ecelgamal_decrypt(&sk, &mut cipher, &mg).unwrap_err();
        assert!(matches!(err, PirError::NotInTable));
    }
}
