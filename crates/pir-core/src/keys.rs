//! Key generation: draw a uniform scalar, derive its public point.

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;

use crate::constants::SCALAR_SIZE;
use crate::curve;
use crate::error::PirError;

/// A client's private key: a uniformly random scalar mod `ℓ`.
#[derive(Clone)]
pub struct PrivKey(pub(crate) Scalar);

/// A client's public key: `privkey · G`.
#[derive(Clone, Copy)]
pub struct PubKey(pub(crate) EdwardsPoint);

impl PrivKey {
    /// Wrap an already-reduced 32-byte scalar. Used by callers who manage
    /// their own randomness (e.g. deterministic tests); prefer
    /// [`create_privkey`] for production key generation.
    pub fn from_bytes_mod_order(bytes: [u8; SCALAR_SIZE]) -> Self {
        PrivKey(Scalar::from_bytes_mod_order(bytes))
    }

    pub fn to_bytes(&self) -> [u8; SCALAR_SIZE] {
        self.0.to_bytes()
    }
}

impl PubKey {
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, PirError> {
        Ok(PubKey(curve::point_decompress(bytes)?))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        curve::point_compress(&self.0)
    }
}

/// Draw a fresh, uniformly random private key.
pub fn create_privkey() -> PrivKey {
    PrivKey(curve::scalar_random())
}

/// Derive the public key corresponding to a private key.
pub fn pubkey_from_privkey(privkey: &PrivKey) -> PubKey {
    PubKey(curve::point_base_mul(&privkey.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pubkey_roundtrips_through_bytes() {
        let sk = create_privkey();
        let pk = pubkey_from_privkey(&sk);
        let bytes = pk.to_bytes();
        let pk2 = PubKey::from_bytes(&bytes).unwrap();
        assert_eq!(pk.to_bytes(), pk2.to_bytes());
    }

    #[test]
    fn distinct_keys_are_distinct() {
        let a = create_privkey();
        let b = create_privkey();
        assert_ne!(a.to_bytes(), b.to_bytes());
    }
}
