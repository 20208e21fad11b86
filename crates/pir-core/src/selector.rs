//! Build the one-hot selector vector for a target index and encrypt it.

use std::thread;

use crate::cipher::{ecelgamal_encrypt, ecelgamal_encrypt_fast};
use crate::constants::CIPHER_SIZE;
use crate::error::PirError;
use crate::keys::{PrivKey, PubKey};

/// `Π dᵢ`, the size of the product index space.
pub fn selector_elements_count(index_counts: &[u64]) -> u64 {
    index_counts.iter().product()
}

/// `Σ dᵢ`, the number of ciphers in a selector (one one-hot block per dimension).
pub fn selector_ciphers_count(index_counts: &[u64]) -> u64 {
    index_counts.iter().sum()
}

fn validate(index_counts: &[u64], idx: u64) -> Result<(), PirError> {
    if index_counts.is_empty() {
        return Err(PirError::InvalidParameter("index_counts must not be empty".into()));
    }
    if index_counts.iter().any(|&d| d == 0) {
        return Err(PirError::InvalidParameter("index_counts entries must be non-zero".into()));
    }
    let total = selector_elements_count(index_counts);
    if idx >= total {
        return Err(PirError::InvalidParameter(format!(
            "idx {} out of range for {} elements",
            idx, total
        )));
    }
    Ok(())
}

/// Write the one-hot plaintext pattern into the leading byte of each of the
/// `Σ dᵢ` cipher slots (the rest of each 64-byte slot is left zeroed, to be
/// overwritten by the encrypt pass).
fn plaintext_pattern(index_counts: &[u64], idx: u64) -> Vec<u8> {
    let n_ciphers = selector_ciphers_count(index_counts) as usize;
    let mut plaintext = vec![0u8; n_ciphers];

    let mut idx_ = idx;
    let mut prod: u64 = selector_elements_count(index_counts);
    let mut offset = 0usize;
    for &cols in index_counts {
        prod /= cols;
        let row = idx_ / prod;
        idx_ -= row * prod;
        for r in 0..cols {
            plaintext[offset] = (r == row) as u8;
            offset += 1;
        }
    }
    plaintext
}

enum Key<'a> {
    Public(&'a PubKey),
    Private(&'a PrivKey),
}

fn encrypt_pass(plaintext: &[u8], key: Key) -> Vec<u8> {
    let mut ciphers = vec![0u8; plaintext.len() * CIPHER_SIZE];
    let chunk_count = thread::available_parallelism().map(|n| n.get()).unwrap_or(1).min(plaintext.len().max(1));
    let chunk_size = plaintext.len().div_ceil(chunk_count.max(1)).max(1);

    thread::scope(|scope| {
        for (chunk_idx, cipher_chunk) in ciphers.chunks_mut(chunk_size * CIPHER_SIZE).enumerate() {
            let start = chunk_idx * chunk_size;
            let plain_chunk = &plaintext[start..(start + cipher_chunk.len() / CIPHER_SIZE).min(plaintext.len())];
            let key = &key;
            scope.spawn(move || {
                for (i, &flag) in plain_chunk.iter().enumerate() {
                    let m = flag as u64;
                    let cipher = match key {
                        Key::Public(pk) => ecelgamal_encrypt(pk, m, None),
                        Key::Private(sk) => ecelgamal_encrypt_fast(sk, m, None),
                    };
                    cipher_chunk[i * CIPHER_SIZE..(i + 1) * CIPHER_SIZE].copy_from_slice(&cipher);
                }
            });
        }
    });

    ciphers
}

/// Build a selector under the caller's public key (standard encrypt path).
pub fn selector_create(pubkey: &PubKey, index_counts: &[u64], idx: u64) -> Result<Vec<u8>, PirError> {
    validate(index_counts, idx)?;
    let plaintext = plaintext_pattern(index_counts, idx);
    Ok(encrypt_pass(&plaintext, Key::Public(pubkey)))
}

/// Build a selector under the caller's private key (fast encrypt path).
pub fn selector_create_fast(
    privkey: &PrivKey,
    index_counts: &[u64],
    idx: u64,
) -> Result<Vec<u8>, PirError> {
    validate(index_counts, idx)?;
    let plaintext = plaintext_pattern(index_counts, idx);
    Ok(encrypt_pass(&plaintext, Key::Private(privkey)))
}
