//! Cryptographic core of a Private Information Retrieval (PIR) client,
//! built on lifted EC-ElGamal over Curve25519.
//!
//! A client issues an encrypted *selector vector* ([`selector`]) that
//! designates one element in a multi-dimensional array held by an untrusted
//! server; the server performs homomorphic inner-product evaluation (out of
//! scope for this crate) and returns ciphertexts which the client decrypts
//! ([`reply`]) to recover small integer plaintexts.
//!
//! Because ElGamal encryption lifts the message `m` to `m·G`, recovering `m`
//! from the decrypted point requires a precomputed discrete-log table
//! ([`mg_table`], searched by [`mg_search`]). Building that table is the one
//! expensive, parallel, offline step; everything downstream of it is cheap.

pub mod cipher;
pub mod constants;
pub mod curve;
pub mod error;
pub mod keys;
pub mod mg_search;
pub mod mg_table;
pub mod reply;
pub mod selector;
pub mod table_io;

pub use cipher::{ecelgamal_decrypt, ecelgamal_decrypt_to_mg, ecelgamal_encrypt, ecelgamal_encrypt_fast, Cipher};
pub use constants::DEFAULT_MMAX;
pub use error::PirError;
pub use keys::{create_privkey, pubkey_from_privkey, PrivKey, PubKey};
pub use mg_table::{mg_generate, MgEntry, MgTable};
pub use reply::reply_decrypt;
pub use selector::{selector_create, selector_create_fast, selector_ciphers_count, selector_elements_count};
pub use table_io::{mg_table_load, mg_table_write};
