//! Error types surfaced by the PIR cryptographic core.

use thiserror::Error;

/// Failure modes of the primitives in this crate.
///
/// `ShortTable` from the design is intentionally not a variant here: the table
/// loader (`table_io::mg_table_load`) always succeeds and returns the number of
/// entries it actually read, leaving the fatal/non-fatal judgment to the caller.
#[derive(Debug, Error)]
pub enum PirError {
    #[error("compressed bytes do not decode to a valid curve point")]
    BadPointEncoding,

    #[error("decrypted point is not in the discrete-log table")]
    NotInTable,

    #[error("reply could not be decrypted: {0}")]
    ReplyUndecryptable(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("table I/O error: {0}")]
    Io(#[from] std::io::Error),
}
