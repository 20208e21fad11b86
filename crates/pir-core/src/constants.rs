//! Fixed sizes and defaults shared across the PIR cryptographic core.

/// Length in bytes of a canonical little-endian scalar mod the subgroup order.
pub const SCALAR_SIZE: usize = 32;

/// Length in bytes of a compressed Edwards point.
pub const POINT_SIZE: usize = 32;

/// Length in bytes of an EC-ElGamal cipher (`c1 ‖ c2`).
pub const CIPHER_SIZE: usize = 2 * POINT_SIZE;

/// On-disk/on-wire size of one `mG` table entry (`point ‖ scalar`).
pub const MG_ENTRY_SIZE: usize = POINT_SIZE + 4;

/// Default size of the discrete-log lookup table: `2^24` entries.
pub const DEFAULT_MMAX: u64 = 1 << 24;

/// Upper bound (inclusive) on the `packing` parameter of `reply_decrypt`.
pub const MAX_PACKING: u8 = 4;

/// Batch size used by the table loader when reading entries from a byte source.
pub const LOAD_BATCH_SIZE: usize = 1024;
